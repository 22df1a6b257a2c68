//! Packed occupancy plus per-player anchor frontiers.
//!
//! # Frontier
//!
//! ```text
//! open_corners[player][direction]: BTreeSet<Pos>
//!
//!   direction d holds cells diagonal (by d) to a corner of class d of one of
//!   the player's pieces. A new piece uses such an anchor with a corner of
//!   class opposite(d).
//! ```
//!
//! Each player starts with one seed anchor in their board corner.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::bits::BitBoard;
use crate::error::PlaceError;
use crate::geometry::{Direction, Geometry, Pos};
use crate::piece::{Catalog, PieceId, PieceVariant, VariantId};
use crate::Player;

/// A placement: which variant, with its bounding box's top-left at `at`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Move {
    pub variant: VariantId,
    pub at: Pos,
}

impl Move {
    #[inline]
    pub fn piece(&self) -> PieceId {
        self.variant.piece
    }
}

type Frontier = [BTreeSet<Pos>; Direction::COUNT];

/// Game state for four players on one board.
#[derive(Clone, Debug)]
pub struct Board {
    catalog: Arc<Catalog>,
    occupancy: BitBoard,
    open_corners: [Frontier; Player::COUNT],
    remaining: [BTreeSet<PieceId>; Player::COUNT],
}

impl Board {
    /// Empty board with every piece in every player's hand.
    pub fn new(catalog: Arc<Catalog>) -> Board {
        let geometry = catalog.geometry();
        let right = geometry.width() - 1;
        let bottom = geometry.height() - 1;

        let mut open_corners: [Frontier; Player::COUNT] = Default::default();
        let seeds = [
            (Player::One, Pos::new(0, 0), Direction::PosPos),
            (Player::Two, Pos::new(right, 0), Direction::NegPos),
            (Player::Three, Pos::new(0, bottom), Direction::PosNeg),
            (Player::Four, Pos::new(right, bottom), Direction::NegNeg),
        ];
        for (player, cell, dir) in seeds {
            open_corners[player.index()][dir.index()].insert(cell);
        }

        let all: BTreeSet<PieceId> = catalog.pieces().iter().map(|p| p.id()).collect();

        Board {
            occupancy: BitBoard::zeros(geometry.bit_len()),
            open_corners,
            remaining: std::array::from_fn(|_| all.clone()),
            catalog,
        }
    }

    // ========== Accessors ==========

    #[inline]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        self.catalog.geometry()
    }

    #[inline]
    pub fn width(&self) -> u8 {
        self.geometry().width()
    }

    #[inline]
    pub fn height(&self) -> u8 {
        self.geometry().height()
    }

    /// Packed occupancy, one-hot per occupied cell.
    #[inline]
    pub fn occupancy(&self) -> &BitBoard {
        &self.occupancy
    }

    /// Owner of `cell`, or `None` when empty or off the board.
    pub fn cell(&self, cell: Pos) -> Option<Player> {
        let geometry = self.geometry();
        if !geometry.contains(cell.x as i32, cell.y as i32) {
            return None;
        }
        let nibble = self
            .occupancy
            .nibble(geometry.cell_bit(cell.x as usize, cell.y as usize));
        if nibble == 0 {
            return None;
        }
        Player::from_index(7 - nibble.leading_zeros() as usize)
    }

    /// Pieces `player` has not placed yet, ascending.
    #[inline]
    pub fn remaining(&self, player: Player) -> &BTreeSet<PieceId> {
        &self.remaining[player.index()]
    }

    /// Current anchors of `player` in direction `dir`.
    #[inline]
    pub fn open_corners(&self, player: Player, dir: Direction) -> &BTreeSet<Pos> {
        &self.open_corners[player.index()][dir.index()]
    }

    /// True if `cell` is empty and has no edge neighbor owned by `player`.
    pub fn is_open_corner(&self, player: Player, cell: Pos) -> bool {
        let geometry = self.geometry();
        geometry.contains(cell.x as i32, cell.y as i32)
            && geometry.is_open_corner(&self.occupancy, player, cell)
    }

    /// Board cells covered by `variant` placed at `at`.
    ///
    /// `None` for an unknown variant or a cell past coordinate 255.
    pub fn footprint(&self, variant: VariantId, at: Pos) -> Option<Vec<Pos>> {
        let variant = self.catalog.variant(variant)?;
        variant
            .shape()
            .filled_cells()
            .map(|c| Some(Pos::new(at.x.checked_add(c.x)?, at.y.checked_add(c.y)?)))
            .collect()
    }

    // ========== Move Generation ==========

    /// Legal top-left positions of every variant of `piece` for `player`.
    ///
    /// One list per variant, in variant order; each list is sorted row-major
    /// with no duplicates. Ownership of the piece is not checked here. An
    /// unknown piece yields no lists.
    pub fn positions(&self, player: Player, piece: PieceId) -> Vec<Vec<Pos>> {
        let Some(piece) = self.catalog.piece(piece) else {
            return Vec::new();
        };
        piece
            .variants()
            .iter()
            .map(|variant| self.variant_positions(player, variant))
            .collect()
    }

    fn variant_positions(&self, player: Player, variant: &PieceVariant) -> Vec<Pos> {
        let geometry = self.geometry();
        let mut found = BTreeSet::new();

        for dir in Direction::all() {
            let anchors = &self.open_corners[player.index()][dir.opposite().index()];
            if anchors.is_empty() {
                continue;
            }
            for corner in variant.corners(dir) {
                for anchor in anchors {
                    let x = anchor.x as i32 - corner.x as i32;
                    let y = anchor.y as i32 - corner.y as i32;
                    if !geometry.contains_box(x, y, variant.width(), variant.height()) {
                        continue;
                    }
                    let at = Pos::new(x as u8, y as u8);
                    if !found.contains(&at) && !self.is_blocked(player, variant, at) {
                        found.insert(at);
                    }
                }
            }
        }

        found.into_iter().collect()
    }

    /// Exclusion mask test for an in-bounds placement.
    fn is_blocked(&self, player: Player, variant: &PieceVariant, at: Pos) -> bool {
        variant
            .exclusion(player)
            .collides(self.geometry(), &self.occupancy, at)
    }

    /// Every legal move of `player`, computed lazily from the current state.
    ///
    /// Pieces come in ascending id order, then variants, then positions.
    pub fn moves(&self, player: Player) -> impl Iterator<Item = Move> + '_ {
        self.remaining[player.index()]
            .iter()
            .flat_map(move |&piece| {
                self.positions(player, piece)
                    .into_iter()
                    .enumerate()
                    .flat_map(move |(index, cells)| {
                        let variant = VariantId {
                            piece,
                            index: index as u8,
                        };
                        cells.into_iter().map(move |at| Move { variant, at })
                    })
            })
    }

    /// True if `player` has at least one legal move.
    pub fn has_moves(&self, player: Player) -> bool {
        self.moves(player).next().is_some()
    }

    // ========== Placement ==========

    /// Place `variant` for `player` with its top-left at `at`.
    ///
    /// All checks run before any mutation; on error the board is unchanged.
    pub fn place(&mut self, player: Player, variant: VariantId, at: Pos) -> Result<(), PlaceError> {
        let catalog = Arc::clone(&self.catalog);
        let geometry = catalog.geometry();
        let piece_variant = catalog
            .variant(variant)
            .ok_or(PlaceError::UnknownVariant(variant))?;

        if !self.remaining[player.index()].contains(&variant.piece) {
            return Err(PlaceError::PieceNotOwned {
                player,
                piece: variant.piece,
            });
        }
        if !geometry.contains_box(
            at.x as i32,
            at.y as i32,
            piece_variant.width(),
            piece_variant.height(),
        ) {
            return Err(PlaceError::OutOfBounds { variant, at });
        }
        if self.is_blocked(player, piece_variant, at) {
            return Err(PlaceError::Blocked { variant, at });
        }
        if !self.is_anchored(player, piece_variant, at) {
            return Err(PlaceError::NotAnchored { variant, at });
        }

        self.remaining[player.index()].remove(&variant.piece);
        let shift = geometry.cell_bit(at.x as usize, at.y as usize) as isize;
        self.occupancy |= &piece_variant.occupancy(player).shifted(shift);

        self.repair_frontier(player, piece_variant, at);

        debug!(
            "{:?} placed piece {} variant {} at {}, {} anchors open",
            player,
            variant.piece.0,
            variant.index,
            at,
            self.open_corners[player.index()]
                .iter()
                .map(BTreeSet::len)
                .sum::<usize>()
        );
        Ok(())
    }

    fn is_anchored(&self, player: Player, variant: &PieceVariant, at: Pos) -> bool {
        Direction::all().any(|dir| {
            let anchors = &self.open_corners[player.index()][dir.index()];
            variant
                .corners(dir.opposite())
                .iter()
                .any(|c| anchors.contains(&Pos::new(at.x + c.x, at.y + c.y)))
        })
    }

    /// Add the new piece's outward anchors, then drop every anchor of every
    /// player that the placement closed.
    fn repair_frontier(&mut self, player: Player, variant: &PieceVariant, at: Pos) {
        let geometry = self.catalog.geometry();

        for dir in Direction::all() {
            let (dx, dy) = dir.delta();
            let anchors = &mut self.open_corners[player.index()][dir.index()];
            for corner in variant.corners(dir) {
                let x = at.x as i32 + corner.x as i32 + dx;
                let y = at.y as i32 + corner.y as i32 + dy;
                if geometry.contains(x, y) {
                    anchors.insert(Pos::new(x as u8, y as u8));
                }
            }
        }

        let occupancy = &self.occupancy;
        for other in Player::all() {
            for (d, anchors) in self.open_corners[other.index()].iter_mut().enumerate() {
                anchors.retain(|&cell| {
                    let open = geometry.is_open_corner(occupancy, other, cell);
                    if !open {
                        trace!("{:?} lost anchor {} (direction {})", other, cell, d);
                    }
                    open
                });
            }
        }
    }
}
