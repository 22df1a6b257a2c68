//! Text output: plain `Display`, a colored debug view, and a serde snapshot.

use std::fmt;

use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::geometry::{Direction, Pos};
use crate::piece::PieceId;
use crate::Player;

const EMPTY: char = '-';
const ANCHOR: char = '+';

/// One character per cell: `-` when empty, else the owner's digit.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            for x in 0..self.width() {
                let c = self.cell(Pos::new(x, y)).map_or(EMPTY, Player::digit);
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Options for [`Board::render`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Paint cells in their owner's terminal color.
    pub color: bool,
    /// Mark empty anchor cells with `+`.
    pub corners: bool,
}

fn player_color(player: Player) -> Color {
    match player {
        Player::One => Color::Red,
        Player::Two => Color::Yellow,
        Player::Three => Color::Green,
        Player::Four => Color::Blue,
    }
}

impl Board {
    /// First player holding `cell` as an anchor in any direction.
    fn anchor_owner(&self, cell: Pos) -> Option<Player> {
        Player::all().find(|&player| {
            Direction::all().any(|dir| self.open_corners(player, dir).contains(&cell))
        })
    }

    /// Debug rendering with optional colors and anchor markers.
    pub fn render(&self, options: RenderOptions) -> String {
        let mut out = String::with_capacity((self.width() as usize + 1) * self.height() as usize);
        for y in 0..self.height() {
            for x in 0..self.width() {
                let cell = Pos::new(x, y);
                let (c, owner) = match self.cell(cell) {
                    Some(player) => (player.digit(), Some(player)),
                    None => match self.anchor_owner(cell).filter(|_| options.corners) {
                        Some(player) => (ANCHOR, Some(player)),
                        None => (EMPTY, None),
                    },
                };
                match owner.filter(|_| options.color) {
                    Some(player) => {
                        let painted = c.to_string().color(player_color(player));
                        out.push_str(&painted.to_string());
                    }
                    None => out.push(c),
                }
            }
            out.push('\n');
        }
        out
    }

    /// Serializable view of the board.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.width(),
            height: self.height(),
            rows: self.to_string().lines().map(str::to_string).collect(),
            remaining: Player::all()
                .map(|player| self.remaining(player).iter().copied().collect())
                .collect(),
            open_corners: Player::all()
                .map(|player| {
                    let mut cells: Vec<Pos> = Direction::all()
                        .flat_map(|dir| self.open_corners(player, dir).iter().copied())
                        .collect();
                    cells.sort();
                    cells.dedup();
                    cells
                })
                .collect(),
        }
    }
}

/// Board state as plain data, indexed by player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub width: u8,
    pub height: u8,
    /// `Display` output, one string per row.
    pub rows: Vec<String>,
    pub remaining: Vec<Vec<PieceId>>,
    /// Union of each player's anchors, row-major.
    pub open_corners: Vec<Vec<Pos>>,
}
