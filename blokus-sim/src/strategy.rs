//! Move selection for self-play.
//!
//! Besides uniform play, strategies rank moves by a [`Heuristic`] and take
//! the best ([`GreedyMax`]) or worst ([`GreedyMin`]) one. [`Mix`] and
//! [`Opening`] combine two strategies.

use std::cmp::Reverse;

use blokus_core::geometry::CELL_BITS;
use blokus_core::{Board, Move, Player};
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::config::{SimConfig, StrategyKind};
use crate::error::SimError;

/// Picks one legal move, or `None` to pass.
pub trait Strategy {
    fn name(&self) -> String;

    fn choose(&mut self, board: &Board, player: Player, rng: &mut StdRng) -> Option<Move>;
}

/// Scores a legal move for the player about to make it.
pub trait Heuristic {
    fn name(&self) -> String;

    fn score(&self, board: &Board, player: Player, mov: Move) -> i64;
}

/// Uniform over all legal moves.
#[derive(Clone, Copy, Debug, Default)]
pub struct Random;

impl Strategy for Random {
    fn name(&self) -> String {
        "random".to_owned()
    }

    fn choose(&mut self, board: &Board, player: Player, rng: &mut StdRng) -> Option<Move> {
        let moves: Vec<Move> = board.moves(player).collect();
        moves.choose(rng).copied()
    }
}

// ========== Heuristics ==========

/// Cells covered by the placed piece.
#[derive(Clone, Copy, Debug, Default)]
pub struct PieceSize;

impl Heuristic for PieceSize {
    fn name(&self) -> String {
        "size".to_owned()
    }

    fn score(&self, board: &Board, _player: Player, mov: Move) -> i64 {
        board
            .catalog()
            .piece(mov.piece())
            .map_or(0, |p| p.cell_count() as i64)
    }
}

/// Legal moves the player has left once the move is made.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mobility;

impl Heuristic for Mobility {
    fn name(&self) -> String {
        "mobility".to_owned()
    }

    fn score(&self, board: &Board, player: Player, mov: Move) -> i64 {
        after(board, player, mov).map_or(0, |next| next.moves(player).count() as i64)
    }
}

/// Legal moves all opponents have left once the move is made.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnemyMobility;

impl Heuristic for EnemyMobility {
    fn name(&self) -> String {
        "enemy mobility".to_owned()
    }

    fn score(&self, board: &Board, player: Player, mov: Move) -> i64 {
        after(board, player, mov).map_or(0, |next| {
            opponents(player)
                .map(|p| next.moves(p).count() as i64)
                .sum()
        })
    }
}

/// Point a [`Distance`] is measured to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Middle of the board.
    Center,
    /// The player's own starting corner.
    Corner,
    /// Centroid of the opponent covering the most cells.
    Opponent,
}

/// Squared distance from the nearest corner of the move's bounding box to a
/// target, in half-cell units.
#[derive(Clone, Copy, Debug)]
pub struct Distance(pub Target);

impl Heuristic for Distance {
    fn name(&self) -> String {
        match self.0 {
            Target::Center => "distance to center",
            Target::Corner => "distance to own corner",
            Target::Opponent => "distance to leader",
        }
        .to_owned()
    }

    fn score(&self, board: &Board, player: Player, mov: Move) -> i64 {
        let Some(variant) = board.catalog().variant(mov.variant) else {
            return 0;
        };
        let (tx, ty) = match self.0 {
            Target::Center => (board.width() as i64, board.height() as i64),
            Target::Corner => corner_point(board, player),
            Target::Opponent => leader_point(board, player),
        };

        let (x0, y0) = (2 * mov.at.x as i64, 2 * mov.at.y as i64);
        let (x1, y1) = (x0 + 2 * variant.width() as i64, y0 + 2 * variant.height() as i64);
        [(x0, y0), (x1, y0), (x0, y1), (x1, y1)]
            .into_iter()
            .map(|(x, y)| (x - tx).pow(2) + (y - ty).pow(2))
            .min()
            .unwrap_or(0)
    }
}

fn after(board: &Board, player: Player, mov: Move) -> Option<Board> {
    let mut next = board.clone();
    next.place(player, mov.variant, mov.at).ok()?;
    Some(next)
}

fn opponents(player: Player) -> impl Iterator<Item = Player> {
    Player::all().filter(move |&p| p != player)
}

/// Outer corner of the player's starting cell, in half-cell units.
fn corner_point(board: &Board, player: Player) -> (i64, i64) {
    let (w, h) = (2 * board.width() as i64, 2 * board.height() as i64);
    match player {
        Player::One => (0, 0),
        Player::Two => (w, 0),
        Player::Three => (0, h),
        Player::Four => (w, h),
    }
}

/// Cell-center centroid of the opponent with the most cells, in half-cell
/// units. Ties go to the earlier seat; an opponent without cells is
/// represented by its corner.
fn leader_point(board: &Board, player: Player) -> (i64, i64) {
    let width = board.width() as usize;
    let mut count = [0i64; Player::COUNT];
    let mut sum = [(0i64, 0i64); Player::COUNT];
    for bit in board.occupancy().iter_ones() {
        let (cell, owner) = (bit / CELL_BITS, bit % CELL_BITS);
        count[owner] += 1;
        sum[owner].0 += 2 * (cell % width) as i64 + 1;
        sum[owner].1 += 2 * (cell / width) as i64 + 1;
    }

    let leader = opponents(player)
        .max_by_key(|p| (count[p.index()], Reverse(p.index())))
        .unwrap_or_else(|| player.next());
    let n = count[leader.index()];
    if n == 0 {
        return corner_point(board, leader);
    }
    let (sx, sy) = sum[leader.index()];
    (sx / n, sy / n)
}

// ========== Greedy Selection ==========

/// Highest-scoring move, ties broken at random.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyMax<H>(pub H);

impl<H: Heuristic> Strategy for GreedyMax<H> {
    fn name(&self) -> String {
        format!("max {}", self.0.name())
    }

    fn choose(&mut self, board: &Board, player: Player, rng: &mut StdRng) -> Option<Move> {
        let mut moves: Vec<Move> = board.moves(player).collect();
        // Shuffle so the pick among equals is random
        moves.shuffle(rng);
        moves
            .into_iter()
            .max_by_key(|&mov| self.0.score(board, player, mov))
    }
}

/// Lowest-scoring move, ties broken at random.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyMin<H>(pub H);

impl<H: Heuristic> Strategy for GreedyMin<H> {
    fn name(&self) -> String {
        format!("min {}", self.0.name())
    }

    fn choose(&mut self, board: &Board, player: Player, rng: &mut StdRng) -> Option<Move> {
        let mut moves: Vec<Move> = board.moves(player).collect();
        moves.shuffle(rng);
        moves
            .into_iter()
            .min_by_key(|&mov| self.0.score(board, player, mov))
    }
}

// ========== Combinators ==========

/// Plays `first` with probability `ratio` on each turn, `second` otherwise.
pub struct Mix {
    first: Box<dyn Strategy>,
    second: Box<dyn Strategy>,
    ratio: f64,
}

impl Mix {
    pub fn new(
        first: Box<dyn Strategy>,
        second: Box<dyn Strategy>,
        ratio: f64,
    ) -> Result<Mix, SimError> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(SimError::Usage(format!(
                "mix ratio must be between 0 and 1, got {}",
                ratio
            )));
        }
        Ok(Mix {
            first,
            second,
            ratio,
        })
    }
}

impl Strategy for Mix {
    fn name(&self) -> String {
        let percent = (self.ratio * 100.0).round() as u32;
        format!(
            "{}% {}, {}% {}",
            percent,
            self.first.name(),
            100 - percent,
            self.second.name()
        )
    }

    fn choose(&mut self, board: &Board, player: Player, rng: &mut StdRng) -> Option<Move> {
        if rng.random_bool(self.ratio) {
            self.first.choose(board, player, rng)
        } else {
            self.second.choose(board, player, rng)
        }
    }
}

/// Plays `first` for each player's first `moves` placements, then `second`.
pub struct Opening {
    first: Box<dyn Strategy>,
    second: Box<dyn Strategy>,
    moves: usize,
}

impl Opening {
    pub fn new(first: Box<dyn Strategy>, second: Box<dyn Strategy>, moves: usize) -> Opening {
        Opening {
            first,
            second,
            moves,
        }
    }
}

impl Strategy for Opening {
    fn name(&self) -> String {
        format!(
            "open {} moves with {}, then {}",
            self.moves,
            self.first.name(),
            self.second.name()
        )
    }

    fn choose(&mut self, board: &Board, player: Player, rng: &mut StdRng) -> Option<Move> {
        let placed = board.catalog().len() - board.remaining(player).len();
        if placed < self.moves {
            self.first.choose(board, player, rng)
        } else {
            self.second.choose(board, player, rng)
        }
    }
}

pub fn strategy_for(kind: StrategyKind) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::Random => Box::new(Random),
        StrategyKind::Greedy => Box::new(GreedyMax(PieceSize)),
        StrategyKind::Mobility => Box::new(GreedyMax(Mobility)),
        StrategyKind::Blocker => Box::new(GreedyMin(EnemyMobility)),
        StrategyKind::Center => Box::new(GreedyMin(Distance(Target::Center))),
        StrategyKind::Outward => Box::new(GreedyMax(Distance(Target::Center))),
        StrategyKind::Corner => Box::new(GreedyMin(Distance(Target::Corner))),
        StrategyKind::Advance => Box::new(GreedyMax(Distance(Target::Corner))),
        StrategyKind::Chase => Box::new(GreedyMin(Distance(Target::Opponent))),
        StrategyKind::Avoid => Box::new(GreedyMax(Distance(Target::Opponent))),
    }
}

/// The configured strategy, wrapped in its mix and opening when set.
pub fn build_strategy(config: &SimConfig) -> Result<Box<dyn Strategy>, SimError> {
    let mut strategy = strategy_for(config.strategy);
    if let Some(mix) = config.mix {
        strategy = Box::new(Mix::new(strategy_for(mix.strategy), strategy, mix.ratio)?);
    }
    if let Some(opening) = config.opening {
        strategy = Box::new(Opening::new(
            strategy_for(opening.strategy),
            strategy,
            opening.moves,
        ));
    }
    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MixConfig, OpeningConfig};
    use blokus_core::{standard, Catalog, PieceId, Pos, VariantId};
    use std::sync::Arc;

    fn board() -> Board {
        Board::new(Arc::new(standard::catalog(20, 20).unwrap()))
    }

    fn board_of(width: usize, height: usize, grids: &[&[&[u8]]]) -> Board {
        Board::new(Arc::new(Catalog::from_grids(width, height, grids).unwrap()))
    }

    fn mov(piece: u16, index: u8, x: u8, y: u8) -> Move {
        Move {
            variant: VariantId {
                piece: PieceId(piece),
                index,
            },
            at: Pos::new(x, y),
        }
    }

    /// Always picks the first legal move.
    struct First;

    impl Strategy for First {
        fn name(&self) -> String {
            "first".to_owned()
        }

        fn choose(&mut self, board: &Board, player: Player, _rng: &mut StdRng) -> Option<Move> {
            board.moves(player).next()
        }
    }

    /// Always passes.
    struct Pass;

    impl Strategy for Pass {
        fn name(&self) -> String {
            "pass".to_owned()
        }

        fn choose(&mut self, _board: &Board, _player: Player, _rng: &mut StdRng) -> Option<Move> {
            None
        }
    }

    #[test]
    fn test_random_picks_legal_move() {
        let board = board();
        let mut rng = StdRng::seed_from_u64(1);
        let legal: Vec<Move> = board.moves(Player::Two).collect();
        for _ in 0..20 {
            let mov = Random.choose(&board, Player::Two, &mut rng).unwrap();
            assert!(legal.contains(&mov));
        }
    }

    #[test]
    fn test_greedy_picks_largest_piece() {
        let board = board();
        let mut rng = StdRng::seed_from_u64(2);
        for player in Player::all() {
            let mov = GreedyMax(PieceSize).choose(&board, player, &mut rng).unwrap();
            let piece = board.catalog().piece(mov.piece()).unwrap();
            assert_eq!(piece.cell_count(), 5);
        }
    }

    #[test]
    fn test_greedy_ties_vary_with_seed() {
        let board = board();
        let picks: std::collections::HashSet<Move> = (0..16)
            .filter_map(|seed| {
                GreedyMax(PieceSize).choose(&board, Player::One, &mut StdRng::seed_from_u64(seed))
            })
            .collect();
        assert!(picks.len() > 1);
    }

    #[test]
    fn test_smallest_piece_with_min() {
        let board = board();
        let mut rng = StdRng::seed_from_u64(4);
        let mov = GreedyMin(PieceSize).choose(&board, Player::Three, &mut rng).unwrap();
        assert_eq!(mov.piece(), PieceId(0));
    }

    #[test]
    fn test_pass_when_no_moves() {
        let grids: [&[&[u8]]; 1] = [&[&[1]]];
        let mut board = board_of(5, 5, &grids);
        board.place(Player::One, mov(0, 0, 0, 0).variant, Pos::new(0, 0)).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(Random.choose(&board, Player::One, &mut rng), None);
        assert_eq!(GreedyMax(PieceSize).choose(&board, Player::One, &mut rng), None);
        assert_eq!(GreedyMin(Mobility).choose(&board, Player::One, &mut rng), None);
    }

    #[test]
    fn test_mobility_counts_moves_after_placing() {
        // Monomino and domino on 5x5: after the monomino at the corner, only
        // the domino remains, with its two placements at (1, 1).
        let grids: [&[&[u8]]; 2] = [&[&[1]], &[&[1, 1]]];
        let board = board_of(5, 5, &grids);
        assert_eq!(Mobility.score(&board, Player::One, mov(0, 0, 0, 0)), 2);
        // An illegal move leaves nothing to count
        assert_eq!(Mobility.score(&board, Player::One, mov(0, 0, 2, 2)), 0);
    }

    #[test]
    fn test_mobility_prefers_open_moves() {
        // The monomino in the corner leaves the domino two placements; either
        // domino leaves the monomino only one.
        let grids: [&[&[u8]]; 2] = [&[&[1]], &[&[1, 1]]];
        let board = board_of(5, 5, &grids);
        let mut rng = StdRng::seed_from_u64(5);
        let best = GreedyMax(Mobility).choose(&board, Player::One, &mut rng).unwrap();
        assert_eq!(best, mov(0, 0, 0, 0));
    }

    #[test]
    fn test_enemy_mobility_sums_opponents() {
        let grids: [&[&[u8]]; 1] = [&[&[1]]];
        let board = board_of(5, 5, &grids);
        // Each opponent still has its monomino at its own corner
        assert_eq!(EnemyMobility.score(&board, Player::One, mov(0, 0, 0, 0)), 3);
    }

    #[test]
    fn test_blocker_minimizes_opponent_moves() {
        // On 5x5 the long pieces reach the other corners
        let board = Board::new(Arc::new(standard::catalog(5, 5).unwrap()));
        let mut rng = StdRng::seed_from_u64(6);
        let pick = GreedyMin(EnemyMobility)
            .choose(&board, Player::One, &mut rng)
            .unwrap();
        let best = EnemyMobility.score(&board, Player::One, pick);
        for other in board.moves(Player::One) {
            assert!(best <= EnemyMobility.score(&board, Player::One, other));
        }

        let untouched: i64 = opponents(Player::One)
            .map(|p| board.moves(p).count() as i64)
            .sum();
        assert!(best < untouched);
    }

    #[test]
    fn test_distance_to_center() {
        let grids: [&[&[u8]]; 1] = [&[&[1]]];
        let board = board_of(10, 10, &grids);
        // Monomino at (4, 4): box corner (10, 10) sits on the center
        assert_eq!(Distance(Target::Center).score(&board, Player::One, mov(0, 0, 4, 4)), 0);
        // At (0, 0): nearest box corner (2, 2), 8 half-cells from the center each way
        assert_eq!(
            Distance(Target::Center).score(&board, Player::One, mov(0, 0, 0, 0)),
            128
        );
    }

    #[test]
    fn test_distance_to_own_corner() {
        let grids: [&[&[u8]]; 1] = [&[&[1]]];
        let board = board_of(10, 10, &grids);
        let d = Distance(Target::Corner);
        assert_eq!(d.score(&board, Player::One, mov(0, 0, 0, 0)), 0);
        assert_eq!(d.score(&board, Player::Four, mov(0, 0, 9, 9)), 0);
        assert_eq!(d.score(&board, Player::Two, mov(0, 0, 9, 0)), 0);
        assert_eq!(d.score(&board, Player::Two, mov(0, 0, 0, 0)), 18 * 18);
    }

    #[test]
    fn test_distance_to_leader() {
        let grids: [&[&[u8]]; 2] = [&[&[1]], &[&[1, 1]]];
        let mut board = board_of(10, 10, &grids);
        // Nobody has moved: Player One measures to Player Two's corner
        assert_eq!(leader_point(&board, Player::One), (20, 0));

        // Player Four leads with two cells in the bottom row
        let lying = board
            .catalog()
            .piece(PieceId(1))
            .unwrap()
            .variants()
            .iter()
            .find(|v| v.width() == 2)
            .unwrap()
            .id();
        board.place(Player::Four, lying, Pos::new(8, 9)).unwrap();
        assert_eq!(leader_point(&board, Player::One), (18, 19));
        // No opponent of Player Four has cells: the earliest seat's corner
        assert_eq!(leader_point(&board, Player::Four), (0, 0));

        let d = Distance(Target::Opponent);
        assert_eq!(d.score(&board, Player::One, mov(0, 0, 8, 8)), 1);
        assert!(d.score(&board, Player::One, mov(0, 0, 0, 0)) > 1);
    }

    #[test]
    fn test_center_strategy_moves_inward() {
        let board = board();
        let mut rng = StdRng::seed_from_u64(7);
        let inward = strategy_for(StrategyKind::Center)
            .choose(&board, Player::One, &mut rng)
            .unwrap();
        let outward = strategy_for(StrategyKind::Outward)
            .choose(&board, Player::One, &mut rng)
            .unwrap();
        let d = Distance(Target::Center);
        assert!(d.score(&board, Player::One, inward) < d.score(&board, Player::One, outward));
    }

    #[test]
    fn test_mix_follows_ratio() {
        let board = board();
        let first = board.moves(Player::One).next();
        let mut rng = StdRng::seed_from_u64(8);

        let mut always = Mix::new(Box::new(First), Box::new(Pass), 1.0).unwrap();
        let mut never = Mix::new(Box::new(First), Box::new(Pass), 0.0).unwrap();
        for _ in 0..10 {
            assert_eq!(always.choose(&board, Player::One, &mut rng), first);
            assert_eq!(never.choose(&board, Player::One, &mut rng), None);
        }

        let mut half = Mix::new(Box::new(First), Box::new(Pass), 0.5).unwrap();
        let played = (0..200)
            .filter(|_| half.choose(&board, Player::One, &mut rng).is_some())
            .count();
        assert!((50..150).contains(&played), "played {}", played);
        assert_eq!(half.name(), "50% first, 50% pass");

        assert!(matches!(
            Mix::new(Box::new(First), Box::new(Pass), 1.5),
            Err(SimError::Usage(_))
        ));
    }

    #[test]
    fn test_opening_switches_after_own_moves() {
        let mut board = board();
        let mut opening = Opening::new(Box::new(First), Box::new(Pass), 2);
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..2 {
            let mov = opening.choose(&board, Player::One, &mut rng).unwrap();
            board.place(Player::One, mov.variant, mov.at).unwrap();
            // Other players' placements do not count
            assert!(opening.choose(&board, Player::Two, &mut rng).is_some());
        }
        assert_eq!(opening.choose(&board, Player::One, &mut rng), None);
        assert!(opening.choose(&board, Player::Two, &mut rng).is_some());
        assert_eq!(opening.name(), "open 2 moves with first, then pass");
    }

    #[test]
    fn test_build_strategy_wraps_configured_one() {
        let config = SimConfig {
            strategy: StrategyKind::Greedy,
            mix: Some(MixConfig {
                strategy: StrategyKind::Random,
                ratio: 0.25,
            }),
            opening: Some(OpeningConfig {
                strategy: StrategyKind::Center,
                moves: 3,
            }),
            ..SimConfig::default()
        };
        assert_eq!(
            build_strategy(&config).unwrap().name(),
            "open 3 moves with min distance to center, then 25% random, 75% max size"
        );

        let plain = SimConfig::default();
        assert_eq!(build_strategy(&plain).unwrap().name(), "random");
    }

    #[test]
    fn test_strategy_for() {
        assert_eq!(strategy_for(StrategyKind::Random).name(), "random");
        assert_eq!(strategy_for(StrategyKind::Greedy).name(), "max size");
        assert_eq!(strategy_for(StrategyKind::Mobility).name(), "max mobility");
        assert_eq!(strategy_for(StrategyKind::Blocker).name(), "min enemy mobility");
        assert_eq!(strategy_for(StrategyKind::Advance).name(), "max distance to own corner");
        assert_eq!(strategy_for(StrategyKind::Chase).name(), "min distance to leader");
    }
}
