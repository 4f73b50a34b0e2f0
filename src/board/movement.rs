//! Movement rules and reachability.
//!
//! Every piece type resolves to a [`MovementRule`] once per action. The rule
//! selects one of two traversal modes:
//!
//! - **Single**: one step in the rule's adjacency set.
//! - **Area**: a breadth-first flood labelling each tile with its step
//!   distance, bounded by the rule's step limit. All steps cost one, so the
//!   BFS distance is the shortest path.
//!
//! Tiles of type `Empty` are never entered. Enemy pieces block passage
//! unless the rule flies; friendly pieces block passage unless the rule
//! passes friends or flies. Destinations must be unoccupied.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::core::{Config, PieceId, PieceType, Side, TileId, TileType};

use super::state::Board;

/// Neighbour set of a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjacency {
    /// Four orthogonal neighbours.
    Straight,
    /// Eight neighbours including diagonals.
    Full,
}

impl Adjacency {
    const STRAIGHT: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
    const FULL: [(i32, i32); 8] = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

    /// Step offsets.
    #[must_use]
    pub const fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Adjacency::Straight => &Self::STRAIGHT,
            Adjacency::Full => &Self::FULL,
        }
    }
}

/// Traversal mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reach {
    Single,
    Area,
}

/// How a piece type moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovementRule {
    pub reach: Reach,
    pub adjacency: Adjacency,
    /// Step limit for `Area` traversal.
    pub limit: u16,
    /// Pass over friendly pieces.
    pub passes_friends: bool,
    /// Pass over any piece.
    pub flies: bool,
}

impl MovementRule {
    /// One step in the given adjacency.
    #[must_use]
    pub const fn step(adjacency: Adjacency) -> Self {
        Self {
            reach: Reach::Single,
            adjacency,
            limit: 1,
            passes_friends: false,
            flies: false,
        }
    }

    /// Multi-step flood.
    #[must_use]
    pub const fn area(adjacency: Adjacency, limit: u16) -> Self {
        Self {
            reach: Reach::Area,
            adjacency,
            limit,
            passes_friends: false,
            flies: false,
        }
    }

    #[must_use]
    pub const fn passing_friends(mut self) -> Self {
        self.passes_friends = true;
        self
    }

    #[must_use]
    pub const fn flying(mut self) -> Self {
        self.flies = true;
        self
    }

    /// Rule for a piece type under `config`.
    #[must_use]
    pub fn for_piece(piece_type: PieceType, config: &Config) -> Self {
        match piece_type {
            PieceType::Ranger
            | PieceType::Spearman
            | PieceType::Crossbowman
            | PieceType::Catapult
            | PieceType::Trebuchet
            | PieceType::Elephant => Self::step(Adjacency::Straight),
            PieceType::Lancer | PieceType::Throne => Self::step(Adjacency::Full),
            PieceType::Warhorse => Self::area(Adjacency::Straight, 2).passing_friends(),
            PieceType::Dragon => {
                let adjacency = if config.dragon_diag { Adjacency::Full } else { Adjacency::Straight };
                Self::area(adjacency, u16::from(config.dragon_dist)).flying()
            }
        }
    }

    /// Rule granted by a plains favor: one step in any direction.
    #[must_use]
    pub const fn plains_favor() -> Self {
        Self::step(Adjacency::Full)
    }
}

/// Neighbours of a tile inside the board.
#[must_use]
pub fn neighbors(board: &Board, tile: TileId, adjacency: Adjacency) -> SmallVec<[TileId; 8]> {
    adjacency
        .offsets()
        .iter()
        .filter_map(|&(dx, dy)| board.offset(tile, dx, dy))
        .collect()
}

/// Movement query for one piece.
struct Walker<'a> {
    board: &'a Board,
    side: Side,
    rule: MovementRule,
    /// Tile treated as unoccupied (the partner of a swap).
    vacant: Option<TileId>,
}

impl Walker<'_> {
    fn occupant(&self, tile: TileId) -> Option<PieceId> {
        if self.vacant == Some(tile) {
            return None;
        }
        self.board.piece_on(tile)
    }

    fn passable(&self, tile: TileId) -> bool {
        if self.board.tile_type(tile) == TileType::Empty {
            return false;
        }
        match self.occupant(tile) {
            None => true,
            Some(_) if self.rule.flies => true,
            Some(other) => self.rule.passes_friends && self.board.side_of(other) == self.side,
        }
    }

    fn is_destination(&self, tile: TileId) -> bool {
        self.board.tile_type(tile) != TileType::Empty && self.occupant(tile).is_none()
    }

    /// BFS distances from `from` over passable tiles, `u16::MAX` when
    /// unreached.
    fn flood(&self, from: TileId) -> Vec<u16> {
        let mut dist = vec![u16::MAX; usize::from(self.board.tile_count())];
        let mut queue = VecDeque::new();
        dist[from.index()] = 0;
        queue.push_back(from);

        while let Some(tile) = queue.pop_front() {
            let d = dist[tile.index()];
            if d >= self.rule.limit {
                continue;
            }
            for next in neighbors(self.board, tile, self.rule.adjacency) {
                if dist[next.index()] != u16::MAX || !self.passable(next) {
                    continue;
                }
                dist[next.index()] = d + 1;
                queue.push_back(next);
            }
        }
        dist
    }

    fn move_tiles(&self, from: TileId) -> FxHashSet<TileId> {
        match self.rule.reach {
            Reach::Single => neighbors(self.board, from, self.rule.adjacency)
                .into_iter()
                .filter(|&t| self.is_destination(t))
                .collect(),
            Reach::Area => self
                .flood(from)
                .iter()
                .enumerate()
                .filter(|&(i, &d)| d != u16::MAX && i != from.index())
                .map(|(i, _)| TileId::new(i as u16))
                .filter(|&t| self.is_destination(t))
                .collect(),
        }
    }

    /// Tiles a melee engagement may target: a final step onto any
    /// non-empty tile.
    fn engage_tiles(&self, from: TileId) -> FxHashSet<TileId> {
        let origins: Vec<TileId> = match self.rule.reach {
            Reach::Single => vec![from],
            Reach::Area => self
                .flood(from)
                .iter()
                .enumerate()
                .filter(|&(_, &d)| d < self.rule.limit)
                .map(|(i, _)| TileId::new(i as u16))
                .collect(),
        };

        let mut targets = FxHashSet::default();
        for origin in origins {
            for next in neighbors(self.board, origin, self.rule.adjacency) {
                if next != from && self.board.tile_type(next) != TileType::Empty {
                    targets.insert(next);
                }
            }
        }
        targets
    }
}

/// Tiles `piece` can move to under `rule`. `vacant` marks a tile whose
/// occupant is ignored, used for swaps.
#[must_use]
pub fn move_tiles(board: &Board, piece: PieceId, rule: MovementRule, vacant: Option<TileId>) -> FxHashSet<TileId> {
    let Some(from) = board.piece(piece).and_then(|p| p.pos) else {
        return FxHashSet::default();
    };
    Walker {
        board,
        side: board.side_of(piece),
        rule,
        vacant,
    }
    .move_tiles(from)
}

/// Tiles `piece` can engage in melee under `rule`.
#[must_use]
pub fn engage_tiles(board: &Board, piece: PieceId, rule: MovementRule) -> FxHashSet<TileId> {
    let Some(from) = board.piece(piece).and_then(|p| p.pos) else {
        return FxHashSet::default();
    };
    Walker {
        board,
        side: board.side_of(piece),
        rule,
        vacant: None,
    }
    .engage_tiles(from)
}

/// Tiles at exactly `range` along the eight straight and diagonal rays.
#[must_use]
pub fn fire_tiles(board: &Board, from: TileId, range: u16) -> FxHashSet<TileId> {
    let r = i32::from(range);
    Adjacency::FULL
        .iter()
        .filter_map(|&(dx, dy)| board.offset(from, dx * r, dy * r))
        .filter(|&t| board.tile_type(t) != TileType::Empty)
        .collect()
}

/// Tiles strictly between two aligned tiles.
#[must_use]
pub fn tiles_between(board: &Board, from: TileId, to: TileId) -> SmallVec<[TileId; 8]> {
    let a = board.coord_of(from);
    let b = board.coord_of(to);
    let mut between = SmallVec::new();
    if !a.is_aligned(b) {
        return between;
    }
    let (dx, dy) = a.step_towards(b);
    let mut current = from;
    for _ in 1..a.chebyshev(b) {
        match board.offset(current, dx, dy) {
            Some(next) => {
                between.push(next);
                current = next;
            }
            None => break,
        }
    }
    between
}
