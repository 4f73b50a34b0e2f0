//! Board identifiers: sides, coordinates, tile indices and piece indices.
//!
//! ## Mirrored Indexing
//!
//! Each peer numbers the board from its own point of view. Its homeland
//! occupies the last rows of the tile array and its pieces the first half of
//! the piece array. A tile or piece index is converted into the opponent's
//! numbering by mirroring it, `count - 1 - index`, which is its own inverse:
//!
//! ```
//! use fates_favor::core::TileId;
//!
//! let tile = TileId::new(7);
//! assert_eq!(tile.invert(45), TileId::new(37));
//! assert_eq!(tile.invert(45).invert(45), tile);
//! ```

use serde::{Deserialize, Serialize};

/// One of the two sides of a match, seen from the local peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The local player.
    Own,
    /// The remote player.
    Enemy,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Own => Side::Enemy,
            Side::Enemy => Side::Own,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Own => write!(f, "own"),
            Side::Enemy => write!(f, "enemy"),
        }
    }
}

/// A board coordinate.
///
/// Row 0 is the far edge of the enemy homeland, the last row the back of the
/// own homeland.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Chebyshev (king move) distance to another coordinate.
    #[must_use]
    pub fn chebyshev(self, other: Coord) -> u16 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Unit step from `self` towards `other`, each component in `-1..=1`.
    #[must_use]
    pub fn step_towards(self, other: Coord) -> (i32, i32) {
        (
            (i32::from(other.x) - i32::from(self.x)).signum(),
            (i32::from(other.y) - i32::from(self.y)).signum(),
        )
    }

    /// Whether `other` lies on one of the eight straight or diagonal lines
    /// through `self`.
    #[must_use]
    pub fn is_aligned(self, other: Coord) -> bool {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx == 0 || dy == 0 || dx == dy
    }

    /// Offset by `(dx, dy)`, returning `None` when leaving a
    /// `width × height` grid.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32, width: u16, height: u16) -> Option<Coord> {
        let x = i32::from(self.x) + dx;
        let y = i32::from(self.y) + dy;
        if x < 0 || y < 0 || x >= i32::from(width) || y >= i32::from(height) {
            return None;
        }
        Some(Coord::new(u16::try_from(x).ok()?, u16::try_from(y).ok()?))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.x, self.y)
    }
}

/// Linear tile index, `y * width + x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u16);

impl TileId {
    /// Create a new tile ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Index into a tile slice.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Mirror into the opponent's numbering for a board of `count` tiles.
    #[must_use]
    pub fn invert(self, count: u16) -> Self {
        debug_assert!(self.0 < count, "tile {} outside board of {count}", self.0);
        Self(count - 1 - self.0)
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({})", self.0)
    }
}

/// Index into the piece array shared by both sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceId(pub u16);

impl PieceId {
    /// Create a new piece ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Index into a piece slice.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Mirror into the opponent's numbering for `count` pieces in total.
    #[must_use]
    pub fn invert(self, count: u16) -> Self {
        debug_assert!(self.0 < count, "piece {} outside array of {count}", self.0);
        Self(count - 1 - self.0)
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Piece({})", self.0)
    }
}
