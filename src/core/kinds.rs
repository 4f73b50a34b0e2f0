//! Tile and piece types.
//!
//! Both enums carry stable numeric codes: tile codes fit in 3 bits for the
//! compressed setup layout, piece codes index per-type quota arrays.

use serde::{Deserialize, Serialize};

/// Number of tile types that count towards quotas (everything but `Empty`).
pub const TILE_KINDS: usize = 5;

/// Number of piece types.
pub const PIECE_KINDS: usize = 10;

/// Terrain of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileType {
    /// Open ground.
    Plains = 0,
    /// Woodland; hides pieces from most ranged fire.
    Forest = 1,
    /// Blocks fire and is dangerous to enter for most pieces.
    Mountain = 2,
    /// Dangerous to enter for most pieces.
    Water = 3,
    /// Stronghold; must be breached before it can be taken.
    Fortress = 4,
    /// No terrain. Never enterable.
    Empty = 5,
}

impl TileType {
    /// Tile types that count towards quotas, in code order.
    pub const PLACEABLE: [TileType; TILE_KINDS] = [
        TileType::Plains,
        TileType::Forest,
        TileType::Mountain,
        TileType::Water,
        TileType::Fortress,
    ];

    /// Numeric code used on the wire and as a quota index.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a numeric code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TileType::Plains),
            1 => Some(TileType::Forest),
            2 => Some(TileType::Mountain),
            3 => Some(TileType::Water),
            4 => Some(TileType::Fortress),
            5 => Some(TileType::Empty),
            _ => None,
        }
    }

    /// Lowercase display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TileType::Plains => "plains",
            TileType::Forest => "forest",
            TileType::Mountain => "mountain",
            TileType::Water => "water",
            TileType::Fortress => "fortress",
            TileType::Empty => "empty",
        }
    }

    /// Terrain that triggers a survival check when entered or left.
    #[must_use]
    pub const fn is_rough(self) -> bool {
        matches!(self, TileType::Mountain | TileType::Water)
    }
}

impl std::fmt::Display for TileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceType {
    Ranger = 0,
    Spearman = 1,
    Crossbowman = 2,
    Catapult = 3,
    Trebuchet = 4,
    Lancer = 5,
    Warhorse = 6,
    Elephant = 7,
    Dragon = 8,
    Throne = 9,
}

impl PieceType {
    /// All piece types in code order.
    pub const ALL: [PieceType; PIECE_KINDS] = [
        PieceType::Ranger,
        PieceType::Spearman,
        PieceType::Crossbowman,
        PieceType::Catapult,
        PieceType::Trebuchet,
        PieceType::Lancer,
        PieceType::Warhorse,
        PieceType::Elephant,
        PieceType::Dragon,
        PieceType::Throne,
    ];

    /// Index into per-type arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a piece type by index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lowercase display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PieceType::Ranger => "ranger",
            PieceType::Spearman => "spearman",
            PieceType::Crossbowman => "crossbowman",
            PieceType::Catapult => "catapult",
            PieceType::Trebuchet => "trebuchet",
            PieceType::Lancer => "lancer",
            PieceType::Warhorse => "warhorse",
            PieceType::Elephant => "elephant",
            PieceType::Dragon => "dragon",
            PieceType::Throne => "throne",
        }
    }

    /// Mounted pieces: lancer, warhorse and elephant.
    #[must_use]
    pub const fn is_cavalry(self) -> bool {
        matches!(self, PieceType::Lancer | PieceType::Warhorse | PieceType::Elephant)
    }

    /// Exact Chebyshev distance at which the piece fires, if it is a ranged
    /// piece. Ranged pieces never melee.
    #[must_use]
    pub const fn firing_range(self) -> Option<u16> {
        match self {
            PieceType::Crossbowman | PieceType::Catapult => Some(2),
            PieceType::Trebuchet => Some(3),
            _ => None,
        }
    }
}

impl std::fmt::Display for PieceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of piece types stored as a bitmask (bit `n` = `PieceType` code `n`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceTypeSet(u16);

impl PieceTypeSet {
    const MASK: u16 = (1 << PIECE_KINDS) - 1;

    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build from raw bits, dropping bits that name no piece type.
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & Self::MASK)
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Add a piece type.
    #[must_use]
    pub const fn with(self, piece: PieceType) -> Self {
        Self(self.0 | (1 << piece as u16))
    }

    /// Check membership.
    #[must_use]
    pub const fn contains(self, piece: PieceType) -> bool {
        self.0 & (1 << piece as u16) != 0
    }

    /// Iterate over the members in code order.
    pub fn iter(self) -> impl Iterator<Item = PieceType> {
        PieceType::ALL.into_iter().filter(move |&p| self.contains(p))
    }
}

impl FromIterator<PieceType> for PieceTypeSet {
    fn from_iter<I: IntoIterator<Item = PieceType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}
