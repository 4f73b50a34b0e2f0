//! # Error Types
//!
//! - [`IllegalAction`]: a local intent broke a rule. Nothing was mutated and
//!   nothing was sent.
//! - [`SetupError`]: a setup layout does not satisfy the config.
//! - [`ProtocolError`]: a received frame is malformed or out of place. The
//!   session cannot recover; the engine aborts the match.

use thiserror::Error;

use crate::core::{Actions, PieceType, TileType};

/// Kind of engagement, used in messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngageKind {
    Attack,
    Fire,
}

impl EngageKind {
    /// Record bit of this engagement.
    #[must_use]
    pub const fn action(self) -> Actions {
        match self {
            EngageKind::Attack => Actions::ATTACK,
            EngageKind::Fire => Actions::FIRE,
        }
    }
}

impl std::fmt::Display for EngageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngageKind::Attack => f.write_str("attack"),
            EngageKind::Fire => f.write_str("fire"),
        }
    }
}

/// Reasons an action is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IllegalAction {
    #[error("not your turn")]
    NotYourTurn,

    #[error("no match in progress")]
    MatchNotRunning,

    #[error("piece is already there")]
    NoOp,

    /// The opponent lost a battle; this turn is limited to one move.
    #[error("only moving is allowed")]
    OnlyMovingAllowed,

    #[error("no such piece")]
    UnknownPiece,

    #[error("not your piece")]
    NotOwnPiece,

    #[error("piece is not on the board")]
    PieceOffBoard,

    #[error("position is off the board")]
    OutOfBounds,

    #[error("can't move there")]
    Unreachable,

    #[error("piece can't move")]
    MoveSpent,

    #[error("piece can't switch")]
    SwapSpent,

    #[error("nothing to switch with")]
    NothingToSwap,

    #[error("can't switch with that piece")]
    SwapWithActor,

    #[error("piece can't switch with an enemy")]
    SwapWithEnemy,

    #[error("{piece} can't switch with an enemy {target}")]
    SwapEnemyType {
        piece: PieceType,
        target: PieceType,
    },

    #[error("{piece} can't switch onto {tile}")]
    SwapOnto { piece: PieceType, tile: TileType },

    #[error("{piece} can't switch onto a not breached fortress")]
    SwapOntoFortress { piece: PieceType },

    #[error("can't {0} on first turn")]
    FirstTurn(EngageKind),

    #[error("can't {0} after a fate's favor")]
    AfterFavor(EngageKind),

    /// The piece appears in the opponent's record.
    #[error("piece can't {0} during this turn")]
    Restrained(EngageKind),

    #[error("piece can't {0}")]
    EngageAfterAction(EngageKind),

    #[error("piece is protected during this turn")]
    TargetProtected,

    #[error("{piece} can't attack an elephant on plains")]
    ElephantOnPlains { piece: PieceType },

    #[error("can't attack nothing")]
    NothingToAttack,

    #[error("can't fire at nothing")]
    NothingToFire,

    #[error("can't engage your own piece")]
    FriendlyTarget,

    #[error("{piece} can't attack from a {tile}")]
    AttackFrom { piece: PieceType, tile: TileType },

    #[error("{piece} must be on a forest to attack onto one")]
    AttackOntoForest { piece: PieceType },

    #[error("{piece} can't attack onto {tile}")]
    AttackOnto { piece: PieceType, tile: TileType },

    #[error("{piece} can only fire")]
    RangedMelee { piece: PieceType },

    #[error("{piece} can't fire")]
    CannotFire { piece: PieceType },

    #[error("can't fire from {0}")]
    FireFrom(TileType),

    #[error("{piece} can't fire at a forest")]
    FireAtForest { piece: PieceType },

    #[error("can't fire at a mountain")]
    FireAtMountain,

    #[error("can't fire over mountains")]
    FireOverMountain,

    #[error("can't fire there")]
    OutOfRange,

    #[error("no space beside fortress")]
    NoSpaceBesideFortress,

    #[error("no fate's favor available")]
    FavorUnavailable,

    #[error("fate's favor is limited to moving and switching")]
    FavorLimited,

    #[error("{0} can't be spawned")]
    NotSpawnable(PieceType),

    #[error("no {0} to spawn")]
    NoSpawnablePiece(PieceType),

    #[error("can only spawn on an own empty fortress")]
    SpawnTile,

    #[error("spawning must be the only action of a turn")]
    SpawnAfterAction,

    #[error("no dragon left to place")]
    NoDragonToPlace,

    #[error("dragons can only be placed on a home fortress")]
    DragonTile,
}

/// Result type for local actions.
pub type ActionResult<T> = Result<T, IllegalAction>;

/// Reasons a setup layout is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("not in the room")]
    NotInRoom,

    #[error("setup is not open")]
    NotInSetup,

    #[error("setup was already submitted")]
    AlreadySubmitted,

    #[error("expected {expected} homeland tiles, got {got}")]
    TileCount { expected: u16, got: usize },

    #[error("homeland tile {index} is empty")]
    EmptyHomeTile { index: usize },

    #[error("expected {expected} {tile} tiles, got {got}")]
    TileQuota { tile: TileType, expected: u16, got: u16 },

    #[error("expected a middle row of {expected} tiles, got {got}")]
    MiddleSize { expected: u16, got: usize },

    #[error("expected {expected} {tile} tiles in the middle row, got {got}")]
    MiddleQuota { tile: TileType, expected: u16, got: u16 },

    #[error("expected {expected} {piece} pieces, got {got}")]
    PieceQuota { piece: PieceType, expected: u16, got: u16 },

    #[error("{piece} is placed outside the homeland at {index}")]
    PieceOutsideHome { piece: PieceType, index: u16 },

    #[error("more than one piece on homeland tile {index}")]
    PieceStacked { index: u16 },

    #[error("{0} must be placed")]
    PieceUnplaced(PieceType),

    #[error("setup library: {0}")]
    Library(String),
}

/// Result type for setup operations.
pub type SetupResult<T> = Result<T, SetupError>;

/// Reasons a received frame is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("frame truncated: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("frame length {declared} does not match {actual} bytes for opcode {opcode:#04x}")]
    LengthMismatch { opcode: u8, declared: usize, actual: usize },

    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),

    #[error("piece index {index} out of range ({count} pieces)")]
    PieceOutOfRange { index: u16, count: u16 },

    #[error("tile index {index} out of range ({count} tiles)")]
    TileOutOfRange { index: u16, count: u16 },

    #[error("invalid tile type code {0}")]
    InvalidTileType(u8),

    #[error("invalid record status {0:#04x}")]
    InvalidStatus(u8),

    #[error("config block out of range")]
    InvalidConfig,

    #[error("enemy has {got} pieces, expected {expected}")]
    PieceCountMismatch { expected: u16, got: u32 },

    #[error("unexpected {0} message")]
    UnexpectedMessage(&'static str),
}

/// Result type for received frames.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
