//! Protocol messages.
//!
//! Every index in a message is already in the receiver's numbering: the
//! sender mirrors tiles and pieces before encoding, the receiver applies
//! them as they are.

use crate::core::{Actions, Config, PieceId, Protection, RecordInfo, TileId, TileType, PIECE_KINDS};

/// Opcodes.
pub mod opcode {
    pub const START: u8 = 0x01;
    pub const CONFIG: u8 = 0x02;
    pub const SETUP: u8 = 0x03;
    pub const MOVE: u8 = 0x04;
    pub const KILL: u8 = 0x05;
    pub const BREACH: u8 = 0x06;
    pub const TILE: u8 = 0x07;
    pub const RECORD: u8 = 0x08;
}

/// Opcode plus total frame length.
pub const HEADER_SIZE: usize = 3;

/// Size of an encoded config block.
pub const CONFIG_DATA_SIZE: usize = 58;

/// Marker for "no piece" and "off the board".
pub const NONE_INDEX: u16 = 0xFFFF;

/// A player's setup as seen by the opponent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetupFrame {
    /// Sender's homeland; entry `j` is the receiver's tile `j`.
    pub tiles: Vec<TileType>,
    /// Sender's middle-row contribution by receiver column.
    pub middle: Vec<TileType>,
    /// Sender's pieces per type.
    pub counts: [u16; PIECE_KINDS],
    /// Position of each sender piece in receiver numbering. Entry `i` is the
    /// sender's piece `i`.
    pub positions: Vec<Option<TileId>>,
}

/// A turn record as sent at the end of a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordFrame {
    pub actions: Actions,
    pub info: RecordInfo,
    pub actor: Option<PieceId>,
    pub protects: Vec<(PieceId, Protection)>,
}

/// Every message the peers exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    /// Host announces the match: who moves first and the ruleset.
    Start { receiver_first: bool, config: Config },
    /// Config change while in the room.
    Config(Config),
    Setup(SetupFrame),
    Move { piece: PieceId, tile: TileId },
    Kill { piece: PieceId },
    Breach { tile: TileId, breached: bool },
    Tile { tile: TileId, tile_type: TileType },
    Record(RecordFrame),
}

impl Message {
    #[must_use]
    pub const fn opcode(&self) -> u8 {
        match self {
            Message::Start { .. } => opcode::START,
            Message::Config(_) => opcode::CONFIG,
            Message::Setup(_) => opcode::SETUP,
            Message::Move { .. } => opcode::MOVE,
            Message::Kill { .. } => opcode::KILL,
            Message::Breach { .. } => opcode::BREACH,
            Message::Tile { .. } => opcode::TILE,
            Message::Record(_) => opcode::RECORD,
        }
    }

    /// Lowercase name for logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Message::Start { .. } => "start",
            Message::Config(_) => "config",
            Message::Setup(_) => "setup",
            Message::Move { .. } => "move",
            Message::Kill { .. } => "kill",
            Message::Breach { .. } => "breach",
            Message::Tile { .. } => "tile",
            Message::Record(_) => "record",
        }
    }
}

/// Board dimensions a decoder checks indices against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WireBounds {
    pub tiles: u16,
    /// Pieces of both sides.
    pub pieces: u16,
    /// Tiles in one homeland.
    pub home: u16,
    pub width: u16,
}

impl WireBounds {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            tiles: config.tile_count(),
            pieces: config.pieces_per_side().saturating_mul(2),
            home: config.home_area(),
            width: config.home_width,
        }
    }

    /// Bytes holding the packed homeland and middle row.
    #[must_use]
    pub const fn packed_tiles_size(&self) -> usize {
        (self.home as usize + self.width as usize + 1) / 2
    }
}
