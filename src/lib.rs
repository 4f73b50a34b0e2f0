//! # fates-favor
//!
//! Rules engine and peer protocol for a two-player board game of homelands,
//! fortresses and thrones.
//!
//! ## Design Principles
//!
//! 1. **Effects, not intents, cross the wire**: the acting peer decides
//!    legality; the other peer applies the resulting moves, kills and
//!    records as they are.
//!
//! 2. **Explicit context**: every operation takes a `&mut MatchContext`.
//!    There is no global state.
//!
//! 3. **No I/O**: frames are queued and handed to a [`wire::Transport`]; the
//!    crate never opens sockets or files.
//!
//! ## Architecture
//!
//! - **Mirrored numbering**: each peer sees its own homeland at the bottom.
//!   Tile and piece indices are mirrored with `count - 1 - i` before they
//!   are sent.
//!
//! - **Deterministic randomness**: battle and survival rolls come from a
//!   seeded ChaCha8 stream.
//!
//! ## Modules
//!
//! - `core`: identifiers, tile and piece kinds, config, turn record, RNG
//! - `board`: tile grid, reachability, setup layouts
//! - `rules`: the match state machine
//! - `wire`: messages and the frame codec
//! - `error`: error types

pub mod core;
pub mod board;
pub mod rules;
pub mod wire;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    Actions, Config, Coord, MatchRng, MatchRngState, PieceId, PieceType, PieceTypeSet, Protection, Record,
    RecordInfo, Side, TileId, TileType,
};

pub use crate::board::{Board, MovementRule, Piece, PlacedPiece, SetupLayout, SetupLibrary, Tile};

pub use crate::rules::{
    Cue, FavorAct, Hint, Intent, MatchContext, MatchOutcome, Notice, Outcome, Phase, Resolution, StatusMessage,
    TurnFlow, TurnPhase,
};

pub use crate::wire::{Message, Transport};

pub use crate::error::{ActionResult, IllegalAction, ProtocolError, ProtocolResult, SetupError, SetupResult};
