//! Core types: identifiers, tile and piece kinds, configuration, the turn
//! record and the match RNG.
//!
//! Nothing in here knows about board layout or rules; the board and the
//! engine are built on top of these.

pub mod ids;
pub mod kinds;
pub mod config;
pub mod record;
pub mod rng;

pub use ids::{Coord, PieceId, Side, TileId};
pub use kinds::{PieceType, PieceTypeSet, TileType, PIECE_KINDS, TILE_KINDS};
pub use config::Config;
pub use record::{Actions, Protection, Record, RecordInfo};
pub use rng::{MatchRng, MatchRngState};
