//! Board state, movement and setup.

pub mod state;
pub mod movement;
pub mod setup;

pub use state::{Board, Piece, Tile};
pub use movement::{engage_tiles, fire_tiles, move_tiles, neighbors, tiles_between, Adjacency, MovementRule, Reach};
pub use setup::{merge_middle, PlacedPiece, SetupLayout, SetupLibrary};
