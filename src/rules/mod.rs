//! Turn and favor engine.
//!
//! [`MatchContext`] holds one peer's view of a match and implements the
//! whole rule set:
//!
//! - `engine`: phases, shared state, setup and turn hand-over
//! - `actions`: move, swap, attack, fire, spawn and favors
//! - `protocol`: applying frames from the peer
//! - `checks`: terrain survival and engagement restrictions
//! - `notice`: notifications for the presentation layer

pub mod actions;
pub mod checks;
pub mod engine;
pub mod notice;
pub mod protocol;

pub use actions::{Hint, Intent};
pub use checks::{check_attack_terrain, check_fire_terrain, needs_survival_roll};
pub use engine::{FavorAct, MatchContext, MatchOutcome, Outcome, Phase, Resolution, TurnFlow, TurnPhase};
pub use notice::{Cue, Notice, StatusMessage};
