//! Notifications for the presentation layer.
//!
//! The engine queues a [`Notice`] for every visible change, whether it came
//! from a local action or a received frame. A GUI drains them with
//! `MatchContext::take_notices` after each call.

use crate::core::{PieceId, TileId, TileType};

/// Sound cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Move,
    Fire,
}

impl Cue {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Cue::Move => "move",
            Cue::Fire => "ammo",
        }
    }
}

/// Status line shown to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusMessage {
    YourTurn,
    OpponentsTurn,
    OpponentLostBattle,
    BattleLost,
    /// The acting piece failed its survival check.
    PiecePerished,
    Victory,
    Defeat,
    ConnectionLost,
}

impl std::fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StatusMessage::YourTurn => "Your turn",
            StatusMessage::OpponentsTurn => "Opponent's turn",
            StatusMessage::OpponentLostBattle => "Opponent lost a battle",
            StatusMessage::BattleLost => "Battle lost",
            StatusMessage::PiecePerished => "Your piece perished",
            StatusMessage::Victory => "You win",
            StatusMessage::Defeat => "You lose",
            StatusMessage::ConnectionLost => "Connection lost",
        })
    }
}

/// A change the presentation layer should reflect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    PieceMoved { piece: PieceId, tile: TileId },
    PieceRemoved { piece: PieceId },
    TileChanged { tile: TileId, tile_type: TileType },
    TileBreached { tile: TileId, breached: bool },
    /// A throne reached a new fortress; `count` favors are now held.
    FavorEarned { count: u16 },
    Status(StatusMessage),
    Cue(Cue),
}
