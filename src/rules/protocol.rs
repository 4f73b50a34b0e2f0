//! Applying frames received from the peer.
//!
//! The peer already validated the action it took; received effects are
//! applied without re-checking game rules. What is checked is whether the
//! frame is well formed, in range and expected in the current phase. Any
//! failure is a [`ProtocolError`] and aborts the match.

use im::OrdMap;
use tracing::{debug, info, warn};

use crate::core::{Record, RecordInfo, Side};
use crate::error::{ProtocolError, ProtocolResult};
use crate::wire::{decode, Message, RecordFrame, WireBounds};

use super::engine::{FavorAct, MatchContext, MatchOutcome, Phase, TurnPhase};
use super::notice::{Notice, StatusMessage};

impl MatchContext {
    /// Decode and apply one frame from the peer.
    ///
    /// On error the match is aborted unless it had already ended.
    pub fn receive(&mut self, frame: &[u8]) -> ProtocolResult<()> {
        let result = decode(frame, &WireBounds::from_config(&self.config)).and_then(|message| self.apply(message));
        if let Err(err) = &result {
            warn!(error = %err, phase = ?self.phase, "protocol error");
            if !matches!(self.phase, Phase::Ended(_)) {
                self.phase = Phase::Aborted;
                self.notices.push(Notice::Status(StatusMessage::ConnectionLost));
            }
        }
        result
    }

    /// Mark the session as lost, e.g. when the transport disconnects.
    pub fn abort(&mut self) {
        if !self.phase.is_over() {
            self.phase = Phase::Aborted;
            info!("match aborted");
            self.notices.push(Notice::Status(StatusMessage::ConnectionLost));
        }
    }

    fn apply(&mut self, message: Message) -> ProtocolResult<()> {
        let name = message.name();
        debug!(message = name, "apply frame");
        match (self.phase, message) {
            (Phase::Room, Message::Start { receiver_first, config }) => {
                self.apply_config(config);
                self.goes_first = receiver_first;
                self.enter_setup();
            }
            (Phase::Room, Message::Config(config)) => self.apply_config(config),
            (Phase::Setup, Message::Setup(frame)) => {
                if self.enemy_setup.is_some() {
                    return Err(ProtocolError::UnexpectedMessage(name));
                }
                self.enemy_setup = Some(frame);
                if self.own_setup.is_some() {
                    self.begin_match();
                }
            }
            (Phase::Match(_), Message::Move { piece, tile }) => {
                self.board.place_piece(piece, tile);
                self.mark_fortress(piece);
                self.notices.push(Notice::PieceMoved { piece, tile });
            }
            (Phase::Match(_), Message::Kill { piece }) => {
                self.board.remove_piece(piece);
                self.notices.push(Notice::PieceRemoved { piece });
            }
            (Phase::Match(_), Message::Breach { tile, breached }) => {
                self.board.set_breached(tile, breached);
                self.notices.push(Notice::TileBreached { tile, breached });
            }
            (Phase::Match(_), Message::Tile { tile, tile_type }) => {
                self.board.set_tile_type(tile, tile_type);
                if let Some(piece) = self.board.piece_on(tile) {
                    self.mark_fortress(piece);
                }
                self.notices.push(Notice::TileChanged { tile, tile_type });
            }
            (Phase::Match(turn), Message::Record(frame)) => self.apply_record(turn, frame)?,
            (_, _) => return Err(ProtocolError::UnexpectedMessage(name)),
        }
        Ok(())
    }

    fn apply_record(&mut self, turn: TurnPhase, frame: RecordFrame) -> ProtocolResult<()> {
        match frame.info {
            RecordInfo::Win => {
                self.end_match(MatchOutcome::Lose);
                return Ok(());
            }
            RecordInfo::Lose => {
                self.end_match(MatchOutcome::Win);
                return Ok(());
            }
            RecordInfo::None | RecordInfo::BattleFail => {}
        }
        if turn != TurnPhase::Awaiting(Side::Enemy) {
            return Err(ProtocolError::UnexpectedMessage("record"));
        }

        if frame.info == RecordInfo::BattleFail && self.battle_pending {
            // The opponent used its move-only turn; the interrupted turn goes on.
            self.battle_pending = false;
            self.own.info = RecordInfo::None;
            self.their.info = RecordInfo::None;
            self.phase = Phase::Match(TurnPhase::Awaiting(Side::Own));
            info!("turn resumed after lost battle");
            self.notices.push(Notice::Status(StatusMessage::YourTurn));
            return Ok(());
        }

        self.their = Record {
            actor: frame.actor,
            actions: frame.actions,
            protects: frame.protects.into_iter().collect::<OrdMap<_, _>>(),
            info: frame.info,
        };
        self.own.clear();
        self.any_favor_used = false;
        self.favor_act = FavorAct::Off;
        self.phase = Phase::Match(TurnPhase::Awaiting(Side::Own));
        info!(move_only = self.is_move_only(), "turn received");
        self.notices.push(Notice::Status(if self.is_move_only() {
            StatusMessage::OpponentLostBattle
        } else {
            StatusMessage::YourTurn
        }));
        Ok(())
    }
}
