//! Match state and the turn state machine.
//!
//! A [`MatchContext`] is one peer's view of a match. It owns the config, the
//! board, both turn records and the favor counters, and is passed by `&mut`
//! into every operation:
//!
//! - local intents go through the action methods (see `actions.rs`), which
//!   validate, mutate, record and queue outgoing frames;
//! - frames from the peer go through [`MatchContext::receive`] (see
//!   `protocol.rs`) and are applied without validation of game rules.
//!
//! ## Phases
//!
//! ```text
//! Room ──host_start / Start──▶ Setup ──both layouts known──▶ Match(Awaiting)
//!                                                              │    ▲
//!                                                              ▼    │
//!                                                       Match(InProgress)
//!                                                              │
//!                                       win / lose / surrender ▼
//!                                                           Ended
//! ```
//!
//! Any protocol error moves the match to `Aborted`.

use tracing::{debug, info};

use crate::board::{merge_middle, Board, SetupLayout};
use crate::core::{Config, MatchRng, MatchRngState, PieceId, PieceType, Record, RecordInfo, Side, TileId, TileType};
use crate::error::{SetupError, SetupResult};
use crate::wire::{encode, Message, RecordFrame, SetupFrame, Transport};

use super::notice::{Notice, StatusMessage};

/// Sub-state of a running match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    /// Waiting for the given side to act.
    Awaiting(Side),
    /// The local side acted and the turn goes on.
    InProgress,
}

/// How a match ended for the local side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    Win,
    Lose,
}

impl MatchOutcome {
    #[must_use]
    pub const fn is_win(self) -> bool {
        matches!(self, MatchOutcome::Win)
    }
}

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Negotiating the config.
    Room,
    /// Arranging homelands and pieces.
    Setup,
    Match(TurnPhase),
    Ended(MatchOutcome),
    /// The peer sent something that could not be applied.
    Aborted,
}

impl Phase {
    #[must_use]
    pub const fn is_match(self) -> bool {
        matches!(self, Phase::Match(_))
    }

    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Phase::Ended(_) | Phase::Aborted)
    }
}

/// State of the favor selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FavorAct {
    /// Actions use the regular budget.
    #[default]
    Off,
    /// Armed by the player: the next move or swap consumes a favor.
    On,
    /// The regular budget is spent; every further move or swap consumes a
    /// favor until none are left.
    Now,
}

/// What happened to the acting piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The action completed.
    Done,
    /// The piece failed a survival check and was removed.
    Perished,
    /// An assault on a fortress failed.
    BattleLost,
    /// An assault breached a fortress.
    Breached,
}

/// Whether the turn goes on after an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnFlow {
    Continues,
    Ended,
    MatchEnded,
}

/// Result of a legal action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub resolution: Resolution,
    pub turn: TurnFlow,
}

/// One peer's state of a match.
#[derive(Clone, Debug)]
pub struct MatchContext {
    pub(super) config: Config,
    pub(super) board: Board,
    pub(super) rng: MatchRng,
    pub(super) phase: Phase,
    /// Record of the local side's current or last turn.
    pub(super) own: Record,
    /// Record of the opponent's last turn.
    pub(super) their: Record,
    pub(super) goes_first: bool,
    pub(super) first_turn: bool,
    /// Favors earned and not yet spent.
    pub(super) favor_count: u16,
    /// Favors earned this match.
    pub(super) favor_total: u16,
    pub(super) favor_act: FavorAct,
    pub(super) any_favor_used: bool,
    /// A lost battle interrupted the local turn; the opponent's move-only
    /// reply resumes it.
    pub(super) battle_pending: bool,
    /// Own dragons kept off the board during setup.
    pub(super) reserve_dragons: Vec<PieceId>,
    pub(super) own_setup: Option<SetupLayout>,
    pub(super) enemy_setup: Option<SetupFrame>,
    pub(super) outbox: Vec<Vec<u8>>,
    pub(super) notices: Vec<Notice>,
}

impl MatchContext {
    /// Create a context in the room. The config is normalized first.
    #[must_use]
    pub fn new(config: Config, rng: MatchRng) -> Self {
        let config = config.checked();
        Self {
            board: Board::new(&config),
            config,
            rng,
            phase: Phase::Room,
            own: Record::new(),
            their: Record::new(),
            goes_first: false,
            first_turn: true,
            favor_count: 0,
            favor_total: 0,
            favor_act: FavorAct::Off,
            any_favor_used: false,
            battle_pending: false,
            reserve_dragons: Vec::new(),
            own_setup: None,
            enemy_setup: None,
            outbox: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// Create a context with a seeded RNG.
    #[must_use]
    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self::new(config, MatchRng::new(seed))
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn own_record(&self) -> &Record {
        &self.own
    }

    #[must_use]
    pub fn their_record(&self) -> &Record {
        &self.their
    }

    #[must_use]
    pub fn goes_first(&self) -> bool {
        self.goes_first
    }

    #[must_use]
    pub fn is_first_turn(&self) -> bool {
        self.first_turn
    }

    #[must_use]
    pub fn favor_count(&self) -> u16 {
        self.favor_count
    }

    #[must_use]
    pub fn favor_total(&self) -> u16 {
        self.favor_total
    }

    #[must_use]
    pub fn favor_act(&self) -> FavorAct {
        self.favor_act
    }

    /// Dragons still waiting to be placed.
    #[must_use]
    pub fn reserve_dragons(&self) -> &[PieceId] {
        &self.reserve_dragons
    }

    /// The local side may act now.
    #[must_use]
    pub fn is_my_turn(&self) -> bool {
        matches!(
            self.phase,
            Phase::Match(TurnPhase::Awaiting(Side::Own) | TurnPhase::InProgress)
        )
    }

    /// The opponent lost a battle; this turn allows a single move.
    #[must_use]
    pub fn is_move_only(&self) -> bool {
        self.their.info == RecordInfo::BattleFail
    }

    #[must_use]
    pub fn rng_state(&self) -> MatchRngState {
        self.rng.state()
    }

    /// Frames waiting to be sent.
    pub fn take_outbox(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.outbox)
    }

    /// Hand all queued frames to a transport.
    pub fn flush(&mut self, transport: &mut impl Transport) {
        for frame in self.outbox.drain(..) {
            transport.send(&frame);
        }
    }

    /// Notices queued since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // === Room and setup ===

    /// Open the setup phase as host: flip for the first turn and announce
    /// the match.
    pub fn host_start(&mut self) -> SetupResult<()> {
        if self.phase != Phase::Room {
            return Err(SetupError::NotInRoom);
        }
        self.goes_first = self.rng.coin_flip();
        self.send(Message::Start {
            receiver_first: !self.goes_first,
            config: self.config.clone(),
        });
        self.enter_setup();
        Ok(())
    }

    /// Replace the config while in the room and tell the peer.
    pub fn set_config(&mut self, config: Config) -> SetupResult<()> {
        if self.phase != Phase::Room {
            return Err(SetupError::NotInRoom);
        }
        self.apply_config(config);
        self.send(Message::Config(self.config.clone()));
        Ok(())
    }

    pub(super) fn apply_config(&mut self, config: Config) {
        self.config = config.checked();
        self.board = Board::new(&self.config);
    }

    pub(super) fn enter_setup(&mut self) {
        self.own_setup = None;
        self.enemy_setup = None;
        self.phase = Phase::Setup;
        info!(goes_first = self.goes_first, "setup started");
    }

    /// Submit the local layout. The match begins as soon as the opponent's
    /// layout is known too.
    pub fn submit_setup(&mut self, layout: SetupLayout) -> SetupResult<()> {
        if self.phase != Phase::Setup {
            return Err(SetupError::NotInSetup);
        }
        if self.own_setup.is_some() {
            return Err(SetupError::AlreadySubmitted);
        }
        layout.validate(&self.config)?;

        let home = self.config.home_area();
        let frame = SetupFrame {
            tiles: layout.tiles.iter().rev().copied().collect(),
            middle: layout.middle.iter().rev().copied().collect(),
            counts: self.config.piece_amounts,
            positions: setup_order(&layout)
                .into_iter()
                .map(|tile| tile.map(|k| TileId::new(home - 1 - k)))
                .collect(),
        };
        self.send(Message::Setup(frame));
        self.own_setup = Some(layout);

        if self.enemy_setup.is_some() {
            self.begin_match();
        }
        Ok(())
    }

    /// Lay out both sides and open the first turn.
    pub(super) fn begin_match(&mut self) {
        let (Some(layout), Some(frame)) = (self.own_setup.take(), self.enemy_setup.take()) else {
            return;
        };
        self.board.set_enemy_amounts(frame.counts);

        let start = self.board.own_home_start();
        for (k, &tile_type) in layout.tiles.iter().enumerate() {
            self.board.set_tile_type(TileId::new(start + k as u16), tile_type);
        }
        self.reserve_dragons.clear();
        let own_ids: Vec<PieceId> = self.board.piece_ids(Side::Own).collect();
        for (&id, tile) in own_ids.iter().zip(setup_order(&layout)) {
            match tile {
                Some(k) => self.board.place_piece(id, TileId::new(start + k)),
                None => self.reserve_dragons.push(id),
            }
        }

        for (j, &tile_type) in frame.tiles.iter().enumerate() {
            self.board.set_tile_type(TileId::new(j as u16), tile_type);
        }
        for (i, &tile) in frame.positions.iter().enumerate() {
            let id = self.board.invert_piece(PieceId::new(i as u16));
            if let Some(tile) = tile {
                self.board.place_piece(id, tile);
            }
        }

        let middle = if self.goes_first {
            merge_middle(&layout.middle, &frame.middle, self.config.shift_left, self.config.shift_near)
        } else {
            let first: Vec<TileType> = frame.middle.iter().rev().copied().collect();
            let second: Vec<TileType> = layout.middle.iter().rev().copied().collect();
            let mut merged = merge_middle(&first, &second, self.config.shift_left, self.config.shift_near);
            merged.reverse();
            merged
        };
        let middle_start = self.board.middle_start();
        for (x, &tile_type) in middle.iter().enumerate() {
            self.board.set_tile_type(TileId::new(middle_start + x as u16), tile_type);
        }

        let thrones: Vec<PieceId> = (0..self.board.piece_count())
            .map(PieceId::new)
            .filter(|&id| self.board.piece(id).map(|p| p.piece_type) == Some(PieceType::Throne))
            .collect();
        for id in thrones {
            self.mark_fortress(id);
        }

        self.first_turn = true;
        self.favor_count = 0;
        self.favor_total = 0;
        self.favor_act = FavorAct::Off;
        self.any_favor_used = false;
        self.own.clear();
        self.their.clear();

        let first = if self.goes_first { Side::Own } else { Side::Enemy };
        self.phase = Phase::Match(TurnPhase::Awaiting(first));
        info!(?first, reserve = self.reserve_dragons.len(), "match started");
        self.notices.push(Notice::Status(if self.goes_first {
            StatusMessage::YourTurn
        } else {
            StatusMessage::OpponentsTurn
        }));
    }

    // === Shared mutation helpers ===

    /// Encode and queue a frame.
    pub(super) fn send(&mut self, message: Message) {
        debug!(message = message.name(), "queue frame");
        self.outbox.push(encode(&message));
    }

    /// Remember the fortress a throne stands on. Returns true when it is a
    /// fortress the throne had not reached last.
    pub(super) fn mark_fortress(&mut self, piece: PieceId) -> bool {
        let Some(p) = self.board.piece(piece) else {
            return false;
        };
        if p.piece_type != PieceType::Throne {
            return false;
        }
        let Some(pos) = p.pos else {
            return false;
        };
        if self.board.tile_type(pos) != TileType::Fortress || p.last_fortress == Some(pos) {
            return false;
        }
        if let Some(p) = self.board.piece_mut(piece) {
            p.last_fortress = Some(pos);
        }
        true
    }

    /// Move an own or enemy piece locally and mirror it to the peer. A throne
    /// reaching a new fortress earns a favor while the match limit allows.
    pub(super) fn place(&mut self, piece: PieceId, tile: TileId) {
        self.board.place_piece(piece, tile);
        if self.mark_fortress(piece)
            && self.board.side_of(piece) == Side::Own
            && self.favor_total < self.config.favor_limit
        {
            self.favor_total += 1;
            self.favor_count = (self.favor_count + 1).min(self.config.favor_max);
            debug!(count = self.favor_count, total = self.favor_total, "favor earned");
            self.notices.push(Notice::FavorEarned {
                count: self.favor_count,
            });
        }
        self.send(Message::Move {
            piece: self.board.invert_piece(piece),
            tile: self.board.invert_tile(tile),
        });
        self.notices.push(Notice::PieceMoved { piece, tile });
    }

    pub(super) fn remove(&mut self, piece: PieceId) {
        self.board.remove_piece(piece);
        self.send(Message::Kill {
            piece: self.board.invert_piece(piece),
        });
        self.notices.push(Notice::PieceRemoved { piece });
    }

    pub(super) fn breach(&mut self, tile: TileId) {
        self.board.set_breached(tile, true);
        self.send(Message::Breach {
            tile: self.board.invert_tile(tile),
            breached: true,
        });
        self.notices.push(Notice::TileBreached { tile, breached: true });
    }

    // === Turn flow ===

    /// Send the record and hand the turn over, or close the match when the
    /// record is final.
    pub(super) fn finish_turn(&mut self) {
        // The reply to a lost battle carries the flag back without storing it.
        let info = if !self.own.info.is_final() && self.is_move_only() {
            RecordInfo::BattleFail
        } else {
            self.own.info
        };
        let frame = RecordFrame {
            actions: self.own.actions,
            info,
            actor: self.own.actor.map(|p| self.board.invert_piece(p)),
            protects: self
                .own
                .protects
                .iter()
                .map(|(&piece, &protection)| (self.board.invert_piece(piece), protection))
                .collect(),
        };
        self.send(Message::Record(frame));
        self.first_turn = false;
        self.favor_act = FavorAct::Off;

        match info {
            RecordInfo::Win => self.end_match(MatchOutcome::Win),
            RecordInfo::Lose => self.end_match(MatchOutcome::Lose),
            RecordInfo::None | RecordInfo::BattleFail => {
                self.phase = Phase::Match(TurnPhase::Awaiting(Side::Enemy));
                info!(?info, "turn handed over");
                self.notices.push(Notice::Status(StatusMessage::OpponentsTurn));
            }
        }
    }

    pub(super) fn end_match(&mut self, outcome: MatchOutcome) {
        self.phase = Phase::Ended(outcome);
        info!(?outcome, "match ended");
        self.notices.push(Notice::Status(if outcome.is_win() {
            StatusMessage::Victory
        } else {
            StatusMessage::Defeat
        }));
    }

    /// Evaluate both win conditions. Ends the turn with a final record and
    /// returns true when the match is decided. Losing is checked first.
    pub(super) fn check_win(&mut self) -> bool {
        let info = if self.has_lost(Side::Own) {
            RecordInfo::Lose
        } else if self.has_lost(Side::Enemy) {
            RecordInfo::Win
        } else {
            return false;
        };
        self.own.info = info;
        self.finish_turn();
        true
    }

    /// A side loses when it lost enough thrones or when enough of its
    /// fortresses are held by enemy capturers.
    fn has_lost(&self, side: Side) -> bool {
        let thrones = self.config.win_throne;
        let fortresses = self.config.win_fortress;
        (thrones > 0 && self.board.thrones_lost(side) >= thrones)
            || (fortresses > 0
                && self.board.fortresses_captured(side.opponent(), self.config.capturers) >= fortresses)
    }
}

/// Homeland slot of every piece in a layout, in grouped piece order.
fn setup_order(layout: &SetupLayout) -> Vec<Option<u16>> {
    PieceType::ALL
        .into_iter()
        .flat_map(|piece_type| {
            layout
                .pieces
                .iter()
                .filter(move |p| p.piece_type == piece_type)
                .map(|p| p.tile)
        })
        .collect()
}
