//! Local actions: validation, mutation and turn conclusion.
//!
//! Every action first runs all of its checks against the current state and
//! returns an [`IllegalAction`] without touching anything when one fails.
//! Only then does it mutate the board, queue the frames mirroring the
//! effect and conclude the action.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::board::{engage_tiles, fire_tiles, move_tiles, tiles_between, MovementRule};
use crate::core::{Actions, Coord, PieceId, PieceType, Protection, RecordInfo, Side, TileId, TileType};
use crate::error::{ActionResult, EngageKind, IllegalAction};

use super::checks::{check_attack_terrain, check_fire_terrain, needs_survival_roll};
use super::engine::{FavorAct, MatchContext, Outcome, Phase, Resolution, TurnFlow, TurnPhase};
use super::notice::{Cue, Notice, StatusMessage};

/// What the player meant by dropping a piece on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hint {
    /// Move there, or swap with the occupant.
    Move,
    /// Attack or fire at the tile.
    Engage,
}

/// A player's request from the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Intent {
    pub actor: PieceId,
    pub target: Coord,
    pub hint: Hint,
}

impl Intent {
    #[must_use]
    pub const fn new(actor: PieceId, target: Coord, hint: Hint) -> Self {
        Self { actor, target, hint }
    }
}

impl MatchContext {
    /// Resolve an intent into the action it stands for and perform it.
    pub fn submit(&mut self, intent: Intent) -> ActionResult<Outcome> {
        let occupied = self.board.piece_at(intent.target).is_some();
        let ranged = self
            .board
            .piece(intent.actor)
            .is_some_and(|p| p.piece_type.firing_range().is_some());
        match intent.hint {
            Hint::Move if occupied => self.swap_piece(intent.actor, intent.target),
            Hint::Move => self.move_piece(intent.actor, intent.target),
            Hint::Engage if ranged => self.fire(intent.actor, intent.target),
            Hint::Engage => self.attack(intent.actor, intent.target),
        }
    }

    /// Move a piece onto a free tile.
    pub fn move_piece(&mut self, piece: PieceId, target: Coord) -> ActionResult<Outcome> {
        self.ensure_turn()?;
        let (piece_type, from) = self.own_piece(piece)?;
        let dst = self.target_tile(target)?;
        if dst == from {
            return Err(IllegalAction::NoOp);
        }
        let favored = self.favored();
        if !self.is_move_only() && !favored && self.own.actions.contains(Actions::MOVE) {
            return Err(IllegalAction::MoveSpent);
        }

        let dst_type = self.board.tile_type(dst);
        let rule = MovementRule::for_piece(piece_type, &self.config);
        let reachable = move_tiles(&self.board, piece, rule, None).contains(&dst)
            || (favored
                && dst_type == TileType::Plains
                && move_tiles(&self.board, piece, MovementRule::plains_favor(), None).contains(&dst));
        if !reachable {
            return Err(IllegalAction::Unreachable);
        }

        let from_type = self.board.tile_type(from);
        if !self.survives(piece_type, from_type, dst_type, favored) {
            self.remove(piece);
            return Ok(self.conclude(piece, Actions::MOVE, favored, Resolution::Perished));
        }
        self.place(piece, dst);
        if favored && dst_type == TileType::Forest {
            self.own.protect(piece, Protection::Total);
        }
        Ok(self.conclude(piece, Actions::MOVE, favored, Resolution::Done))
    }

    /// Exchange positions with the piece on `target`.
    pub fn swap_piece(&mut self, piece: PieceId, target: Coord) -> ActionResult<Outcome> {
        self.ensure_turn()?;
        if self.is_move_only() {
            return Err(IllegalAction::OnlyMovingAllowed);
        }
        let (piece_type, from) = self.own_piece(piece)?;
        let dst = self.target_tile(target)?;
        if dst == from {
            return Err(IllegalAction::NoOp);
        }
        let occupant = self.board.piece_on(dst).ok_or(IllegalAction::NothingToSwap)?;
        let favored = self.favored();
        if !favored && self.own.actions.contains(Actions::SWAP) {
            return Err(IllegalAction::SwapSpent);
        }
        if self.own.actor == Some(occupant) {
            return Err(IllegalAction::SwapWithActor);
        }

        let dst_type = self.board.tile_type(dst);
        if self.board.side_of(occupant) == Side::Enemy {
            if self.their.protection(occupant) == Some(Protection::Total) {
                return Err(IllegalAction::TargetProtected);
            }
            if !favored {
                self.check_enemy_swap(piece_type, occupant, dst)?;
            }
        }

        let rule = MovementRule::for_piece(piece_type, &self.config);
        if !move_tiles(&self.board, piece, rule, Some(dst)).contains(&dst) {
            return Err(IllegalAction::Unreachable);
        }

        let from_type = self.board.tile_type(from);
        if !self.survives(piece_type, from_type, dst_type, favored) {
            self.remove(piece);
            return Ok(self.conclude(piece, Actions::SWAP, favored, Resolution::Perished));
        }
        self.place(occupant, from);
        self.place(piece, dst);
        if favored && dst_type == TileType::Forest {
            self.own.protect(piece, Protection::Total);
        }
        Ok(self.conclude(piece, Actions::SWAP, favored, Resolution::Done))
    }

    /// Only a warhorse may swap with an enemy without a favor, and not with
    /// a spearman, onto water or onto an unbreached fortress.
    fn check_enemy_swap(&self, piece_type: PieceType, occupant: PieceId, dst: TileId) -> ActionResult<()> {
        if piece_type != PieceType::Warhorse {
            return Err(IllegalAction::SwapWithEnemy);
        }
        let target = self.board.piece(occupant).map_or(PieceType::Ranger, |p| p.piece_type);
        if target == PieceType::Spearman {
            return Err(IllegalAction::SwapEnemyType {
                piece: piece_type,
                target,
            });
        }
        let tile = self.board.tile(dst).copied();
        if let Some(tile) = tile {
            if tile.tile_type == TileType::Water {
                return Err(IllegalAction::SwapOnto {
                    piece: piece_type,
                    tile: tile.tile_type,
                });
            }
            if tile.is_unbreached_fortress() {
                return Err(IllegalAction::SwapOntoFortress { piece: piece_type });
            }
        }
        Ok(())
    }

    /// Melee engagement.
    pub fn attack(&mut self, piece: PieceId, target: Coord) -> ActionResult<Outcome> {
        self.ensure_turn()?;
        if self.is_move_only() {
            return Err(IllegalAction::OnlyMovingAllowed);
        }
        let (piece_type, from) = self.own_piece(piece)?;
        let dst = self.target_tile(target)?;
        if dst == from {
            return Err(IllegalAction::NoOp);
        }
        if piece_type.firing_range().is_some() {
            return Err(IllegalAction::RangedMelee { piece: piece_type });
        }
        if self.favored() {
            return Err(IllegalAction::FavorLimited);
        }
        let victim = self.enemy_on(dst)?;
        self.check_killer(piece, piece_type, victim, dst, EngageKind::Attack)?;
        if piece_type != PieceType::Throne {
            check_attack_terrain(piece_type, self.board.tile_type(from), self.board.tile_type(dst))?;
        }
        let rule = MovementRule::for_piece(piece_type, &self.config);
        if !engage_tiles(&self.board, piece, rule).contains(&dst) {
            return Err(IllegalAction::Unreachable);
        }
        self.engage(piece, piece_type, from, dst, victim, EngageKind::Attack)
    }

    /// Ranged engagement at the piece's firing distance.
    pub fn fire(&mut self, piece: PieceId, target: Coord) -> ActionResult<Outcome> {
        self.ensure_turn()?;
        if self.is_move_only() {
            return Err(IllegalAction::OnlyMovingAllowed);
        }
        let (piece_type, from) = self.own_piece(piece)?;
        let dst = self.target_tile(target)?;
        if dst == from {
            return Err(IllegalAction::NoOp);
        }
        let range = piece_type
            .firing_range()
            .ok_or(IllegalAction::CannotFire { piece: piece_type })?;
        if self.favored() {
            return Err(IllegalAction::FavorLimited);
        }
        let victim = self.enemy_on(dst)?;
        self.check_killer(piece, piece_type, victim, dst, EngageKind::Fire)?;
        check_fire_terrain(piece_type, self.board.tile_type(from), self.board.tile_type(dst))?;
        if !fire_tiles(&self.board, from, range).contains(&dst) {
            return Err(IllegalAction::OutOfRange);
        }
        if tiles_between(&self.board, from, dst)
            .iter()
            .any(|&t| self.board.tile_type(t) == TileType::Mountain)
        {
            return Err(IllegalAction::FireOverMountain);
        }
        self.engage(piece, piece_type, from, dst, victim, EngageKind::Fire)
    }

    /// Bring an off-board own piece back onto an empty home fortress.
    pub fn spawn(&mut self, piece_type: PieceType, target: Coord) -> ActionResult<Outcome> {
        self.ensure_turn()?;
        if self.is_move_only() {
            return Err(IllegalAction::OnlyMovingAllowed);
        }
        if matches!(piece_type, PieceType::Dragon | PieceType::Throne) {
            return Err(IllegalAction::NotSpawnable(piece_type));
        }
        if !self.own.actions.is_empty() {
            return Err(IllegalAction::SpawnAfterAction);
        }
        if self.favored() {
            return Err(IllegalAction::FavorLimited);
        }
        let dst = self.target_tile(target)?;
        let fits = self.board.is_own_home(dst)
            && self.board.tile(dst).is_some_and(|t| t.is_unbreached_fortress())
            && self.board.piece_on(dst).is_none();
        if !fits {
            return Err(IllegalAction::SpawnTile);
        }
        let piece = self
            .board
            .pieces_of(Side::Own, piece_type)
            .find(|&id| {
                !self.reserve_dragons.contains(&id) && self.board.piece(id).is_some_and(|p| !p.on_board())
            })
            .ok_or(IllegalAction::NoSpawnablePiece(piece_type))?;

        self.place(piece, dst);
        Ok(self.conclude(piece, Actions::SPAWN, false, Resolution::Done))
    }

    /// Put a reserve dragon on a home fortress, replacing any occupant. This
    /// is a free action.
    pub fn place_dragon(&mut self, target: Coord) -> ActionResult<Outcome> {
        self.ensure_turn()?;
        if self.is_move_only() {
            return Err(IllegalAction::OnlyMovingAllowed);
        }
        if self.reserve_dragons.is_empty() {
            return Err(IllegalAction::NoDragonToPlace);
        }
        let dst = self.target_tile(target)?;
        if !self.board.is_own_home(dst) || self.board.tile_type(dst) != TileType::Fortress {
            return Err(IllegalAction::DragonTile);
        }

        let dragon = self.reserve_dragons.remove(0);
        if let Some(occupant) = self.board.piece_on(dst) {
            self.remove(occupant);
        }
        self.place(dragon, dst);
        debug!(%dragon, tile = %dst, "dragon placed");

        let turn = if self.check_win() {
            TurnFlow::MatchEnded
        } else {
            TurnFlow::Continues
        };
        Ok(Outcome {
            resolution: Resolution::Done,
            turn,
        })
    }

    /// End the turn without further actions.
    pub fn end_turn(&mut self) -> ActionResult<()> {
        self.ensure_turn()?;
        self.finish_turn();
        Ok(())
    }

    /// Give up the match.
    pub fn surrender(&mut self) -> ActionResult<()> {
        if !self.phase.is_match() {
            return Err(IllegalAction::MatchNotRunning);
        }
        self.own.actions = Actions::NONE;
        self.own.actor = None;
        self.own.protects.clear();
        self.own.info = RecordInfo::Lose;
        self.finish_turn();
        Ok(())
    }

    /// Arm a favor for the next move or swap.
    pub fn arm_favor(&mut self) -> ActionResult<()> {
        self.ensure_turn()?;
        if self.is_move_only() {
            return Err(IllegalAction::OnlyMovingAllowed);
        }
        if self.favor_count == 0 {
            return Err(IllegalAction::FavorUnavailable);
        }
        if self.favor_act == FavorAct::Off {
            self.favor_act = FavorAct::On;
        }
        Ok(())
    }

    /// Take back an armed favor.
    pub fn disarm_favor(&mut self) {
        if self.favor_act == FavorAct::On {
            self.favor_act = FavorAct::Off;
        }
    }

    // === Highlights ===

    /// Tiles the piece could move or swap to right now.
    #[must_use]
    pub fn highlight_moves(&self, piece: PieceId) -> FxHashSet<TileId> {
        let Some(p) = self.board.piece(piece) else {
            return FxHashSet::default();
        };
        if !self.is_my_turn() || self.board.side_of(piece) != Side::Own {
            return FxHashSet::default();
        }
        let rule = MovementRule::for_piece(p.piece_type, &self.config);
        let mut tiles = move_tiles(&self.board, piece, rule, None);
        if self.favored() {
            tiles.extend(
                move_tiles(&self.board, piece, MovementRule::plains_favor(), None)
                    .into_iter()
                    .filter(|&t| self.board.tile_type(t) == TileType::Plains),
            );
        }
        tiles
    }

    /// Tiles the piece could attack or fire at, ignoring occupants.
    #[must_use]
    pub fn highlight_engages(&self, piece: PieceId) -> FxHashSet<TileId> {
        let Some(p) = self.board.piece(piece) else {
            return FxHashSet::default();
        };
        if !self.is_my_turn() || self.board.side_of(piece) != Side::Own {
            return FxHashSet::default();
        }
        match (p.piece_type.firing_range(), p.pos) {
            (Some(range), Some(from)) => fire_tiles(&self.board, from, range),
            (Some(_), None) => FxHashSet::default(),
            (None, _) => engage_tiles(&self.board, piece, MovementRule::for_piece(p.piece_type, &self.config)),
        }
    }

    // === Checks ===

    pub(super) fn ensure_turn(&self) -> ActionResult<()> {
        match self.phase {
            Phase::Match(TurnPhase::Awaiting(Side::Own) | TurnPhase::InProgress) => Ok(()),
            Phase::Match(TurnPhase::Awaiting(Side::Enemy)) => Err(IllegalAction::NotYourTurn),
            _ => Err(IllegalAction::MatchNotRunning),
        }
    }

    fn favored(&self) -> bool {
        self.favor_act != FavorAct::Off && self.favor_count > 0
    }

    fn own_piece(&self, piece: PieceId) -> ActionResult<(PieceType, TileId)> {
        let p = self.board.piece(piece).ok_or(IllegalAction::UnknownPiece)?;
        if self.board.side_of(piece) != Side::Own {
            return Err(IllegalAction::NotOwnPiece);
        }
        let pos = p.pos.ok_or(IllegalAction::PieceOffBoard)?;
        Ok((p.piece_type, pos))
    }

    fn target_tile(&self, target: Coord) -> ActionResult<TileId> {
        self.board.tile_id(target).ok_or(IllegalAction::OutOfBounds)
    }

    /// Enemy piece on a tile; an own piece there is an error.
    fn enemy_on(&self, tile: TileId) -> ActionResult<Option<PieceId>> {
        match self.board.piece_on(tile) {
            Some(id) if self.board.side_of(id) == Side::Own => Err(IllegalAction::FriendlyTarget),
            occupant => Ok(occupant),
        }
    }

    /// Survival roll for a piece crossing rough terrain. The favor counts as
    /// matching the destination's terrain.
    fn survives(&mut self, piece_type: PieceType, from: TileType, to: TileType, favored: bool) -> bool {
        let favor = favored.then_some(to);
        !needs_survival_roll(piece_type, from, to, favor) || self.rng.passes(self.config.survival_pass)
    }

    fn check_killer(
        &self,
        killer: PieceId,
        killer_type: PieceType,
        victim: Option<PieceId>,
        dst: TileId,
        kind: EngageKind,
    ) -> ActionResult<()> {
        if self.first_turn && !self.config.first_turn_engage {
            return Err(IllegalAction::FirstTurn(kind));
        }
        if self.any_favor_used {
            return Err(IllegalAction::AfterFavor(kind));
        }
        if self.their.protection(killer).is_some() {
            return Err(IllegalAction::Restrained(kind));
        }
        let moved_then_fires = kind == EngageKind::Fire
            && self.config.multistage
            && self.own.actions == Actions::MOVE
            && self.own.actor == Some(killer);
        if !self.own.actions.is_empty() && !moved_then_fires {
            return Err(IllegalAction::EngageAfterAction(kind));
        }

        match victim {
            Some(victim) => {
                if self
                    .their
                    .protection(victim)
                    .is_some_and(|p| p.shields_from(killer_type))
                {
                    return Err(IllegalAction::TargetProtected);
                }
                let victim_type = self.board.piece(victim).map(|p| p.piece_type);
                if victim_type == Some(PieceType::Elephant)
                    && self.board.tile_type(dst) == TileType::Plains
                    && !matches!(killer_type, PieceType::Dragon | PieceType::Throne)
                {
                    return Err(IllegalAction::ElephantOnPlains { piece: killer_type });
                }
            }
            None => {
                let assailable = self.board.tile(dst).is_some_and(|t| t.is_unbreached_fortress())
                    && !self.board.is_own_home(dst);
                if !assailable {
                    return Err(match kind {
                        EngageKind::Attack => IllegalAction::NothingToAttack,
                        EngageKind::Fire => IllegalAction::NothingToFire,
                    });
                }
            }
        }
        Ok(())
    }

    /// Resolve a validated engagement.
    ///
    /// An assault on an unbreached fortress rolls against the battle pass.
    /// Losing restrains the killer; a lost melee battle also ends the turn
    /// and hands the opponent a move-only turn. Winning breaches the
    /// fortress, and a dragon lands on the tile in front of it.
    fn engage(
        &mut self,
        killer: PieceId,
        killer_type: PieceType,
        from: TileId,
        dst: TileId,
        victim: Option<PieceId>,
        kind: EngageKind,
    ) -> ActionResult<Outcome> {
        let assault = killer_type != PieceType::Throne
            && self.board.tile(dst).is_some_and(|t| t.is_unbreached_fortress());

        let landing = if assault && killer_type == PieceType::Dragon {
            let (dx, dy) = self.board.coord_of(dst).step_towards(self.board.coord_of(from));
            let spot = self
                .board
                .offset(dst, dx, dy)
                .ok_or(IllegalAction::NoSpaceBesideFortress)?;
            let free = spot == from
                || (self.board.piece_on(spot).is_none() && self.board.tile_type(spot) != TileType::Empty);
            if !free {
                return Err(IllegalAction::NoSpaceBesideFortress);
            }
            Some(spot)
        } else {
            None
        };

        if killer_type == PieceType::Warhorse {
            self.own.protect(killer, Protection::ExceptThrone);
        }

        if assault {
            if !self.rng.passes(self.config.battle_pass) {
                self.their.protect(killer, Protection::ExceptThrone);
                debug!(%killer, tile = %dst, %kind, "battle lost");
                self.notices.push(Notice::Status(StatusMessage::BattleLost));
                if kind == EngageKind::Fire {
                    return Ok(Outcome {
                        resolution: Resolution::BattleLost,
                        turn: TurnFlow::Continues,
                    });
                }
                self.own.info = RecordInfo::BattleFail;
                self.own.actor = Some(killer);
                self.battle_pending = true;
                self.finish_turn();
                return Ok(Outcome {
                    resolution: Resolution::BattleLost,
                    turn: TurnFlow::Ended,
                });
            }
            self.breach(dst);
            if let Some(spot) = landing {
                if spot != from {
                    self.place(killer, spot);
                }
            }
            return Ok(self.conclude(killer, kind.action(), false, Resolution::Breached));
        }

        if let Some(victim) = victim {
            self.remove(victim);
        }
        if kind == EngageKind::Attack {
            let (from_type, dst_type) = (self.board.tile_type(from), self.board.tile_type(dst));
            if !self.survives(killer_type, from_type, dst_type, false) {
                self.remove(killer);
                return Ok(self.conclude(killer, kind.action(), false, Resolution::Perished));
            }
            self.place(killer, dst);
        }
        Ok(self.conclude(killer, kind.action(), false, Resolution::Done))
    }

    /// Record a committed action and decide the turn flow.
    ///
    /// The turn ends after an engagement or spawn, once move and swap are
    /// both spent with no favors left, or after the single move of a
    /// move-only turn. A spent budget with favors left keeps the turn open
    /// on favors alone.
    fn conclude(&mut self, piece: PieceId, action: Actions, favored: bool, resolution: Resolution) -> Outcome {
        if favored {
            self.favor_count = self.favor_count.saturating_sub(1);
            self.any_favor_used = true;
            if self.favor_act == FavorAct::On {
                self.favor_act = FavorAct::Off;
            }
            self.own.actor = Some(piece);
        } else {
            self.own.note(piece, action);
        }
        debug!(%piece, action = action.bits(), favored, ?resolution, "action committed");

        let cue = if action == Actions::FIRE { Cue::Fire } else { Cue::Move };
        self.notices.push(Notice::Cue(cue));
        if resolution == Resolution::Perished {
            self.notices.push(Notice::Status(StatusMessage::PiecePerished));
        }

        if self.check_win() {
            return Outcome {
                resolution,
                turn: TurnFlow::MatchEnded,
            };
        }

        let exhausted = self.own.exhausting_actions();
        let ends = exhausted.intersects(Actions::TERMINAL)
            || self.is_move_only()
            || (exhausted == Actions::MOVE_SWAP && self.favor_count == 0);
        if ends {
            self.finish_turn();
            return Outcome {
                resolution,
                turn: TurnFlow::Ended,
            };
        }
        if exhausted == Actions::MOVE_SWAP {
            self.favor_act = FavorAct::Now;
        }
        self.phase = Phase::Match(TurnPhase::InProgress);
        Outcome {
            resolution,
            turn: TurnFlow::Continues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::rules::MatchOutcome;
    use crate::wire::Message;

    /// 5×5 homeland board of plains with one ranger, one lancer, one warhorse,
    /// one crossbowman, one dragon and one throne per side. Pieces start off
    /// the board; tests place what they need.
    fn ctx() -> MatchContext {
        let config = Config::default()
            .with_home_size(5, 2)
            .with_piece_amounts([1, 0, 1, 0, 0, 1, 1, 0, 1, 1])
            .with_win_throne(1)
            .with_win_fortress(0)
            .with_battle_pass(100)
            .with_survival_pass(100)
            .with_first_turn_engage(true)
            .checked();
        let mut ctx = MatchContext::with_seed(config, 11);
        for i in 0..ctx.board.tile_count() {
            ctx.board.set_tile_type(TileId::new(i), TileType::Plains);
        }
        // Thrones stay far apart so the match does not end by accident.
        let own_throne = own(&ctx, PieceType::Throne);
        let enemy_throne = enemy(&ctx, PieceType::Throne);
        ctx.board.place_piece(own_throne, TileId::new(24));
        ctx.board.place_piece(enemy_throne, TileId::new(0));
        ctx.phase = Phase::Match(TurnPhase::Awaiting(Side::Own));
        ctx.first_turn = false;
        ctx
    }

    fn own(ctx: &MatchContext, piece_type: PieceType) -> PieceId {
        ctx.board.pieces_of(Side::Own, piece_type).next().unwrap()
    }

    fn enemy(ctx: &MatchContext, piece_type: PieceType) -> PieceId {
        ctx.board.pieces_of(Side::Enemy, piece_type).next().unwrap()
    }

    fn put(ctx: &mut MatchContext, piece: PieceId, x: u16, y: u16) {
        let tile = ctx.board.tile_id(Coord::new(x, y)).unwrap();
        ctx.board.place_piece(piece, tile);
    }

    fn tile(ctx: &MatchContext, x: u16, y: u16) -> TileId {
        ctx.board.tile_id(Coord::new(x, y)).unwrap()
    }

    #[test]
    fn test_move_and_budget() {
        let mut ctx = ctx();
        let ranger = own(&ctx, PieceType::Ranger);
        put(&mut ctx, ranger, 2, 3);

        let outcome = ctx.move_piece(ranger, Coord::new(2, 2)).unwrap();
        assert_eq!(outcome.resolution, Resolution::Done);
        assert_eq!(outcome.turn, TurnFlow::Continues);
        assert_eq!(ctx.phase(), Phase::Match(TurnPhase::InProgress));
        assert_eq!(ctx.board.piece_on(tile(&ctx, 2, 2)), Some(ranger));

        assert_eq!(ctx.move_piece(ranger, Coord::new(2, 1)), Err(IllegalAction::MoveSpent));
    }

    #[test]
    fn test_move_queues_mirrored_frame() {
        let mut ctx = ctx();
        let ranger = own(&ctx, PieceType::Ranger);
        put(&mut ctx, ranger, 2, 3);
        ctx.move_piece(ranger, Coord::new(1, 3)).unwrap();

        let frames = ctx.take_outbox();
        let bounds = crate::wire::WireBounds::from_config(ctx.config());
        let message = crate::wire::decode(&frames[0], &bounds).unwrap();
        assert_eq!(
            message,
            Message::Move {
                piece: ctx.board.invert_piece(ranger),
                tile: ctx.board.invert_tile(tile(&ctx, 1, 3)),
            }
        );
    }

    #[test]
    fn test_move_rejections() {
        let mut ctx = ctx();
        let ranger = own(&ctx, PieceType::Ranger);
        let foe = enemy(&ctx, PieceType::Ranger);
        put(&mut ctx, ranger, 2, 3);
        put(&mut ctx, foe, 3, 2);

        assert_eq!(ctx.move_piece(ranger, Coord::new(2, 3)), Err(IllegalAction::NoOp));
        assert_eq!(ctx.move_piece(ranger, Coord::new(3, 2)), Err(IllegalAction::Unreachable));
        assert_eq!(ctx.move_piece(ranger, Coord::new(9, 9)), Err(IllegalAction::OutOfBounds));
        assert_eq!(ctx.move_piece(foe, Coord::new(3, 1)), Err(IllegalAction::NotOwnPiece));
        let lancer = own(&ctx, PieceType::Lancer);
        assert_eq!(ctx.move_piece(lancer, Coord::new(0, 0)), Err(IllegalAction::PieceOffBoard));
        assert_eq!(ctx.move_piece(PieceId::new(99), Coord::new(0, 0)), Err(IllegalAction::UnknownPiece));
    }

    #[test]
    fn test_not_your_turn() {
        let mut ctx = ctx();
        ctx.phase = Phase::Match(TurnPhase::Awaiting(Side::Enemy));
        let ranger = own(&ctx, PieceType::Ranger);
        put(&mut ctx, ranger, 2, 3);
        assert_eq!(ctx.move_piece(ranger, Coord::new(2, 2)), Err(IllegalAction::NotYourTurn));
        assert_eq!(ctx.end_turn(), Err(IllegalAction::NotYourTurn));

        ctx.phase = Phase::Setup;
        assert_eq!(ctx.move_piece(ranger, Coord::new(2, 2)), Err(IllegalAction::MatchNotRunning));
    }

    #[test]
    fn test_move_then_swap_ends_turn() {
        let mut ctx = ctx();
        let ranger = own(&ctx, PieceType::Ranger);
        let lancer = own(&ctx, PieceType::Lancer);
        put(&mut ctx, ranger, 0, 3);
        put(&mut ctx, lancer, 3, 3);
        let bow = own(&ctx, PieceType::Crossbowman);
        put(&mut ctx, bow, 4, 3);

        ctx.move_piece(ranger, Coord::new(0, 2)).unwrap();
        let outcome = ctx.swap_piece(lancer, Coord::new(4, 3)).unwrap();
        assert_eq!(outcome.turn, TurnFlow::Ended);
        assert_eq!(ctx.phase(), Phase::Match(TurnPhase::Awaiting(Side::Enemy)));
        assert_eq!(ctx.board.piece_on(tile(&ctx, 4, 3)), Some(lancer));
    }

    #[test]
    fn test_swap_rules() {
        let mut ctx = ctx();
        let ranger = own(&ctx, PieceType::Ranger);
        let horse = own(&ctx, PieceType::Warhorse);
        let foe = enemy(&ctx, PieceType::Ranger);
        put(&mut ctx, ranger, 1, 2);
        put(&mut ctx, foe, 2, 2);
        put(&mut ctx, horse, 2, 3);

        assert_eq!(ctx.swap_piece(ranger, Coord::new(1, 1)), Err(IllegalAction::NothingToSwap));
        assert_eq!(ctx.swap_piece(ranger, Coord::new(2, 2)), Err(IllegalAction::SwapWithEnemy));

        ctx.board.set_tile_type(tile(&ctx, 2, 2), TileType::Water);
        assert_eq!(
            ctx.swap_piece(horse, Coord::new(2, 2)),
            Err(IllegalAction::SwapOnto {
                piece: PieceType::Warhorse,
                tile: TileType::Water,
            })
        );
        ctx.board.set_tile_type(tile(&ctx, 2, 2), TileType::Fortress);
        assert_eq!(
            ctx.swap_piece(horse, Coord::new(2, 2)),
            Err(IllegalAction::SwapOntoFortress {
                piece: PieceType::Warhorse,
            })
        );

        ctx.board.set_tile_type(tile(&ctx, 2, 2), TileType::Plains);
        let outcome = ctx.swap_piece(horse, Coord::new(2, 2)).unwrap();
        assert_eq!(outcome.turn, TurnFlow::Continues);
        assert_eq!(ctx.board.piece_on(tile(&ctx, 2, 2)), Some(horse));
        assert_eq!(ctx.board.piece_on(tile(&ctx, 2, 3)), Some(foe));
        assert_eq!(ctx.swap_piece(ranger, Coord::new(2, 2)), Err(IllegalAction::SwapSpent));
    }

    #[test]
    fn test_attack_kills_and_ends_turn() {
        let mut ctx = ctx();
        let lancer = own(&ctx, PieceType::Lancer);
        let foe = enemy(&ctx, PieceType::Ranger);
        put(&mut ctx, lancer, 2, 3);
        put(&mut ctx, foe, 3, 2);

        let outcome = ctx.attack(lancer, Coord::new(3, 2)).unwrap();
        assert_eq!(outcome, Outcome {
            resolution: Resolution::Done,
            turn: TurnFlow::Ended,
        });
        assert!(!ctx.board.piece(foe).unwrap().on_board());
        assert_eq!(ctx.board.piece_on(tile(&ctx, 3, 2)), Some(lancer));
    }

    #[test]
    fn test_attack_rejections() {
        let mut ctx = ctx();
        let lancer = own(&ctx, PieceType::Lancer);
        let ranger = own(&ctx, PieceType::Ranger);
        let bow = own(&ctx, PieceType::Crossbowman);
        let foe = enemy(&ctx, PieceType::Ranger);
        put(&mut ctx, lancer, 2, 3);
        put(&mut ctx, ranger, 1, 3);
        put(&mut ctx, bow, 0, 4);
        put(&mut ctx, foe, 3, 2);

        assert_eq!(ctx.attack(lancer, Coord::new(1, 3)), Err(IllegalAction::FriendlyTarget));
        assert_eq!(ctx.attack(lancer, Coord::new(2, 2)), Err(IllegalAction::NothingToAttack));
        assert_eq!(
            ctx.attack(bow, Coord::new(3, 2)),
            Err(IllegalAction::RangedMelee {
                piece: PieceType::Crossbowman,
            })
        );
        assert_eq!(ctx.attack(ranger, Coord::new(3, 2)), Err(IllegalAction::Unreachable));

        ctx.first_turn = true;
        ctx.config.first_turn_engage = false;
        assert_eq!(
            ctx.attack(lancer, Coord::new(3, 2)),
            Err(IllegalAction::FirstTurn(EngageKind::Attack))
        );
        ctx.first_turn = false;

        ctx.their.protect(lancer, Protection::ExceptThrone);
        assert_eq!(
            ctx.attack(lancer, Coord::new(3, 2)),
            Err(IllegalAction::Restrained(EngageKind::Attack))
        );
        ctx.their.clear();

        ctx.their.protect(foe, Protection::ExceptThrone);
        assert_eq!(ctx.attack(lancer, Coord::new(3, 2)), Err(IllegalAction::TargetProtected));
    }

    #[test]
    fn test_elephant_on_plains() {
        let config = Config::default()
            .with_home_size(5, 2)
            .with_piece_amounts([0, 0, 0, 0, 0, 1, 0, 1, 0, 1])
            .checked();
        let mut ctx = MatchContext::with_seed(config, 2);
        for i in 0..ctx.board.tile_count() {
            ctx.board.set_tile_type(TileId::new(i), TileType::Plains);
        }
        ctx.phase = Phase::Match(TurnPhase::Awaiting(Side::Own));
        ctx.first_turn = false;
        let lancer = own(&ctx, PieceType::Lancer);
        let elephant = enemy(&ctx, PieceType::Elephant);
        let (own_throne, enemy_throne) = (own(&ctx, PieceType::Throne), enemy(&ctx, PieceType::Throne));
        put(&mut ctx, own_throne, 4, 4);
        put(&mut ctx, enemy_throne, 0, 0);
        put(&mut ctx, lancer, 2, 3);
        put(&mut ctx, elephant, 2, 2);

        assert_eq!(
            ctx.attack(lancer, Coord::new(2, 2)),
            Err(IllegalAction::ElephantOnPlains {
                piece: PieceType::Lancer,
            })
        );
    }

    #[test]
    fn test_fire_range_and_terrain() {
        let mut ctx = ctx();
        let bow = own(&ctx, PieceType::Crossbowman);
        let foe = enemy(&ctx, PieceType::Ranger);
        put(&mut ctx, bow, 2, 4);
        put(&mut ctx, foe, 2, 2);

        ctx.board.set_tile_type(tile(&ctx, 2, 3), TileType::Mountain);
        assert_eq!(ctx.fire(bow, Coord::new(2, 2)), Err(IllegalAction::FireOverMountain));
        ctx.board.set_tile_type(tile(&ctx, 2, 3), TileType::Plains);

        ctx.board.set_tile_type(tile(&ctx, 2, 4), TileType::Forest);
        assert_eq!(ctx.fire(bow, Coord::new(2, 2)), Err(IllegalAction::FireFrom(TileType::Forest)));
        ctx.board.set_tile_type(tile(&ctx, 2, 4), TileType::Plains);

        put(&mut ctx, foe, 2, 3);
        assert_eq!(ctx.fire(bow, Coord::new(2, 3)), Err(IllegalAction::OutOfRange));
        put(&mut ctx, foe, 2, 2);

        let outcome = ctx.fire(bow, Coord::new(2, 2)).unwrap();
        assert_eq!(outcome.turn, TurnFlow::Ended);
        assert!(!ctx.board.piece(foe).unwrap().on_board());
        assert_eq!(ctx.board.piece_on(tile(&ctx, 2, 4)), Some(bow));
        assert!(ctx.take_notices().contains(&Notice::Cue(Cue::Fire)));
    }

    #[test]
    fn test_cannot_fire_with_melee_piece() {
        let mut ctx = ctx();
        let lancer = own(&ctx, PieceType::Lancer);
        put(&mut ctx, lancer, 2, 3);
        assert_eq!(
            ctx.fire(lancer, Coord::new(2, 1)),
            Err(IllegalAction::CannotFire {
                piece: PieceType::Lancer,
            })
        );
    }

    #[test]
    fn test_multistage_fire_after_move() {
        let mut ctx = ctx();
        ctx.config.multistage = true;
        let bow = own(&ctx, PieceType::Crossbowman);
        let foe = enemy(&ctx, PieceType::Ranger);
        put(&mut ctx, bow, 2, 4);
        put(&mut ctx, foe, 2, 1);

        ctx.move_piece(bow, Coord::new(2, 3)).unwrap();
        assert!(ctx.fire(bow, Coord::new(2, 1)).is_ok());
    }

    #[test]
    fn test_engage_after_action_without_multistage() {
        let mut ctx = ctx();
        let bow = own(&ctx, PieceType::Crossbowman);
        let foe = enemy(&ctx, PieceType::Ranger);
        put(&mut ctx, bow, 2, 4);
        put(&mut ctx, foe, 2, 1);

        ctx.move_piece(bow, Coord::new(2, 3)).unwrap();
        assert_eq!(
            ctx.fire(bow, Coord::new(2, 1)),
            Err(IllegalAction::EngageAfterAction(EngageKind::Fire))
        );
    }

    #[test]
    fn test_failed_assault_protects_attacker() {
        let mut ctx = ctx();
        ctx.config.battle_pass = 0;
        let lancer = own(&ctx, PieceType::Lancer);
        put(&mut ctx, lancer, 2, 2);
        ctx.board.set_tile_type(tile(&ctx, 2, 1), TileType::Fortress);

        let outcome = ctx.attack(lancer, Coord::new(2, 1)).unwrap();
        assert_eq!(outcome.resolution, Resolution::BattleLost);
        assert_eq!(outcome.turn, TurnFlow::Ended);
        assert_eq!(ctx.their_record().protection(lancer), Some(Protection::ExceptThrone));
        assert_eq!(ctx.own_record().info, RecordInfo::BattleFail);
        assert_eq!(ctx.board.piece_on(tile(&ctx, 2, 2)), Some(lancer));
        assert!(ctx.board.tile(tile(&ctx, 2, 1)).unwrap().is_unbreached_fortress());
    }

    #[test]
    fn test_failed_fire_assault_keeps_turn() {
        let mut ctx = ctx();
        ctx.config.battle_pass = 0;
        let bow = own(&ctx, PieceType::Crossbowman);
        put(&mut ctx, bow, 2, 3);
        ctx.board.set_tile_type(tile(&ctx, 2, 1), TileType::Fortress);

        let outcome = ctx.fire(bow, Coord::new(2, 1)).unwrap();
        assert_eq!(outcome.resolution, Resolution::BattleLost);
        assert_eq!(outcome.turn, TurnFlow::Continues);
        assert_eq!(
            ctx.fire(bow, Coord::new(2, 1)),
            Err(IllegalAction::Restrained(EngageKind::Fire))
        );
    }

    #[test]
    fn test_breach_with_dragon_lands_in_front() {
        let mut ctx = ctx();
        let dragon = own(&ctx, PieceType::Dragon);
        put(&mut ctx, dragon, 2, 4);
        let fortress = tile(&ctx, 2, 1);
        ctx.board.set_tile_type(fortress, TileType::Fortress);

        let outcome = ctx.attack(dragon, Coord::new(2, 1)).unwrap();
        assert_eq!(outcome.resolution, Resolution::Breached);
        assert!(ctx.board.tile(fortress).unwrap().breached);
        assert_eq!(ctx.board.piece_on(tile(&ctx, 2, 2)), Some(dragon));
    }

    #[test]
    fn test_dragon_needs_space_beside_fortress() {
        let mut ctx = ctx();
        let dragon = own(&ctx, PieceType::Dragon);
        let lancer = own(&ctx, PieceType::Lancer);
        put(&mut ctx, dragon, 2, 4);
        put(&mut ctx, lancer, 2, 2);
        ctx.config.dragon_diag = false;
        ctx.board.set_tile_type(tile(&ctx, 2, 1), TileType::Fortress);

        assert_eq!(ctx.attack(dragon, Coord::new(2, 1)), Err(IllegalAction::NoSpaceBesideFortress));
        assert_eq!(ctx.board.piece_on(tile(&ctx, 2, 4)), Some(dragon));
    }

    #[test]
    fn test_warhorse_attack_protects_itself() {
        let mut ctx = ctx();
        let horse = own(&ctx, PieceType::Warhorse);
        let foe = enemy(&ctx, PieceType::Ranger);
        put(&mut ctx, horse, 2, 3);
        put(&mut ctx, foe, 2, 1);

        ctx.attack(horse, Coord::new(2, 1)).unwrap();
        assert_eq!(ctx.own_record().protection(horse), Some(Protection::ExceptThrone));
    }

    #[test]
    fn test_survival_failure_removes_piece() {
        let mut ctx = ctx();
        ctx.config.survival_pass = 0;
        let lancer = own(&ctx, PieceType::Lancer);
        put(&mut ctx, lancer, 2, 3);
        ctx.board.set_tile_type(tile(&ctx, 2, 2), TileType::Water);

        let outcome = ctx.move_piece(lancer, Coord::new(2, 2)).unwrap();
        assert_eq!(outcome.resolution, Resolution::Perished);
        assert!(!ctx.board.piece(lancer).unwrap().on_board());
        let notices = ctx.take_notices();
        assert!(notices.contains(&Notice::PieceRemoved { piece: lancer }));
        assert!(notices.contains(&Notice::Status(StatusMessage::PiecePerished)));
    }

    #[test]
    fn test_killing_last_throne_wins() {
        let mut ctx = ctx();
        let lancer = own(&ctx, PieceType::Lancer);
        put(&mut ctx, lancer, 1, 1);

        let outcome = ctx.attack(lancer, Coord::new(0, 0)).unwrap();
        assert_eq!(outcome.turn, TurnFlow::MatchEnded);
        assert_eq!(ctx.phase(), Phase::Ended(MatchOutcome::Win));
        assert_eq!(ctx.own_record().info, RecordInfo::Win);
        assert_eq!(ctx.move_piece(lancer, Coord::new(1, 1)), Err(IllegalAction::MatchNotRunning));
    }

    #[test]
    fn test_favor_grants_extra_move() {
        let mut ctx = ctx();
        ctx.favor_count = 1;
        ctx.favor_total = 1;
        let ranger = own(&ctx, PieceType::Ranger);
        put(&mut ctx, ranger, 2, 3);

        ctx.move_piece(ranger, Coord::new(2, 2)).unwrap();
        assert_eq!(ctx.move_piece(ranger, Coord::new(2, 1)), Err(IllegalAction::MoveSpent));

        ctx.arm_favor().unwrap();
        assert_eq!(ctx.favor_act(), FavorAct::On);
        // A plains favor allows a diagonal step.
        ctx.move_piece(ranger, Coord::new(1, 1)).unwrap();
        assert_eq!(ctx.favor_count(), 0);
        assert_eq!(ctx.favor_act(), FavorAct::Off);
        assert_eq!(ctx.arm_favor(), Err(IllegalAction::FavorUnavailable));
    }

    #[test]
    fn test_favor_blocks_engagement() {
        let mut ctx = ctx();
        ctx.favor_count = 1;
        let lancer = own(&ctx, PieceType::Lancer);
        let foe = enemy(&ctx, PieceType::Ranger);
        put(&mut ctx, lancer, 2, 3);
        put(&mut ctx, foe, 2, 2);

        ctx.arm_favor().unwrap();
        assert_eq!(ctx.attack(lancer, Coord::new(2, 2)), Err(IllegalAction::FavorLimited));
        ctx.disarm_favor();
        ctx.any_favor_used = true;
        assert_eq!(
            ctx.attack(lancer, Coord::new(2, 2)),
            Err(IllegalAction::AfterFavor(EngageKind::Attack))
        );
    }

    #[test]
    fn test_forest_favor_protects_fully() {
        let mut ctx = ctx();
        ctx.favor_count = 1;
        let ranger = own(&ctx, PieceType::Ranger);
        put(&mut ctx, ranger, 2, 3);
        ctx.board.set_tile_type(tile(&ctx, 2, 2), TileType::Forest);

        ctx.arm_favor().unwrap();
        ctx.move_piece(ranger, Coord::new(2, 2)).unwrap();
        assert_eq!(ctx.own_record().protection(ranger), Some(Protection::Total));
    }

    #[test]
    fn test_spent_budget_continues_on_favors() {
        let mut ctx = ctx();
        ctx.favor_count = 1;
        let ranger = own(&ctx, PieceType::Ranger);
        let lancer = own(&ctx, PieceType::Lancer);
        put(&mut ctx, ranger, 0, 3);
        put(&mut ctx, lancer, 3, 3);
        let bow = own(&ctx, PieceType::Crossbowman);
        put(&mut ctx, bow, 4, 3);

        ctx.move_piece(ranger, Coord::new(0, 2)).unwrap();
        let outcome = ctx.swap_piece(lancer, Coord::new(4, 3)).unwrap();
        assert_eq!(outcome.turn, TurnFlow::Continues);
        assert_eq!(ctx.favor_act(), FavorAct::Now);

        let outcome = ctx.move_piece(ranger, Coord::new(0, 1)).unwrap();
        assert_eq!(outcome.turn, TurnFlow::Ended);
        assert_eq!(ctx.favor_count(), 0);
    }

    #[test]
    fn test_throne_earns_favor_on_new_fortress() {
        let mut ctx = ctx();
        let throne = own(&ctx, PieceType::Throne);
        put(&mut ctx, throne, 2, 3);
        ctx.board.set_tile_type(tile(&ctx, 2, 2), TileType::Fortress);

        ctx.move_piece(throne, Coord::new(2, 2)).unwrap();
        assert_eq!(ctx.favor_count(), 1);
        assert_eq!(ctx.favor_total(), 1);
        assert!(ctx.take_notices().contains(&Notice::FavorEarned { count: 1 }));
    }

    #[test]
    fn test_spawn() {
        let mut ctx = ctx();
        let fortress = tile(&ctx, 1, 4);
        ctx.board.set_tile_type(fortress, TileType::Fortress);

        assert_eq!(
            ctx.spawn(PieceType::Throne, Coord::new(1, 4)),
            Err(IllegalAction::NotSpawnable(PieceType::Throne))
        );
        assert_eq!(ctx.spawn(PieceType::Ranger, Coord::new(2, 4)), Err(IllegalAction::SpawnTile));

        let outcome = ctx.spawn(PieceType::Ranger, Coord::new(1, 4)).unwrap();
        assert_eq!(outcome.turn, TurnFlow::Ended);
        assert_eq!(ctx.board.piece_on(fortress), Some(own(&ctx, PieceType::Ranger)));
    }

    #[test]
    fn test_spawn_needs_an_off_board_piece() {
        let mut ctx = ctx();
        let ranger = own(&ctx, PieceType::Ranger);
        put(&mut ctx, ranger, 0, 3);
        ctx.board.set_tile_type(tile(&ctx, 1, 4), TileType::Fortress);
        assert_eq!(
            ctx.spawn(PieceType::Ranger, Coord::new(1, 4)),
            Err(IllegalAction::NoSpawnablePiece(PieceType::Ranger))
        );
    }

    #[test]
    fn test_place_reserve_dragon() {
        let mut ctx = ctx();
        let dragon = own(&ctx, PieceType::Dragon);
        ctx.reserve_dragons.push(dragon);
        ctx.board.set_tile_type(tile(&ctx, 0, 4), TileType::Fortress);

        assert_eq!(ctx.place_dragon(Coord::new(1, 4)), Err(IllegalAction::DragonTile));
        let outcome = ctx.place_dragon(Coord::new(0, 4)).unwrap();
        assert_eq!(outcome.turn, TurnFlow::Continues);
        assert_eq!(ctx.board.piece_on(tile(&ctx, 0, 4)), Some(dragon));
        assert_eq!(ctx.place_dragon(Coord::new(0, 4)), Err(IllegalAction::NoDragonToPlace));
    }

    #[test]
    fn test_no_dragon_during_move_only_turn() {
        let mut ctx = ctx();
        let dragon = own(&ctx, PieceType::Dragon);
        ctx.reserve_dragons.push(dragon);
        ctx.board.set_tile_type(tile(&ctx, 0, 4), TileType::Fortress);
        ctx.their.info = RecordInfo::BattleFail;

        assert_eq!(ctx.place_dragon(Coord::new(0, 4)), Err(IllegalAction::OnlyMovingAllowed));
        assert_eq!(ctx.reserve_dragons, vec![dragon]);
    }

    #[test]
    fn test_second_lost_battle_in_resumed_turn() {
        let mut ctx = ctx();
        ctx.config.battle_pass = 0;
        let lancer = own(&ctx, PieceType::Lancer);
        let horse = own(&ctx, PieceType::Warhorse);
        put(&mut ctx, lancer, 2, 2);
        put(&mut ctx, horse, 4, 2);
        ctx.board.set_tile_type(tile(&ctx, 2, 1), TileType::Fortress);
        ctx.board.set_tile_type(tile(&ctx, 4, 1), TileType::Fortress);

        ctx.attack(lancer, Coord::new(2, 1)).unwrap();
        assert!(ctx.battle_pending);
        ctx.receive(&crate::wire::encode(&Message::Record(crate::wire::RecordFrame {
            actions: Actions::MOVE,
            info: RecordInfo::BattleFail,
            actor: None,
            protects: Vec::new(),
        })))
        .unwrap();
        assert!(!ctx.battle_pending);
        assert!(ctx.is_my_turn());

        let outcome = ctx.attack(horse, Coord::new(4, 1)).unwrap();
        assert_eq!(outcome.resolution, Resolution::BattleLost);
        assert_eq!(outcome.turn, TurnFlow::Ended);
        assert!(ctx.battle_pending);
    }

    #[test]
    fn test_surrender_sends_lose_record() {
        let mut ctx = ctx();
        ctx.phase = Phase::Match(TurnPhase::Awaiting(Side::Enemy));
        ctx.surrender().unwrap();
        assert_eq!(ctx.phase(), Phase::Ended(MatchOutcome::Lose));

        let frames = ctx.take_outbox();
        assert_eq!(frames.last().unwrap(), &vec![crate::wire::opcode::RECORD, 8, 0, 0x40, 0xFF, 0xFF, 0, 0]);
        assert_eq!(ctx.surrender(), Err(IllegalAction::MatchNotRunning));
    }

    #[test]
    fn test_submit_routes_by_hint() {
        let mut ctx = ctx();
        let lancer = own(&ctx, PieceType::Lancer);
        let foe = enemy(&ctx, PieceType::Ranger);
        put(&mut ctx, lancer, 2, 3);
        put(&mut ctx, foe, 2, 2);

        assert_eq!(
            ctx.submit(Intent::new(lancer, Coord::new(2, 2), Hint::Move)),
            Err(IllegalAction::SwapWithEnemy)
        );
        let outcome = ctx.submit(Intent::new(lancer, Coord::new(2, 2), Hint::Engage)).unwrap();
        assert_eq!(outcome.turn, TurnFlow::Ended);
    }

    #[test]
    fn test_highlights() {
        let mut ctx = ctx();
        let lancer = own(&ctx, PieceType::Lancer);
        let bow = own(&ctx, PieceType::Crossbowman);
        put(&mut ctx, lancer, 2, 2);
        put(&mut ctx, bow, 2, 4);

        assert_eq!(ctx.highlight_moves(lancer).len(), 8);
        assert!(ctx.highlight_engages(bow).contains(&tile(&ctx, 2, 2)));
        assert!(ctx.highlight_moves(enemy(&ctx, PieceType::Throne)).is_empty());
    }
}
