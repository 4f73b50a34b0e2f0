//! Per-turn action ledger.
//!
//! Each side keeps one `Record` for the turn in progress. When a turn ends
//! the acting side's record is sent to the opponent, who keeps it as the
//! read-only history of the previous turn: its protections restrain the
//! receiver during its own turn.
//!
//! ## Status Byte
//!
//! On the wire the action bits and the terminal flag share one byte:
//!
//! | bit    | meaning       |
//! |--------|---------------|
//! | `0x01` | move          |
//! | `0x02` | swap          |
//! | `0x04` | attack        |
//! | `0x08` | fire          |
//! | `0x10` | spawn         |
//! | `0x20` | win           |
//! | `0x40` | lose          |
//! | `0x80` | battle failed |

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::ids::PieceId;
use super::kinds::PieceType;

/// Bitmask of the actions taken this turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actions(u8);

impl Actions {
    pub const NONE: Actions = Actions(0);
    pub const MOVE: Actions = Actions(0x01);
    pub const SWAP: Actions = Actions(0x02);
    pub const ATTACK: Actions = Actions(0x04);
    pub const FIRE: Actions = Actions(0x08);
    pub const SPAWN: Actions = Actions(0x10);

    /// The regular budget of a turn without engagements.
    pub const MOVE_SWAP: Actions = Actions(0x03);
    /// Actions that end the turn on their own.
    pub const TERMINAL: Actions = Actions(0x1C);

    const MASK: u8 = 0x1F;

    /// Build from raw bits, keeping only action bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// All bits of `other` are set.
    #[must_use]
    pub const fn contains(self, other: Actions) -> bool {
        self.0 & other.0 == other.0
    }

    /// Any bit of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Actions) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Actions) {
        self.0 |= other.0;
    }
}

impl std::ops::BitOr for Actions {
    type Output = Actions;

    fn bitor(self, rhs: Actions) -> Actions {
        Actions(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Actions {
    fn bitor_assign(&mut self, rhs: Actions) {
        self.0 |= rhs.0;
    }
}

/// How strongly a piece is shielded during the opponent's next turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Protection {
    /// Cannot be engaged except by a throne. Also restrains the piece itself
    /// from engaging when it appears in the opponent's record.
    ExceptThrone,
    /// Cannot be engaged or swapped at all.
    Total,
}

impl Protection {
    /// Whether this protection stops `attacker` from engaging the piece.
    #[must_use]
    pub const fn shields_from(self, attacker: PieceType) -> bool {
        match self {
            Protection::Total => true,
            Protection::ExceptThrone => !matches!(attacker, PieceType::Throne),
        }
    }
}

/// Terminal flag of a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordInfo {
    #[default]
    None,
    /// The sender won the match with this turn.
    Win,
    /// The sender lost the match with this turn (or surrendered).
    Lose,
    /// The sender's melee assault on a fortress failed; the receiver gets a
    /// move-only turn before the sender continues.
    BattleFail,
}

impl RecordInfo {
    pub const WIN_BIT: u8 = 0x20;
    pub const LOSE_BIT: u8 = 0x40;
    pub const BATTLE_FAIL_BIT: u8 = 0x80;

    /// Bit in the status byte.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            RecordInfo::None => 0,
            RecordInfo::Win => Self::WIN_BIT,
            RecordInfo::Lose => Self::LOSE_BIT,
            RecordInfo::BattleFail => Self::BATTLE_FAIL_BIT,
        }
    }

    /// Decode the terminal flag of a status byte. `None` when more than one
    /// flag is set.
    #[must_use]
    pub const fn from_status(status: u8) -> Option<Self> {
        match status & !Actions::MASK {
            0 => Some(RecordInfo::None),
            Self::WIN_BIT => Some(RecordInfo::Win),
            Self::LOSE_BIT => Some(RecordInfo::Lose),
            Self::BATTLE_FAIL_BIT => Some(RecordInfo::BattleFail),
            _ => None,
        }
    }

    /// The match ended with this record.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, RecordInfo::Win | RecordInfo::Lose)
    }
}

/// Ledger of one side's turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Piece that acted last, if any.
    pub actor: Option<PieceId>,
    /// Actions taken.
    pub actions: Actions,
    /// Pieces shielded during the opponent's next turn.
    pub protects: OrdMap<PieceId, Protection>,
    /// Terminal flag.
    pub info: RecordInfo,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that `piece` performed `action`.
    pub fn note(&mut self, piece: PieceId, action: Actions) {
        self.actor = Some(piece);
        self.actions |= action;
    }

    /// Add a protection. An existing stronger protection is kept.
    pub fn protect(&mut self, piece: PieceId, protection: Protection) {
        let merged = self
            .protects
            .get(&piece)
            .map_or(protection, |&current| current.max(protection));
        self.protects.insert(piece, merged);
    }

    /// Protection of a piece, if any.
    #[must_use]
    pub fn protection(&self, piece: PieceId) -> Option<Protection> {
        self.protects.get(&piece).copied()
    }

    /// Actions that exhaust the turn, or `NONE` if the turn may go on.
    ///
    /// Engagements and spawns end the turn by themselves; otherwise the
    /// budget is spent once both move and swap are done.
    #[must_use]
    pub fn exhausting_actions(&self) -> Actions {
        if self.actions.intersects(Actions::TERMINAL) {
            Actions::from_bits(self.actions.bits() & Actions::TERMINAL.bits())
        } else if self.actions.contains(Actions::MOVE_SWAP) {
            Actions::MOVE_SWAP
        } else {
            Actions::NONE
        }
    }

    /// Status byte for the wire.
    #[must_use]
    pub const fn status(&self) -> u8 {
        self.actions.bits() | self.info.bit()
    }

    /// Reset for a new turn.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_bits() {
        let mut actions = Actions::MOVE;
        actions |= Actions::SWAP;
        assert!(actions.contains(Actions::MOVE_SWAP));
        assert!(!actions.intersects(Actions::TERMINAL));
        actions.insert(Actions::FIRE);
        assert!(actions.intersects(Actions::TERMINAL));
        assert_eq!(Actions::from_bits(0xFF).bits(), 0x1F);
    }

    #[test]
    fn test_protection_shields() {
        assert!(Protection::Total.shields_from(PieceType::Throne));
        assert!(!Protection::ExceptThrone.shields_from(PieceType::Throne));
        assert!(Protection::ExceptThrone.shields_from(PieceType::Dragon));
    }

    #[test]
    fn test_protect_keeps_stronger() {
        let mut record = Record::new();
        let piece = PieceId::new(3);

        record.protect(piece, Protection::Total);
        record.protect(piece, Protection::ExceptThrone);
        assert_eq!(record.protection(piece), Some(Protection::Total));

        let other = PieceId::new(4);
        record.protect(other, Protection::ExceptThrone);
        record.protect(other, Protection::Total);
        assert_eq!(record.protection(other), Some(Protection::Total));
    }

    #[test]
    fn test_exhausting_actions() {
        let mut record = Record::new();
        assert_eq!(record.exhausting_actions(), Actions::NONE);

        record.note(PieceId::new(0), Actions::MOVE);
        assert_eq!(record.exhausting_actions(), Actions::NONE);

        record.note(PieceId::new(1), Actions::SWAP);
        assert_eq!(record.exhausting_actions(), Actions::MOVE_SWAP);
        assert_eq!(record.actor, Some(PieceId::new(1)));

        let mut engaged = Record::new();
        engaged.note(PieceId::new(2), Actions::ATTACK);
        assert_eq!(engaged.exhausting_actions(), Actions::ATTACK);
    }

    #[test]
    fn test_status_byte() {
        let mut record = Record::new();
        record.note(PieceId::new(0), Actions::ATTACK);
        record.info = RecordInfo::Win;
        assert_eq!(record.status(), 0x24);

        assert_eq!(RecordInfo::from_status(0x24), Some(RecordInfo::Win));
        assert_eq!(RecordInfo::from_status(0x81), Some(RecordInfo::BattleFail));
        assert_eq!(RecordInfo::from_status(0x03), Some(RecordInfo::None));
        assert_eq!(RecordInfo::from_status(0x60), None);
    }

    #[test]
    fn test_clear() {
        let mut record = Record::new();
        record.note(PieceId::new(5), Actions::MOVE);
        record.protect(PieceId::new(5), Protection::Total);
        record.info = RecordInfo::BattleFail;

        record.clear();
        assert_eq!(record, Record::new());
    }

    #[test]
    fn test_record_serde() {
        let mut record = Record::new();
        record.note(PieceId::new(1), Actions::FIRE);
        record.protect(PieceId::new(9), Protection::ExceptThrone);

        let json = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
