//! Seeded randomness for battle and survival rolls.
//!
//! ## Key Features
//!
//! - **Deterministic**: the same seed and the same sequence of actions
//!   produce the same rolls, so a match can be replayed exactly
//! - **Percent rolls**: every check in the game compares a roll in
//!   `0..100` against a configured pass threshold
//! - **Serializable**: O(1) state capture and restore
//!
//! ```
//! use fates_favor::core::MatchRng;
//!
//! let mut a = MatchRng::new(7);
//! let mut b = MatchRng::new(7);
//! assert_eq!(a.roll_percent(), b.roll_percent());
//!
//! // A threshold of 100 always passes, 0 never does.
//! assert!(a.passes(100));
//! assert!(!a.passes(0));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Per-match random source.
#[derive(Clone, Debug)]
pub struct MatchRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl MatchRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Roll a number in `0..100`.
    pub fn roll_percent(&mut self) -> u8 {
        self.inner.gen_range(0..100)
    }

    /// Roll and compare against a pass threshold: passes when the roll is
    /// strictly below `threshold`.
    pub fn passes(&mut self, threshold: u8) -> bool {
        self.roll_percent() < threshold
    }

    /// Fair coin, used to pick the first player.
    pub fn coin_flip(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> MatchRngState {
        MatchRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &MatchRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state.
///
/// Uses the ChaCha8 word position, so capture costs the same no matter how
/// many rolls were made.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}
