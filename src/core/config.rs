//! Match configuration.
//!
//! A `Config` is negotiated in the room before a match, normalized once with
//! [`Config::check_values`] and never changed while the match runs. Every
//! quota is indexed by the numeric code of its tile or piece type.
//!
//! ```
//! use fates_favor::core::{Config, PieceType, TileType};
//!
//! let config = Config::default()
//!     .with_home_size(5, 5)
//!     .with_pieces(PieceType::Throne, 1)
//!     .with_tiles(TileType::Plains, 40)
//!     .checked();
//!
//! assert_eq!(config.home_area(), 25);
//! assert_eq!(config.tile_amounts.iter().sum::<u16>(), 25);
//! ```

use serde::{Deserialize, Serialize};

use super::kinds::{PieceType, PieceTypeSet, TileType, PIECE_KINDS, TILE_KINDS};

/// Smallest accepted homeland width.
pub const MIN_WIDTH: u16 = 3;
/// Largest accepted homeland width.
pub const MAX_WIDTH: u16 = 101;
/// Smallest accepted homeland height.
pub const MIN_HEIGHT: u16 = 1;
/// Largest accepted homeland height.
pub const MAX_HEIGHT: u16 = 45;
/// Upper bound for the dragon's move distance.
pub const MAX_DRAGON_DIST: u8 = 32;

/// Complete ruleset for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Board width in tiles.
    pub home_width: u16,
    /// Rows per homeland. The board has `2 * home_height + 1` rows.
    pub home_height: u16,
    /// Homeland tile quota per tile type.
    pub tile_amounts: [u16; TILE_KINDS],
    /// Middle-row quota per tile type, placed by each player.
    pub middle_amounts: [u16; TILE_KINDS],
    /// Pieces per side per piece type.
    pub piece_amounts: [u16; PIECE_KINDS],
    /// Enemy homeland fortresses to occupy for a win. Zero disables.
    pub win_fortress: u16,
    /// Thrones a side may lose before it is defeated. Zero disables.
    pub win_throne: u16,
    /// Piece types that count when occupying enemy fortresses.
    pub capturers: PieceTypeSet,
    /// Percent chance for an assault on an unbreached fortress to succeed.
    pub battle_pass: u8,
    /// Percent chance to survive entering or leaving rough terrain.
    pub survival_pass: u8,
    /// Favors a side may earn over a whole match.
    pub favor_limit: u16,
    /// Favors a side may hold at once.
    pub favor_max: u16,
    /// Dragon move distance in steps.
    pub dragon_dist: u8,
    /// Whether the dragon may step diagonally.
    pub dragon_diag: bool,
    /// Ranged pieces may move and fire in the same turn.
    pub multistage: bool,
    /// Attacking and firing allowed on a side's first turn.
    pub first_turn_engage: bool,
    /// Displace conflicting middle tiles towards the first player's left.
    pub shift_left: bool,
    /// Displace conflicting middle tiles to the nearest free column.
    pub shift_near: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            home_width: 9,
            home_height: 4,
            tile_amounts: [16, 8, 4, 5, 3],
            middle_amounts: [2, 1, 0, 0, 1],
            piece_amounts: [2, 2, 2, 1, 1, 2, 1, 1, 1, 1],
            win_fortress: 3,
            win_throne: 1,
            capturers: PieceTypeSet::empty().with(PieceType::Throne),
            battle_pass: 50,
            survival_pass: 50,
            favor_limit: 4,
            favor_max: 2,
            dragon_dist: 4,
            dragon_diag: true,
            multistage: false,
            first_turn_engage: false,
            shift_left: true,
            shift_near: true,
        }
    }
}

impl Config {
    /// Set the homeland dimensions.
    #[must_use]
    pub fn with_home_size(mut self, width: u16, height: u16) -> Self {
        self.home_width = width;
        self.home_height = height;
        self
    }

    /// Set the homeland quota of one tile type.
    #[must_use]
    pub fn with_tiles(mut self, tile: TileType, amount: u16) -> Self {
        if let Some(slot) = self.tile_amounts.get_mut(tile.code() as usize) {
            *slot = amount;
        }
        self
    }

    /// Set the middle-row quota of one tile type.
    #[must_use]
    pub fn with_middle(mut self, tile: TileType, amount: u16) -> Self {
        if let Some(slot) = self.middle_amounts.get_mut(tile.code() as usize) {
            *slot = amount;
        }
        self
    }

    /// Set the per-side amount of one piece type.
    #[must_use]
    pub fn with_pieces(mut self, piece: PieceType, amount: u16) -> Self {
        self.piece_amounts[piece.index()] = amount;
        self
    }

    /// Replace all piece amounts.
    #[must_use]
    pub fn with_piece_amounts(mut self, amounts: [u16; PIECE_KINDS]) -> Self {
        self.piece_amounts = amounts;
        self
    }

    /// Set the fortress win condition.
    #[must_use]
    pub fn with_win_fortress(mut self, fortresses: u16) -> Self {
        self.win_fortress = fortresses;
        self
    }

    /// Set the throne win condition.
    #[must_use]
    pub fn with_win_throne(mut self, thrones: u16) -> Self {
        self.win_throne = thrones;
        self
    }

    /// Set which piece types capture fortresses.
    #[must_use]
    pub fn with_capturers(mut self, capturers: PieceTypeSet) -> Self {
        self.capturers = capturers;
        self
    }

    /// Set the battle pass chance in percent.
    #[must_use]
    pub fn with_battle_pass(mut self, pass: u8) -> Self {
        self.battle_pass = pass;
        self
    }

    /// Set the survival pass chance in percent.
    #[must_use]
    pub fn with_survival_pass(mut self, pass: u8) -> Self {
        self.survival_pass = pass;
        self
    }

    /// Set the favor limit per match and the maximum held at once.
    #[must_use]
    pub fn with_favors(mut self, limit: u16, max: u16) -> Self {
        self.favor_limit = limit;
        self.favor_max = max;
        self
    }

    /// Set dragon movement.
    #[must_use]
    pub fn with_dragon(mut self, dist: u8, diagonal: bool) -> Self {
        self.dragon_dist = dist;
        self.dragon_diag = diagonal;
        self
    }

    /// Allow ranged pieces to move and fire in one turn.
    #[must_use]
    pub fn with_multistage(mut self, enabled: bool) -> Self {
        self.multistage = enabled;
        self
    }

    /// Allow engaging on a side's first turn.
    #[must_use]
    pub fn with_first_turn_engage(mut self, enabled: bool) -> Self {
        self.first_turn_engage = enabled;
        self
    }

    /// Set the middle-row displacement rule.
    #[must_use]
    pub fn with_shift(mut self, left: bool, near: bool) -> Self {
        self.shift_left = left;
        self.shift_near = near;
        self
    }

    /// Normalize and return the config.
    #[must_use]
    pub fn checked(mut self) -> Self {
        self.check_values();
        self
    }

    /// Tiles in one homeland.
    #[must_use]
    pub const fn home_area(&self) -> u16 {
        self.home_width * self.home_height
    }

    /// Middle-row tiles each player places.
    #[must_use]
    pub const fn middle_size(&self) -> u16 {
        self.home_width / 2
    }

    /// Rows on the board.
    #[must_use]
    pub const fn board_height(&self) -> u16 {
        self.home_height * 2 + 1
    }

    /// Tiles on the board.
    #[must_use]
    pub const fn tile_count(&self) -> u16 {
        self.home_width * self.board_height()
    }

    /// Pieces per side.
    #[must_use]
    pub fn pieces_per_side(&self) -> u16 {
        self.piece_amounts.iter().fold(0, |sum, &n| sum.saturating_add(n))
    }

    /// Homeland quota of one tile type.
    #[must_use]
    pub fn tiles_of(&self, tile: TileType) -> u16 {
        self.tile_amounts.get(tile.code() as usize).copied().unwrap_or(0)
    }

    /// Middle-row quota of one tile type.
    #[must_use]
    pub fn middle_of(&self, tile: TileType) -> u16 {
        self.middle_amounts.get(tile.code() as usize).copied().unwrap_or(0)
    }

    /// Per-side amount of one piece type.
    #[must_use]
    pub fn pieces_of(&self, piece: PieceType) -> u16 {
        self.piece_amounts[piece.index()]
    }

    /// Clamp every field into its valid range.
    ///
    /// Afterwards the homeland quotas sum to the homeland area, the middle
    /// quotas to the middle size, pieces fit on a homeland and the win
    /// conditions never exceed what the board offers. Fortresses absorb any
    /// difference in the tile quotas.
    pub fn check_values(&mut self) {
        self.home_width = self.home_width.clamp(MIN_WIDTH, MAX_WIDTH);
        self.home_height = self.home_height.clamp(MIN_HEIGHT, MAX_HEIGHT);

        let home = self.home_area();
        let middle = self.middle_size();
        fit_quota(&mut self.tile_amounts, home);
        fit_quota(&mut self.middle_amounts, middle);

        let area = self.home_area();
        for amount in &mut self.piece_amounts {
            *amount = (*amount).min(area);
        }
        while self.pieces_per_side() > area {
            let (largest, _) = self
                .piece_amounts
                .iter()
                .enumerate()
                .max_by_key(|&(i, &n)| (n, std::cmp::Reverse(i)))
                .unwrap_or((0, &0));
            self.piece_amounts[largest] -= 1;
        }

        self.win_throne = self.win_throne.min(self.pieces_of(PieceType::Throne));
        self.win_fortress = self.win_fortress.min(self.tiles_of(TileType::Fortress));
        self.capturers = PieceTypeSet::from_bits(self.capturers.bits());
        self.battle_pass = self.battle_pass.min(100);
        self.survival_pass = self.survival_pass.min(100);
        self.favor_max = self.favor_max.min(self.favor_limit);
        self.dragon_dist = self.dragon_dist.clamp(1, MAX_DRAGON_DIST);
    }
}

/// Shrink the largest non-fortress quota until the rest fits in `size`, then
/// give fortresses the remainder.
fn fit_quota(amounts: &mut [u16; TILE_KINDS], size: u16) {
    let fortress = TileType::Fortress.code() as usize;
    for amount in amounts.iter_mut() {
        *amount = (*amount).min(size);
    }
    let mut others: u32 = amounts
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != fortress)
        .map(|(_, &n)| u32::from(n))
        .sum();

    while others > u32::from(size) {
        let largest = amounts
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != fortress)
            .max_by_key(|&(i, &n)| (n, std::cmp::Reverse(i)))
            .map_or(0, |(i, _)| i);
        amounts[largest] -= 1;
        others -= 1;
    }

    // `others <= size` here, so the difference fits in u16.
    amounts[fortress] = size - others as u16;
}
