//! Setup layouts, the middle-row merge and the named layout library.
//!
//! A [`SetupLayout`] is one player's arrangement before a match, in that
//! player's own frame:
//!
//! - `tiles[k]` is homeland tile `k`, counted row by row from the row next to
//!   the middle row, left to right.
//! - `middle[x]` is the tile the player contributes to middle-row column
//!   `x`, or `Empty`.
//! - each [`PlacedPiece`] names a homeland tile index, or `None` for a
//!   dragon kept in reserve.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{Config, PieceType, TileType, PIECE_KINDS, TILE_KINDS};
use crate::error::{SetupError, SetupResult};

/// A piece in a setup layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub piece_type: PieceType,
    /// Homeland tile index.
    pub tile: Option<u16>,
}

/// One player's arrangement of homeland, middle row and pieces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupLayout {
    pub tiles: Vec<TileType>,
    pub middle: Vec<TileType>,
    pub pieces: Vec<PlacedPiece>,
}

impl SetupLayout {
    /// Fill every quota in type order: homeland tiles front to back, middle
    /// tiles from the left, pieces on the front tiles. Dragons are placed
    /// like any other piece.
    #[must_use]
    pub fn sequential(config: &Config) -> Self {
        let tiles: Vec<TileType> = repeat_quota(&config.tile_amounts).collect();

        let mut middle: Vec<TileType> = repeat_quota(&config.middle_amounts).collect();
        middle.resize(usize::from(config.home_width), TileType::Empty);

        let pieces = PieceType::ALL
            .into_iter()
            .flat_map(|piece_type| {
                std::iter::repeat(piece_type).take(usize::from(config.pieces_of(piece_type)))
            })
            .enumerate()
            .map(|(i, piece_type)| PlacedPiece {
                piece_type,
                tile: Some(i as u16),
            })
            .collect();

        Self { tiles, middle, pieces }
    }

    /// Check the layout against `config`.
    pub fn validate(&self, config: &Config) -> SetupResult<()> {
        let home = config.home_area();
        if self.tiles.len() != usize::from(home) {
            return Err(SetupError::TileCount {
                expected: home,
                got: self.tiles.len(),
            });
        }
        if let Some(index) = self.tiles.iter().position(|&t| t == TileType::Empty) {
            return Err(SetupError::EmptyHomeTile { index });
        }
        let counts = count_tiles(&self.tiles);
        for tile in TileType::PLACEABLE {
            let (expected, got) = (config.tiles_of(tile), counts[tile.code() as usize]);
            if expected != got {
                return Err(SetupError::TileQuota { tile, expected, got });
            }
        }

        if self.middle.len() != usize::from(config.home_width) {
            return Err(SetupError::MiddleSize {
                expected: config.home_width,
                got: self.middle.len(),
            });
        }
        let counts = count_tiles(&self.middle);
        for tile in TileType::PLACEABLE {
            let (expected, got) = (config.middle_of(tile), counts[tile.code() as usize]);
            if expected != got {
                return Err(SetupError::MiddleQuota { tile, expected, got });
            }
        }

        let mut piece_counts = [0u16; PIECE_KINDS];
        let mut occupied = vec![false; usize::from(home)];
        for piece in &self.pieces {
            let count = &mut piece_counts[piece.piece_type.index()];
            *count = count.saturating_add(1);
            match piece.tile {
                None if piece.piece_type == PieceType::Dragon => {}
                None => return Err(SetupError::PieceUnplaced(piece.piece_type)),
                Some(index) if index >= home => {
                    return Err(SetupError::PieceOutsideHome {
                        piece: piece.piece_type,
                        index,
                    })
                }
                Some(index) => {
                    let slot = &mut occupied[usize::from(index)];
                    if *slot {
                        return Err(SetupError::PieceStacked { index });
                    }
                    *slot = true;
                }
            }
        }
        for piece in PieceType::ALL {
            let (expected, got) = (config.pieces_of(piece), piece_counts[piece.index()]);
            if expected != got {
                return Err(SetupError::PieceQuota { piece, expected, got });
            }
        }
        Ok(())
    }
}

fn repeat_quota(amounts: &[u16; TILE_KINDS]) -> impl Iterator<Item = TileType> + '_ {
    TileType::PLACEABLE
        .into_iter()
        .zip(amounts.iter())
        .flat_map(|(tile, &n)| std::iter::repeat(tile).take(usize::from(n)))
}

fn count_tiles(tiles: &[TileType]) -> [u16; TILE_KINDS] {
    let mut counts = [0u16; TILE_KINDS];
    for tile in tiles {
        if let Some(slot) = counts.get_mut(tile.code() as usize) {
            *slot += 1;
        }
    }
    counts
}

/// Merge both players' middle-row contributions.
///
/// Both rows are given in the first player's frame. The first player keeps
/// every column it filled; a second-player tile landing on a taken column is
/// displaced. With `shift_near` it goes to the nearest free column, ties
/// broken towards `shift_left`; otherwise the row is scanned from the column
/// in the preferred direction, then the other way.
#[must_use]
pub fn merge_middle(first: &[TileType], second: &[TileType], shift_left: bool, shift_near: bool) -> Vec<TileType> {
    let mut merged = first.to_vec();
    merged.resize(first.len().max(second.len()), TileType::Empty);

    for (x, &tile) in second.iter().enumerate() {
        if tile == TileType::Empty {
            continue;
        }
        let target = if merged[x] == TileType::Empty {
            Some(x)
        } else if shift_near {
            nearest_free(&merged, x, shift_left)
        } else {
            scan_free(&merged, x, shift_left)
        };
        if let Some(column) = target {
            merged[column] = tile;
        }
    }
    merged
}

fn nearest_free(row: &[TileType], x: usize, left_first: bool) -> Option<usize> {
    for d in 1..row.len() {
        let left = x.checked_sub(d);
        let right = Some(x + d).filter(|&r| r < row.len());
        let order = if left_first { [left, right] } else { [right, left] };
        if let Some(column) = order.into_iter().flatten().find(|&c| row[c] == TileType::Empty) {
            return Some(column);
        }
    }
    None
}

fn scan_free(row: &[TileType], x: usize, left_first: bool) -> Option<usize> {
    let mut left = (0..x).rev();
    let mut right = x + 1..row.len();
    let free = |c: &usize| row[*c] == TileType::Empty;
    if left_first {
        left.find(free).or_else(|| right.find(free))
    } else {
        right.find(free).or_else(|| left.find(free))
    }
}

/// Named setup layouts, persisted as an opaque blob.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupLibrary {
    layouts: BTreeMap<String, SetupLayout>,
}

impl SetupLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a layout, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, layout: SetupLayout) -> Option<SetupLayout> {
        self.layouts.insert(name.into(), layout)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SetupLayout> {
        self.layouts.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<SetupLayout> {
        self.layouts.remove(name)
    }

    /// Layout names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }

    /// Names of the layouts usable under `config`.
    pub fn usable<'a>(&'a self, config: &'a Config) -> impl Iterator<Item = &'a str> {
        self.layouts
            .iter()
            .filter(move |(_, layout)| layout.validate(config).is_ok())
            .map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Serialize with bincode.
    pub fn to_bytes(&self) -> SetupResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| SetupError::Library(e.to_string()))
    }

    /// Deserialize a blob written by [`SetupLibrary::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> SetupResult<Self> {
        bincode::deserialize(bytes).map_err(|e| SetupError::Library(e.to_string()))
    }
}
