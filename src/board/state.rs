//! Tile grid and piece array for both sides.
//!
//! The board performs no validation; the engine checks legality before it
//! mutates anything here.
//!
//! ## Layout
//!
//! The grid is `width × (2 · home_height + 1)` tiles, seen from the local
//! player:
//!
//! ```text
//! rows 0 .. home_height            enemy homeland
//! row  home_height                 middle row
//! rows home_height + 1 .. height   own homeland
//! ```
//!
//! The piece array holds `2 · P` pieces where `P` is the per-side total.
//! Indices `0..P` are own pieces grouped by type, indices `P..2P` the
//! mirrored enemy pieces.

use serde::{Deserialize, Serialize};

use crate::core::{Config, Coord, PieceId, PieceType, PieceTypeSet, Side, TileId, TileType, PIECE_KINDS};

/// One board tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub tile_type: TileType,
    /// Only meaningful for fortresses.
    pub breached: bool,
}

impl Tile {
    #[must_use]
    pub const fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            breached: false,
        }
    }

    /// A fortress that still has to be assaulted before it can be entered
    /// by force.
    #[must_use]
    pub const fn is_unbreached_fortress(&self) -> bool {
        matches!(self.tile_type, TileType::Fortress) && !self.breached
    }
}

/// One piece, on or off the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    /// `None` while captured or not yet placed.
    pub pos: Option<TileId>,
    /// Fortress the piece last stood on. Thrones earn favors by reaching a
    /// different one.
    pub last_fortress: Option<TileId>,
}

impl Piece {
    #[must_use]
    pub const fn new(piece_type: PieceType) -> Self {
        Self {
            piece_type,
            pos: None,
            last_fortress: None,
        }
    }

    #[must_use]
    pub const fn on_board(&self) -> bool {
        self.pos.is_some()
    }
}

/// Tiles and pieces of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: u16,
    home_height: u16,
    tiles: Vec<Tile>,
    pieces: Vec<Piece>,
    own_amounts: [u16; PIECE_KINDS],
    enemy_amounts: [u16; PIECE_KINDS],
}

impl Board {
    /// Create an empty board sized for `config`. All tiles start `Empty`,
    /// all pieces off-board. Both sides start with the configured amounts.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let width = config.home_width;
        let home_height = config.home_height;
        let tiles = vec![Tile::new(TileType::Empty); usize::from(config.tile_count())];

        let mut board = Self {
            width,
            home_height,
            tiles,
            pieces: Vec::new(),
            own_amounts: config.piece_amounts,
            enemy_amounts: config.piece_amounts,
        };
        board.rebuild_pieces();
        board
    }

    /// Replace the enemy's per-type amounts, reallocating the enemy half of
    /// the piece array. Every piece is taken off the board.
    pub fn set_enemy_amounts(&mut self, amounts: [u16; PIECE_KINDS]) {
        self.enemy_amounts = amounts;
        self.rebuild_pieces();
    }

    fn rebuild_pieces(&mut self) {
        let own: Vec<Piece> = grouped_types(&self.own_amounts).map(Piece::new).collect();
        let enemy: Vec<Piece> = grouped_types(&self.enemy_amounts).map(Piece::new).collect();
        // The enemy's piece `i` is stored at `2P - 1 - i`.
        self.pieces = own.into_iter().chain(enemy.into_iter().rev()).collect();
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Rows on the board.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.home_height * 2 + 1
    }

    #[must_use]
    pub const fn home_height(&self) -> u16 {
        self.home_height
    }

    /// Tiles in one homeland.
    #[must_use]
    pub const fn home_size(&self) -> u16 {
        self.width * self.home_height
    }

    #[must_use]
    pub fn tile_count(&self) -> u16 {
        // Bounded by the config limits.
        self.tiles.len() as u16
    }

    #[must_use]
    pub fn piece_count(&self) -> u16 {
        self.pieces.len() as u16
    }

    /// Own pieces, also the index of the first enemy piece.
    #[must_use]
    pub fn own_piece_count(&self) -> u16 {
        self.own_amounts.iter().sum()
    }

    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Per-type amounts of one side.
    #[must_use]
    pub fn amounts(&self, side: Side) -> &[u16; PIECE_KINDS] {
        match side {
            Side::Own => &self.own_amounts,
            Side::Enemy => &self.enemy_amounts,
        }
    }

    // === Coordinates ===

    #[must_use]
    pub fn coord_of(&self, tile: TileId) -> Coord {
        Coord::new(tile.raw() % self.width, tile.raw() / self.width)
    }

    /// Tile at a coordinate, `None` when out of bounds.
    #[must_use]
    pub fn tile_id(&self, pos: Coord) -> Option<TileId> {
        (pos.x < self.width && pos.y < self.height()).then(|| TileId::new(pos.y * self.width + pos.x))
    }

    /// Neighbour of `tile` by offset, `None` when leaving the board.
    #[must_use]
    pub fn offset(&self, tile: TileId, dx: i32, dy: i32) -> Option<TileId> {
        let pos = self.coord_of(tile).offset(dx, dy, self.width, self.height())?;
        self.tile_id(pos)
    }

    /// First tile of the own homeland.
    #[must_use]
    pub const fn own_home_start(&self) -> u16 {
        self.width * (self.home_height + 1)
    }

    /// First tile of the middle row.
    #[must_use]
    pub const fn middle_start(&self) -> u16 {
        self.width * self.home_height
    }

    #[must_use]
    pub fn is_own_home(&self, tile: TileId) -> bool {
        tile.raw() >= self.own_home_start() && tile.raw() < self.tile_count()
    }

    #[must_use]
    pub fn is_enemy_home(&self, tile: TileId) -> bool {
        tile.raw() < self.middle_start()
    }

    #[must_use]
    pub fn is_home_of(&self, side: Side, tile: TileId) -> bool {
        match side {
            Side::Own => self.is_own_home(tile),
            Side::Enemy => self.is_enemy_home(tile),
        }
    }

    /// Own homeland tiles in index order.
    pub fn own_home_tiles(&self) -> impl Iterator<Item = TileId> {
        (self.own_home_start()..self.tile_count()).map(TileId::new)
    }

    /// Mirror a tile into the opponent's numbering.
    #[must_use]
    pub fn invert_tile(&self, tile: TileId) -> TileId {
        tile.invert(self.tile_count())
    }

    /// Mirror a piece into the opponent's numbering.
    #[must_use]
    pub fn invert_piece(&self, piece: PieceId) -> PieceId {
        piece.invert(self.piece_count())
    }

    // === Tiles ===

    #[must_use]
    pub fn tile(&self, tile: TileId) -> Option<&Tile> {
        self.tiles.get(tile.index())
    }

    #[must_use]
    pub fn tile_at(&self, pos: Coord) -> Option<&Tile> {
        self.tile(self.tile_id(pos)?)
    }

    /// Terrain of a tile; out-of-range tiles read as `Empty`.
    #[must_use]
    pub fn tile_type(&self, tile: TileId) -> TileType {
        self.tile(tile).map_or(TileType::Empty, |t| t.tile_type)
    }

    pub fn set_tile_type(&mut self, tile: TileId, tile_type: TileType) {
        if let Some(t) = self.tiles.get_mut(tile.index()) {
            t.tile_type = tile_type;
        }
    }

    pub fn set_breached(&mut self, tile: TileId, breached: bool) {
        if let Some(t) = self.tiles.get_mut(tile.index()) {
            t.breached = breached;
        }
    }

    // === Pieces ===

    #[must_use]
    pub fn piece(&self, piece: PieceId) -> Option<&Piece> {
        self.pieces.get(piece.index())
    }

    pub fn piece_mut(&mut self, piece: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(piece.index())
    }

    /// Piece standing on a tile.
    #[must_use]
    pub fn piece_on(&self, tile: TileId) -> Option<PieceId> {
        self.pieces
            .iter()
            .position(|p| p.pos == Some(tile))
            .map(|i| PieceId::new(i as u16))
    }

    #[must_use]
    pub fn piece_at(&self, pos: Coord) -> Option<PieceId> {
        self.piece_on(self.tile_id(pos)?)
    }

    pub fn place_piece(&mut self, piece: PieceId, tile: TileId) {
        if let Some(p) = self.pieces.get_mut(piece.index()) {
            p.pos = Some(tile);
        }
    }

    pub fn remove_piece(&mut self, piece: PieceId) {
        if let Some(p) = self.pieces.get_mut(piece.index()) {
            p.pos = None;
        }
    }

    #[must_use]
    pub fn side_of(&self, piece: PieceId) -> Side {
        if piece.raw() < self.own_piece_count() {
            Side::Own
        } else {
            Side::Enemy
        }
    }

    /// IDs of one side's pieces.
    pub fn piece_ids(&self, side: Side) -> impl Iterator<Item = PieceId> {
        let split = self.own_piece_count();
        let range = match side {
            Side::Own => 0..split,
            Side::Enemy => split..self.piece_count(),
        };
        range.map(PieceId::new)
    }

    /// IDs of one side's pieces of a type.
    pub fn pieces_of(&self, side: Side, piece_type: PieceType) -> impl Iterator<Item = PieceId> + '_ {
        self.piece_ids(side)
            .filter(move |&id| self.pieces[id.index()].piece_type == piece_type)
    }

    /// Thrones a side has lost.
    #[must_use]
    pub fn thrones_lost(&self, side: Side) -> u16 {
        let alive = self
            .pieces_of(side, PieceType::Throne)
            .filter(|&id| self.pieces[id.index()].on_board())
            .count() as u16;
        self.amounts(side)[PieceType::Throne.index()].saturating_sub(alive)
    }

    /// Fortresses in the opposing homeland held by `side`'s capturers.
    #[must_use]
    pub fn fortresses_captured(&self, side: Side, capturers: PieceTypeSet) -> u16 {
        let mut count = 0;
        for id in self.piece_ids(side) {
            let piece = &self.pieces[id.index()];
            let Some(pos) = piece.pos else { continue };
            if capturers.contains(piece.piece_type)
                && self.tile_type(pos) == TileType::Fortress
                && self.is_home_of(side.opponent(), pos)
            {
                count += 1;
            }
        }
        count
    }
}

/// Piece types repeated by amount, in type order.
fn grouped_types(amounts: &[u16; PIECE_KINDS]) -> impl Iterator<Item = PieceType> + '_ {
    PieceType::ALL
        .into_iter()
        .zip(amounts.iter())
        .flat_map(|(piece_type, &n)| std::iter::repeat(piece_type).take(usize::from(n)))
}
