//! Property-based tests for indexing, config normalization, reachability
//! and the wire format.

use proptest::prelude::*;

use fates_favor::board::{fire_tiles, merge_middle, move_tiles, Adjacency, MovementRule};
use fates_favor::wire::{decode_config, encode_config};
use fates_favor::{Board, Config, PieceId, PieceTypeSet, TileId, TileType};

fn tile_type() -> impl Strategy<Value = TileType> {
    (0u8..6).prop_map(|code| TileType::from_code(code).unwrap_or(TileType::Empty))
}

fn any_config() -> impl Strategy<Value = Config> {
    (
        (0u16..120, 0u16..60),
        prop::array::uniform5(0u16..400),
        prop::array::uniform5(0u16..80),
        prop::array::uniform10(0u16..60),
        (any::<u16>(), any::<u16>(), any::<u16>()),
        (any::<u8>(), any::<u8>(), any::<u8>()),
        (0u16..10, 0u16..10),
        prop::array::uniform5(any::<bool>()),
    )
        .prop_map(
            |((w, h), tiles, middle, pieces, (wf, wt, cap), (battle, survival, dragon), (limit, max), flags)| {
                Config {
                    home_width: w,
                    home_height: h,
                    tile_amounts: tiles,
                    middle_amounts: middle,
                    piece_amounts: pieces,
                    win_fortress: wf,
                    win_throne: wt,
                    capturers: PieceTypeSet::from_bits(cap),
                    battle_pass: battle,
                    survival_pass: survival,
                    favor_limit: limit,
                    favor_max: max,
                    dragon_dist: dragon,
                    dragon_diag: flags[0],
                    multistage: flags[1],
                    first_turn_engage: flags[2],
                    shift_left: flags[3],
                    shift_near: flags[4],
                }
            },
        )
}

fn filled(row: &[TileType]) -> usize {
    row.iter().filter(|&&t| t != TileType::Empty).count()
}

/// 7×7 board with random terrain.
fn board_with(tiles: &[TileType]) -> Board {
    let config = Config::default().with_home_size(7, 3).checked();
    let mut board = Board::new(&config);
    for (i, &tile_type) in tiles.iter().enumerate() {
        board.set_tile_type(TileId::new(i as u16), tile_type);
    }
    board
}

proptest! {
    /// Mirroring an index twice gives the index back.
    #[test]
    fn prop_invert_is_involution((count, index) in (1u16..=u16::MAX).prop_flat_map(|c| (Just(c), 0..c))) {
        let tile = TileId::new(index);
        prop_assert!(tile.invert(count).raw() < count);
        prop_assert_eq!(tile.invert(count).invert(count), tile);
        let piece = PieceId::new(index);
        prop_assert_eq!(piece.invert(count).invert(count), piece);
    }

    /// Normalized quotas fill the homeland and the middle row exactly.
    #[test]
    fn prop_check_values_fits_quotas(config in any_config()) {
        let checked = config.checked();
        prop_assert_eq!(checked.tile_amounts.iter().sum::<u16>(), checked.home_area());
        prop_assert_eq!(checked.middle_amounts.iter().sum::<u16>(), checked.middle_size());
        prop_assert!(checked.pieces_per_side() <= checked.home_area());
        prop_assert!(checked.win_throne <= checked.piece_amounts[9]);
        prop_assert!(checked.favor_max <= checked.favor_limit);
        prop_assert!(checked.battle_pass <= 100 && checked.survival_pass <= 100);
    }

    /// Normalizing twice changes nothing.
    #[test]
    fn prop_check_values_idempotent(config in any_config()) {
        let once = config.checked();
        prop_assert_eq!(once.clone().checked(), once);
    }

    /// Every normalized config survives the config block.
    #[test]
    fn prop_config_block_round_trip(config in any_config()) {
        let config = config.checked();
        prop_assert_eq!(decode_config(&encode_config(&config)), Ok(config));
    }

    /// A larger step limit never loses a reachable tile.
    #[test]
    fn prop_reach_grows_with_limit(
        tiles in prop::collection::vec(tile_type(), 49),
        start in 0u16..49,
        blockers in prop::collection::vec(0u16..49, 0..8),
        limit in 1u16..6,
        diagonal in any::<bool>(),
    ) {
        let mut board = board_with(&tiles);
        let piece = PieceId::new(0);
        board.place_piece(piece, TileId::new(start));
        let enemy = board.piece_count() - 1;
        for (k, &tile) in blockers.iter().filter(|&&t| t != start).enumerate() {
            board.place_piece(PieceId::new(enemy - k as u16), TileId::new(tile));
        }

        let adjacency = if diagonal { Adjacency::Full } else { Adjacency::Straight };
        let near = move_tiles(&board, piece, MovementRule::area(adjacency, limit), None);
        let far = move_tiles(&board, piece, MovementRule::area(adjacency, limit + 1), None);
        prop_assert!(near.is_subset(&far));
        prop_assert!(!far.contains(&TileId::new(start)));
        prop_assert!(far.iter().all(|&t| board.tile_type(t) != TileType::Empty && board.piece_on(t).is_none()));
    }

    /// Fire targets lie on a straight or diagonal ray at exactly the range.
    #[test]
    fn prop_fire_tiles_at_exact_range(
        tiles in prop::collection::vec(tile_type(), 49),
        from in 0u16..49,
        range in 1u16..4,
    ) {
        let board = board_with(&tiles);
        let origin = board.coord_of(TileId::new(from));
        for tile in fire_tiles(&board, TileId::new(from), range) {
            let target = board.coord_of(tile);
            prop_assert!(origin.is_aligned(target));
            prop_assert_eq!(origin.chebyshev(target), range);
            prop_assert_ne!(board.tile_type(tile), TileType::Empty);
        }
    }

    /// The first player's columns are kept and no tile is lost while free
    /// columns remain.
    #[test]
    fn prop_merge_middle_conserves_tiles(
        rows in (3usize..12).prop_flat_map(|w| (
            prop::collection::vec(tile_type(), w),
            prop::collection::vec(tile_type(), w),
        )),
        shift_left in any::<bool>(),
        shift_near in any::<bool>(),
    ) {
        let (first, second) = rows;
        let merged = merge_middle(&first, &second, shift_left, shift_near);
        prop_assert_eq!(merged.len(), first.len());
        for (x, &tile) in first.iter().enumerate() {
            if tile != TileType::Empty {
                prop_assert_eq!(merged[x], tile);
            }
        }
        prop_assert_eq!(filled(&merged), (filled(&first) + filled(&second)).min(first.len()));
    }
}
