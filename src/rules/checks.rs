//! Stateless rule checks: terrain survival and terrain restrictions on
//! engagements.

use crate::core::{PieceType, TileType};
use crate::error::{ActionResult, IllegalAction};

/// Whether moving between two terrains calls for a survival roll.
///
/// Rough terrain is mountain and water. Dragons never roll; rangers are at
/// home in mountains and spearmen in water as long as the other rough
/// terrain is not involved. A favor matching the only rough terrain
/// involved also spares the roll.
#[must_use]
pub fn needs_survival_roll(piece: PieceType, from: TileType, to: TileType, favor: Option<TileType>) -> bool {
    let mountain = from == TileType::Mountain || to == TileType::Mountain;
    let water = from == TileType::Water || to == TileType::Water;
    if !mountain && !water {
        return false;
    }

    let only_mountain = mountain && !water;
    let only_water = water && !mountain;
    match piece {
        PieceType::Dragon => false,
        PieceType::Ranger if only_mountain => false,
        PieceType::Spearman if only_water => false,
        _ => !matches!(
            (favor, only_mountain, only_water),
            (Some(TileType::Mountain), true, _) | (Some(TileType::Water), _, true)
        ),
    }
}

/// Terrain restrictions on melee. Thrones are exempt and never reach here.
pub fn check_attack_terrain(piece: PieceType, from: TileType, to: TileType) -> ActionResult<()> {
    if from == TileType::Mountain && !matches!(piece, PieceType::Ranger | PieceType::Dragon) {
        return Err(IllegalAction::AttackFrom { piece, tile: from });
    }
    if to == TileType::Forest && from != TileType::Forest && piece.is_cavalry() {
        return Err(IllegalAction::AttackOntoForest { piece });
    }
    if to == TileType::Forest && piece == PieceType::Dragon {
        return Err(IllegalAction::AttackOnto { piece, tile: to });
    }
    if to == TileType::Water && !matches!(piece, PieceType::Spearman | PieceType::Dragon) {
        return Err(IllegalAction::AttackOnto { piece, tile: to });
    }
    Ok(())
}

/// Terrain restrictions on ranged fire.
pub fn check_fire_terrain(piece: PieceType, from: TileType, to: TileType) -> ActionResult<()> {
    if matches!(from, TileType::Forest | TileType::Water) {
        return Err(IllegalAction::FireFrom(from));
    }
    if to == TileType::Forest && piece != PieceType::Trebuchet {
        return Err(IllegalAction::FireAtForest { piece });
    }
    if to == TileType::Mountain {
        return Err(IllegalAction::FireAtMountain);
    }
    Ok(())
}
