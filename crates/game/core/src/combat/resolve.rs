//! Move validation and effect application.

use crate::config::CombatParams;
use crate::env::MoveCatalog;
use crate::moves::{Move, MoveEffect};
use crate::state::{CombatantState, Effect, MoveId, PlayerId};

use super::damage::calculate_damage;
use super::error::BattleError;

/// What a single resolved move did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveResolution {
    pub damage: u32,
    pub healing: u32,
    pub effect: Option<String>,
}

/// Checks turn ownership, catalog membership and energy, in that order.
///
/// The caller has already checked that the battle is active.
pub fn validate_move<'c>(
    current_player: &PlayerId,
    player: &PlayerId,
    attacker: &CombatantState,
    move_id: &MoveId,
    catalog: &'c dyn MoveCatalog,
) -> Result<&'c Move, BattleError> {
    if current_player != player {
        return Err(BattleError::NotYourTurn);
    }

    let mv = catalog
        .find_move(move_id)
        .ok_or_else(|| BattleError::UnknownMove(move_id.to_string()))?;

    if attacker.current_energy() < mv.energy_cost {
        return Err(BattleError::InsufficientEnergy {
            required: mv.energy_cost,
            available: attacker.current_energy(),
        });
    }

    Ok(mv)
}

/// Applies a validated move to both combatants and pays its energy cost.
///
/// `variance` is only consumed by damaging moves.
pub fn apply_move(
    mv: &Move,
    attacker: &mut CombatantState,
    defender: &mut CombatantState,
    variance: f64,
    params: &CombatParams,
) -> MoveResolution {
    attacker.begin_move();

    let resolution = match mv.effect {
        MoveEffect::Attack { power } | MoveEffect::Special { power } => {
            let damage = calculate_damage(power, attacker, defender, variance, params);
            defender.take_damage(damage);
            MoveResolution {
                damage,
                ..MoveResolution::default()
            }
        }
        MoveEffect::Defend => {
            attacker.defending = true;
            MoveResolution {
                effect: Some("Defending - damage reduced by 50%".to_owned()),
                ..MoveResolution::default()
            }
        }
        MoveEffect::Heal { amount } => {
            attacker.heal(amount);
            MoveResolution {
                healing: amount,
                ..MoveResolution::default()
            }
        }
        MoveEffect::Counter => {
            attacker.effects.push(Effect::CounterStance { turns: 1 });
            MoveResolution {
                effect: Some("Counter stance raised".to_owned()),
                ..MoveResolution::default()
            }
        }
    };

    attacker.spend_energy(mv.energy_cost);
    resolution
}
