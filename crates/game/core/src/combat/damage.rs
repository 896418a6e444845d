//! Damage calculation.

use crate::config::CombatParams;
use crate::state::{CombatantState, Element};

/// Elemental multiplier for an attack from `attacker` onto `defender`.
pub fn element_multiplier(attacker: Element, defender: Element, params: &CombatParams) -> f64 {
    if attacker.has_advantage_over(defender) {
        params.advantage_multiplier
    } else if defender.has_advantage_over(attacker) {
        params.disadvantage_multiplier
    } else {
        1.0
    }
}

/// Calculate damage from a damaging move.
///
/// # Formula
///
/// ```text
/// attack_mod    = attacker.attack / 100
/// defense_mod   = defender.defense / 200
/// level_mod     = 1 + (attacker.level - defender.level) * 0.05
/// defending_mod = 0.5 if defender is defending else 1.0
/// raw = power * attack_mod * element_mul * level_mod * variance * defending_mod * (1 - defense_mod)
/// damage = max(minimum, floor(raw))
/// ```
///
/// `variance` is supplied by the caller so the roll can be pinned.
pub fn calculate_damage(
    power: u32,
    attacker: &CombatantState,
    defender: &CombatantState,
    variance: f64,
    params: &CombatParams,
) -> u32 {
    let attack_mod = f64::from(attacker.stats.attack) / params.attack_divisor;
    let defense_mod = f64::from(defender.stats.defense) / params.defense_divisor;
    let element_mul = element_multiplier(attacker.element, defender.element, params);
    let level_diff = i64::from(attacker.level) - i64::from(defender.level);
    let level_mod = 1.0 + level_diff as f64 * params.level_step;
    let defending_mod = if defender.defending {
        params.defending_multiplier
    } else {
        1.0
    };

    let raw = f64::from(power)
        * attack_mod
        * element_mul
        * level_mod
        * variance
        * defending_mod
        * (1.0 - defense_mod);

    // Negative or NaN results fall through to the floor.
    let floored = raw.floor();
    if floored.is_finite() && floored > f64::from(params.minimum_damage) {
        floored.min(f64::from(u32::MAX)) as u32
    } else {
        params.minimum_damage
    }
}
