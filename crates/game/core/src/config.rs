//! Balance constants and tunable parameters.

use crate::state::StatLine;

/// Game configuration constants and tunable parameters.
///
/// `Default` yields the canonical balance values. Content can override any of
/// them through a TOML file (see `arena-content`'s `ConfigLoader`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub combat: CombatParams,
    pub behavior: BehaviorParams,
    pub evolution: EvolutionParams,
    pub rewards: RewardParams,
    pub leveling: LevelingParams,
    /// Number of log entries included in public battle snapshots.
    pub snapshot_log_window: usize,
}

impl GameConfig {
    pub const DEFAULT_SNAPSHOT_LOG_WINDOW: usize = 5;

    pub fn new() -> Self {
        Self {
            combat: CombatParams::default(),
            behavior: BehaviorParams::default(),
            evolution: EvolutionParams::default(),
            rewards: RewardParams::default(),
            leveling: LevelingParams::default(),
            snapshot_log_window: Self::DEFAULT_SNAPSHOT_LOG_WINDOW,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters of the damage formula and per-turn upkeep.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatParams {
    /// Floor applied to every damaging move.
    pub minimum_damage: u32,
    pub attack_divisor: f64,
    pub defense_divisor: f64,
    pub advantage_multiplier: f64,
    pub disadvantage_multiplier: f64,
    /// Damage change per level of difference between attacker and defender.
    pub level_step: f64,
    pub variance_min: f64,
    pub variance_max: f64,
    /// Multiplier applied while the defender is defending.
    pub defending_multiplier: f64,
    /// Energy regained by both combatants after each non-terminal move.
    pub energy_regen: u32,
}

impl Default for CombatParams {
    fn default() -> Self {
        Self {
            minimum_damage: 5,
            attack_divisor: 100.0,
            defense_divisor: 200.0,
            advantage_multiplier: 1.5,
            disadvantage_multiplier: 0.75,
            level_step: 0.05,
            variance_min: 0.9,
            variance_max: 1.1,
            defending_multiplier: 0.5,
            energy_regen: 10,
        }
    }
}

/// Thresholds and increments used by the behavior tracker.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BehaviorParams {
    /// Moves at or above this power count as heavy aggression.
    pub heavy_power: u32,
    /// HP fraction below which acting counts as risky.
    pub low_hp_ratio: f64,
    /// HP fraction above which defending counts as strategic.
    pub high_hp_ratio: f64,
    /// Number of the player's most recent moves inspected for variety.
    pub variety_window: usize,
    /// Distinct moves within the window required for the adaptive bonus.
    pub variety_threshold: usize,
    /// Variance below which a profile is classified as balanced.
    pub balanced_variance: f64,
    /// Secondary/primary ratio at or above which a profile is hybrid.
    pub hybrid_ratio: f64,
}

impl Default for BehaviorParams {
    fn default() -> Self {
        Self {
            heavy_power: 100,
            low_hp_ratio: 0.3,
            high_hp_ratio: 0.7,
            variety_window: 5,
            variety_threshold: 3,
            balanced_variance: 2.0,
            hybrid_ratio: 0.7,
        }
    }
}

/// Battle-count gates for each stage transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvolutionParams {
    pub evolved_battles: u32,
    pub ultimate_battles: u32,
    /// Weight of the primary trait when blending hybrid stat boosts.
    pub primary_weight_pct: u32,
    /// Maximum number of new moves granted by a hybrid evolution.
    pub hybrid_move_limit: usize,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            evolved_battles: 10,
            ultimate_battles: 20,
            primary_weight_pct: 60,
            hybrid_move_limit: 3,
        }
    }
}

/// Fixed post-battle payouts.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardParams {
    pub winner_experience: u32,
    pub winner_currency: f64,
    pub loser_experience: u32,
    pub loser_currency: f64,
}

impl Default for RewardParams {
    fn default() -> Self {
        Self {
            winner_experience: 100,
            winner_currency: 0.01,
            loser_experience: 50,
            loser_currency: 0.005,
        }
    }
}

/// Experience curve and per-level stat growth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelingParams {
    /// Experience needed per level: `level * experience_per_level`.
    pub experience_per_level: u32,
    pub level_up_boosts: StatLine,
}

impl Default for LevelingParams {
    fn default() -> Self {
        Self {
            experience_per_level: 100,
            level_up_boosts: StatLine {
                attack: 5,
                defense: 5,
                speed: 3,
                intelligence: 3,
                max_hp: 20,
                max_energy: 10,
            },
        }
    }
}
