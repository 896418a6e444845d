//! Post-battle rewards, experience and level-ups.

use crate::behavior::TraitScores;
use crate::config::{GameConfig, LevelingParams, RewardParams};
use crate::engine::BattleSession;
use crate::evolution::meets_evolution_gate;
use crate::state::{BattleId, Creature, CreatureId, PlayerId};

/// Fixed payout for one side of a battle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub experience: u32,
    pub currency: f64,
}

impl Rewards {
    pub fn winner(params: &RewardParams) -> Self {
        Self {
            experience: params.winner_experience,
            currency: params.winner_currency,
        }
    }

    pub fn loser(params: &RewardParams) -> Self {
        Self {
            experience: params.loser_experience,
            currency: params.loser_currency,
        }
    }
}

/// What one participant takes away from a battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerSettlement {
    pub player: PlayerId,
    pub creature: CreatureId,
    pub rewards: Rewards,
    /// Behavior scored during this battle only.
    pub behavior: TraitScores,
}

/// Settlement of a decided battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settlement {
    pub battle_id: BattleId,
    pub winner: PlayerSettlement,
    pub loser: PlayerSettlement,
}

impl Settlement {
    /// Builds the settlement of a terminated session.
    ///
    /// Returns `None` while the battle is active. Abandoned battles carry a
    /// forfeit result and settle like any other decided battle.
    pub fn from_session(session: &BattleSession, params: &RewardParams) -> Option<Self> {
        let result = session.result()?;
        let side = |player: &PlayerId, rewards: Rewards| -> Option<PlayerSettlement> {
            let seat = session.side_of(player)?;
            Some(PlayerSettlement {
                player: player.clone(),
                creature: session.combatant(seat).creature,
                rewards,
                behavior: session.behavior_scores(player)?,
            })
        };

        Some(Self {
            battle_id: session.id(),
            winner: side(result.winner(), Rewards::winner(params))?,
            loser: side(result.loser(), Rewards::loser(params))?,
        })
    }

    /// The entry for `creature`, if it took part.
    pub fn for_creature(&self, creature: CreatureId) -> Option<(&PlayerSettlement, bool)> {
        if self.winner.creature == creature {
            Some((&self.winner, true))
        } else if self.loser.creature == creature {
            Some((&self.loser, false))
        } else {
            None
        }
    }
}

/// Adds experience and applies every level-up it pays for.
///
/// Each level costs `level * experience_per_level`. A level-up adds the fixed
/// boosts and restores HP and energy. Returns the number of levels gained.
pub fn grant_experience(creature: &mut Creature, experience: u32, params: &LevelingParams) -> u32 {
    creature.experience = creature.experience.saturating_add(experience);

    let mut gained = 0;
    loop {
        let cost = creature.level.saturating_mul(params.experience_per_level);
        if cost == 0 || creature.experience < cost {
            break;
        }
        creature.experience -= cost;
        creature.level += 1;
        creature.stats.add_line(&params.level_up_boosts);
        creature.stats.restore();
        gained += 1;
    }
    gained
}

/// Folds one settlement entry into a creature record.
///
/// Updates the battle record, experience, lifetime behavior and the
/// evolvable flag. Returns levels gained.
pub fn apply_settlement(
    creature: &mut Creature,
    entry: &PlayerSettlement,
    won: bool,
    config: &GameConfig,
) -> u32 {
    if won {
        creature.battle_stats.record_win();
    } else {
        creature.battle_stats.record_loss();
    }
    creature.behavior += entry.behavior;
    let levels = grant_experience(creature, entry.rewards.experience, &config.leveling);
    creature.is_evolvable = meets_evolution_gate(creature, config);
    levels
}
