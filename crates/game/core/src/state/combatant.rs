//! Per-battle combatant substate.

use super::creature::{Creature, Element};
use super::ids::{CreatureId, PlayerId};

/// Seat of a combatant within a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub const fn opponent(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

/// Transient effects attached to a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    /// Registered by a counter move. Lasts until its owner's next move and
    /// does not alter damage.
    CounterStance { turns: u32 },
}

/// Base values copied from the creature when the battle starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub intelligence: u32,
    pub max_hp: u32,
    pub max_energy: u32,
}

/// Mutable combat state of one creature, owned by its battle session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantState {
    pub player: PlayerId,
    pub creature: CreatureId,
    pub element: Element,
    pub level: u32,
    pub stats: CombatStats,
    current_hp: u32,
    current_energy: u32,
    pub defending: bool,
    pub effects: Vec<Effect>,
}

impl CombatantState {
    /// Enters battle with the creature's resting HP and energy.
    pub fn new(player: PlayerId, creature: &Creature) -> Self {
        let stats = CombatStats {
            attack: creature.stats.attack,
            defense: creature.stats.defense,
            speed: creature.stats.speed,
            intelligence: creature.stats.intelligence,
            max_hp: creature.stats.max_hp,
            max_energy: creature.stats.max_energy,
        };
        Self {
            player,
            creature: creature.id,
            element: creature.element,
            level: creature.level,
            stats,
            current_hp: creature.stats.hp.min(stats.max_hp),
            current_energy: creature.stats.energy.min(stats.max_energy),
            defending: false,
            effects: Vec::new(),
        }
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn current_energy(&self) -> u32 {
        self.current_energy
    }

    pub fn is_defeated(&self) -> bool {
        self.current_hp == 0
    }

    /// Reduces HP, clamped at zero. Returns the HP actually lost.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_sub(damage);
        before - self.current_hp
    }

    /// Restores HP, clamped at max. Returns the HP actually gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.stats.max_hp);
        self.current_hp - before
    }

    /// Spends energy. The caller has already checked affordability.
    pub fn spend_energy(&mut self, cost: u32) {
        self.current_energy = self.current_energy.saturating_sub(cost);
    }

    pub fn regenerate_energy(&mut self, amount: u32) {
        self.current_energy = self
            .current_energy
            .saturating_add(amount)
            .min(self.stats.max_energy);
    }

    pub fn has_counter_stance(&self) -> bool {
        self.effects
            .iter()
            .any(|effect| matches!(effect, Effect::CounterStance { .. }))
    }

    /// Clears per-turn state at the start of this combatant's move.
    pub(crate) fn begin_move(&mut self) {
        self.defending = false;
        self.effects.retain_mut(|effect| match effect {
            Effect::CounterStance { turns } => {
                *turns = turns.saturating_sub(1);
                *turns > 0
            }
        });
    }
}
