//! Redacted, read-only battle views.

use crate::state::{BattleId, CombatantState, CreatureId, Element, PlayerId};

use super::log::{BattleResult, BattleStatus, LogEntry};

/// Public view of one combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantView {
    pub player: PlayerId,
    pub creature: CreatureId,
    pub element: Element,
    pub level: u32,
    pub current_hp: u32,
    pub max_hp: u32,
    pub current_energy: u32,
    pub max_energy: u32,
    pub defending: bool,
    pub counter_stance: bool,
}

impl From<&CombatantState> for CombatantView {
    fn from(state: &CombatantState) -> Self {
        Self {
            player: state.player.clone(),
            creature: state.creature,
            element: state.element,
            level: state.level,
            current_hp: state.current_hp(),
            max_hp: state.stats.max_hp,
            current_energy: state.current_energy(),
            max_energy: state.stats.max_energy,
            defending: state.defending,
            counter_stance: state.has_counter_stance(),
        }
    }
}

/// Snapshot handed to players and observers. Owns its data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub battle_id: BattleId,
    pub status: BattleStatus,
    pub turn: u32,
    pub current_player: PlayerId,
    pub combatants: [CombatantView; 2],
    pub recent_log: Vec<LogEntry>,
    pub result: Option<BattleResult>,
}

impl BattleSnapshot {
    pub fn combatant(&self, player: &PlayerId) -> Option<&CombatantView> {
        self.combatants.iter().find(|view| &view.player == player)
    }
}
