//! Persistent creature model.
//!
//! A [`Creature`] is owned by the surrounding application. The core only
//! mutates it through post-battle settlement and evolution.

use crate::behavior::TraitScores;
use crate::evolution::VisualTraits;

use super::ids::{CreatureId, MoveId, PlayerId};

/// Elemental affinity. Fire beats earth, earth beats water, water beats fire.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Element {
    Fire,
    Water,
    Earth,
}

impl Element {
    /// The element this one has an advantage over.
    pub const fn beats(self) -> Element {
        match self {
            Element::Fire => Element::Earth,
            Element::Earth => Element::Water,
            Element::Water => Element::Fire,
        }
    }

    pub fn has_advantage_over(self, other: Element) -> bool {
        self.beats() == other
    }
}

/// Evolution tier. Transitions only move forward.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvolutionStage {
    #[default]
    Base,
    Evolved,
    Ultimate,
}

impl EvolutionStage {
    /// The stage reached by the next evolution, if any.
    pub const fn next(self) -> Option<EvolutionStage> {
        match self {
            EvolutionStage::Base => Some(EvolutionStage::Evolved),
            EvolutionStage::Evolved => Some(EvolutionStage::Ultimate),
            EvolutionStage::Ultimate => None,
        }
    }
}

/// Stat keys that evolution and level-ups can modify.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum StatKind {
    Attack,
    Defense,
    Speed,
    Intelligence,
    MaxHp,
    MaxEnergy,
}

/// A flat block of the six growable stats.
///
/// Used for starter templates and fixed level-up boosts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatLine {
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub intelligence: u32,
    pub max_hp: u32,
    pub max_energy: u32,
}

/// Creature stats including resting HP and energy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureStats {
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub intelligence: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub energy: u32,
    pub max_energy: u32,
}

impl CreatureStats {
    /// Full-health stats from a stat line.
    pub fn from_line(line: &StatLine) -> Self {
        Self {
            attack: line.attack,
            defense: line.defense,
            speed: line.speed,
            intelligence: line.intelligence,
            hp: line.max_hp,
            max_hp: line.max_hp,
            energy: line.max_energy,
            max_energy: line.max_energy,
        }
    }

    pub fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::Speed => self.speed,
            StatKind::Intelligence => self.intelligence,
            StatKind::MaxHp => self.max_hp,
            StatKind::MaxEnergy => self.max_energy,
        }
    }

    /// Applies a signed delta to one stat, saturating at zero.
    pub fn apply_delta(&mut self, kind: StatKind, delta: i32) {
        let slot = match kind {
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::Speed => &mut self.speed,
            StatKind::Intelligence => &mut self.intelligence,
            StatKind::MaxHp => &mut self.max_hp,
            StatKind::MaxEnergy => &mut self.max_energy,
        };
        *slot = slot.saturating_add_signed(delta);
        self.hp = self.hp.min(self.max_hp);
        self.energy = self.energy.min(self.max_energy);
    }

    /// Adds every field of a stat line.
    pub fn add_line(&mut self, line: &StatLine) {
        self.attack = self.attack.saturating_add(line.attack);
        self.defense = self.defense.saturating_add(line.defense);
        self.speed = self.speed.saturating_add(line.speed);
        self.intelligence = self.intelligence.saturating_add(line.intelligence);
        self.max_hp = self.max_hp.saturating_add(line.max_hp);
        self.max_energy = self.max_energy.saturating_add(line.max_energy);
    }

    pub fn restore(&mut self) {
        self.hp = self.max_hp;
        self.energy = self.max_energy;
    }
}

/// Lifetime win/loss record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleRecord {
    total_battles: u32,
    wins: u32,
    losses: u32,
    win_rate: u32,
}

impl BattleRecord {
    pub fn new(total_battles: u32, wins: u32, losses: u32) -> Self {
        let mut record = Self {
            total_battles,
            wins,
            losses,
            win_rate: 0,
        };
        record.recompute_win_rate();
        record
    }

    pub fn total_battles(&self) -> u32 {
        self.total_battles
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    /// Rounded win percentage; zero before the first battle.
    pub fn win_rate(&self) -> u32 {
        self.win_rate
    }

    pub fn record_win(&mut self) {
        self.total_battles += 1;
        self.wins += 1;
        self.recompute_win_rate();
    }

    pub fn record_loss(&mut self) {
        self.total_battles += 1;
        self.losses += 1;
        self.recompute_win_rate();
    }

    fn recompute_win_rate(&mut self) {
        self.win_rate = if self.total_battles == 0 {
            0
        } else {
            (f64::from(self.wins) / f64::from(self.total_battles) * 100.0).round() as u32
        };
    }
}

/// Starter stats and moveset for newly minted creatures of one element.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureTemplate {
    pub element: Element,
    pub stats: StatLine,
    pub moves: Vec<MoveId>,
}

/// Long-lived creature record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Creature {
    pub id: CreatureId,
    pub name: String,
    pub owner: PlayerId,
    pub element: Element,
    pub level: u32,
    pub experience: u32,
    pub evolution_stage: EvolutionStage,
    /// Form name granted by the latest evolution (e.g. `Destroyer`).
    pub form: Option<String>,
    pub stats: CreatureStats,
    /// Catalog moves from the starter template.
    pub moves: Vec<MoveId>,
    /// Move names unlocked through evolution.
    pub signature_moves: Vec<String>,
    pub visual: Option<VisualTraits>,
    /// Lifetime behavior totals accumulated across all battles.
    pub behavior: TraitScores,
    pub battle_stats: BattleRecord,
    pub is_evolvable: bool,
}

impl Creature {
    /// Mint-equivalent constructor: level 1, no history, full resources.
    pub fn from_template(
        id: CreatureId,
        name: impl Into<String>,
        owner: PlayerId,
        template: &CreatureTemplate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
            element: template.element,
            level: 1,
            experience: 0,
            evolution_stage: EvolutionStage::Base,
            form: None,
            stats: CreatureStats::from_line(&template.stats),
            moves: template.moves.clone(),
            signature_moves: Vec::new(),
            visual: None,
            behavior: TraitScores::default(),
            battle_stats: BattleRecord::default(),
            is_evolvable: false,
        }
    }
}
