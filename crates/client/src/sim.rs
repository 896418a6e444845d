//! Self-play driver.
//!
//! Three trainers, one creature of each element, take turns meeting through
//! the matchmaking queue. Each battle is played out with random affordable
//! moves, then settled; creatures evolve as soon as they qualify.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use arena_content::{MoveRegistry, TemplateRegistry};
use arena_core::{
    BattleId, BattleSnapshot, Creature, CreatureId, Element, EvolutionResult, MoveId, PlayerId,
};
use arena_runtime::{CreatureRepository, MoveProvider, RuntimeHandle, TurnStep};

use crate::config::SimConfig;

const TRAINERS: [(&str, &str, Element); 3] = [
    ("alice", "Ember", Element::Fire),
    ("bob", "Tide", Element::Water),
    ("carol", "Pebble", Element::Earth),
];

/// One trainer and the creature they field.
#[derive(Clone, Debug)]
pub struct Trainer {
    pub player: PlayerId,
    pub creature: CreatureId,
    pub moves: Vec<MoveId>,
}

/// Mints one starter creature per trainer into `store`.
pub fn mint_roster(
    templates: &TemplateRegistry,
    store: &dyn CreatureRepository,
) -> Result<Vec<Trainer>> {
    let mut trainers = Vec::with_capacity(TRAINERS.len());

    for (index, (player, name, element)) in TRAINERS.into_iter().enumerate() {
        let template = templates
            .get(element)
            .with_context(|| format!("no starter template for {element}"))?;
        let id = CreatureId(index as u64 + 1);
        let player = PlayerId::from(player);
        store.save(&Creature::from_template(id, name, player.clone(), template))?;

        info!(%player, creature = %id, %element, "starter minted");
        trainers.push(Trainer {
            player,
            creature: id,
            moves: template.moves.clone(),
        });
    }

    Ok(trainers)
}

/// Picks uniformly among the moves the acting creature can pay for.
pub struct RandomMoveProvider {
    catalog: MoveRegistry,
    movesets: HashMap<PlayerId, Vec<MoveId>>,
    rng: Mutex<StdRng>,
}

impl RandomMoveProvider {
    pub fn new(catalog: MoveRegistry, trainers: &[Trainer], rng: StdRng) -> Self {
        Self {
            catalog,
            movesets: trainers
                .iter()
                .map(|trainer| (trainer.player.clone(), trainer.moves.clone()))
                .collect(),
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl MoveProvider for RandomMoveProvider {
    async fn choose_move(
        &self,
        player: &PlayerId,
        state: &BattleSnapshot,
    ) -> arena_runtime::Result<Option<MoveId>> {
        let energy = state
            .combatant(player)
            .map(|view| view.current_energy)
            .unwrap_or_default();
        let affordable: Vec<&MoveId> = self
            .movesets
            .get(player)
            .into_iter()
            .flatten()
            .filter(|id| {
                self.catalog
                    .get(id)
                    .is_some_and(|mv| mv.energy_cost <= energy)
            })
            .collect();

        let mut rng = match self.rng.lock() {
            Ok(rng) => rng,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(affordable.choose(&mut *rng).map(|id| (*id).clone()))
    }
}

pub struct Simulator {
    handle: RuntimeHandle,
    provider: RandomMoveProvider,
    config: SimConfig,
}

impl Simulator {
    pub fn new(handle: RuntimeHandle, provider: RandomMoveProvider, config: SimConfig) -> Self {
        Self {
            handle,
            provider,
            config,
        }
    }

    /// Plays the configured number of battles, rotating pairings.
    pub async fn run(&self, trainers: &[Trainer]) -> Result<()> {
        anyhow::ensure!(trainers.len() >= 2, "self-play needs at least two trainers");

        for round in 0..self.config.battles as usize {
            let first = &trainers[round % trainers.len()];
            let second = &trainers[(round + 1) % trainers.len()];

            self.handle
                .enqueue(first.player.clone(), first.creature)
                .await?;
            let battle = self
                .handle
                .enqueue(second.player.clone(), second.creature)
                .await?
                .context("matchmaking did not pair two waiting players")?;

            self.play(battle).await?;
            self.settle(battle).await?;
            for trainer in [first, second] {
                self.try_evolve(trainer.creature)?;
            }
        }

        Ok(())
    }

    async fn play(&self, battle: BattleId) -> Result<()> {
        loop {
            match self.handle.play_turn(battle, &self.provider).await? {
                TurnStep::Moved(outcome) => {
                    debug!(
                        %battle,
                        player = %outcome.entry.player,
                        move_id = %outcome.entry.move_id,
                        damage = outcome.entry.damage,
                        healing = outcome.entry.healing,
                        "turn {}",
                        outcome.entry.turn
                    );
                    if outcome.is_terminal() {
                        return Ok(());
                    }
                    if outcome.entry.turn >= self.config.max_turns {
                        if let Some(player) = outcome.next_player {
                            warn!(%battle, %player, "turn cap reached, conceding");
                            self.handle.forfeit(&player).await?;
                        }
                        return Ok(());
                    }
                }
                TurnStep::Conceded(summary) => {
                    warn!(%battle, winner = ?summary.winner(), "no affordable move, conceded");
                    return Ok(());
                }
            }
        }
    }

    async fn settle(&self, battle: BattleId) -> Result<()> {
        let settlement = self.handle.settle(battle).await?;

        match self.handle.record_settlement(&settlement) {
            Ok((winner, loser)) => info!(
                %battle,
                winner = %winner.name,
                winner_level = winner.level,
                loser = %loser.name,
                loser_level = loser.level,
                "battle settled"
            ),
            // Store failures never undo a finished battle.
            Err(err) => warn!(%battle, error = %err, "settlement not recorded"),
        }
        Ok(())
    }

    fn try_evolve(&self, creature: CreatureId) -> Result<()> {
        if let EvolutionResult::Ineligible(reason) = self.handle.evaluate_evolution(creature)? {
            debug!(%creature, %reason, "not evolving yet");
            return Ok(());
        }

        let (evolved, plan) = self.handle.evolve(creature)?;
        info!(
            creature = %evolved.name,
            stage = %plan.next_stage,
            form = %plan.tier.form,
            profile = ?plan.profile.kind,
            "creature evolved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use arena_content::ContentFactory;
    use arena_core::{BattleId, BattleStatus, CombatantView};
    use arena_runtime::InMemoryCreatureRepo;
    use rand::SeedableRng;

    use super::*;

    fn snapshot(player: &PlayerId, energy: u32) -> BattleSnapshot {
        let view = CombatantView {
            player: player.clone(),
            creature: CreatureId(1),
            element: Element::Fire,
            level: 1,
            current_hp: 100,
            max_hp: 100,
            current_energy: energy,
            max_energy: 100,
            defending: false,
            counter_stance: false,
        };
        BattleSnapshot {
            battle_id: BattleId(1),
            status: BattleStatus::Active,
            turn: 1,
            current_player: player.clone(),
            combatants: [view.clone(), view],
            recent_log: Vec::new(),
            result: None,
        }
    }

    #[tokio::test]
    async fn provider_only_offers_affordable_moves() {
        let content = ContentFactory::embedded().load_bundle().expect("content");
        let store = InMemoryCreatureRepo::new();
        let trainers = mint_roster(&content.templates, &store).expect("roster");
        assert_eq!(store.len(), 3);

        let provider =
            RandomMoveProvider::new(content.moves, &trainers, StdRng::seed_from_u64(1));
        let alice = PlayerId::from("alice");

        // Fire moves cost 20, 30 and 50; only power_attack fits in 25.
        for _ in 0..10 {
            let choice = provider
                .choose_move(&alice, &snapshot(&alice, 25))
                .await
                .expect("no error");
            assert_eq!(choice, Some(MoveId::from("power_attack")));
        }

        let broke = provider
            .choose_move(&alice, &snapshot(&alice, 5))
            .await
            .expect("no error");
        assert_eq!(broke, None);
    }
}
