//! Headless arena simulator.
//!
//! Composition root that assembles content, repositories and the runtime,
//! then plays self-play battles through matchmaking, settlement and
//! evolution, logging every step.
//!
//! # Examples
//!
//! ```bash
//! ARENA_SIM_BATTLES=40 ARENA_SIM_SEED=7 RUST_LOG=arena_runtime=debug \
//!     cargo run -p arena-sim
//! ```

mod config;
mod sim;

use std::sync::Arc;

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::broadcast::error::RecvError;

use arena_content::ContentFactory;
use arena_runtime::{
    BattleEvent, CreatureRepository, Event, InMemoryCreatureRepo, Runtime, RuntimeConfig, Topic,
};

use crate::config::SimConfig;
use crate::sim::{RandomMoveProvider, Simulator, mint_roster};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let sim_config = SimConfig::from_env();
    let runtime_config = RuntimeConfig::from_env();
    tracing::info!(?sim_config, "starting arena simulator");

    // 1. Content
    let factory = match &sim_config.data_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::embedded(),
    };
    let content = factory.load_bundle()?;
    let moves = content.moves.clone();

    // 2. Creature store with one starter per trainer
    let store = Arc::new(InMemoryCreatureRepo::new());
    let trainers = mint_roster(&content.templates, store.as_ref())?;

    // 3. Runtime
    let mut builder = Runtime::builder()
        .config(runtime_config)
        .content(content)
        .creatures(store.clone());
    if let Some(seed) = sim_config.seed {
        builder = builder.seed(seed);
    }
    let runtime = builder.build().await?;

    tokio::spawn(log_battle_events(runtime.subscribe(Topic::Battle)));

    // 4. Play
    let rng = match sim_config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let provider = RandomMoveProvider::new(moves, &trainers, rng);
    let simulator = Simulator::new(runtime.handle(), provider, sim_config);
    simulator.run(&trainers).await?;

    // 5. Report
    for trainer in &trainers {
        if let Some(creature) = store.find(trainer.creature)? {
            println!("{}", serde_json::to_string_pretty(&creature)?);
        }
    }

    runtime.shutdown().await?;
    tracing::info!("simulator finished");
    Ok(())
}

async fn log_battle_events(mut events: tokio::sync::broadcast::Receiver<Event>) {
    loop {
        match events.recv().await {
            Ok(Event::Battle(BattleEvent::Abandoned {
                battle_id,
                remaining,
                reason,
            })) => tracing::info!(%battle_id, %remaining, %reason, "battle abandoned"),
            Ok(Event::Battle(BattleEvent::Concluded { summary })) => tracing::info!(
                battle_id = %summary.battle_id,
                turns = summary.turns,
                duration_ms = summary.duration_ms,
                winner = ?summary.winner(),
                "battle concluded"
            ),
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event log lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
