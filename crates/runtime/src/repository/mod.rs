//! Repository layer for data owned by external collaborators.
//!
//! Repositories handle data that OUTLIVES a battle:
//! - Creature records (read at pairing, written at settlement and evolution)
//! - Battle history (move log and final summaries)
//!
//! Static game content (moves, templates, evolution paths) comes from
//! `arena-content`, not from repositories.

mod error;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use memory::{InMemoryBattleLogRepo, InMemoryCreatureRepo};
pub use traits::{BattleLogRepository, CreatureRepository};
