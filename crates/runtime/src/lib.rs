//! Runtime orchestration for creature battles.
//!
//! This crate wires the deterministic rules from `arena-core` and the content
//! from `arena-content` into an async host. Every battle runs on its own
//! sequential worker, so moves within a battle never interleave while
//! different battles proceed independently. Consumers embed [`Runtime`] and
//! talk to it through the cloneable [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and configuration
//! - [`api`] exposes the handle and error types downstream clients use
//! - [`session`] routes requests to live battles and archives concluded ones
//! - [`matchmaking`] pairs waiting players
//! - [`events`] provides the topic-based event bus
//! - [`oracle`] and [`repository`] adapt content and external stores
pub mod api;
pub mod events;
pub mod matchmaking;
pub mod oracle;
pub mod repository;
pub mod runtime;
pub mod session;

mod workers;

pub use api::{FixedMoveProvider, MoveProvider, Result, RuntimeError, RuntimeHandle, TurnStep};
pub use events::{BattleEvent, Event, EventBus, MatchmakingEvent, Topic};
pub use matchmaking::MatchmakingQueue;
pub use oracle::OracleBundle;
pub use repository::{
    BattleLogRepository, CreatureRepository, InMemoryBattleLogRepo, InMemoryCreatureRepo,
    RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use session::{BattleSummary, SessionRegistry};
