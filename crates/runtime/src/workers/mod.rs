//! Worker tasks that back the runtime orchestration.
//!
//! Each battle runs on its own session worker, while the persistence worker
//! mirrors battle events into storage off the gameplay path.

mod persistence;
mod session;

pub(crate) use persistence::PersistenceWorker;
pub(crate) use session::{MoveReply, SessionCommand, SessionWorker};
