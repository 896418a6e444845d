//! Live battle routing and concluded battle records.

mod registry;
mod summary;

pub use registry::SessionRegistry;
pub use summary::BattleSummary;
