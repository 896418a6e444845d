//! Topic-based event bus for runtime events.
//!
//! Events are published to specific topics, and consumers can subscribe only
//! to the topics they need. Delivery is best-effort: a slow subscriber lags
//! and drops events instead of blocking play.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{BattleEvent, MatchmakingEvent};
