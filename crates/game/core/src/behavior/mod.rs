//! Behavior tracking and classification.
//!
//! Every resolved move earns trait points for the acting player. The
//! accumulated [`TraitScores`] drive the dominant-trait display and, once
//! folded into a creature's lifetime totals, its evolution path.

pub mod classify;
pub mod tracker;
pub mod traits;

pub use classify::{BehaviorProfile, ProfileKind, classify, dominant_trait, score_variance};
pub use tracker::{BehaviorContext, score_move, track};
pub use traits::{TraitKind, TraitScores};
