//! Combat resolution system.
//!
//! This module provides pure functions for resolving a single move.
//!
//! # Core Functions
//!
//! - `validate_move`: Turn ownership, catalog lookup and energy check
//! - `apply_move`: Dispatch on the move effect and mutate both combatants
//! - `calculate_damage`: Damage formula with element, level, defending and variance modifiers
//! - `element_multiplier`: Fire > Earth > Water > Fire

pub mod damage;
pub mod error;
pub mod resolve;

pub use damage::{calculate_damage, element_multiplier};
pub use error::BattleError;
pub use resolve::{MoveResolution, apply_move, validate_move};
