//! Content loaders for reading game data from files.
//!
//! Each loader parses one data file into a core type or an oracle
//! implementation. `parse` works on in-memory text so embedded defaults and
//! on-disk overrides share one code path.

pub mod config;
pub mod evolution;
pub mod factory;
pub mod moves;
pub mod templates;

pub use config::ConfigLoader;
pub use evolution::{EvolutionLoader, EvolutionPathRegistry};
pub use factory::{ContentBundle, ContentFactory};
pub use moves::{MoveLoader, MoveRegistry};
pub use templates::{TemplateLoader, TemplateRegistry};

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}
