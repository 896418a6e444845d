//! Data-driven content definitions and loaders.
//!
//! This crate houses static game content and provides loaders for RON/TOML data files:
//! - Move catalog (data-driven via RON)
//! - Evolution path table (data-driven via RON)
//! - Element starter templates (data-driven via RON)
//! - Game configuration (data-driven via TOML)
//!
//! Every file is also embedded at compile time, so a runtime can start without
//! a data directory. Registries implement the `arena-core` oracle traits.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentBundle, ContentFactory, EvolutionLoader, EvolutionPathRegistry,
    LoadResult, MoveLoader, MoveRegistry, TemplateLoader, TemplateRegistry,
};
