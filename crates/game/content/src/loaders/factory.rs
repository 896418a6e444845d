//! Content factory for building oracles from data files.

use std::path::{Path, PathBuf};

use arena_core::GameConfig;
use tracing::{debug, info};

use crate::loaders::{
    ConfigLoader, EvolutionLoader, EvolutionPathRegistry, LoadResult, MoveLoader, MoveRegistry,
    TemplateLoader, TemplateRegistry,
};

/// Every piece of content a runtime needs, loaded and cross-checked.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub config: GameConfig,
    pub moves: MoveRegistry,
    pub evolution: EvolutionPathRegistry,
    pub templates: TemplateRegistry,
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── moves.ron
/// ├── evolution.ron
/// └── templates.ron
/// ```
///
/// Files missing from the directory fall back to the embedded copies.
pub struct ContentFactory {
    data_dir: Option<PathBuf>,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
        }
    }

    /// A factory that only uses the data compiled into this crate.
    pub fn embedded() -> Self {
        Self { data_dir: None }
    }

    pub fn load_config(&self) -> LoadResult<GameConfig> {
        match self.existing("config.toml") {
            Some(path) => ConfigLoader::load(&path),
            None => ConfigLoader::embedded(),
        }
    }

    pub fn load_moves(&self) -> LoadResult<MoveRegistry> {
        match self.existing("moves.ron") {
            Some(path) => MoveLoader::load(&path),
            None => MoveLoader::embedded(),
        }
    }

    pub fn load_evolution(&self) -> LoadResult<EvolutionPathRegistry> {
        match self.existing("evolution.ron") {
            Some(path) => EvolutionLoader::load(&path),
            None => EvolutionLoader::embedded(),
        }
    }

    pub fn load_templates(&self) -> LoadResult<TemplateRegistry> {
        match self.existing("templates.ron") {
            Some(path) => TemplateLoader::load(&path),
            None => TemplateLoader::embedded(),
        }
    }

    /// Loads everything and checks that templates only use catalog moves.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let bundle = ContentBundle {
            config: self.load_config()?,
            moves: self.load_moves()?,
            evolution: self.load_evolution()?,
            templates: self.load_templates()?,
        };
        bundle.templates.validate(&bundle.moves)?;

        info!(
            moves = bundle.moves.len(),
            templates = bundle.templates.len(),
            source = %self.describe(),
            "Loaded arena content"
        );
        Ok(bundle)
    }

    /// Returns the data directory path, if any.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    fn existing(&self, file: &str) -> Option<PathBuf> {
        let path = self.data_dir.as_ref()?.join(file);
        if path.is_file() {
            Some(path)
        } else {
            debug!(file, "Content file not found in data dir, using embedded copy");
            None
        }
    }

    fn describe(&self) -> String {
        match &self.data_dir {
            Some(dir) => dir.display().to_string(),
            None => "embedded".to_owned(),
        }
    }
}
