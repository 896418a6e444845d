//! Simulator configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Settings for a self-play run.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Content directory; the embedded content is used when unset.
    pub data_dir: Option<PathBuf>,
    pub battles: u32,
    /// Seed for battle seeds and move choices. Random when unset.
    pub seed: Option<u64>,
    /// Turn cap after which the acting player concedes.
    pub max_turns: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            battles: 30,
            seed: None,
            max_turns: 200,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_DATA_DIR` - Content directory (default: embedded content)
    /// - `ARENA_SIM_BATTLES` - Battles to play (default: 30)
    /// - `ARENA_SIM_SEED` - Deterministic seed (default: random)
    /// - `ARENA_SIM_MAX_TURNS` - Turn cap per battle (default: 200)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("ARENA_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(battles) = read_env::<u32>("ARENA_SIM_BATTLES") {
            config.battles = battles;
        }
        config.seed = read_env::<u64>("ARENA_SIM_SEED");
        if let Some(turns) = read_env::<u32>("ARENA_SIM_MAX_TURNS") {
            config.max_turns = turns.max(1);
        }

        config
    }
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.trim().parse().ok()
}
