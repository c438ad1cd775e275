//! scoutctl library - exposes the command-line plumbing for tests.
//!
//! v0.4.0: REPL and one-shot commands run against a single `Engine`.

pub mod display;
pub mod logging;
pub mod repl;

use anyhow::{Context, Result};
use scout_common::config::{default_config_path, ScoutConfig};
use scout_common::paths::{resolve_data_dir, ENV_DATA_DIR};
use scout_common::{DataPaths, Engine};
use std::path::Path;

/// Read the config file (explicit path or default location), then apply env overrides
pub fn load_config(path: Option<&Path>) -> Result<ScoutConfig> {
    let path = path.map(Path::to_path_buf).or_else(default_config_path);
    let config = match path {
        Some(p) => ScoutConfig::load(&p)
            .with_context(|| format!("failed to load config from {}", p.display()))?,
        None => ScoutConfig::default(),
    };
    Ok(config.with_env_overrides(|k| std::env::var(k).ok()))
}

/// Data directory from flag, `SCOUT_DATA_DIR`, config, then platform default
pub fn data_paths(config: &ScoutConfig, flag: Option<&Path>) -> DataPaths {
    DataPaths::new(resolve_data_dir(
        flag,
        std::env::var(ENV_DATA_DIR).ok(),
        config.core.data_dir.as_deref(),
    ))
}

/// Engine over the default adapter catalog
pub fn open_engine(config: ScoutConfig, paths: DataPaths) -> Result<Engine> {
    std::fs::create_dir_all(&paths.root)
        .with_context(|| format!("failed to create data dir {}", paths.root.display()))?;
    let registry = scout_sources::default_registry(&config, &paths)
        .context("failed to build adapter catalog")?;
    let root = paths.root.clone();
    Engine::open(config, paths, registry)
        .with_context(|| format!("failed to open stores in {}", root.display()))
}
