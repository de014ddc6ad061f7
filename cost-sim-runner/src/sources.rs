//! Environment-driven locations for the runner's inputs and outputs.

use std::path::{Path, PathBuf};

use cost_sim::{ConfigError, ConfigLoader, SimulationConfig};
use thiserror::Error;

/// Environment variable naming an optional JSON assumptions file.
pub const CONFIG_ENV: &str = "COST_SIM_CONFIG";
/// Environment variable naming the results directory.
pub const RESULTS_DIR_ENV: &str = "COST_SIM_RESULTS_DIR";
/// Results directory used when `COST_SIM_RESULTS_DIR` is unset.
pub const DEFAULT_RESULTS_DIR: &str = "results";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

/// Loads assumptions from a JSON file, or the reference defaults when no
/// file is configured.
#[derive(Debug, Clone, Default)]
pub struct FileConfigLoader {
    path: Option<PathBuf>,
}

impl FileConfigLoader {
    #[must_use]
    pub const fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Read the config path from `COST_SIM_CONFIG`.
    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self::new(path)
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl ConfigLoader for FileConfigLoader {
    type Error = LoadError;

    fn load_config(&self) -> Result<SimulationConfig, Self::Error> {
        let Some(path) = &self.path else {
            log::info!("{CONFIG_ENV} not set; using reference assumptions");
            let cfg = SimulationConfig::default();
            cfg.validate().map_err(|source| LoadError::Invalid {
                path: PathBuf::new(),
                source,
            })?;
            return Ok(cfg);
        };

        log::info!("loading assumptions from {}", path.display());
        let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.clone(),
            source,
        })?;
        SimulationConfig::from_json_str(&raw).map_err(|source| LoadError::Invalid {
            path: path.clone(),
            source,
        })
    }
}

/// Results directory from `COST_SIM_RESULTS_DIR`, defaulting to `results`.
#[must_use]
pub fn results_dir_from_env() -> PathBuf {
    std::env::var_os(RESULTS_DIR_ENV)
        .filter(|value| !value.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIR), PathBuf::from)
}
