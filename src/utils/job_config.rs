//! Job-level settings for a screening run.
//! Only the alias map path is required; everything else has a default.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::env;
use std::path::PathBuf;

use crate::matching::gate::{default_exclusions, load_exclusions, ExclusionRule};
use crate::utils::constants::DEFAULT_BATCH_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    pub alias_map_path: Option<PathBuf>,
    pub exclusions_path: Option<PathBuf>,
    pub batch_size: usize,
    pub worker_count: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            alias_map_path: None,
            exclusions_path: None,
            batch_size: DEFAULT_BATCH_SIZE,
            worker_count: num_cpus::get(),
        }
    }
}

impl JobConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let alias_map_path = env::var("ALIAS_MAP_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let exclusions_path = env::var("EXCLUSION_RULES_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let batch_size = env::var("BATCH_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.batch_size);

        let worker_count = env::var("WORKER_COUNT")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.worker_count);

        debug!(
            "Job config from env: alias_map={:?}, exclusions={:?}, batch_size={}, workers={}",
            alias_map_path, exclusions_path, batch_size, worker_count
        );

        Self {
            alias_map_path,
            exclusions_path,
            batch_size,
            worker_count,
        }
    }

    pub fn require_alias_map_path(&self) -> Result<&PathBuf> {
        self.alias_map_path
            .as_ref()
            .context("No alias map configured: pass --alias-map or set ALIAS_MAP_PATH")
    }

    /// Exclusion rules from the configured file, or the built-in rule set.
    pub fn load_exclusion_rules(&self) -> Result<Vec<ExclusionRule>> {
        match &self.exclusions_path {
            Some(path) => load_exclusions(path),
            None => Ok(default_exclusions()),
        }
    }

    /// Log the current configuration
    pub fn log_config(&self) {
        match &self.alias_map_path {
            Some(path) => info!("📚 Alias map: {}", path.display()),
            None => warn!("📚 Alias map path not set"),
        }
        match &self.exclusions_path {
            Some(path) => info!("🚫 Exclusion rules: {}", path.display()),
            None => info!("🚫 Exclusion rules: built-in defaults"),
        }
        info!(
            "   Batch size: {}, concurrent batches: {}",
            self.batch_size, self.worker_count
        );
    }
}
