// src/utils/progress_bars/progress_config.rs

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::time::Duration;

/// Configuration for the line-count spinner shown while a job runs
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Whether to show the spinner at all
    pub enabled: bool,
    /// Refresh rate for the spinner in milliseconds
    pub refresh_rate_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_rate_ms: 100,
        }
    }
}

impl ProgressConfig {
    /// Create progress configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("PROGRESS_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            refresh_rate_ms: env::var("PROGRESS_REFRESH_RATE_MS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
        }
    }

    /// Create a spinner counting processed lines if progress is enabled, None otherwise.
    /// Draws to stderr so it never mixes with emitted rows.
    pub fn create_line_spinner(&self) -> Result<Option<ProgressBar>> {
        if !self.enabled {
            return Ok(None);
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} lines ({per_sec}) {msg}")?,
        );
        pb.enable_steady_tick(Duration::from_millis(self.refresh_rate_ms.max(1)));
        pb.set_message("screening...");
        Ok(Some(pb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = ProgressConfig::default();
        assert!(config.enabled);
        assert_eq!(config.refresh_rate_ms, 100);
    }

    #[test]
    fn test_env_config() {
        env::set_var("PROGRESS_ENABLED", "false");
        env::set_var("PROGRESS_REFRESH_RATE_MS", "50");

        let config = ProgressConfig::from_env();
        assert!(!config.enabled);
        assert_eq!(config.refresh_rate_ms, 50);

        env::remove_var("PROGRESS_ENABLED");
        env::remove_var("PROGRESS_REFRESH_RATE_MS");
    }

    #[test]
    fn test_spinner_creation() -> Result<()> {
        let mut config = ProgressConfig::default();

        config.enabled = false;
        assert!(config.create_line_spinner()?.is_none());

        config.enabled = true;
        let spinner = config.create_line_spinner()?;
        assert!(spinner.is_some());
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        Ok(())
    }
}
