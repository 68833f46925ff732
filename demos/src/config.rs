//! Configuration for the WHD demos.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use whd_burn::WeightedHausdorffDistanceConfig;

/// Configuration for fitting a heatmap to synthetic point sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    /// Loss configuration; its height and width also size the heatmap.
    pub loss: WeightedHausdorffDistanceConfig,
    /// Number of independent heatmaps fitted together.
    pub batch_size: usize,
    /// Length of the padded label container per sample.
    pub max_points: usize,
    /// Number of optimizer steps.
    pub steps: usize,
    /// Learning rate for Adam.
    pub learning_rate: f64,
    /// Log the loss terms every this many steps.
    pub log_every: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            loss: WeightedHausdorffDistanceConfig::new(16, 16),
            batch_size: 2,
            max_points: 4,
            steps: 300,
            learning_rate: 0.1,
            log_every: 25,
        }
    }
}

impl FitConfig {
    /// Reads a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Checks the settings the fitting loop relies on.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.loss.height >= 2 && self.loss.width >= 2,
            "Heatmap must be at least 2x2, got {}x{}",
            self.loss.height,
            self.loss.width
        );
        ensure!(self.batch_size > 0, "Batch size must be greater than 0");
        ensure!(self.steps > 0, "Number of steps must be greater than 0");
        ensure!(self.learning_rate > 0.0, "Learning rate must be positive");
        ensure!(self.log_every > 0, "Logging interval must be greater than 0");
        Ok(())
    }
}
