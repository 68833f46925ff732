//! Weighted Hausdorff Distance demos
//!
//! This crate provides runnable demonstrations of the `whd-burn` loss.
//!
//! ## Available Examples
//!
//! - `fit`: fits a batch of free-form heatmaps to synthetic point sets by gradient
//!   descent on the Weighted Hausdorff Distance
//!
//! ## Usage
//!
//! ```bash
//! # Fit with the default configuration
//! cargo run --bin fit
//!
//! # Fit with a configuration file and more verbose logging
//! cargo run --bin fit -- --config fit.json --log-level debug
//! ```

pub mod backend;
pub mod config;
pub mod heatmap;

pub use backend::{create_device, get_backend_name, SelectedBackend, SelectedDevice};
pub use config::FitConfig;
pub use heatmap::{fit, synthetic_labels, FitOutcome, Heatmap};
