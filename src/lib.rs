//! # Trueno-Experiment: Reproducible Experiment Tracking
//!
//! **Version**: 0.1.0
//!
//! Trueno-Experiment gives each training run its own directory and keeps
//! the run's configuration, metric history and trained model there.
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Poka-Yoke**: Experiment names are validated before they become paths;
//!   saves are write-then-rename so a failed write never clobbers good state
//! - **Genchi Genbutsu**: Config and results stay human-readable JSON
//! - **Jidoka**: Artifacts carry a versioned, checksummed envelope so a
//!   corrupt or foreign file stops the load instead of yielding garbage
//! - **Heijunka**: Each context owns its seeded RNG; no global reseed
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use trueno_experiment::{ExperimentConfig, ExperimentContext};
//!
//! let config = ExperimentConfig::try_from(serde_json::json!({
//!     "random_seed": 1,
//!     "lr": 0.01
//! }))?;
//! let mut ctx = ExperimentContext::new(config, Some("exp1"))?;
//!
//! ctx.record_metric("loss", 0.5, Some(0));
//! ctx.record_metric("loss", 0.3, Some(1));
//! ctx.persist_results()?; // experiments/exp1/results.json
//! # Ok::<(), trueno_experiment::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod codec;
pub mod config;
pub mod error;
pub mod experiment;
pub mod rng;
pub mod storage;

pub use config::ExperimentConfig;
pub use error::{Error, Result};
pub use experiment::{ExperimentContext, ExperimentSummary, MetricLog, MetricObservation};
