//! Experiment Tracking
//!
//! This module owns everything a single training run persists: its
//! configuration, the metrics it records, and the model it produces.
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentContext (1) ── ExperimentDir  experiments/<name>/
//!        │
//!        ├── ExperimentConfig   -> config.json   [JsonCodec]
//!        ├── MetricLog (N)      -> results.json  [JsonCodec]
//!        └── artifact           -> model.pkl     [BinaryCodec]
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trueno_experiment::experiment::ExperimentContext;
//! use trueno_experiment::ExperimentConfig;
//!
//! let config = ExperimentConfig::try_from(serde_json::json!({"lr": 0.01}))?;
//! let mut ctx = ExperimentContext::new(config, None)?;
//!
//! for step in 0..10 {
//!     ctx.record_metric("loss", 1.0 / (step as f64 + 1.0), Some(step));
//! }
//!
//! ctx.persist_config()?;
//! ctx.persist_results()?;
//! println!("{}", serde_json::to_string_pretty(&ctx.summarize()).unwrap());
//! # Ok::<(), trueno_experiment::Error>(())
//! ```

mod context;
mod identity;
mod metric_log;
mod summary;

pub use context::{
    ExperimentContext, ExperimentContextBuilder, CONFIG_FILE, DEFAULT_ARTIFACT_FILE, DEFAULT_ROOT,
    RESULTS_FILE,
};
pub use identity::{ExperimentName, DEFAULT_NAME_FORMAT};
pub use metric_log::{MetricLog, MetricObservation};
pub use summary::ExperimentSummary;
