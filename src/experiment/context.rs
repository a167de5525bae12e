//! Experiment Context - one run's directory, config, metrics, and model

use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use serde::{de::DeserializeOwned, Serialize};

use super::{ExperimentName, ExperimentSummary, MetricLog};
use crate::codec::{BinaryCodec, Codec, JsonCodec};
use crate::config::ExperimentConfig;
use crate::rng::seeded_rng;
use crate::storage::ExperimentDir;
use crate::{Error, Result};

/// Storage root used when none is configured, relative to the working
/// directory.
pub const DEFAULT_ROOT: &str = "experiments";

/// File name of the persisted configuration.
pub const CONFIG_FILE: &str = "config.json";

/// File name of the persisted metric log.
pub const RESULTS_FILE: &str = "results.json";

/// File name used for the model artifact unless another is given.
pub const DEFAULT_ARTIFACT_FILE: &str = "model.pkl";

/// Tracks a single experiment run.
///
/// ## Layout
///
/// ```text
/// <root>/<experiment_name>/
///     config.json     configuration, 2-space indented JSON
///     results.json    metric log, 2-space indented JSON
///     model.pkl       model artifact, binary envelope
/// ```
///
/// Nothing is written implicitly: config, results and artifacts reach disk
/// only through the `persist_*` calls, and dropping the context saves
/// nothing.
///
/// ## Randomness
///
/// The context owns a `StdRng` seeded from the config's `random_seed`
/// (default 42). Consumers draw from [`ExperimentContext::rng_mut`]; no
/// process-wide generator is touched.
///
/// ## Example
///
/// ```rust,no_run
/// use trueno_experiment::{ExperimentConfig, ExperimentContext};
///
/// let config = ExperimentConfig::try_from(serde_json::json!({
///     "random_seed": 1,
///     "lr": 0.01
/// }))?;
/// let mut ctx = ExperimentContext::new(config, Some("exp1"))?;
///
/// ctx.record_metric("loss", 0.5, Some(0));
/// ctx.record_metric("loss", 0.3, Some(1));
/// ctx.persist_config()?;
/// ctx.persist_results()?;
///
/// ctx.persist_artifact(vec![0.1_f64, 0.2, 0.3])?;
/// let weights: &Vec<f64> = ctx.load_artifact()?;
/// assert_eq!(weights.len(), 3);
/// # Ok::<(), trueno_experiment::Error>(())
/// ```
pub struct ExperimentContext {
    name: ExperimentName,
    dir: ExperimentDir,
    config: ExperimentConfig,
    results: MetricLog,
    artifact: Option<Box<dyn Any + Send>>,
    seed: u64,
    rng: StdRng,
}

impl ExperimentContext {
    /// Create a context under the default `experiments/` root.
    ///
    /// Without a `name`, one is derived from the current local time.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` for unusable names, `InvalidConfig` for a
    /// malformed `random_seed`, and `Io` if the directory cannot be created.
    pub fn new(config: ExperimentConfig, name: Option<&str>) -> Result<Self> {
        let mut builder = Self::builder(config);
        if let Some(name) = name {
            builder = builder.name(name);
        }
        builder.build()
    }

    /// Create a builder for a context with a custom root or name.
    #[must_use]
    pub fn builder(config: ExperimentConfig) -> ExperimentContextBuilder {
        ExperimentContextBuilder::new(config)
    }

    /// Get the experiment name.
    #[must_use]
    pub const fn name(&self) -> &ExperimentName {
        &self.name
    }

    /// Get the experiment directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Mutable access to the configuration.
    ///
    /// Changes are visible to later `persist_config` and `summarize` calls;
    /// the RNG is not reseeded.
    pub fn config_mut(&mut self) -> &mut ExperimentConfig {
        &mut self.config
    }

    /// Get the metric log recorded so far.
    #[must_use]
    pub const fn results(&self) -> &MetricLog {
        &self.results
    }

    /// Seed the context RNG was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The context-scoped RNG.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Current artifact, if one was persisted or loaded and has type `M`.
    #[must_use]
    pub fn artifact<M: Any>(&self) -> Option<&M> {
        self.artifact.as_deref().and_then(|a| a.downcast_ref::<M>())
    }

    /// Write `config.json`, replacing any previous copy.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if encoding fails and `Io` if the file
    /// cannot be written.
    pub fn persist_config(&self) -> Result<PathBuf> {
        self.persist_json(CONFIG_FILE, &self.config)
    }

    /// Append a metric observation. No I/O.
    pub fn record_metric(&mut self, name: &str, value: f64, step: Option<i64>) {
        tracing::trace!(experiment = %self.name, metric = name, value, ?step, "recorded metric");
        self.results.record(name, value, step);
    }

    /// Write `results.json`, replacing any previous copy.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if any recorded value is NaN or
    /// infinite (JSON has no representation for them) and `Io` if the file
    /// cannot be written.
    pub fn persist_results(&self) -> Result<PathBuf> {
        if let Some((metric, index, value)) = self.results.first_non_finite() {
            return Err(Error::SerializationError(format!(
                "metric {metric:?} observation {index} has non-finite value {value}"
            )));
        }
        self.persist_json(RESULTS_FILE, &self.results)
    }

    /// Persist a model as `model.pkl` and make it the current artifact.
    ///
    /// # Errors
    ///
    /// See [`ExperimentContext::persist_artifact_as`].
    pub fn persist_artifact<M>(&mut self, model: M) -> Result<PathBuf>
    where
        M: Serialize + Any + Send,
    {
        self.persist_artifact_as(model, DEFAULT_ARTIFACT_FILE)
    }

    /// Persist a model under `file_name` and make it the current artifact.
    ///
    /// The current artifact is only replaced once the file is written.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if the model cannot be encoded,
    /// `InvalidName` if `file_name` is not a plain file name, and `Io` if
    /// the file cannot be written.
    pub fn persist_artifact_as<M>(&mut self, model: M, file_name: &str) -> Result<PathBuf>
    where
        M: Serialize + Any + Send,
    {
        let bytes = BinaryCodec.encode(&model)?;
        let path = self.dir.write_atomic(file_name, &bytes)?;
        tracing::debug!(
            experiment = %self.name,
            path = %path.display(),
            bytes = bytes.len(),
            codec = BinaryCodec.name(),
            "persisted artifact"
        );
        self.artifact = Some(Box::new(model));
        Ok(path)
    }

    /// Load `model.pkl` and make it the current artifact.
    ///
    /// # Errors
    ///
    /// See [`ExperimentContext::load_artifact_from`].
    pub fn load_artifact<M>(&mut self) -> Result<&M>
    where
        M: DeserializeOwned + Any + Send,
    {
        self.load_artifact_from(DEFAULT_ARTIFACT_FILE)
    }

    /// Load `file_name` and make it the current artifact.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file does not exist and
    /// `DeserializationError` if it is corrupt, was written by an
    /// incompatible format version, or does not decode as `M`.
    pub fn load_artifact_from<M>(&mut self, file_name: &str) -> Result<&M>
    where
        M: DeserializeOwned + Any + Send,
    {
        let bytes = self.dir.read(file_name)?;
        let model: M = BinaryCodec.decode(&bytes)?;
        tracing::debug!(
            experiment = %self.name,
            file = file_name,
            bytes = bytes.len(),
            codec = BinaryCodec.name(),
            "loaded artifact"
        );

        self.artifact
            .insert(Box::new(model))
            .downcast_ref::<M>()
            .ok_or_else(|| {
                Error::DeserializationError("artifact type changed after load".to_string())
            })
    }

    /// Read `config.json` back from disk.
    ///
    /// The in-memory configuration is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the config was never persisted and
    /// `DeserializationError` if the file is not a JSON object.
    pub fn load_config(&self) -> Result<ExperimentConfig> {
        self.load_json(CONFIG_FILE)
    }

    /// Read `results.json` back from disk.
    ///
    /// The in-memory metric log is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if results were never persisted and
    /// `DeserializationError` if the file does not hold a metric log.
    pub fn load_results(&self) -> Result<MetricLog> {
        self.load_json(RESULTS_FILE)
    }

    /// Snapshot of name, config and results, stamped with the current time.
    #[must_use]
    pub fn summarize(&self) -> ExperimentSummary<'_> {
        ExperimentSummary {
            experiment_name: &self.name,
            config: &self.config,
            results: &self.results,
            timestamp: chrono::Local::now(),
        }
    }

    fn persist_json<T: Serialize>(&self, file_name: &str, value: &T) -> Result<PathBuf> {
        let bytes = JsonCodec.encode(value)?;
        let path = self.dir.write_atomic(file_name, &bytes)?;
        tracing::debug!(
            experiment = %self.name,
            path = %path.display(),
            bytes = bytes.len(),
            codec = JsonCodec.name(),
            "persisted"
        );
        Ok(path)
    }

    fn load_json<T: DeserializeOwned>(&self, file_name: &str) -> Result<T> {
        let bytes = self.dir.read(file_name)?;
        JsonCodec.decode(&bytes)
    }
}

impl fmt::Debug for ExperimentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExperimentContext")
            .field("name", &self.name)
            .field("dir", &self.dir)
            .field("config", &self.config)
            .field("results", &self.results)
            .field("has_artifact", &self.artifact.is_some())
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

/// Builder for `ExperimentContext`.
#[derive(Debug)]
pub struct ExperimentContextBuilder {
    config: ExperimentConfig,
    name: Option<String>,
    root: PathBuf,
}

impl ExperimentContextBuilder {
    /// Create a new builder with the required configuration.
    #[must_use]
    pub fn new(config: ExperimentConfig) -> Self {
        Self {
            config,
            name: None,
            root: PathBuf::from(DEFAULT_ROOT),
        }
    }

    /// Set an explicit experiment name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the directory experiments are created under.
    #[must_use]
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Validate the name and seed, then create the experiment directory.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` for unusable names, `InvalidConfig` for a
    /// malformed `random_seed`, and `Io` if the directory cannot be created.
    pub fn build(self) -> Result<ExperimentContext> {
        let name = match self.name {
            Some(name) => ExperimentName::new(name)?,
            None => ExperimentName::now(),
        };
        let seed = self.config.random_seed()?;
        let dir = ExperimentDir::create(self.root.join(name.as_str()))?;

        tracing::info!(
            experiment = %name,
            dir = %dir.path().display(),
            seed,
            "created experiment context"
        );

        Ok(ExperimentContext {
            name,
            dir,
            config: self.config,
            results: MetricLog::new(),
            artifact: None,
            seed,
            rng: seeded_rng(seed),
        })
    }
}
