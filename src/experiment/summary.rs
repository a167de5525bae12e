//! Experiment Summary - point-in-time view of a context

use chrono::{DateTime, Local};
use serde::Serialize;

use super::{ExperimentName, MetricLog};
use crate::config::ExperimentConfig;

/// Snapshot returned by `ExperimentContext::summarize`.
///
/// Borrows the live configuration and metric log rather than copying them;
/// only `timestamp` is captured at call time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExperimentSummary<'a> {
    /// Experiment identity.
    pub experiment_name: &'a ExperimentName,
    /// Configuration the context was built with.
    pub config: &'a ExperimentConfig,
    /// Every metric observation recorded so far.
    pub results: &'a MetricLog,
    /// Wall-clock time when the summary was taken.
    ///
    /// Serializes as RFC 3339 with the local UTC offset, e.g.
    /// `2024-01-15T14:30:22.123456789+01:00`. The offset is always present,
    /// so readers expecting a naive `YYYY-MM-DDTHH:MM:SS.ffffff` string must
    /// parse it as an offset-aware timestamp.
    pub timestamp: DateTime<Local>,
}

impl ExperimentSummary<'_> {
    /// Check whether two summaries describe the same experiment state,
    /// ignoring when they were taken.
    #[must_use]
    pub fn same_state(&self, other: &Self) -> bool {
        self.experiment_name == other.experiment_name
            && self.config == other.config
            && self.results == other.results
    }
}
