//! Metric Log - named, append-only observation sequences

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One recorded `(value, step)` pair.
///
/// No timestamp is attached; the position within its metric's sequence is
/// the only ordering information.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricObservation {
    /// Metric value.
    pub value: f64,
    /// Training step or epoch, if the caller supplied one.
    pub step: Option<i64>,
}

impl MetricObservation {
    /// Create an observation.
    #[must_use]
    pub const fn new(value: f64, step: Option<i64>) -> Self {
        Self { value, step }
    }
}

/// Mapping from metric name to its observations in recording order.
///
/// Metric names keep the order in which they were first recorded, which is
/// also the key order of the persisted `results.json`.
///
/// ## Example
///
/// ```rust
/// use trueno_experiment::experiment::MetricLog;
///
/// let mut log = MetricLog::new();
/// log.record("loss", 0.5, Some(0));
/// log.record("accuracy", 0.7, Some(0));
/// log.record("loss", 0.3, Some(1));
///
/// let loss: Vec<f64> = log.get("loss").unwrap().iter().map(|o| o.value).collect();
/// assert_eq!(loss, [0.5, 0.3]);
/// assert_eq!(log.names().collect::<Vec<_>>(), ["loss", "accuracy"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricLog {
    series: Vec<(String, Vec<MetricObservation>)>,
}

impl MetricLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observation, creating the metric on first use.
    ///
    /// Steps are not checked: duplicates and out-of-order steps are kept
    /// exactly as given.
    pub fn record(&mut self, name: &str, value: f64, step: Option<i64>) {
        let observation = MetricObservation::new(value, step);
        match self.series.iter_mut().find(|(key, _)| key == name) {
            Some((_, observations)) => observations.push(observation),
            None => self.series.push((name.to_string(), vec![observation])),
        }
    }

    /// Observations for one metric.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[MetricObservation]> {
        self.series
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, observations)| observations.as_slice())
    }

    /// Metric names in first-recorded order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|(key, _)| key.as_str())
    }

    /// Iterate `(name, observations)` in first-recorded order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MetricObservation])> {
        self.series
            .iter()
            .map(|(key, observations)| (key.as_str(), observations.as_slice()))
    }

    /// Number of distinct metric names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Total number of observations across all metrics.
    #[must_use]
    pub fn observation_count(&self) -> usize {
        self.series.iter().map(|(_, observations)| observations.len()).sum()
    }

    /// First observation whose value JSON cannot represent (NaN or infinite).
    pub(crate) fn first_non_finite(&self) -> Option<(&str, usize, f64)> {
        self.iter().find_map(|(name, observations)| {
            observations
                .iter()
                .position(|o| !o.value.is_finite())
                .map(|index| (name, index, observations[index].value))
        })
    }
}

impl Serialize for MetricLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.series.len()))?;
        for (name, observations) in &self.series {
            map.serialize_entry(name, observations)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MetricLog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MetricLogVisitor;

        impl<'de> Visitor<'de> for MetricLogVisitor {
            type Value = MetricLog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from metric name to a list of observations")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<MetricLog, A::Error> {
                let mut log = MetricLog::new();
                while let Some((name, observations)) =
                    access.next_entry::<String, Vec<MetricObservation>>()?
                {
                    match log.series.iter_mut().find(|(key, _)| *key == name) {
                        Some((_, existing)) => existing.extend(observations),
                        None => log.series.push((name, observations)),
                    }
                }
                Ok(log)
            }
        }

        deserializer.deserialize_map(MetricLogVisitor)
    }
}
