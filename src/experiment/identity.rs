//! Experiment identity - the name a run is filed under

use std::fmt;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::storage::validate_component;
use crate::Result;

/// `strftime` pattern for names synthesized from the wall clock.
pub const DEFAULT_NAME_FORMAT: &str = "experiment_%Y%m%d_%H%M%S";

/// Validated experiment name.
///
/// The name becomes a directory component, so it is checked on creation
/// rather than rewritten: separators, `.`/`..` and NUL are rejected.
///
/// Names synthesized by [`ExperimentName::from_timestamp`] have one-second
/// resolution; two contexts created within the same second share a name
/// (and therefore a directory).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Validate an explicit name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` if the name cannot be used as a single
    /// directory component.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_component(&name)?;
        Ok(Self(name))
    }

    /// Name derived from the current local time, e.g.
    /// `experiment_20240115_143022`.
    #[must_use]
    pub fn now() -> Self {
        Self::from_timestamp(&Local::now())
    }

    /// Name derived from a given timestamp.
    #[must_use]
    pub fn from_timestamp<Tz>(at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self(at.format(DEFAULT_NAME_FORMAT).to_string())
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ExperimentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ExperimentName {
    type Error = crate::Error;

    fn try_from(name: String) -> Result<Self> {
        Self::new(name)
    }
}

impl From<ExperimentName> for String {
    fn from(name: ExperimentName) -> Self {
        name.0
    }
}
