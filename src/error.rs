//! Error types for the model-sounding crate.
use crate::run::ReferenceRun;
use std::{fmt, time::Duration};
use thiserror::Error;

/// Error type for the crate.
///
/// Everything except [`SoundingError::NoCompleteRun`] and [`SoundingError::Config`] only ever
/// describes why a single candidate run was abandoned. Those are collected by the run selector and
/// handed back inside `NoCompleteRun` when every candidate failed.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SoundingError {
    /// The upstream source returned nothing usable for a variable of this run.
    #[error("no data for {variable}: {reason}")]
    DataUnavailable {
        /// Name of the variable that was requested.
        variable: String,
        /// What the source reported.
        reason: FetchError,
    },
    /// A column was shorter than the minimum number of levels.
    #[error("{variable} has {found} levels, at least {required} required")]
    InsufficientLevels {
        /// Name of the variable with too few levels.
        variable: String,
        /// Number of levels found.
        found: usize,
        /// Minimum number of levels.
        required: usize,
    },
    /// Columns of the same run disagree on the number of levels.
    #[error("{variable} has {found} levels, expected {expected} to match pressure")]
    MismatchedLevels {
        /// Name of the variable that disagrees with the pressure column.
        variable: String,
        /// Number of levels found.
        found: usize,
        /// Number of levels in the pressure column.
        expected: usize,
    },
    /// None of the humidity variables could be used for this run.
    #[error("no humidity data, tried {}", HumidityNames(.tried))]
    NoHumidityData {
        /// Every humidity variable tried, in order, with the reason it was rejected.
        tried: Vec<HumidityAttempt>,
    },
    /// A value given to a formula is outside of its physical domain.
    #[error("{quantity} value {value} is outside of its physical domain")]
    InvalidUnitDomain {
        /// Name of the quantity, e.g. "pressure".
        quantity: &'static str,
        /// The offending value, in the units of the quantity.
        value: f64,
    },
    /// Every candidate run was tried and none of them was complete.
    #[error("no complete model run among {} candidates", .attempts.len())]
    NoCompleteRun {
        /// Every candidate run attempted with the reason it was abandoned, in order.
        attempts: Vec<RunFailure>,
    },
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, SoundingError>;

/// Failures reported by a [`ForecastSource`](crate::ForecastSource).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The run exists, but this variable has not been published (yet).
    #[error("not yet published")]
    NotYetPublished,
    /// The request could not be completed.
    #[error("transport error: {0}")]
    Transport(String),
    /// No answer within the allowed time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    /// An answer arrived, but it could not be understood.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Problems with a [`PipelineConfig`](crate::PipelineConfig).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The TOML could not be parsed.
    #[error("could not parse configuration: {0}")]
    Parse(String),
    /// A value is out of range.
    #[error("invalid configuration value for {field}: {message}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// A candidate run and the reason it was abandoned.
#[derive(Clone, Debug, PartialEq)]
pub struct RunFailure {
    /// The candidate.
    pub run: ReferenceRun,
    /// Why it was abandoned.
    pub reason: SoundingError,
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.run, self.reason)
    }
}

/// A humidity variable name that was tried and the reason it was rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct HumidityAttempt {
    /// Variable name.
    pub name: String,
    /// Why it was rejected.
    pub reason: Box<SoundingError>,
}

struct HumidityNames<'a>(&'a [HumidityAttempt]);

impl fmt::Display for HumidityNames<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "nothing");
        }

        for (i, attempt) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", attempt.name)?;
        }

        Ok(())
    }
}
