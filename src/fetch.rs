//! Retrieve single variable columns for one model run.
use crate::{
    error::{FetchError, HumidityAttempt, Result, SoundingError},
    grid::{extract_column, Column},
    keys::HumiditySource,
    run::ReferenceRun,
    source::{ForecastSource, VariableRequest, REFERENCE_TIME_ATTRIBUTE},
};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// A humidity variable name and the kind of humidity it holds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HumidityVariable {
    /// Variable short name, e.g. `RELHUM`.
    pub name: String,
    /// What it contains.
    pub kind: HumiditySource,
}

impl HumidityVariable {
    /// Create a new humidity variable entry.
    pub fn new<S: Into<String>>(name: S, kind: HumiditySource) -> Self {
        HumidityVariable {
            name: name.into(),
            kind,
        }
    }
}

/// A column fetched for one variable, with what the source said about where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedColumn {
    /// Variable name.
    pub variable: String,
    /// The column at the target point.
    pub column: Column,
    /// Reference time reported by the source, if any.
    pub served_reference_time: Option<String>,
}

/// Fetches columns at a fixed target from a [`ForecastSource`].
///
/// Nothing is cached, every call is one request per variable name tried.
#[derive(Debug)]
pub struct VariableFetcher<'a, S> {
    source: &'a S,
    collection: &'a str,
    target: (f64, f64),
    min_levels: usize,
    perturbed: bool,
    timeout: Duration,
}

impl<'a, S: ForecastSource> VariableFetcher<'a, S> {
    /// Create a fetcher for a collection and a `(latitude, longitude)` target.
    pub fn new(
        source: &'a S,
        collection: &'a str,
        target: (f64, f64),
        min_levels: usize,
    ) -> Self {
        VariableFetcher {
            source,
            collection,
            target,
            min_levels,
            perturbed: false,
            timeout: Duration::from_secs(60),
        }
    }

    /// Builder method for requesting perturbed (ensemble member) fields.
    pub fn with_perturbed(mut self, perturbed: bool) -> Self {
        self.perturbed = perturbed;
        self
    }

    /// Builder method for the time allowed per request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The minimum number of levels a column needs.
    #[inline]
    pub fn min_levels(&self) -> usize {
        self.min_levels
    }

    fn request(&self, variable: &str, run: &ReferenceRun) -> VariableRequest {
        VariableRequest {
            collection: self.collection.to_owned(),
            variable: variable.to_owned(),
            run: *run,
            perturbed: self.perturbed,
            timeout: self.timeout,
        }
    }

    /// Fetch one variable and take its column at the target.
    ///
    /// Fails with `DataUnavailable` if the source has nothing and with `InsufficientLevels` if
    /// the column is shorter than the minimum.
    pub fn fetch_column(&self, variable: &str, run: &ReferenceRun) -> Result<FetchedColumn> {
        let request = self.request(variable, run);
        debug!(collection = self.collection, variable, %run, "requesting");

        let response =
            self.source
                .fetch(&request)
                .map_err(|reason| SoundingError::DataUnavailable {
                    variable: variable.to_owned(),
                    reason,
                })?;

        let field = response
            .into_field(variable)
            .ok_or_else(|| SoundingError::DataUnavailable {
                variable: variable.to_owned(),
                reason: FetchError::Malformed("empty collection".to_owned()),
            })?;

        let column = extract_column(&field, self.target)?;

        if column.len() < self.min_levels {
            return Err(SoundingError::InsufficientLevels {
                variable: variable.to_owned(),
                found: column.len(),
                required: self.min_levels,
            });
        }

        Ok(FetchedColumn {
            variable: variable.to_owned(),
            column,
            served_reference_time: field.attribute(REFERENCE_TIME_ATTRIBUTE).map(str::to_owned),
        })
    }

    /// Try humidity variables in order, the first usable one wins.
    ///
    /// Fails with `NoHumidityData` listing every name tried if none of them is usable.
    pub fn fetch_humidity(
        &self,
        candidates: &[HumidityVariable],
        run: &ReferenceRun,
    ) -> Result<(HumiditySource, FetchedColumn)> {
        let mut tried = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            match self.fetch_column(&candidate.name, run) {
                Ok(fetched) => return Ok((candidate.kind, fetched)),
                Err(reason) => {
                    warn!(variable = %candidate.name, %run, %reason, "humidity variable rejected");
                    tried.push(HumidityAttempt {
                        name: candidate.name.clone(),
                        reason: Box::new(reason),
                    });
                }
            }
        }

        Err(SoundingError::NoHumidityData { tried })
    }
}
