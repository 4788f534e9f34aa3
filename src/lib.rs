#![warn(missing_docs)]
//! Resolve a vertical atmospheric sounding at a point from numerical weather model output.
//!
//! The model data comes from anything implementing [`ForecastSource`]. Starting from the most
//! recent model cycle, candidate runs are tried in order until one has every variable needed. The
//! column nearest the target point is taken from each field, the columns are validated and sorted
//! surface first, and dew point, wind speed and heights are derived from them.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use model_sounding::{
//!     resolve_sounding, FetchError, ForecastSource, PipelineConfig, SoundingError,
//!     SourceResponse, VariableRequest,
//! };
//!
//! struct NothingPublished;
//!
//! impl ForecastSource for NothingPublished {
//!     fn fetch(&self, _req: &VariableRequest) -> Result<SourceResponse, FetchError> {
//!         Err(FetchError::NotYetPublished)
//!     }
//! }
//!
//! let now = NaiveDate::from_ymd_opt(2026, 10, 18)
//!     .and_then(|d| d.and_hms_opt(14, 20, 0))
//!     .unwrap();
//!
//! match resolve_sounding(&NothingPublished, &PipelineConfig::default(), now) {
//!     Err(SoundingError::NoCompleteRun { attempts }) => assert_eq!(attempts.len(), 4),
//!     _ => unreachable!(),
//! }
//! ```

//
// API
//
pub use crate::{
    config::{PipelineConfig, VariableNames, MAX_HORIZON_HOURS, MAX_INTERVAL_HOURS},
    derived::{
        derive_sounding, dew_point_from_rh, dew_point_from_specific_humidity,
        height_from_geopotential, standard_atmosphere_height, wind_direction, wind_speed,
    },
    error::{ConfigError, FetchError, HumidityAttempt, Result, RunFailure, SoundingError},
    fetch::{FetchedColumn, HumidityVariable, VariableFetcher},
    grid::{extract_column, nearest_point, Column, GridPoint},
    keys::{ColumnVariable, HumiditySource, SpeedUnit},
    pipeline::resolve_sounding,
    profile::{assemble, Profile, RawColumns},
    run::{latest_cycle, select_run, ReferenceRun, RunCandidates, RunTime},
    sounding::{DataRow, Sounding, StationInfo},
    source::{
        ForecastSource, HorizontalMesh, RawField, SourceResponse, TimeoutSource, VariableRequest,
        REFERENCE_TIME_ATTRIBUTE,
    },
};

pub mod units;

//
// Internal use only
//

// Modules
mod config;
mod derived;
mod error;
mod fetch;
mod grid;
mod keys;
mod pipeline;
mod profile;
mod run;
mod sounding;
mod source;
#[cfg(test)]
mod test_data;
mod utility;
