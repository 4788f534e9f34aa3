//! Data used in tests.

use crate::{
    error::FetchError,
    run::{ReferenceRun, RunTime},
    source::{ForecastSource, HorizontalMesh, RawField, SourceResponse, VariableRequest},
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::{cell::RefCell, collections::HashMap};

/// A time on the test day.
pub fn time(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 18)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .unwrap()
}

/// The analysis of the run at `hour` on the test day.
pub fn run_at(hour: u32) -> ReferenceRun {
    ReferenceRun::new(RunTime::At(time(hour, 0, 0)), Duration::hours(0))
}

pub fn regular_mesh(latitudes: &[f64], longitudes: &[f64]) -> HorizontalMesh {
    HorizontalMesh::Regular {
        latitudes: latitudes.to_vec(),
        longitudes: longitudes.to_vec(),
    }
}

pub fn unstructured_mesh(cells: &[(f64, f64)]) -> HorizontalMesh {
    HorizontalMesh::Unstructured {
        latitudes: cells.iter().map(|&(lat, _)| lat).collect(),
        longitudes: cells.iter().map(|&(_, lon)| lon).collect(),
    }
}

/// A field on a three cell mesh where cell 1 is the one nearest Payerne (46.81, 6.94).
///
/// `column` ends up in cell 1, the other cells hold obviously wrong values.
pub fn column_field(name: &str, column: &[f64]) -> RawField {
    let mesh = unstructured_mesh(&[(45.0, 6.0), (46.8, 6.9), (48.0, 9.0)]);
    let values = column
        .iter()
        .flat_map(|&val| vec![-9999.0, val, 9999.0])
        .collect();

    RawField::new(name, column.len(), values, mesh).unwrap()
}

/// A complete set of P, T, U, V and RELHUM fields, levels not in pressure order.
pub fn sounding_fields() -> Vec<RawField> {
    vec![
        column_field("P", &[85_000.0, 100_000.0, 70_000.0, 30_000.0, 50_000.0]),
        column_field("T", &[281.0, 290.0, 272.0, 229.0, 253.0]),
        column_field("U", &[8.0, 5.0, 12.0, 30.0, 20.0]),
        column_field("V", &[2.0, 0.0, -3.0, 10.0, 5.0]),
        column_field("RELHUM", &[70.0, 80.0, 60.0, 20.0, 40.0]),
    ]
}

/// A source that answers from a fixed table and records every request.
///
/// Anything not in the table is `NotYetPublished`.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    fields: HashMap<(ReferenceRun, String), RawField>,
    log: RefCell<Vec<VariableRequest>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, run: ReferenceRun, field: RawField) -> Self {
        self.fields.insert((run, field.name().to_owned()), field);
        self
    }

    pub fn with_fields<I>(self, run: ReferenceRun, fields: I) -> Self
    where
        I: IntoIterator<Item = RawField>,
    {
        fields
            .into_iter()
            .fold(self, |src, field| src.with_field(run, field))
    }

    /// Every request made so far, in order.
    pub fn requests(&self) -> Vec<VariableRequest> {
        self.log.borrow().clone()
    }
}

impl ForecastSource for ScriptedSource {
    fn fetch(&self, request: &VariableRequest) -> Result<SourceResponse, FetchError> {
        self.log.borrow_mut().push(request.clone());

        self.fields
            .get(&(request.run, request.variable.clone()))
            .cloned()
            .map(SourceResponse::Array)
            .ok_or(FetchError::NotYetPublished)
    }
}
