use chrono::{Duration, NaiveDate, NaiveDateTime};
use model_sounding::{
    FetchError, ForecastSource, HorizontalMesh, RawField, ReferenceRun, RunTime, SourceResponse,
    VariableRequest,
};
use std::{collections::HashMap, sync::Mutex, thread};

pub const PAYERNE: (f64, f64) = (46.81, 6.94);

/// A time on the test day.
pub fn time(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 18)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .unwrap()
}

/// The analysis of the run at `hour` on the test day.
pub fn run(hour: u32) -> ReferenceRun {
    ReferenceRun::new(RunTime::At(time(hour, 0)), Duration::hours(0))
}

/// A 3x3 regular grid around Payerne, the nearest point is index 4.
pub fn regular_mesh() -> HorizontalMesh {
    HorizontalMesh::Regular {
        latitudes: vec![46.5, 46.8, 47.1],
        longitudes: vec![6.6, 6.9, 7.2],
    }
}

/// Scattered cells, the nearest to Payerne is index 3.
pub fn unstructured_mesh() -> HorizontalMesh {
    let cells = [
        (47.4, 8.5),
        (46.2, 6.1),
        (46.0, 7.0),
        (46.83, 6.91),
        (46.9, 7.4),
    ];
    HorizontalMesh::Unstructured {
        latitudes: cells.iter().map(|c| c.0).collect(),
        longitudes: cells.iter().map(|c| c.1).collect(),
    }
}

/// The index of the point nearest Payerne in the meshes above.
pub fn target_index(mesh: &HorizontalMesh) -> usize {
    match mesh {
        HorizontalMesh::Regular { .. } => 4,
        HorizontalMesh::Unstructured { .. } => 3,
    }
}

/// A field with `column` at the target point and garbage everywhere else.
pub fn field_on(mesh: &HorizontalMesh, name: &str, column: &[f64]) -> RawField {
    let n_points = mesh.len();
    let target = target_index(mesh);

    let mut values = vec![-9999.0; n_points * column.len()];
    for (level, val) in column.iter().enumerate() {
        values[level * n_points + target] = *val;
    }

    RawField::new(name, column.len(), values, mesh.clone()).unwrap()
}

pub const PRESSURE: [f64; 5] = [70_000.0, 30_000.0, 100_000.0, 50_000.0, 85_000.0];
pub const TEMPERATURE: [f64; 5] = [270.0, 230.0, 288.15, 250.0, 280.0];
pub const U_WIND: [f64; 5] = [7.0, 25.0, 3.0, 15.0, 5.0];
pub const V_WIND: [f64; 5] = [1.0, 10.0, 4.0, 5.0, 2.0];
pub const RELHUM: [f64; 5] = [60.0, 10.0, 50.0, 30.0, 70.0];
pub const QV: [f64; 5] = [0.004, 0.0002, 0.008, 0.001, 0.006];

/// P, T, U and V, everything but humidity.
pub fn core_fields(mesh: &HorizontalMesh) -> Vec<RawField> {
    vec![
        field_on(mesh, "P", &PRESSURE),
        field_on(mesh, "T", &TEMPERATURE),
        field_on(mesh, "U", &U_WIND),
        field_on(mesh, "V", &V_WIND),
    ]
}

/// Everything a complete run needs, with relative humidity.
pub fn complete_fields(mesh: &HorizontalMesh) -> Vec<RawField> {
    let mut fields = core_fields(mesh);
    fields.push(field_on(mesh, "RELHUM", &RELHUM));
    fields
}

/// A complete set of fields with only the first `levels` levels.
pub fn truncated_fields(mesh: &HorizontalMesh, levels: usize) -> Vec<RawField> {
    vec![
        field_on(mesh, "P", &PRESSURE[..levels]),
        field_on(mesh, "T", &TEMPERATURE[..levels]),
        field_on(mesh, "U", &U_WIND[..levels]),
        field_on(mesh, "V", &V_WIND[..levels]),
        field_on(mesh, "RELHUM", &RELHUM[..levels]),
    ]
}

/// A thread safe source answering from a fixed table.
///
/// Anything not in the table is `NotYetPublished`. Every request is recorded.
#[derive(Debug, Default)]
pub struct StubSource {
    fields: HashMap<(ReferenceRun, String), RawField>,
    delay: Option<std::time::Duration>,
    log: Mutex<Vec<VariableRequest>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields<I>(mut self, run: ReferenceRun, fields: I) -> Self
    where
        I: IntoIterator<Item = RawField>,
    {
        for field in fields {
            self.fields.insert((run, field.name().to_owned()), field);
        }
        self
    }

    /// Every answer takes this long.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<VariableRequest> {
        self.log.lock().unwrap().clone()
    }

    /// Reference times requested, in order, without repeats.
    pub fn runs_requested(&self) -> Vec<RunTime> {
        let mut runs: Vec<RunTime> = vec![];
        for req in self.requests() {
            if runs.last() != Some(&req.run.reference()) {
                runs.push(req.run.reference());
            }
        }
        runs
    }
}

impl ForecastSource for StubSource {
    fn fetch(&self, request: &VariableRequest) -> Result<SourceResponse, FetchError> {
        self.log.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }

        self.fields
            .get(&(request.run, request.variable.clone()))
            .cloned()
            .map(SourceResponse::Array)
            .ok_or(FetchError::NotYetPublished)
    }
}
