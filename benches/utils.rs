#![allow(dead_code)]
use model_sounding::{HorizontalMesh, HumiditySource, RawColumns, RawField};

/// A regular grid about the size of the ICON-CH1 domain at 0.01 degree spacing.
pub fn regular_mesh() -> HorizontalMesh {
    HorizontalMesh::Regular {
        latitudes: (0..600).map(|i| 43.0 + 0.01 * i as f64).collect(),
        longitudes: (0..1000).map(|j| 0.01 * j as f64).collect(),
    }
}

/// Scattered cells over the same area, roughly the cell count of ICON-CH1.
pub fn unstructured_mesh() -> HorizontalMesh {
    let n = 600 * 1000;
    // Deterministic scatter, no need for anything better in a benchmark.
    let latitudes = (0..n)
        .map(|i| 43.0 + 6.0 * ((i as f64 * 0.618_033_988_7) % 1.0))
        .collect();
    let longitudes = (0..n)
        .map(|i| 10.0 * ((i as f64 * 0.414_213_562_4) % 1.0))
        .collect();

    HorizontalMesh::Unstructured {
        latitudes,
        longitudes,
    }
}

/// A single level field on `mesh`.
pub fn field(mesh: HorizontalMesh) -> RawField {
    let n = mesh.len();
    RawField::new("T", 1, vec![280.0; n], mesh).expect("bad shape")
}

/// Columns of an 80 level model, top of the model first like ICON.
pub fn model_columns() -> RawColumns {
    let n = 80;
    let pressure: Vec<f64> = (0..n).map(|i| 2_000.0 + 1_250.0 * i as f64).collect();

    RawColumns {
        temperature: pressure.iter().map(|p| 210.0 + p / 1_250.0).collect(),
        u_wind: pressure.iter().map(|p| 40.0 - p / 2_500.0).collect(),
        v_wind: pressure.iter().map(|p| p / 10_000.0 - 5.0).collect(),
        humidity: pressure.iter().map(|p| p / 1_100.0).collect(),
        geopotential: Some(pressure.iter().map(|p| 9.80665 * (100_000.0 - p) / 12.0).collect()),
        humidity_source: HumiditySource::RelativeHumidity,
        pressure,
    }
}
