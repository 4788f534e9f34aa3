//! Assemble the columns of one model run into a validated vertical profile.
//!
//! A profile is all or nothing. If any required column is missing levels, disagrees with the
//! others about how many levels there are, or has an unusable pressure, the whole run is rejected
//! and no partial profile is ever returned.
//!
//! After assembly the levels are ordered from the surface up, i.e. by descending pressure, and
//! every co-array has been reordered with the same permutation.
use crate::{
    error::{Result, SoundingError},
    keys::{ColumnVariable, HumiditySource},
    units::pa_to_hpa,
    utility::{apply_permutation, descending_permutation},
};
use itertools::izip;
use metfor::{HectoPascal, Kelvin, MetersPSec, WindUV};

/// The raw columns of one model run, in source units and source order.
#[derive(Clone, Debug, PartialEq)]
pub struct RawColumns {
    /// Pressure in Pa.
    pub pressure: Vec<f64>,
    /// Temperature in K.
    pub temperature: Vec<f64>,
    /// Eastward wind in m/s.
    pub u_wind: Vec<f64>,
    /// Northward wind in m/s.
    pub v_wind: Vec<f64>,
    /// Humidity, relative in percent or specific in kg/kg depending on `humidity_source`.
    pub humidity: Vec<f64>,
    /// What kind of humidity `humidity` holds.
    pub humidity_source: HumiditySource,
    /// Geopotential in m²/s², if it was fetched.
    pub geopotential: Option<Vec<f64>>,
}

/// A validated vertical profile, surface first.
///
/// All profiles have the same length, except geopotential which is empty when the run did not
/// provide it.
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pressure: Vec<HectoPascal>,
    temperature: Vec<Kelvin>,
    wind: Vec<WindUV<MetersPSec>>,
    humidity: Vec<f64>,
    humidity_source: HumiditySource,
    geopotential: Vec<f64>,
}

impl Profile {
    /// Number of levels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    /// `true` if there are no levels, which never happens for an assembled profile.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }

    /// Pressure, descending.
    #[inline]
    pub fn pressure(&self) -> &[HectoPascal] {
        &self.pressure
    }

    /// Temperature.
    #[inline]
    pub fn temperature(&self) -> &[Kelvin] {
        &self.temperature
    }

    /// Wind components.
    #[inline]
    pub fn wind(&self) -> &[WindUV<MetersPSec>] {
        &self.wind
    }

    /// Humidity in the units given by `humidity_source()`.
    #[inline]
    pub fn humidity(&self) -> &[f64] {
        &self.humidity
    }

    /// Which humidity variable was used.
    #[inline]
    pub fn humidity_source(&self) -> HumiditySource {
        self.humidity_source
    }

    /// Geopotential in m²/s², empty if not available.
    #[inline]
    pub fn geopotential(&self) -> &[f64] {
        &self.geopotential
    }
}

/// Validate the columns of a run and sort them into a [`Profile`].
pub fn assemble(columns: RawColumns, min_levels: usize) -> Result<Profile> {
    let RawColumns {
        pressure,
        temperature,
        u_wind,
        v_wind,
        humidity,
        humidity_source,
        geopotential,
    } = columns;

    let required: [(ColumnVariable, &[f64]); 5] = [
        (ColumnVariable::Pressure, pressure.as_slice()),
        (ColumnVariable::Temperature, temperature.as_slice()),
        (ColumnVariable::UWind, u_wind.as_slice()),
        (ColumnVariable::VWind, v_wind.as_slice()),
        (ColumnVariable::Humidity, humidity.as_slice()),
    ];

    for (var, vals) in required.iter() {
        if vals.len() < min_levels {
            return Err(SoundingError::InsufficientLevels {
                variable: var.to_string(),
                found: vals.len(),
                required: min_levels,
            });
        }
    }

    let n_levels = pressure.len();
    let optional = geopotential
        .as_deref()
        .map(|geo| (ColumnVariable::Geopotential, geo));

    for (var, vals) in required.iter().skip(1).cloned().chain(optional) {
        if vals.len() != n_levels {
            return Err(SoundingError::MismatchedLevels {
                variable: var.to_string(),
                found: vals.len(),
                expected: n_levels,
            });
        }
    }

    if let Some(&bad) = pressure.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
        return Err(SoundingError::InvalidUnitDomain {
            quantity: "pressure",
            value: bad,
        });
    }

    let perm = descending_permutation(&pressure);

    let pressure = apply_permutation(&pressure, &perm)
        .into_iter()
        .map(pa_to_hpa)
        .collect();
    let temperature = apply_permutation(&temperature, &perm)
        .into_iter()
        .map(Kelvin)
        .collect();
    let wind = izip!(
        apply_permutation(&u_wind, &perm),
        apply_permutation(&v_wind, &perm)
    )
    .map(|(u, v)| WindUV {
        u: MetersPSec(u),
        v: MetersPSec(v),
    })
    .collect();
    let humidity = apply_permutation(&humidity, &perm);
    let geopotential = geopotential
        .map(|geo| apply_permutation(&geo, &perm))
        .unwrap_or_default();

    Ok(Profile {
        pressure,
        temperature,
        wind,
        humidity,
        humidity_source,
        geopotential,
    })
}
