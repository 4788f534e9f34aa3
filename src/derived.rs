//! Derive dew point, wind speed and heights from an assembled profile.
//!
//! All functions here are pure. Inputs are checked against their physical domain before any
//! formula is evaluated, and a value outside of it is an `InvalidUnitDomain` error. A dew point
//! that is undefined because there is no moisture at all (zero humidity) is a missing value
//! instead.
use crate::{
    error::{Result, SoundingError},
    keys::{HumiditySource, SpeedUnit},
    profile::Profile,
    run::ReferenceRun,
    sounding::{Sounding, StationInfo},
    units::{convert_speed, RD, STANDARD_GRAVITY, STD_ATM_LAPSE_RATE, STD_ATM_P0, STD_ATM_T0},
};
use itertools::izip;
use metfor::{Celsius, HectoPascal, Kelvin, Meters, MetersPSec, Quantity, WindSpdDir, WindUV};
use optional::{none, Optioned};

fn check_temperature(t: Kelvin) -> Result<()> {
    let val = t.unpack();
    if val.is_finite() && val > 0.0 {
        Ok(())
    } else {
        Err(SoundingError::InvalidUnitDomain {
            quantity: "temperature",
            value: val,
        })
    }
}

fn check_pressure(p: HectoPascal) -> Result<()> {
    let val = p.unpack();
    if val.is_finite() && val > 0.0 {
        Ok(())
    } else {
        Err(SoundingError::InvalidUnitDomain {
            quantity: "pressure",
            value: val,
        })
    }
}

/// Dew point from temperature and relative humidity given in **percent**.
///
/// Zero relative humidity has no dew point and gives a missing value, as does a dew point outside
/// of the range where the vapor pressure over water is defined.
pub fn dew_point_from_rh(t: Kelvin, rh_percent: f64) -> Result<Optioned<Celsius>> {
    check_temperature(t)?;
    if !rh_percent.is_finite() || rh_percent < 0.0 {
        return Err(SoundingError::InvalidUnitDomain {
            quantity: "relative humidity",
            value: rh_percent,
        });
    }

    if rh_percent == 0.0 {
        return Ok(none());
    }

    let rh = rh_percent / 100.0;
    let dp = metfor::vapor_pressure_water(Celsius::from(t))
        .map(|sat_vap| HectoPascal(rh * sat_vap.unpack()))
        .and_then(metfor::dew_point_from_vapor_pressure_water);

    Ok(Optioned::from(dp))
}

/// Dew point from pressure and specific humidity in kg/kg.
///
/// Zero specific humidity has no dew point and gives a missing value.
pub fn dew_point_from_specific_humidity(p: HectoPascal, q: f64) -> Result<Optioned<Celsius>> {
    check_pressure(p)?;
    if !q.is_finite() || q < 0.0 || q >= 1.0 {
        return Err(SoundingError::InvalidUnitDomain {
            quantity: "specific humidity",
            value: q,
        });
    }

    if q == 0.0 {
        return Ok(none());
    }

    let mw = metfor::mixing_ratio_from_specific_humidity(q);

    Ok(Optioned::from(metfor::dew_point_from_p_and_mw(p, mw)))
}

/// Magnitude of the wind vector.
pub fn wind_speed(wind: WindUV<MetersPSec>) -> Result<MetersPSec> {
    let (u, v) = (wind.u.unpack(), wind.v.unpack());
    for &val in [u, v].iter() {
        if !val.is_finite() {
            return Err(SoundingError::InvalidUnitDomain {
                quantity: "wind component",
                value: val,
            });
        }
    }

    Ok(MetersPSec(u.hypot(v)))
}

/// Meteorological wind direction, the direction the wind blows from, in degrees.
pub fn wind_direction(wind: WindUV<MetersPSec>) -> Result<f64> {
    wind_speed(wind)?;
    Ok(WindSpdDir::<MetersPSec>::from(wind).direction)
}

/// Height from geopotential in m²/s².
pub fn height_from_geopotential(geopotential: f64) -> Result<Meters> {
    if !geopotential.is_finite() {
        return Err(SoundingError::InvalidUnitDomain {
            quantity: "geopotential",
            value: geopotential,
        });
    }

    Ok(Meters(geopotential / STANDARD_GRAVITY))
}

/// Height of a pressure level in the US standard atmosphere (troposphere).
pub fn standard_atmosphere_height(p: HectoPascal) -> Result<Meters> {
    check_pressure(p)?;

    let exponent = RD * STD_ATM_LAPSE_RATE / STANDARD_GRAVITY;
    let ratio = p.unpack() / STD_ATM_P0.unpack();

    Ok(Meters(
        STD_ATM_T0 / STD_ATM_LAPSE_RATE * (1.0 - ratio.powf(exponent)),
    ))
}

/// Dew point profile, using the formula selected by the humidity source of the profile.
pub fn dew_point_profile(profile: &Profile) -> Result<Vec<Optioned<Celsius>>> {
    match profile.humidity_source() {
        HumiditySource::RelativeHumidity => izip!(profile.temperature(), profile.humidity())
            .map(|(&t, &rh)| dew_point_from_rh(t, rh))
            .collect(),
        HumiditySource::SpecificHumidity => izip!(profile.pressure(), profile.humidity())
            .map(|(&p, &q)| dew_point_from_specific_humidity(p, q))
            .collect(),
    }
}

/// Wind speed profile in `unit`.
pub fn wind_speed_profile(profile: &Profile, unit: SpeedUnit) -> Result<Vec<f64>> {
    profile
        .wind()
        .iter()
        .map(|&w| wind_speed(w).map(|spd| convert_speed(spd, unit)))
        .collect()
}

/// Wind direction profile in degrees.
pub fn wind_direction_profile(profile: &Profile) -> Result<Vec<f64>> {
    profile.wind().iter().map(|&w| wind_direction(w)).collect()
}

/// Height profile from geopotential, empty if the profile has no geopotential.
pub fn height_profile(profile: &Profile) -> Result<Vec<Meters>> {
    profile
        .geopotential()
        .iter()
        .map(|&geo| height_from_geopotential(geo))
        .collect()
}

/// Compute every derived quantity and package the result with its provenance.
pub fn derive_sounding(
    profile: &Profile,
    run: ReferenceRun,
    station: StationInfo,
    unit: SpeedUnit,
) -> Result<Sounding> {
    // Domain checks for everything first, so no formula sees a bad value.
    for &p in profile.pressure() {
        check_pressure(p)?;
    }
    for &t in profile.temperature() {
        check_temperature(t)?;
    }

    let dew_point = dew_point_profile(profile)?;
    let wind_speed = wind_speed_profile(profile, unit)?;
    let wind_direction = wind_direction_profile(profile)?;
    let height = height_profile(profile)?;
    let std_atm_height = profile
        .pressure()
        .iter()
        .map(|&p| standard_atmosphere_height(p))
        .collect::<Result<Vec<_>>>()?;

    let temperature = profile
        .temperature()
        .iter()
        .map(|&t| Celsius::from(t))
        .collect();

    let station = match height.first() {
        Some(&lowest) if station.elevation().is_none() => station.with_elevation(lowest),
        _ => station,
    };

    Ok(Sounding::new(run, profile.humidity_source())
        .with_station_info(station)
        .with_speed_unit(unit)
        .with_pressure_profile(profile.pressure().to_vec())
        .with_temperature_profile(temperature)
        .with_dew_point_profile(dew_point)
        .with_wind_profile(profile.wind().to_vec())
        .with_wind_speed_profile(wind_speed)
        .with_wind_direction_profile(wind_direction)
        .with_height_profile(height)
        .with_std_atm_height_profile(std_atm_height))
}
