//! Enums used as keys for selecting variables, formulas and units.
use serde::Deserialize;
use strum_macros::{Display, EnumString};

/// Which kind of humidity field was found for a run.
///
/// This decides which dewpoint formula is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Deserialize)]
pub enum HumiditySource {
    /// Relative humidity in percent.
    #[strum(serialize = "relative")]
    #[serde(rename = "relative")]
    RelativeHumidity,
    /// Specific humidity in kg/kg.
    #[strum(serialize = "specific")]
    #[serde(rename = "specific")]
    SpecificHumidity,
}

/// Units wind speed can be reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Deserialize)]
pub enum SpeedUnit {
    /// Meters per second.
    #[strum(serialize = "m/s")]
    #[serde(rename = "m/s")]
    MetersPerSecond,
    /// Kilometers per hour.
    #[strum(serialize = "km/h")]
    #[serde(rename = "km/h")]
    KilometersPerHour,
    /// Knots.
    #[strum(to_string = "kt", serialize = "knots")]
    #[serde(rename = "kt", alias = "knots")]
    Knots,
}

impl Default for SpeedUnit {
    fn default() -> Self {
        SpeedUnit::KilometersPerHour
    }
}

/// The variables that make up a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ColumnVariable {
    /// Pressure in Pa.
    #[strum(serialize = "pressure")]
    Pressure,
    /// Temperature in K.
    #[strum(serialize = "temperature")]
    Temperature,
    /// Eastward wind component in m/s.
    #[strum(serialize = "u wind")]
    UWind,
    /// Northward wind component in m/s.
    #[strum(serialize = "v wind")]
    VWind,
    /// Relative or specific humidity.
    #[strum(serialize = "humidity")]
    Humidity,
    /// Geopotential in m²/s².
    #[strum(serialize = "geopotential")]
    Geopotential,
}
