use metfor::{Celsius, HectoPascal, Meters, MetersPSec, WindUV};
use optional::Optioned;

/// A copy of a row of the sounding data.
#[derive(Clone, Default, Copy, Debug, PartialEq)]
pub struct DataRow {
    /// Pressure in hPa
    pub pressure: Optioned<HectoPascal>,
    /// Temperature in C
    pub temperature: Optioned<Celsius>,
    /// Dew point in C
    pub dew_point: Optioned<Celsius>,
    /// Wind components
    pub wind: Optioned<WindUV<MetersPSec>>,
    /// Wind speed in the unit of the sounding
    pub wind_speed: Optioned<f64>,
    /// Direction the wind blows from in degrees
    pub wind_direction: Optioned<f64>,
    /// Height from geopotential in meters
    pub height: Optioned<Meters>,
    /// Standard atmosphere height of the pressure level in meters
    pub std_atm_height: Optioned<Meters>,
}
