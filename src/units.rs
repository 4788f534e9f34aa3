//! Physical constants and unit conversions.
//!
//! Every conversion used by the crate goes through one of these constants, nothing is inferred
//! from the magnitude of a value.
use crate::keys::SpeedUnit;
use metfor::{HectoPascal, MetersPSec, Quantity};

/// Pascals in one hectopascal.
pub const PA_PER_HPA: f64 = 100.0;

/// Standard gravity in m/s².
pub const STANDARD_GRAVITY: f64 = 9.806_65;

/// Kilometers per hour in one meter per second.
pub const KMH_PER_MPS: f64 = 3.6;

/// Meters per second in one knot (1852 m / 3600 s).
pub const MPS_PER_KNOT: f64 = 1852.0 / 3600.0;

/// Gas constant for dry air in J/(kg K).
pub const RD: f64 = 287.047_49;

/// Standard atmosphere surface temperature in K.
pub const STD_ATM_T0: f64 = 288.15;

/// Standard atmosphere surface pressure in hPa.
pub const STD_ATM_P0: HectoPascal = HectoPascal(1013.25);

/// Standard atmosphere tropospheric lapse rate in K/m.
pub const STD_ATM_LAPSE_RATE: f64 = 0.0065;

/// Convert pressure in Pa to hPa.
#[inline]
pub fn pa_to_hpa(pa: f64) -> HectoPascal {
    HectoPascal(pa / PA_PER_HPA)
}

/// Convert a speed in m/s into `unit`.
#[inline]
pub fn convert_speed(speed: MetersPSec, unit: SpeedUnit) -> f64 {
    let mps = speed.unpack();
    match unit {
        SpeedUnit::MetersPerSecond => mps,
        SpeedUnit::KilometersPerHour => mps * KMH_PER_MPS,
        SpeedUnit::Knots => mps / MPS_PER_KNOT,
    }
}
