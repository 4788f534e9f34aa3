//! Configuration of the resolution pipeline.
//!
//! Every field has a default, so an empty TOML document gives the ICON-CH1 sounding over Payerne.
//!
//! ```toml
//! collection = "ogd-forecasting-icon-ch1"
//! site_name = "Payerne"
//! latitude = 46.81
//! longitude = 6.94
//! lookback = 4
//! interval_hours = 3
//! wind_speed_unit = "km/h"
//!
//! [[humidity]]
//! name = "RELHUM"
//! kind = "relative"
//!
//! [[humidity]]
//! name = "QV"
//! kind = "specific"
//! ```
use crate::{
    error::{ConfigError, Result},
    fetch::HumidityVariable,
    keys::{HumiditySource, SpeedUnit},
};
use serde::Deserialize;
use std::time::Duration;

/// Longest accepted time between model runs, cycles restart at midnight.
pub const MAX_INTERVAL_HOURS: u32 = 24;

/// Longest accepted forecast horizon.
pub const MAX_HORIZON_HOURS: u32 = 720;

/// Names of the required variables in the upstream collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VariableNames {
    /// Pressure in Pa.
    pub pressure: String,
    /// Temperature in K.
    pub temperature: String,
    /// Eastward wind in m/s.
    pub u_wind: String,
    /// Northward wind in m/s.
    pub v_wind: String,
    /// Geopotential in m²/s², not fetched when `None`.
    pub geopotential: Option<String>,
}

impl Default for VariableNames {
    fn default() -> Self {
        VariableNames {
            pressure: "P".to_owned(),
            temperature: "T".to_owned(),
            u_wind: "U".to_owned(),
            v_wind: "V".to_owned(),
            geopotential: None,
        }
    }
}

/// Everything needed to resolve one sounding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Upstream collection identifier.
    pub collection: String,
    /// Name of the site, only used for labeling.
    pub site_name: String,
    /// Target latitude in degrees.
    pub latitude: f64,
    /// Target longitude in degrees.
    pub longitude: f64,
    /// Variable names.
    pub variables: VariableNames,
    /// Humidity variables in order of preference.
    pub humidity: Vec<HumidityVariable>,
    /// Number of cycle aligned candidate runs to try.
    pub lookback: usize,
    /// Hours between model runs.
    pub interval_hours: u32,
    /// Try the source's own "latest" run before the cycle aligned candidates.
    pub include_latest: bool,
    /// Forecast horizon in hours, 0 for the analysis.
    pub horizon_hours: u32,
    /// Request perturbed (ensemble member) fields instead of the control run.
    pub perturbed: bool,
    /// Minimum number of vertical levels of every column.
    pub min_levels: usize,
    /// Seconds allowed per upstream request.
    pub fetch_timeout_secs: u64,
    /// Unit of the reported wind speed.
    pub wind_speed_unit: SpeedUnit,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            collection: "ogd-forecasting-icon-ch1".to_owned(),
            site_name: "Payerne".to_owned(),
            latitude: 46.81,
            longitude: 6.94,
            variables: VariableNames::default(),
            humidity: vec![
                HumidityVariable::new("RELHUM", HumiditySource::RelativeHumidity),
                HumidityVariable::new("QV", HumiditySource::SpecificHumidity),
            ],
            lookback: 4,
            interval_hours: 3,
            include_latest: false,
            horizon_hours: 0,
            perturbed: false,
            min_levels: 5,
            fetch_timeout_secs: 60,
            wind_speed_unit: SpeedUnit::KilometersPerHour,
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: PipelineConfig =
            toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        fn invalid(field: &'static str, message: &str) -> ConfigError {
            ConfigError::Invalid {
                field,
                message: message.to_owned(),
            }
        }

        if self.collection.trim().is_empty() {
            return Err(invalid("collection", "must not be empty"));
        }
        if !self.latitude.is_finite() || self.latitude.abs() > 90.0 {
            return Err(invalid("latitude", "must be between -90 and 90"));
        }
        if !self.longitude.is_finite() || !(-180.0..=360.0).contains(&self.longitude) {
            return Err(invalid("longitude", "must be between -180 and 360"));
        }
        if self.lookback == 0 && !self.include_latest {
            return Err(invalid(
                "lookback",
                "must be at least 1 unless include_latest is set",
            ));
        }
        if self.interval_hours == 0 || self.interval_hours > MAX_INTERVAL_HOURS {
            return Err(invalid("interval_hours", "must be between 1 and 24"));
        }
        if self.horizon_hours > MAX_HORIZON_HOURS {
            return Err(invalid("horizon_hours", "must be at most 720"));
        }
        if self.min_levels == 0 {
            return Err(invalid("min_levels", "must be at least 1"));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(invalid("fetch_timeout_secs", "must be at least 1"));
        }
        if self.humidity.is_empty() {
            return Err(invalid("humidity", "at least one humidity variable needed"));
        }

        let VariableNames {
            pressure,
            temperature,
            u_wind,
            v_wind,
            geopotential,
        } = &self.variables;
        let required = [pressure, temperature, u_wind, v_wind];
        let names = required
            .iter()
            .map(|name| name.as_str())
            .chain(geopotential.as_deref())
            .chain(self.humidity.iter().map(|h| h.name.as_str()));
        for name in names {
            if name.trim().is_empty() {
                return Err(invalid("variables", "variable names must not be empty"));
            }
        }

        Ok(())
    }

    /// The target as `(latitude, longitude)`.
    #[inline]
    pub fn target(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Time between model runs.
    #[inline]
    pub fn interval(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.interval_hours))
    }

    /// Forecast horizon.
    #[inline]
    pub fn horizon(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.horizon_hours))
    }

    /// Time allowed per upstream request.
    #[inline]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::SoundingError;

    #[test]
    fn test_empty_document_is_default() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.target(), (46.81, 6.94));
        assert_eq!(config.interval(), chrono::Duration::hours(3));
        assert_eq!(config.lookback, 4);
        assert_eq!(config.min_levels, 5);
        assert_eq!(config.humidity[0].name, "RELHUM");
        assert!(!config.perturbed);
    }

    #[test]
    fn test_parse() {
        let text = r#"
            collection = "ogd-forecasting-icon-ch2"
            site_name = "Zurich"
            latitude = 47.38
            longitude = 8.54
            lookback = 2
            include_latest = true
            horizon_hours = 6
            wind_speed_unit = "kt"

            [variables]
            geopotential = "FI"

            [[humidity]]
            name = "QV"
            kind = "specific"
        "#;

        let config = PipelineConfig::from_toml_str(text).unwrap();
        assert_eq!(config.collection, "ogd-forecasting-icon-ch2");
        assert_eq!(config.target(), (47.38, 8.54));
        assert_eq!(config.variables.pressure, "P");
        assert_eq!(config.variables.geopotential.as_deref(), Some("FI"));
        assert_eq!(
            config.humidity,
            vec![HumidityVariable::new("QV", HumiditySource::SpecificHumidity)]
        );
        assert_eq!(config.horizon(), chrono::Duration::hours(6));
        assert_eq!(config.wind_speed_unit, SpeedUnit::Knots);
        assert!(config.include_latest);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            PipelineConfig::from_toml_str("latitude = 123.0"),
            Err(SoundingError::Config(ConfigError::Invalid { field: "latitude", .. }))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("lookback = 0"),
            Err(SoundingError::Config(ConfigError::Invalid { field: "lookback", .. }))
        ));
        assert!(PipelineConfig::from_toml_str("lookback = 0\ninclude_latest = true").is_ok());
        assert!(matches!(
            PipelineConfig::from_toml_str("humidity = []"),
            Err(SoundingError::Config(ConfigError::Invalid { field: "humidity", .. }))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("[variables]\ntemperature = \" \""),
            Err(SoundingError::Config(ConfigError::Invalid { field: "variables", .. }))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("interval_hours = 3000000000"),
            Err(SoundingError::Config(ConfigError::Invalid { field: "interval_hours", .. }))
        ));
        assert!(PipelineConfig::from_toml_str("interval_hours = 24").is_ok());
        assert!(matches!(
            PipelineConfig::from_toml_str("horizon_hours = 100000"),
            Err(SoundingError::Config(ConfigError::Invalid { field: "horizon_hours", .. }))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("lookback = \"four\""),
            Err(SoundingError::Config(ConfigError::Parse(_)))
        ));
    }
}
