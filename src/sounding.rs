//! Data type and methods to store a resolved model sounding.

use crate::{
    keys::{HumiditySource, SpeedUnit},
    run::ReferenceRun,
};
use chrono::NaiveDateTime;
use metfor::{Celsius, HectoPascal, Meters, MetersPSec, WindUV};
use optional::Optioned;

pub use self::{data_row::DataRow, station_info::StationInfo};

/// A vertical profile at one location from one model run, with its provenance.
///
/// The profile variables are stored in parallel vectors ordered from the surface up, so pressure
/// is non-increasing. If a profile lacks a certain variable, e.g. height from geopotential, that
/// whole vector has length 0 instead of being full of missing values.
#[derive(Clone, Debug, PartialEq)]
pub struct Sounding {
    // Description of the source of the sounding.
    source: Option<String>,

    // Station info
    station: StationInfo,

    // Provenance
    run: ReferenceRun,
    served_reference_time: Option<String>,
    humidity_source: HumiditySource,
    speed_unit: SpeedUnit,

    // Profiles
    pressure: Vec<HectoPascal>,
    temperature: Vec<Celsius>,
    dew_point: Vec<Optioned<Celsius>>,
    wind: Vec<WindUV<MetersPSec>>,
    wind_speed: Vec<f64>,
    wind_direction: Vec<f64>,
    height: Vec<Meters>,
    std_atm_height: Vec<Meters>,
}

macro_rules! make_profile_setter {
    ($(#[$attr:meta])* => $name:tt, $inner_type:ty, $p_var:ident) => {
        $(#[$attr])*
        pub fn $name(self, profile: Vec<$inner_type>) -> Self {
            Self {$p_var: profile, ..self}
        }
    };
}

macro_rules! make_profile_getter {
    ($(#[$attr:meta])* => $name:tt, $inner_type:ty, $p_var:ident) => {
        $(#[$attr])*
        pub fn $name(&self) -> &[$inner_type] {
            &self.$p_var
        }
    };
}

impl Sounding {
    /// Create a new, empty sounding for a model run.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::Duration;
    /// use model_sounding::{HumiditySource, ReferenceRun, RunTime, Sounding};
    ///
    /// let run = ReferenceRun::new(RunTime::Latest, Duration::hours(0));
    /// let snd = Sounding::new(run, HumiditySource::RelativeHumidity);
    /// assert!(snd.pressure_profile().is_empty());
    /// ```
    #[inline]
    pub fn new(run: ReferenceRun, humidity_source: HumiditySource) -> Self {
        Sounding {
            source: None,
            station: StationInfo::default(),
            run,
            served_reference_time: None,
            humidity_source,
            speed_unit: SpeedUnit::default(),
            pressure: vec![],
            temperature: vec![],
            dew_point: vec![],
            wind: vec![],
            wind_speed: vec![],
            wind_direction: vec![],
            height: vec![],
            std_atm_height: vec![],
        }
    }

    /// Add a source description to this sounding.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::Duration;
    /// use model_sounding::{HumiditySource, ReferenceRun, RunTime, Sounding};
    ///
    /// let run = ReferenceRun::new(RunTime::Latest, Duration::hours(0));
    /// let snd = Sounding::new(run, HumiditySource::RelativeHumidity)
    ///     .with_source_description("ICON-CH1".to_owned());
    /// assert_eq!(snd.source_description().unwrap(), "ICON-CH1");
    ///
    /// let snd = snd.with_source_description(None);
    /// assert!(snd.source_description().is_none());
    /// ```
    #[inline]
    pub fn with_source_description<S>(mut self, desc: S) -> Self
    where
        Option<String>: From<S>,
    {
        self.source = Option::from(desc);
        self
    }

    /// Retrieve a source description for this sounding.
    #[inline]
    pub fn source_description(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Builder function for setting the station info.
    #[inline]
    pub fn with_station_info(mut self, new_value: StationInfo) -> Self {
        self.station = new_value;
        self
    }

    /// Get the station info
    #[inline]
    pub fn station_info(&self) -> &StationInfo {
        &self.station
    }

    /// Builder method for the reference time the upstream reported it actually served.
    #[inline]
    pub fn with_served_reference_time<S>(mut self, served: S) -> Self
    where
        Option<String>: From<S>,
    {
        self.served_reference_time = Option::from(served);
        self
    }

    /// The reference time the upstream reported, verbatim, if it reported one.
    ///
    /// This is mostly useful when the run was requested as [`RunTime::Latest`].
    ///
    /// [`RunTime::Latest`]: crate::RunTime::Latest
    #[inline]
    pub fn served_reference_time(&self) -> Option<&str> {
        self.served_reference_time.as_deref()
    }

    /// Builder method for the unit of the wind speed profile.
    #[inline]
    pub fn with_speed_unit(mut self, unit: SpeedUnit) -> Self {
        self.speed_unit = unit;
        self
    }

    /// Unit of [`wind_speed_profile`](Sounding::wind_speed_profile).
    #[inline]
    pub fn speed_unit(&self) -> SpeedUnit {
        self.speed_unit
    }

    /// The model run this sounding was taken from.
    #[inline]
    pub fn run(&self) -> ReferenceRun {
        self.run
    }

    /// Which humidity variable the dew point was derived from.
    #[inline]
    pub fn humidity_source(&self) -> HumiditySource {
        self.humidity_source
    }

    /// Valid time of the sounding, unknown when the run was requested as "latest".
    #[inline]
    pub fn valid_time(&self) -> Option<NaiveDateTime> {
        self.run.valid_time()
    }

    /// Difference in model initialization time and `valid_time` in hours.
    #[inline]
    pub fn lead_time(&self) -> Optioned<i32> {
        Optioned::from(self.run.horizon().num_hours() as i32)
    }

    make_profile_setter!(
        /// Builder method for the pressure profile.
        ///
        /// # Examples
        /// ```rust
        /// use chrono::Duration;
        /// use metfor::HectoPascal;
        /// use model_sounding::{HumiditySource, ReferenceRun, RunTime, Sounding};
        ///
        /// let data = vec![1000.0, 925.0, 850.0, 700.0, 500.0, 300.0];
        /// let pressure_data: Vec<HectoPascal> = data.into_iter().map(HectoPascal).collect();
        ///
        /// let run = ReferenceRun::new(RunTime::Latest, Duration::hours(0));
        /// let snd = Sounding::new(run, HumiditySource::RelativeHumidity)
        ///     .with_pressure_profile(pressure_data);
        /// assert_eq!(snd.pressure_profile().len(), 6);
        /// ```
        #[inline]
        => with_pressure_profile, HectoPascal, pressure
    );

    make_profile_getter!(
        /// Get the pressure profile, non-increasing from the surface up.
        #[inline]
        => pressure_profile, HectoPascal, pressure
    );

    make_profile_setter!(
        /// Builder method for the temperature profile.
        #[inline]
        => with_temperature_profile, Celsius, temperature
    );

    make_profile_getter!(
        /// Get the temperature profile.
        #[inline]
        => temperature_profile, Celsius, temperature
    );

    make_profile_setter!(
        /// Builder method for the dew point profile.
        #[inline]
        => with_dew_point_profile, Optioned<Celsius>, dew_point
    );

    make_profile_getter!(
        /// Get the dew point profile. A level is missing where there was no moisture at all.
        #[inline]
        => dew_point_profile, Optioned<Celsius>, dew_point
    );

    make_profile_setter!(
        /// Builder method for the wind profile.
        #[inline]
        => with_wind_profile, WindUV<MetersPSec>, wind
    );

    make_profile_getter!(
        /// Get the wind profile as eastward and northward components.
        #[inline]
        => wind_profile, WindUV<MetersPSec>, wind
    );

    make_profile_setter!(
        /// Builder method for the wind speed profile, in the unit set by `with_speed_unit`.
        #[inline]
        => with_wind_speed_profile, f64, wind_speed
    );

    make_profile_getter!(
        /// Get the wind speed profile in [`speed_unit`](Sounding::speed_unit).
        #[inline]
        => wind_speed_profile, f64, wind_speed
    );

    make_profile_setter!(
        /// Builder method for the wind direction profile.
        #[inline]
        => with_wind_direction_profile, f64, wind_direction
    );

    make_profile_getter!(
        /// Get the direction the wind blows from in degrees.
        #[inline]
        => wind_direction_profile, f64, wind_direction
    );

    make_profile_setter!(
        /// Builder method for the height profile.
        #[inline]
        => with_height_profile, Meters, height
    );

    make_profile_getter!(
        /// Get the height profile derived from geopotential. Empty if the model run did not
        /// provide geopotential.
        #[inline]
        => height_profile, Meters, height
    );

    make_profile_setter!(
        /// Builder method for the standard atmosphere height profile.
        #[inline]
        => with_std_atm_height_profile, Meters, std_atm_height
    );

    make_profile_getter!(
        /// Get the height of each pressure level in the standard atmosphere, suitable as a plot
        /// axis.
        #[inline]
        => std_atm_height_profile, Meters, std_atm_height
    );

    /// Number of levels.
    #[inline]
    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    /// `true` if there are no levels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }

    /// Get a bottom up iterator over the data rows. The first row is the lowest model level.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::Duration;
    /// use metfor::{Celsius, HectoPascal};
    /// use model_sounding::{HumiditySource, ReferenceRun, RunTime, Sounding};
    ///
    /// let pres: Vec<_> = vec![1000.0, 925.0, 850.0].into_iter().map(HectoPascal).collect();
    /// let temps: Vec<_> = vec![20.0, 18.0, 17.0].into_iter().map(Celsius).collect();
    ///
    /// let run = ReferenceRun::new(RunTime::Latest, Duration::hours(0));
    /// let snd = Sounding::new(run, HumiditySource::RelativeHumidity)
    ///     .with_pressure_profile(pres)
    ///     .with_temperature_profile(temps);
    ///
    /// let mut iter = snd.bottom_up();
    ///
    /// let row = iter.next().unwrap();
    /// assert_eq!(row.pressure.unwrap(), HectoPascal(1000.0));
    /// assert_eq!(row.temperature.unwrap(), Celsius(20.0));
    /// assert!(row.wind.is_none()); // We never set wind profile.
    ///
    /// let row = iter.next().unwrap();
    /// assert_eq!(row.pressure.unwrap(), HectoPascal(925.0));
    ///
    /// let row = iter.next().unwrap();
    /// assert_eq!(row.pressure.unwrap(), HectoPascal(850.0));
    ///
    /// assert!(iter.next().is_none());
    /// ```
    #[inline]
    pub fn bottom_up<'a>(&'a self) -> impl Iterator<Item = DataRow> + 'a {
        ProfileIterator {
            next_idx: 0,
            direction: 1,
            src: self,
        }
    }

    /// Get a top down iterator over the data rows. The last row is the lowest model level.
    #[inline]
    pub fn top_down<'a>(&'a self) -> impl Iterator<Item = DataRow> + 'a {
        ProfileIterator {
            next_idx: self.pressure.len() as isize - 1,
            direction: -1,
            src: self,
        }
    }

    /// Get a row of data values from this sounding, index 0 is the lowest level.
    #[inline]
    pub fn data_row(&self, idx: usize) -> Option<DataRow> {
        macro_rules! copy_to_result {
            ($result:ident, $profile:ident, $idx:ident) => {
                if let Some(&val) = self.$profile.get($idx) {
                    $result.$profile = Optioned::from(val);
                }
            };
        }

        if idx >= self.pressure.len() {
            return None;
        }

        let mut result = DataRow::default();

        copy_to_result!(result, pressure, idx);
        copy_to_result!(result, temperature, idx);
        copy_to_result!(result, wind, idx);
        copy_to_result!(result, wind_speed, idx);
        copy_to_result!(result, wind_direction, idx);
        copy_to_result!(result, height, idx);
        copy_to_result!(result, std_atm_height, idx);
        if let Some(&dp) = self.dew_point.get(idx) {
            result.dew_point = dp;
        }

        Some(result)
    }
}

/// Iterator over the data rows of a sounding, either top down or bottom up.
struct ProfileIterator<'a> {
    next_idx: isize,
    direction: isize, // +1 for bottom up, -1 for top down
    src: &'a Sounding,
}

impl<'a> Iterator for ProfileIterator<'a> {
    type Item = DataRow;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.next_idx < 0 {
            return None;
        }

        let result = self.src.data_row(self.next_idx as usize);
        self.next_idx += self.direction;
        result
    }
}


mod data_row;
mod station_info;
