use crate::grid::GridPoint;
use metfor::Meters;
use optional::Optioned;

/// Where a sounding was requested and which model grid point answered.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationInfo {
    /// Site name, e.g. Payerne
    name: Option<String>,
    /// Requested latitude and longitude.
    target: Option<(f64, f64)>,
    /// The model grid point the columns were taken from.
    grid_point: Option<GridPoint>,
    /// Elevation, this is model terrain and not necessarily the same as the real world.
    elevation: Optioned<Meters>,
}

impl StationInfo {
    /// Create a new object with default values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use model_sounding::StationInfo;
    ///
    /// assert!(StationInfo::new().name().is_none());
    /// assert!(StationInfo::new().target().is_none());
    /// assert!(StationInfo::new().elevation().is_none());
    ///
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a site name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use model_sounding::StationInfo;
    ///
    /// assert_eq!(StationInfo::new().with_name("Payerne".to_owned()).name().unwrap(), "Payerne");
    /// assert!(StationInfo::new().with_name(None).name().is_none());
    /// ```
    #[inline]
    pub fn with_name<T>(mut self, name: T) -> Self
    where
        Option<String>: From<T>,
    {
        self.name = Option::from(name);
        self
    }

    /// Builder method to add the requested location.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use model_sounding::StationInfo;
    ///
    /// assert_eq!(
    ///     StationInfo::new().with_target((46.81, 6.94)).target().unwrap(), (46.81, 6.94));
    /// ```
    #[inline]
    pub fn with_target<T>(mut self, coords: T) -> Self
    where
        Option<(f64, f64)>: From<T>,
    {
        self.target = Option::from(coords);
        self
    }

    /// Builder method to add the grid point the data came from.
    #[inline]
    pub fn with_grid_point<T>(mut self, point: T) -> Self
    where
        Option<GridPoint>: From<T>,
    {
        self.grid_point = Option::from(point);
        self
    }

    /// Builder method to add elevation.
    ///
    /// # Examples
    ///```rust
    /// use metfor::Meters;
    /// use model_sounding::StationInfo;
    /// use optional::{some, none};
    ///
    /// let _info = StationInfo::new().with_elevation(Meters(200.0));
    /// let _info = StationInfo::new().with_elevation(some(Meters(200.0)));
    /// let info = StationInfo::new().with_elevation(none::<Meters>());
    /// assert!(info.elevation().is_none());
    ///```
    #[inline]
    pub fn with_elevation<T>(mut self, elev: T) -> Self
    where
        Optioned<Meters>: From<T>,
    {
        self.elevation = Optioned::from(elev);
        self
    }

    /// Site name.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Requested latitude and longitude.
    #[inline]
    pub fn target(&self) -> Option<(f64, f64)> {
        self.target
    }

    /// The grid point that was selected for the target.
    #[inline]
    pub fn grid_point(&self) -> Option<GridPoint> {
        self.grid_point
    }

    /// Latitude and longitude of the selected grid point, falling back to the target.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use model_sounding::{GridPoint, StationInfo};
    ///
    /// let info = StationInfo::new().with_target((46.81, 6.94));
    /// assert_eq!(info.location(), Some((46.81, 6.94)));
    ///
    /// let info = info.with_grid_point(GridPoint {
    ///     index: 12,
    ///     latitude: 46.8,
    ///     longitude: 6.95,
    ///     distance_sq: 0.0002,
    /// });
    /// assert_eq!(info.location(), Some((46.8, 6.95)));
    ///
    /// assert!(StationInfo::new().location().is_none());
    /// ```
    #[inline]
    pub fn location(&self) -> Option<(f64, f64)> {
        self.grid_point
            .map(|pnt| (pnt.latitude, pnt.longitude))
            .or(self.target)
    }

    /// Elevation in meters of the lowest model level with a height, this is model terrain, not
    /// necessarily the same as the real world.
    #[inline]
    pub fn elevation(&self) -> Optioned<Meters> {
        self.elevation
    }
}
