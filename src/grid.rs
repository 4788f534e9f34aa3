//! Nearest neighbor lookup on a horizontal mesh.
//!
//! Regular grids and unstructured meshes are both searched through the flattened point index of
//! [`HorizontalMesh`], so there is a single algorithm for both. Distances are squared Euclidean
//! distances in degrees of latitude and longitude, no interpolation is done.
//!
//! Ties go to the first point in index order. That is only stable as long as the upstream keeps
//! the same ordering of its mesh from run to run.
use crate::{
    error::{FetchError, Result, SoundingError},
    source::{HorizontalMesh, RawField},
};
use tracing::debug;

/// The mesh point selected for a target location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    /// Flattened horizontal index.
    pub index: usize,
    /// Latitude of the mesh point in degrees.
    pub latitude: f64,
    /// Longitude of the mesh point in degrees.
    pub longitude: f64,
    /// Squared distance to the target in degrees².
    pub distance_sq: f64,
}

/// A vertical column taken out of a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Where it was taken.
    pub point: GridPoint,
    /// One value per level, in the order of the source field.
    pub values: Vec<f64>,
}

impl Column {
    /// Number of levels.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if there are no levels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Find the mesh point closest to `target`, given as `(latitude, longitude)`.
///
/// Points with non-finite coordinates are skipped. Returns `None` if there are no usable points.
pub fn nearest_point(mesh: &HorizontalMesh, target: (f64, f64)) -> Option<GridPoint> {
    let (tgt_lat, tgt_lon) = target;

    mesh.points()
        .enumerate()
        .filter(|(_, (lat, lon))| lat.is_finite() && lon.is_finite())
        .map(|(index, (lat, lon))| GridPoint {
            index,
            latitude: lat,
            longitude: lon,
            distance_sq: (lat - tgt_lat).powi(2) + (lon - tgt_lon).powi(2),
        })
        // Only a strictly closer point replaces the best so far.
        .fold(None, |best: Option<GridPoint>, pnt| match best {
            Some(b) if b.distance_sq <= pnt.distance_sq => Some(b),
            _ => Some(pnt),
        })
}

/// Take the column of every level at the mesh point closest to `target`.
pub fn extract_column(field: &RawField, target: (f64, f64)) -> Result<Column> {
    let no_points = || SoundingError::DataUnavailable {
        variable: field.name().to_owned(),
        reason: FetchError::Malformed("field has no usable horizontal points".to_owned()),
    };

    let point = nearest_point(field.mesh(), target).ok_or_else(no_points)?;
    let values = field.column(point.index).ok_or_else(no_points)?;

    debug!(
        variable = field.name(),
        index = point.index,
        lat = point.latitude,
        lon = point.longitude,
        levels = values.len(),
        "extracted column"
    );

    Ok(Column { point, values })
}
