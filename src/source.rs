//! The seam to the upstream model data source.
//!
//! The crate does not know how forecast fields are transported. Anything that can answer a
//! [`VariableRequest`] with a [`SourceResponse`] implements [`ForecastSource`].
use crate::{error::FetchError, run::ReferenceRun};
use std::{
    collections::BTreeMap,
    sync::{mpsc, Arc},
    thread,
    time::Duration,
};
use tracing::warn;

/// Attribute name upstream sources use to report the reference time actually served.
pub const REFERENCE_TIME_ATTRIBUTE: &str = "reference_datetime";

/// A request for one variable of one model run.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableRequest {
    /// Collection identifier, e.g. `ogd-forecasting-icon-ch1`.
    pub collection: String,
    /// Variable short name, e.g. `T`.
    pub variable: String,
    /// Model run and forecast horizon.
    pub run: ReferenceRun,
    /// `false` for the deterministic (control) run.
    pub perturbed: bool,
    /// How long the source may take to answer.
    pub timeout: Duration,
}

/// Horizontal layout of the points of a field.
#[derive(Clone, Debug, PartialEq)]
pub enum HorizontalMesh {
    /// A regular grid given by its latitude and longitude axes. Points are numbered row major,
    /// `i_lat * longitudes.len() + i_lon`.
    Regular {
        /// Latitude axis in degrees.
        latitudes: Vec<f64>,
        /// Longitude axis in degrees.
        longitudes: Vec<f64>,
    },
    /// A flat list of cells with the coordinates of each cell.
    Unstructured {
        /// Latitude of each cell in degrees.
        latitudes: Vec<f64>,
        /// Longitude of each cell in degrees.
        longitudes: Vec<f64>,
    },
}

impl HorizontalMesh {
    /// Number of horizontal points.
    pub fn len(&self) -> usize {
        match self {
            HorizontalMesh::Regular {
                latitudes,
                longitudes,
            } => latitudes.len() * longitudes.len(),
            HorizontalMesh::Unstructured { latitudes, .. } => latitudes.len(),
        }
    }

    /// `true` if there are no horizontal points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the `(latitude, longitude)` of every point in flattened index order.
    pub fn points<'a>(&'a self) -> Box<dyn Iterator<Item = (f64, f64)> + 'a> {
        match self {
            HorizontalMesh::Regular {
                latitudes,
                longitudes,
            } => Box::new(
                latitudes
                    .iter()
                    .flat_map(move |&lat| longitudes.iter().map(move |&lon| (lat, lon))),
            ),
            HorizontalMesh::Unstructured {
                latitudes,
                longitudes,
            } => Box::new(latitudes.iter().cloned().zip(longitudes.iter().cloned())),
        }
    }

    /// The `(latitude, longitude)` of the point at a flattened index.
    pub fn point(&self, index: usize) -> Option<(f64, f64)> {
        match self {
            HorizontalMesh::Regular {
                latitudes,
                longitudes,
            } => {
                if longitudes.is_empty() {
                    return None;
                }
                let lat = latitudes.get(index / longitudes.len())?;
                let lon = longitudes.get(index % longitudes.len())?;
                Some((*lat, *lon))
            }
            HorizontalMesh::Unstructured {
                latitudes,
                longitudes,
            } => Some((*latitudes.get(index)?, *longitudes.get(index)?)),
        }
    }
}

/// A named field with its horizontal mesh and one vertical dimension.
///
/// Values are stored level major, `values[level * mesh.len() + point]`.
#[derive(Clone, Debug, PartialEq)]
pub struct RawField {
    name: String,
    levels: usize,
    values: Vec<f64>,
    mesh: HorizontalMesh,
    attributes: BTreeMap<String, String>,
}

impl RawField {
    /// Create a new field, checking the values fit the mesh and number of levels.
    pub fn new<S>(
        name: S,
        levels: usize,
        values: Vec<f64>,
        mesh: HorizontalMesh,
    ) -> Result<Self, FetchError>
    where
        S: Into<String>,
    {
        let name = name.into();

        if let HorizontalMesh::Unstructured {
            latitudes,
            longitudes,
        } = &mesh
        {
            if latitudes.len() != longitudes.len() {
                return Err(FetchError::Malformed(format!(
                    "{}: {} cell latitudes but {} cell longitudes",
                    name,
                    latitudes.len(),
                    longitudes.len()
                )));
            }
        }

        if values.len() != levels * mesh.len() {
            return Err(FetchError::Malformed(format!(
                "{}: {} values do not fit {} levels of {} points",
                name,
                values.len(),
                levels,
                mesh.len()
            )));
        }

        Ok(RawField {
            name,
            levels,
            values,
            mesh,
            attributes: BTreeMap::new(),
        })
    }

    /// Builder method to attach a provenance attribute.
    pub fn with_attribute<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Variable name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of vertical levels.
    #[inline]
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// The horizontal mesh.
    #[inline]
    pub fn mesh(&self) -> &HorizontalMesh {
        &self.mesh
    }

    /// Look up a provenance attribute.
    #[inline]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }

    /// All values at one horizontal point, bottom of the array first.
    pub fn column(&self, point: usize) -> Option<Vec<f64>> {
        let n_points = self.mesh.len();
        if point >= n_points {
            return None;
        }

        Some(
            (0..self.levels)
                .map(|level| self.values[level * n_points + point])
                .collect(),
        )
    }
}

/// What an upstream source answers with.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceResponse {
    /// A single field.
    Array(RawField),
    /// Several labeled fields, e.g. a whole dataset.
    Collection(Vec<RawField>),
}

impl SourceResponse {
    /// Reduce the response to the one field for `variable`.
    ///
    /// A collection yields the member with a matching name, or its first member if none match.
    pub fn into_field(self, variable: &str) -> Option<RawField> {
        match self {
            SourceResponse::Array(field) => Some(field),
            SourceResponse::Collection(mut fields) => {
                if let Some(pos) = fields.iter().position(|f| f.name() == variable) {
                    Some(fields.swap_remove(pos))
                } else if fields.is_empty() {
                    None
                } else {
                    Some(fields.swap_remove(0))
                }
            }
        }
    }
}

/// Upstream provider of forecast fields.
///
/// Calls are blocking. Implementations should give up after `request.timeout`, wrap the source
/// in a [`TimeoutSource`] when that is not possible.
pub trait ForecastSource {
    /// Retrieve one variable for one run.
    fn fetch(&self, request: &VariableRequest) -> Result<SourceResponse, FetchError>;
}

impl<S: ForecastSource + ?Sized> ForecastSource for &S {
    fn fetch(&self, request: &VariableRequest) -> Result<SourceResponse, FetchError> {
        (**self).fetch(request)
    }
}

impl<S: ForecastSource + ?Sized> ForecastSource for Box<S> {
    fn fetch(&self, request: &VariableRequest) -> Result<SourceResponse, FetchError> {
        (**self).fetch(request)
    }
}

impl<S: ForecastSource + ?Sized> ForecastSource for Arc<S> {
    fn fetch(&self, request: &VariableRequest) -> Result<SourceResponse, FetchError> {
        (**self).fetch(request)
    }
}

/// Enforce the request timeout on a source that does not honor it.
///
/// Each fetch runs on its own thread. When it does not answer in time the thread is left behind
/// to finish on its own and its answer is dropped.
#[derive(Debug)]
pub struct TimeoutSource<S> {
    inner: Arc<S>,
}

impl<S> TimeoutSource<S>
where
    S: ForecastSource + Send + Sync + 'static,
{
    /// Wrap a source.
    pub fn new(inner: S) -> Self {
        TimeoutSource {
            inner: Arc::new(inner),
        }
    }
}

impl<S> Clone for TimeoutSource<S> {
    fn clone(&self) -> Self {
        TimeoutSource {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> ForecastSource for TimeoutSource<S>
where
    S: ForecastSource + Send + Sync + 'static,
{
    fn fetch(&self, request: &VariableRequest) -> Result<SourceResponse, FetchError> {
        let (sender, receiver) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let owned_request = request.clone();

        thread::Builder::new()
            .name(format!("fetch-{}", request.variable))
            .spawn(move || {
                // The receiver is gone if we already timed out.
                let _ = sender.send(inner.fetch(&owned_request));
            })
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        match receiver.recv_timeout(request.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!(
                    variable = %request.variable,
                    run = %request.run,
                    timeout = ?request.timeout,
                    "fetch timed out"
                );
                Err(FetchError::Timeout(request.timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(FetchError::Transport(
                "fetch thread ended without an answer".to_owned(),
            )),
        }
    }
}
