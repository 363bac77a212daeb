//! Collaborators the view layer reads through: store lookup, store
//! attributes, windowed observation stores and the field-dataset opener.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::Array2;
use serde::Deserialize;
use serde_json::{Map, Value};
use zarrs::array::Array;
use zarrs::filesystem::FilesystemStore;
use zarrs::group::Group;

use crate::error::ViewError;
use crate::view::View;

/// Environment variable overriding the root directory of [`DirectoryLookup`].
pub const DATASETS_ROOT_ENV: &str = "STRATUS_DATASETS_ROOT";

const STORE_SUFFIX: &str = ".zarr";

/// Returns `true` when `name` already looks like a physical store path.
#[must_use]
pub fn is_store_path(name: &str) -> bool {
    name.ends_with(STORE_SUFFIX)
}

/// Maps dataset names to physical store locations.
pub trait StoreLookup: Send + Sync {
    /// Resolves `name`. Implementations must reject names that are already
    /// store paths.
    ///
    /// # Errors
    /// [`ViewError::ResolvedPath`] for store paths, or any lookup failure.
    fn resolve(&self, name: &str) -> Result<PathBuf, ViewError>;
}

/// Store-level attributes of a physical store.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct StoreAttributes {
    /// Set on observation stores. Anything but a JSON `true` reads as unset.
    #[serde(default, deserialize_with = "flag_is_true")]
    pub is_observations: bool,
    /// ISO-8601 date of the first sample.
    #[serde(default)]
    pub start_date: Option<String>,
    /// ISO-8601 date of the last sample.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Every other attribute, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn flag_is_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

/// Reads [`StoreAttributes`] of a resolved store.
pub trait AttributeReader: Send + Sync {
    /// Returns the attributes stored at `path`.
    ///
    /// # Errors
    /// Any failure to read or decode the attributes.
    fn attributes(&self, path: &Path) -> Result<StoreAttributes, ViewError>;
}

/// Parameters used to open a [`WindowedStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRequest {
    /// Physical store location.
    pub path: PathBuf,
    /// `YYYYMMDDHHMMSS` start of the first window.
    pub first_window_begin: i64,
    /// `YYYYMMDDHHMMSS` end of the last window.
    pub last_window_end: i64,
    /// Time span of one window, in hours.
    pub len_hrs: u32,
    /// Shift between two consecutive windows, in hours.
    pub step_hrs: u32,
    /// Whether the store should normalise samples.
    pub normalize: bool,
}

/// Observation store addressed by fixed-length time windows.
///
/// Implementations must allow concurrent `window` calls.
pub trait WindowedStore: Send + Sync {
    /// Number of windows.
    fn len(&self) -> usize;

    /// Returns `true` when the store has no windows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Samples of window `index`, shaped `(columns, samples)`.
    ///
    /// # Errors
    /// Any failure while reading the window.
    fn window(&self, index: usize) -> Result<Array2<f32>, ViewError>;

    /// Shift between windows, in hours.
    fn step_hrs(&self) -> u32;

    /// Length of one window, in hours.
    fn len_hrs(&self) -> u32;

    /// Column names, in matrix order.
    fn colnames(&self) -> &[String];
}

/// Opens windowed observation stores.
pub trait WindowedStoreOpener: Send + Sync {
    /// Opens the store described by `request`.
    ///
    /// # Errors
    /// Any failure while opening the store.
    fn open(&self, request: &WindowRequest) -> Result<Arc<dyn WindowedStore>, ViewError>;
}

/// Opens gridded field datasets; the factory falls back to it for any
/// configuration that is not observation-specific.
pub trait FieldDatasetOpener: Send + Sync {
    /// Opens the dataset described by `config`.
    ///
    /// # Errors
    /// Any failure while opening the dataset.
    fn open(&self, config: &Value) -> Result<Box<dyn View>, ViewError>;
}

/// Every collaborator the factory and the leaf adapters need.
#[derive(Clone)]
pub struct Backends {
    /// Dataset name resolution.
    pub lookup: Arc<dyn StoreLookup>,
    /// Store attribute access.
    pub attributes: Arc<dyn AttributeReader>,
    /// Windowed observation stores.
    pub windows: Arc<dyn WindowedStoreOpener>,
    /// Field dataset fallback.
    pub fields: Arc<dyn FieldDatasetOpener>,
}

impl Backends {
    /// Filesystem lookup and zarr attributes, no field datasets.
    #[must_use]
    pub fn local(windows: Arc<dyn WindowedStoreOpener>) -> Self {
        Self {
            lookup: Arc::new(DirectoryLookup::from_env()),
            attributes: Arc::new(ZarrAttributeReader),
            windows,
            fields: Arc::new(NoFieldDatasets),
        }
    }

    /// Replaces the field dataset opener.
    #[must_use]
    pub fn with_fields(mut self, fields: Arc<dyn FieldDatasetOpener>) -> Self {
        self.fields = fields;
        self
    }
}

/// Resolves `name` to `<root>/<name>.zarr` under a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLookup {
    root: PathBuf,
}

impl DirectoryLookup {
    /// Lookup under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Lookup under `$STRATUS_DATASETS_ROOT`, or `datasets` when unset.
    #[must_use]
    pub fn from_env() -> Self {
        let root = std::env::var(DATASETS_ROOT_ENV).unwrap_or_else(|_| "datasets".to_string());
        Self::new(root)
    }

    /// Root directory searched by this lookup.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl StoreLookup for DirectoryLookup {
    fn resolve(&self, name: &str) -> Result<PathBuf, ViewError> {
        if is_store_path(name) || name.contains(['/', '\\']) {
            return Err(ViewError::ResolvedPath(name.to_string()));
        }
        let path = self.root.join(format!("{name}{STORE_SUFFIX}"));
        if !path.is_dir() {
            return Err(ViewError::StoreNotFound {
                name: name.to_string(),
                path,
            });
        }
        Ok(path)
    }
}

/// Reads the attributes of the `data` node of a zarr store, v2 or v3.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZarrAttributeReader;

const DATA_NODE: &str = "/data";

impl AttributeReader for ZarrAttributeReader {
    fn attributes(&self, path: &Path) -> Result<StoreAttributes, ViewError> {
        let storage = Arc::new(
            FilesystemStore::new(path)
                .map_err(|e| ViewError::store(format!("{}: {e}", path.display())))?,
        );
        let attributes = match Group::open(Arc::clone(&storage), DATA_NODE) {
            Ok(group) => group.attributes().clone(),
            Err(group_err) => match Array::open(storage, DATA_NODE) {
                Ok(array) => array.attributes().clone(),
                Err(array_err) => {
                    return Err(ViewError::store(format!(
                        "{}{DATA_NODE}: not a zarr group ({group_err}) or array ({array_err})",
                        path.display()
                    )));
                }
            },
        };
        Ok(serde_json::from_value(Value::Object(attributes))?)
    }
}

/// Field dataset opener for deployments without gridded fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFieldDatasets;

impl FieldDatasetOpener for NoFieldDatasets {
    fn open(&self, config: &Value) -> Result<Box<dyn View>, ViewError> {
        Err(ViewError::invalid_config(format!(
            "no field dataset opener configured for {config}"
        )))
    }
}
