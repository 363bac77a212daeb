//! Leaf adapter onto windowed observation stores.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::Axis;
use once_cell::sync::OnceCell;
use serde_json::Value;
use stratus_types::{
    Frequency, Timestamp, advance, format_timestamp, make_dates, parse_timestamp, round_datetime,
    window_code,
};

use crate::error::ViewError;
use crate::item::{Item, VariableIndex};
use crate::node::Node;
use crate::statistics::{Statistics, StoreStatistics};
use crate::store::{Backends, StoreAttributes, WindowRequest, WindowedStore, is_store_path};
use crate::view::{View, check_index, flat_name_to_index};

const OBSVALUE_PREFIX: &str = "obsvalue_";

/// View over an observation store, one window per calendar entry.
///
/// Entry `i` holds the samples of the window ending at `dates()[i]`.
pub struct Observations {
    path: PathBuf,
    frequency: Frequency,
    time_span: Option<Value>,
    dates: Vec<Timestamp>,
    variables: Vec<String>,
    forward: Arc<dyn WindowedStore>,
    name_to_index: OnceCell<HashMap<String, VariableIndex>>,
}

impl Observations {
    /// Resolves `dataset` and opens its windowed store.
    ///
    /// `time_span` is kept as given and not interpreted.
    ///
    /// # Errors
    /// - [`ViewError::ResolvedPath`] when `dataset` already names a store.
    /// - [`ViewError::NotObservations`] when the store lacks the flag.
    /// - [`ViewError::WindowShapeMismatch`] / [`ViewError::WindowCountMismatch`]
    ///   when the store disagrees with the derived calendar.
    /// - Any lookup, attribute or store failure.
    pub fn new(
        dataset: &str,
        frequency: Frequency,
        time_span: Option<Value>,
        backends: &Backends,
    ) -> Result<Self, ViewError> {
        if is_store_path(dataset) {
            return Err(ViewError::ResolvedPath(dataset.to_string()));
        }
        let path = backends.lookup.resolve(dataset)?;
        let attributes = backends.attributes.attributes(&path)?;
        if !attributes.is_observations {
            return Err(ViewError::NotObservations(path));
        }

        let (start, end) = stored_span(&attributes, &path)?;
        let start = round_datetime(start, frequency, true)?;
        let end = round_datetime(end, frequency, true)?;
        let dates = make_dates(advance(start, frequency)?, end, frequency);

        let request = WindowRequest {
            path: path.clone(),
            first_window_begin: window_code(start),
            last_window_end: window_code(end),
            len_hrs: frequency.hours(),
            step_hrs: frequency.hours(),
            normalize: false,
        };
        let forward = backends.windows.open(&request)?;

        if forward.step_hrs() != frequency.hours() || forward.len_hrs() != frequency.hours() {
            tracing::warn!(
                path = %path.display(),
                %frequency,
                len_hrs = forward.len_hrs(),
                step_hrs = forward.step_hrs(),
                "store windows do not match the frequency"
            );
            return Err(ViewError::WindowShapeMismatch {
                frequency,
                len_hrs: forward.len_hrs(),
                step_hrs: forward.step_hrs(),
            });
        }
        if forward.len() != dates.len() {
            tracing::warn!(
                path = %path.display(),
                windows = forward.len(),
                dates = dates.len(),
                "store window count does not match the calendar"
            );
            return Err(ViewError::WindowCountMismatch {
                windows: forward.len(),
                dates: dates.len(),
                frequency,
                first: dates
                    .first()
                    .map_or_else(|| "-".to_string(), |d| format_timestamp(*d)),
                last: dates
                    .last()
                    .map_or_else(|| "-".to_string(), |d| format_timestamp(*d)),
            });
        }

        let variables = forward
            .colnames()
            .iter()
            .map(|name| {
                name.strip_prefix(OBSVALUE_PREFIX)
                    .unwrap_or(name)
                    .to_string()
            })
            .collect();

        tracing::debug!(
            path = %path.display(),
            %frequency,
            windows = dates.len(),
            first_window_begin = request.first_window_begin,
            last_window_end = request.last_window_end,
            "opened observations"
        );

        Ok(Self {
            path,
            frequency,
            time_span,
            dates,
            variables,
            forward,
            name_to_index: OnceCell::new(),
        })
    }

    /// Resolved store location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Time-span hint given at construction.
    #[must_use]
    pub fn time_span(&self) -> Option<&Value> {
        self.time_span.as_ref()
    }
}

fn stored_span(
    attributes: &StoreAttributes,
    path: &Path,
) -> Result<(Timestamp, Timestamp), ViewError> {
    let missing = |key: &str| {
        ViewError::store(format!(
            "{} has no {key} attribute",
            path.display()
        ))
    };
    let start = attributes
        .start_date
        .as_deref()
        .ok_or_else(|| missing("start_date"))?;
    let end = attributes
        .end_date
        .as_deref()
        .ok_or_else(|| missing("end_date"))?;
    Ok((parse_timestamp(start)?, parse_timestamp(end)?))
}

impl View for Observations {
    fn get(&self, index: usize) -> Result<Item, ViewError> {
        check_index(index, self.dates.len())?;
        let window = self.forward.window(index)?;
        // (columns, samples) -> (samples, 1, columns)
        let data = window
            .reversed_axes()
            .insert_axis(Axis(1))
            .as_standard_layout()
            .into_owned();
        if data.shape()[0] == 0 {
            return Ok(Item::Missing);
        }
        Ok(Item::Data(data))
    }

    fn dates(&self) -> &[Timestamp] {
        &self.dates
    }

    fn frequency(&self) -> Frequency {
        self.frequency
    }

    fn variables(&self) -> &[String] {
        &self.variables
    }

    fn name_to_index(&self) -> &HashMap<String, VariableIndex> {
        self.name_to_index
            .get_or_init(|| flat_name_to_index(&self.variables))
    }

    fn statistics(&self) -> Statistics {
        Statistics::Store(StoreStatistics::new(Arc::clone(&self.forward)))
    }

    fn mutate(self: Box<Self>) -> Box<dyn View> {
        self
    }

    fn tree(&self) -> Node {
        Node::new(self.label(), Vec::new())
            .with_label("path", self.path.display())
            .with_label("frequency", self.frequency)
    }

    fn label(&self) -> &'static str {
        "observations"
    }
}

impl fmt::Display for Observations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let first = self.dates.first().map(|d| format_timestamp(*d)).unwrap_or_default();
        let last = self.dates.last().map(|d| format_timestamp(*d)).unwrap_or_default();
        write!(f, "Observations({name}, {first};{last}, {})", self.len())
    }
}
