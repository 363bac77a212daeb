#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ndarray::{Array2, Array3};
use serde_json::Value;

use stratus_types::{Frequency, Timestamp, make_dates, parse_timestamp};
use stratus_views::{
    AttributeReader, Backends, FieldDatasetOpener, Item, Node, Statistics, StoreAttributes,
    StoreLookup, VariableIndex, VariableSummary, View, ViewError, WindowRequest, WindowedStore,
    WindowedStoreOpener,
};

pub fn ts(text: &str) -> Timestamp {
    parse_timestamp(text).unwrap()
}

pub fn hours(h: u32) -> Frequency {
    Frequency::from_hours(h).unwrap()
}

/// In-memory view: item `i` is a `(1, 1, variables)` matrix filled with
/// `base + i`.
#[derive(Clone)]
pub struct Series {
    pub dates: Vec<Timestamp>,
    pub frequency: Frequency,
    pub variables: Vec<String>,
    pub items: Vec<Item>,
    pub name_to_index: HashMap<String, VariableIndex>,
}

impl Series {
    pub fn new(start: &str, end: &str, freq: u32, variables: &[&str], base: f32) -> Self {
        let frequency = hours(freq);
        Self::from_dates(make_dates(ts(start), ts(end), frequency), frequency, variables, base)
    }

    pub fn from_dates(
        dates: Vec<Timestamp>,
        frequency: Frequency,
        variables: &[&str],
        base: f32,
    ) -> Self {
        let items = (0..dates.len())
            .map(|i| {
                let value = base + i as f32;
                Item::Data(Array3::from_elem((1, 1, variables.len()), value))
            })
            .collect();
        let variables: Vec<String> = variables.iter().map(ToString::to_string).collect();
        let name_to_index = variables
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), VariableIndex::Flat(i)))
            .collect();
        Self {
            dates,
            frequency,
            variables,
            items,
            name_to_index,
        }
    }

    pub fn boxed(self) -> Box<dyn View> {
        Box::new(self)
    }
}

impl View for Series {
    fn get(&self, index: usize) -> Result<Item, ViewError> {
        self.items
            .get(index)
            .cloned()
            .ok_or(ViewError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
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
        &self.name_to_index
    }

    fn statistics(&self) -> Statistics {
        Statistics::Summary(VariableSummary {
            variables: self.variables.clone(),
            count: vec![0; self.variables.len()],
            mean: vec![f64::NAN; self.variables.len()],
            stdev: vec![f64::NAN; self.variables.len()],
            minimum: vec![f64::NAN; self.variables.len()],
            maximum: vec![f64::NAN; self.variables.len()],
        })
    }

    fn mutate(self: Box<Self>) -> Box<dyn View> {
        self
    }

    fn tree(&self) -> Node {
        Node::new(self.label(), Vec::new())
    }

    fn label(&self) -> &'static str {
        "series"
    }
}

/// Placeholder that only becomes readable once `mutate` swaps in the series.
pub struct Deferred(pub Series);

impl View for Deferred {
    fn get(&self, _index: usize) -> Result<Item, ViewError> {
        Err(ViewError::store("deferred view read before mutate"))
    }

    fn dates(&self) -> &[Timestamp] {
        &[]
    }

    fn frequency(&self) -> Frequency {
        self.0.frequency
    }

    fn variables(&self) -> &[String] {
        &[]
    }

    fn name_to_index(&self) -> &HashMap<String, VariableIndex> {
        &self.0.name_to_index
    }

    fn statistics(&self) -> Statistics {
        self.0.statistics()
    }

    fn mutate(self: Box<Self>) -> Box<dyn View> {
        Box::new(self.0)
    }

    fn tree(&self) -> Node {
        Node::new(self.label(), Vec::new())
    }

    fn label(&self) -> &'static str {
        "deferred"
    }
}

pub fn value_of(item: &Item) -> f32 {
    item.as_data().and_then(|d| d.iter().next().copied()).unwrap()
}

/// Windows shaped `(columns, samples)`.
pub struct MemoryStore {
    pub windows: Vec<Array2<f32>>,
    pub colnames: Vec<String>,
    pub len_hrs: u32,
    pub step_hrs: u32,
}

impl WindowedStore for MemoryStore {
    fn len(&self) -> usize {
        self.windows.len()
    }

    fn window(&self, index: usize) -> Result<Array2<f32>, ViewError> {
        self.windows
            .get(index)
            .cloned()
            .ok_or_else(|| ViewError::store(format!("no window {index}")))
    }

    fn step_hrs(&self) -> u32 {
        self.step_hrs
    }

    fn len_hrs(&self) -> u32 {
        self.len_hrs
    }

    fn colnames(&self) -> &[String] {
        &self.colnames
    }
}

/// Opens stores by path and records every request.
#[derive(Default)]
pub struct MemoryOpener {
    pub stores: HashMap<PathBuf, Arc<MemoryStore>>,
    pub requests: Mutex<Vec<WindowRequest>>,
}

impl WindowedStoreOpener for MemoryOpener {
    fn open(&self, request: &WindowRequest) -> Result<Arc<dyn WindowedStore>, ViewError> {
        self.requests.lock().unwrap().push(request.clone());
        let store: Arc<dyn WindowedStore> = self
            .stores
            .get(&request.path)
            .cloned()
            .ok_or_else(|| ViewError::store(format!("no store at {}", request.path.display())))?;
        Ok(store)
    }
}

#[derive(Default)]
pub struct MapLookup(pub HashMap<String, PathBuf>);

impl StoreLookup for MapLookup {
    fn resolve(&self, name: &str) -> Result<PathBuf, ViewError> {
        self.0.get(name).cloned().ok_or_else(|| ViewError::StoreNotFound {
            name: name.to_string(),
            path: PathBuf::from(name),
        })
    }
}

#[derive(Default)]
pub struct MapAttributes(pub HashMap<PathBuf, StoreAttributes>);

impl AttributeReader for MapAttributes {
    fn attributes(&self, path: &Path) -> Result<StoreAttributes, ViewError> {
        self.0
            .get(path)
            .cloned()
            .ok_or_else(|| ViewError::store(format!("no attributes for {}", path.display())))
    }
}

/// Field datasets opened by name from prebuilt series.
#[derive(Default)]
pub struct SeriesFields(pub HashMap<String, Series>);

impl FieldDatasetOpener for SeriesFields {
    fn open(&self, config: &Value) -> Result<Box<dyn View>, ViewError> {
        let name = match config {
            Value::String(name) => name.as_str(),
            Value::Object(map) => map.get("dataset").and_then(Value::as_str).unwrap_or(""),
            _ => "",
        };
        self.0
            .get(name)
            .cloned()
            .map(Series::boxed)
            .ok_or_else(|| ViewError::invalid_config(format!("unknown field dataset {config}")))
    }
}

pub struct ObsFixture {
    pub name: &'static str,
    pub start_date: &'static str,
    pub end_date: &'static str,
    pub is_observations: bool,
    pub windows: Vec<Array2<f32>>,
    pub colnames: Vec<&'static str>,
    pub len_hrs: u32,
    pub step_hrs: u32,
}

impl ObsFixture {
    /// `windows` windows of `samples` samples over three columns; sample `s`
    /// of window `w` holds `100 * w + 10 * column + s`.
    pub fn new(name: &'static str, start_date: &'static str, end_date: &'static str) -> Self {
        Self {
            name,
            start_date,
            end_date,
            is_observations: true,
            windows: Vec::new(),
            colnames: vec!["obsvalue_t2m", "obsvalue_rh", "latitude"],
            len_hrs: 6,
            step_hrs: 6,
        }
        .with_windows(4, 2)
    }

    pub fn with_windows(mut self, windows: usize, samples: usize) -> Self {
        let columns = self.colnames.len();
        self.windows = (0..windows)
            .map(|w| {
                Array2::from_shape_fn((columns, samples), |(c, s)| {
                    (100 * w + 10 * c + s) as f32
                })
            })
            .collect();
        self
    }
}

pub struct Harness {
    pub backends: Backends,
    pub opener: Arc<MemoryOpener>,
}

pub fn harness(fixtures: Vec<ObsFixture>, fields: Vec<(&str, Series)>) -> Harness {
    let mut lookup = MapLookup::default();
    let mut attributes = MapAttributes::default();
    let mut opener = MemoryOpener::default();

    for fixture in fixtures {
        let path = PathBuf::from(format!("/stores/{}.zarr", fixture.name));
        lookup.0.insert(fixture.name.to_string(), path.clone());
        attributes.0.insert(
            path.clone(),
            StoreAttributes {
                is_observations: fixture.is_observations,
                start_date: Some(fixture.start_date.to_string()),
                end_date: Some(fixture.end_date.to_string()),
                extra: serde_json::Map::new(),
            },
        );
        opener.stores.insert(
            path,
            Arc::new(MemoryStore {
                windows: fixture.windows,
                colnames: fixture.colnames.iter().map(ToString::to_string).collect(),
                len_hrs: fixture.len_hrs,
                step_hrs: fixture.step_hrs,
            }),
        );
    }

    let fields = SeriesFields(
        fields
            .into_iter()
            .map(|(name, series)| (name.to_string(), series))
            .collect(),
    );
    let opener = Arc::new(opener);
    Harness {
        backends: Backends {
            lookup: Arc::new(lookup),
            attributes: Arc::new(attributes),
            windows: opener.clone(),
            fields: Arc::new(fields),
        },
        opener,
    }
}
