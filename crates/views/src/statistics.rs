//! Statistics accessors exposed by views.

use std::fmt;
use std::sync::Arc;

use crate::error::ViewError;
use crate::store::WindowedStore;

/// What `View::statistics` hands to downstream aggregate computations.
#[derive(Debug, Clone)]
pub enum Statistics {
    /// Adapter over a windowed observation store.
    Store(StoreStatistics),
    /// One entry per child of a combinator.
    Multiple(Vec<Statistics>),
    /// Precomputed per-variable summary, e.g. from a field dataset.
    Summary(VariableSummary),
}

/// Per-variable aggregates, all vectors in variable order.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct VariableSummary {
    /// Variable names.
    pub variables: Vec<String>,
    /// Finite samples seen per variable.
    pub count: Vec<u64>,
    /// Mean (NaN when no sample).
    pub mean: Vec<f64>,
    /// Population standard deviation (NaN when no sample).
    pub stdev: Vec<f64>,
    /// Minimum (NaN when no sample).
    pub minimum: Vec<f64>,
    /// Maximum (NaN when no sample).
    pub maximum: Vec<f64>,
}

/// Wraps a windowed store for aggregate computation.
#[derive(Clone)]
pub struct StoreStatistics {
    store: Arc<dyn WindowedStore>,
}

impl fmt::Debug for StoreStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreStatistics")
            .field("windows", &self.store.len())
            .field("colnames", &self.store.colnames())
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
struct Welford {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl Welford {
    fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(self) -> (f64, f64, f64, f64) {
        if self.count == 0 {
            return (f64::NAN, f64::NAN, f64::NAN, f64::NAN);
        }
        let variance = self.m2 / self.count as f64;
        (self.mean, variance.sqrt(), self.min, self.max)
    }
}

impl StoreStatistics {
    /// Creates the adapter.
    #[must_use]
    pub fn new(store: Arc<dyn WindowedStore>) -> Self {
        Self { store }
    }

    /// Wrapped store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn WindowedStore> {
        &self.store
    }

    /// Raw column names of the store.
    #[must_use]
    pub fn colnames(&self) -> &[String] {
        self.store.colnames()
    }

    /// Streams every window once and aggregates each column, skipping NaN.
    ///
    /// # Errors
    /// Window read failures, or a window whose column count disagrees with
    /// the store's column names.
    pub fn summarise(&self) -> Result<VariableSummary, ViewError> {
        let colnames = self.store.colnames();
        let mut acc = vec![Welford::new(); colnames.len()];

        for index in 0..self.store.len() {
            let window = self.store.window(index)?;
            if window.nrows() != colnames.len() {
                return Err(ViewError::store(format!(
                    "window {index} has {} columns, expected {}",
                    window.nrows(),
                    colnames.len()
                )));
            }
            for (column, values) in acc.iter_mut().zip(window.outer_iter()) {
                for &value in values.iter().filter(|v| !v.is_nan()) {
                    column.push(f64::from(value));
                }
            }
        }

        let mut summary = VariableSummary {
            variables: colnames.to_vec(),
            count: Vec::with_capacity(acc.len()),
            mean: Vec::with_capacity(acc.len()),
            stdev: Vec::with_capacity(acc.len()),
            minimum: Vec::with_capacity(acc.len()),
            maximum: Vec::with_capacity(acc.len()),
        };
        for column in acc {
            let (mean, stdev, min, max) = column.finish();
            summary.count.push(column.count);
            summary.mean.push(mean);
            summary.stdev.push(stdev);
            summary.minimum.push(min);
            summary.maximum.push(max);
        }

        tracing::debug!(
            columns = summary.variables.len(),
            windows = self.store.len(),
            "summarised observation store"
        );
        Ok(summary)
    }
}
