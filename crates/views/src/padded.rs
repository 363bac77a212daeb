//! Re-expresses a view over a wider date range.

use std::collections::HashMap;

use stratus_types::{Frequency, Timestamp, format_timestamp, make_dates};

use crate::error::ViewError;
use crate::forward::Forward;
use crate::item::{Item, VariableIndex};
use crate::node::Node;
use crate::statistics::Statistics;
use crate::view::{View, check_index};

/// Child view over the calendar `make_dates(start, end, child frequency)`.
///
/// Entries whose date the child has no item for read as [`Item::Missing`].
pub struct Padded {
    inner: Forward,
    start: Timestamp,
    end: Timestamp,
    dates: Vec<Timestamp>,
    // Padded position -> child position, resolved once.
    positions: Vec<Option<usize>>,
}

impl Padded {
    /// Wraps `child` over `[start, end]`.
    #[must_use]
    pub fn new(child: Box<dyn View>, start: Timestamp, end: Timestamp) -> Self {
        let inner = Forward::new(child);
        let frequency = inner.frequency();
        let dates = make_dates(start, end, frequency);

        let child_positions: HashMap<Timestamp, usize> = inner
            .dates()
            .iter()
            .enumerate()
            .map(|(j, date)| (*date, j))
            .collect();
        let positions: Vec<Option<usize>> = dates
            .iter()
            .map(|date| child_positions.get(date).copied())
            .collect();

        let matched = positions.iter().flatten().count();
        if matched < inner.len() {
            tracing::warn!(
                child = inner.child().label(),
                unmatched = inner.len() - matched,
                "padding drops child dates outside or off the target calendar"
            );
        }
        tracing::debug!(
            start = %start,
            end = %end,
            %frequency,
            len = dates.len(),
            matched,
            "built padded view"
        );

        Self {
            inner,
            start,
            end,
            dates,
            positions,
        }
    }

    /// Requested start of the padded range.
    #[must_use]
    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// Requested end of the padded range.
    #[must_use]
    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Child position backing padded position `index`, if any.
    #[must_use]
    pub fn child_position(&self, index: usize) -> Option<usize> {
        self.positions.get(index).copied().flatten()
    }
}

impl View for Padded {
    fn get(&self, index: usize) -> Result<Item, ViewError> {
        check_index(index, self.dates.len())?;
        match self.positions[index] {
            Some(position) => self.inner.get(position),
            None => Ok(Item::Missing),
        }
    }

    fn dates(&self) -> &[Timestamp] {
        &self.dates
    }

    fn frequency(&self) -> Frequency {
        self.inner.frequency()
    }

    fn variables(&self) -> &[String] {
        self.inner.variables()
    }

    fn name_to_index(&self) -> &HashMap<String, VariableIndex> {
        self.inner.cached_name_to_index(self.inner.variables())
    }

    fn statistics(&self) -> Statistics {
        self.inner.cached_statistics()
    }

    fn mutate(self: Box<Self>) -> Box<dyn View> {
        self
    }

    fn tree(&self) -> Node {
        Node::new(self.label(), vec![self.inner.child().tree()])
            .with_label("frequency", self.frequency())
            .with_label("start", format_timestamp(self.start))
            .with_label("end", format_timestamp(self.end))
    }

    fn label(&self) -> &'static str {
        "padded"
    }
}
