//! The contract every node of a view graph satisfies.

use std::collections::HashMap;

use stratus_types::{Frequency, Timestamp, format_timestamp};

use crate::error::ViewError;
use crate::item::{Item, VariableIndex};
use crate::node::Node;
use crate::statistics::Statistics;

/// A composable, read-only, index-addressable time series of records.
///
/// Reads take `&self`; once built, a view graph can be shared between
/// threads as long as its leaf stores allow concurrent window reads.
pub trait View: Send + Sync {
    /// Item at calendar position `index`.
    ///
    /// # Errors
    /// [`ViewError::IndexOutOfRange`] past the end, or a store failure.
    fn get(&self, index: usize) -> Result<Item, ViewError>;

    /// Calendar this view answers indexed queries against.
    fn dates(&self) -> &[Timestamp];

    /// Spacing of the calendar.
    fn frequency(&self) -> Frequency;

    /// Ordered variable names.
    fn variables(&self) -> &[String];

    /// Variable name to position, computed once on first access.
    fn name_to_index(&self) -> &HashMap<String, VariableIndex>;

    /// Accessor for downstream aggregate computation.
    fn statistics(&self) -> Statistics;

    /// Gives a lazy view the chance to replace itself with its resolved
    /// equivalent. Concrete views return themselves.
    fn mutate(self: Box<Self>) -> Box<dyn View>;

    /// Diagnostic tree of this view and its children.
    fn tree(&self) -> Node;

    /// Short lowercase name of the view kind.
    fn label(&self) -> &'static str;

    /// Number of calendar entries.
    fn len(&self) -> usize {
        self.dates().len()
    }

    /// Returns `true` when the calendar is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First calendar entry.
    fn start_date(&self) -> Option<Timestamp> {
        self.dates().first().copied()
    }

    /// Last calendar entry.
    fn end_date(&self) -> Option<Timestamp> {
        self.dates().last().copied()
    }

    /// Positions of the calendar entries within `[start, end]`; an open
    /// bound defaults to the calendar's own first or last date.
    fn dates_interval_to_indices(
        &self,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Vec<usize> {
        let dates = self.dates();
        let (Some(&first), Some(&last)) = (dates.first(), dates.last()) else {
            return Vec::new();
        };
        let start = start.unwrap_or(first);
        let end = end.unwrap_or(last);
        let lo = dates.partition_point(|d| *d < start);
        let hi = dates.partition_point(|d| *d <= end);
        (lo..hi.max(lo)).collect()
    }

    /// Serializable summary of this view.
    fn metadata(&self) -> ViewMetadata {
        ViewMetadata {
            action: self.label().to_string(),
            frequency: self.frequency(),
            variables: self.variables().to_vec(),
            length: self.len(),
            start_date: self.start_date().map(format_timestamp),
            end_date: self.end_date().map(format_timestamp),
        }
    }
}

/// Summary returned by [`View::metadata`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ViewMetadata {
    /// View kind.
    pub action: String,
    /// Calendar spacing.
    pub frequency: Frequency,
    /// Ordered variable names.
    pub variables: Vec<String>,
    /// Calendar length.
    pub length: usize,
    /// First date, ISO-8601.
    pub start_date: Option<String>,
    /// Last date, ISO-8601.
    pub end_date: Option<String>,
}

/// `name -> Flat(position)` over an ordered variable list.
#[must_use]
pub fn flat_name_to_index(variables: &[String]) -> HashMap<String, VariableIndex> {
    variables
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), VariableIndex::Flat(i)))
        .collect()
}

/// Fails unless `index` addresses an entry of a calendar of `len` entries.
///
/// # Errors
/// [`ViewError::IndexOutOfRange`].
pub fn check_index(index: usize, len: usize) -> Result<(), ViewError> {
    if index >= len {
        return Err(ViewError::IndexOutOfRange { index, len });
    }
    Ok(())
}

/// `(min start, max end)` over the calendars of `views`.
///
/// # Errors
/// [`ViewError::Core`] when `views` is empty or a view has no dates.
pub fn merge_span(views: &[Box<dyn View>]) -> Result<(Timestamp, Timestamp), ViewError> {
    Ok(stratus_types::merge_span(views.iter().map(|v| v.dates()))?)
}
