//! Merges sibling views onto one union calendar.

use std::collections::{HashMap, HashSet};

use once_cell::sync::OnceCell;
use stratus_types::{Frequency, Timestamp, make_dates};

use crate::error::ViewError;
use crate::item::{Item, VariableIndex};
use crate::node::Node;
use crate::padded::Padded;
use crate::statistics::Statistics;
use crate::view::{View, check_index, merge_span};

/// N children sharing one frequency, each padded to the union span.
///
/// `get(i)` returns [`Item::Group`] with one entry per child, in order.
pub struct Multiple {
    datasets: Vec<Box<dyn View>>,
    frequency: Frequency,
    dates: Vec<Timestamp>,
    variables: Vec<String>,
    name_to_index: OnceCell<HashMap<String, VariableIndex>>,
}

impl Multiple {
    /// Combines `children`, resolving each with `mutate` first.
    ///
    /// # Errors
    /// - [`ViewError::EmptyMultiple`] without children.
    /// - [`ViewError::FrequencyMismatch`] when frequencies differ.
    /// - [`ViewError::Core`] when a child has an empty calendar.
    /// - [`ViewError::DuplicateVariable`] when two children share a variable.
    pub fn new(children: Vec<Box<dyn View>>) -> Result<Self, ViewError> {
        let children: Vec<Box<dyn View>> = children.into_iter().map(View::mutate).collect();
        let Some(first) = children.first() else {
            return Err(ViewError::EmptyMultiple);
        };
        let frequency = first.frequency();
        for child in &children[1..] {
            if child.frequency() != frequency {
                tracing::warn!(
                    expected = %frequency,
                    found = %child.frequency(),
                    child = child.label(),
                    "cannot combine views of different frequencies"
                );
                return Err(ViewError::FrequencyMismatch {
                    expected: frequency,
                    found: child.frequency(),
                });
            }
        }

        let (start, end) = merge_span(&children)?;
        let datasets: Vec<Box<dyn View>> = children
            .into_iter()
            .map(|child| Box::new(Padded::new(child, start, end)).mutate())
            .collect();
        let dates = make_dates(start, end, frequency);
        let variables = datasets
            .iter()
            .flat_map(|d| d.variables().iter().cloned())
            .collect();

        let multiple = Self {
            datasets,
            frequency,
            dates,
            variables,
            name_to_index: OnceCell::new(),
        };
        multiple.check()?;

        tracing::debug!(
            children = multiple.datasets.len(),
            start = %start,
            end = %end,
            len = multiple.dates.len(),
            "built multiple view"
        );
        Ok(multiple)
    }

    /// Fails on the first variable name exposed by two children.
    ///
    /// # Errors
    /// [`ViewError::DuplicateVariable`].
    pub fn check(&self) -> Result<(), ViewError> {
        let mut seen = HashSet::new();
        for dataset in &self.datasets {
            for name in dataset.variables() {
                if !seen.insert(name.as_str()) {
                    return Err(ViewError::DuplicateVariable(name.clone()));
                }
            }
        }
        Ok(())
    }

    /// The padded children, in order.
    #[must_use]
    pub fn datasets(&self) -> &[Box<dyn View>] {
        &self.datasets
    }
}

impl View for Multiple {
    fn get(&self, index: usize) -> Result<Item, ViewError> {
        check_index(index, self.dates.len())?;
        let items = self
            .datasets
            .iter()
            .map(|d| d.get(index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Item::Group(items))
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
        self.name_to_index.get_or_init(|| {
            let mut dic = HashMap::new();
            for (child, dataset) in self.datasets.iter().enumerate() {
                let local = dataset.name_to_index();
                for name in dataset.variables() {
                    if let Some(VariableIndex::Flat(inner)) = local.get(name) {
                        dic.insert(
                            name.clone(),
                            VariableIndex::Nested {
                                child,
                                inner: *inner,
                            },
                        );
                    }
                }
            }
            dic
        })
    }

    fn statistics(&self) -> Statistics {
        Statistics::Multiple(self.datasets.iter().map(|d| d.statistics()).collect())
    }

    fn mutate(self: Box<Self>) -> Box<dyn View> {
        self
    }

    fn tree(&self) -> Node {
        Node::new(
            self.label(),
            self.datasets.iter().map(|d| d.tree()).collect(),
        )
    }

    fn label(&self) -> &'static str {
        "multiple"
    }
}
