//! Variable renaming decorator.

use std::collections::HashMap;

use stratus_types::{Frequency, Timestamp};

use crate::error::ViewError;
use crate::forward::Forward;
use crate::item::{Item, VariableIndex};
use crate::node::Node;
use crate::statistics::Statistics;
use crate::view::View;

/// Exposes the child's variables as `{prefix}_{name}`; data is untouched.
pub struct RenamePrefix {
    inner: Forward,
    prefix: String,
    variables: Vec<String>,
}

impl RenamePrefix {
    /// Wraps `child` with the given prefix.
    #[must_use]
    pub fn new(child: Box<dyn View>, prefix: impl Into<String>) -> Self {
        let inner = Forward::new(child);
        let prefix = prefix.into();
        let variables = inner
            .child()
            .variables()
            .iter()
            .map(|name| format!("{prefix}_{name}"))
            .collect();
        Self {
            inner,
            prefix,
            variables,
        }
    }

    /// Prefix added to every variable name.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl View for RenamePrefix {
    fn get(&self, index: usize) -> Result<Item, ViewError> {
        self.inner.get(index)
    }

    fn dates(&self) -> &[Timestamp] {
        self.inner.dates()
    }

    fn frequency(&self) -> Frequency {
        self.inner.frequency()
    }

    fn variables(&self) -> &[String] {
        &self.variables
    }

    fn name_to_index(&self) -> &HashMap<String, VariableIndex> {
        self.inner.cached_name_to_index(&self.variables)
    }

    fn statistics(&self) -> Statistics {
        self.inner.cached_statistics()
    }

    fn mutate(self: Box<Self>) -> Box<dyn View> {
        self
    }

    fn tree(&self) -> Node {
        Node::new(self.label(), vec![self.inner.child().tree()])
            .with_label("rename_prefix", &self.prefix)
    }

    fn label(&self) -> &'static str {
        "rename_prefix"
    }
}
