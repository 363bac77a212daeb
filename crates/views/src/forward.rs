//! Identity decorator, the base the other decorators build on.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::OnceCell;
use stratus_types::{Frequency, Timestamp};

use crate::error::ViewError;
use crate::item::{Item, VariableIndex};
use crate::node::Node;
use crate::statistics::Statistics;
use crate::view::{View, flat_name_to_index};

/// Wraps exactly one child and forwards every query to it.
pub struct Forward {
    forward: Box<dyn View>,
    name_to_index: OnceCell<HashMap<String, VariableIndex>>,
    statistics: OnceCell<Statistics>,
}

impl Forward {
    /// Wraps `child`, resolving it first.
    #[must_use]
    pub fn new(child: Box<dyn View>) -> Self {
        Self {
            forward: child.mutate(),
            name_to_index: OnceCell::new(),
            statistics: OnceCell::new(),
        }
    }

    /// The wrapped view.
    #[must_use]
    pub fn child(&self) -> &dyn View {
        self.forward.as_ref()
    }

    /// Flat index over `variables`, cached on first call.
    ///
    /// Decorators pass their own variable list, which must not change
    /// between calls.
    pub(crate) fn cached_name_to_index(
        &self,
        variables: &[String],
    ) -> &HashMap<String, VariableIndex> {
        self.name_to_index
            .get_or_init(|| flat_name_to_index(variables))
    }

    /// The child's statistics, cached on first call.
    pub(crate) fn cached_statistics(&self) -> Statistics {
        self.statistics
            .get_or_init(|| self.forward.statistics())
            .clone()
    }
}

impl View for Forward {
    fn get(&self, index: usize) -> Result<Item, ViewError> {
        self.forward.get(index)
    }

    fn dates(&self) -> &[Timestamp] {
        self.forward.dates()
    }

    fn frequency(&self) -> Frequency {
        self.forward.frequency()
    }

    fn variables(&self) -> &[String] {
        self.forward.variables()
    }

    fn name_to_index(&self) -> &HashMap<String, VariableIndex> {
        self.cached_name_to_index(self.forward.variables())
    }

    fn statistics(&self) -> Statistics {
        self.cached_statistics()
    }

    fn mutate(self: Box<Self>) -> Box<dyn View> {
        self
    }

    fn tree(&self) -> Node {
        Node::new(self.label(), vec![self.forward.tree()])
    }

    fn label(&self) -> &'static str {
        "forward"
    }
}

impl fmt::Debug for Forward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Forward({})", self.forward.label())
    }
}
