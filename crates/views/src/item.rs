//! Payloads returned by indexed access.

use ndarray::Array3;

/// What a view returns for one calendar entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// Records laid out as `(rows, 1, columns)`.
    Data(Array3<f32>),
    /// No data exists for this calendar entry.
    Missing,
    /// One item per child of a combinator, in child order.
    Group(Vec<Item>),
}

impl Item {
    /// Returns `true` for [`Item::Missing`].
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Item::Missing)
    }

    /// Returns the record matrix, if this item carries one.
    #[must_use]
    pub fn as_data(&self) -> Option<&Array3<f32>> {
        match self {
            Item::Data(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the child items of a group.
    #[must_use]
    pub fn as_group(&self) -> Option<&[Item]> {
        match self {
            Item::Group(items) => Some(items),
            _ => None,
        }
    }
}

/// Position of a variable inside a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableIndex {
    /// Column of a single-source view.
    Flat(usize),
    /// Column `inner` of child `child` of a combinator.
    Nested {
        /// Child position.
        child: usize,
        /// Column inside the child.
        inner: usize,
    },
}
