//! Diagnostic tree of a view graph.

use std::fmt;

/// One node of the diagnostic tree returned by `View::tree`.
///
/// Only used for introspection and debugging output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Kind of view, e.g. `padded`.
    pub kind: String,
    /// Trees of the child views.
    pub children: Vec<Node>,
    /// `key=value` labels, in insertion order.
    pub labels: Vec<(String, String)>,
}

impl Node {
    /// Creates a node for a view of `kind` with child trees.
    #[must_use]
    pub fn new(kind: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            kind: kind.into(),
            children,
            labels: Vec::new(),
        }
    }

    /// Adds a label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.labels.push((key.into(), value.to_string()));
        self
    }

    /// Looks up a label value.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.kind, indent = depth * 2)?;
        if !self.labels.is_empty() {
            let labels: Vec<String> = self.labels.iter().map(|(k, v)| format!("{k}={v}")).collect();
            write!(f, " ({})", labels.join(", "))?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
