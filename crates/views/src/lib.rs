//! Stratus Views
//!
//! Composable, lazily-resolved time-indexed views over observation and field
//! archives: forwarding, renaming, padding and merging decorators, a leaf
//! adapter onto windowed observation stores, and the factory that builds a
//! view graph from configuration.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(missing_docs)]

/// Typed view-graph configuration.
pub mod config;
/// View-layer error types.
pub mod error;
/// Two-phase view-graph construction.
pub mod factory;
/// Identity decorator.
pub mod forward;
/// Items returned by indexed access.
pub mod item;
/// Union-calendar combinator.
pub mod multiple;
/// Diagnostic tree nodes.
pub mod node;
/// Windowed observation store adapter.
pub mod observations;
/// Date-range padding decorator.
pub mod padded;
/// Variable renaming decorator.
pub mod rename;
/// Statistics accessors.
pub mod statistics;
/// External collaborators.
pub mod store;
/// The view contract.
pub mod view;

/// Re-export: parsed configuration node.
pub use config::{ObservationsConfig, ViewConfig};
/// Re-export: view-layer error types.
pub use error::{ErrorKind, ViewError};
/// Re-export: graph construction entry points.
pub use factory::{build, observations_factory, open_observations};
/// Re-export: identity decorator.
pub use forward::Forward;
/// Re-export: item payloads.
pub use item::{Item, VariableIndex};
/// Re-export: union-calendar combinator.
pub use multiple::Multiple;
/// Re-export: diagnostic tree node.
pub use node::Node;
/// Re-export: observation store adapter.
pub use observations::Observations;
/// Re-export: padding decorator.
pub use padded::Padded;
/// Re-export: renaming decorator.
pub use rename::RenamePrefix;
/// Re-export: statistics accessors.
pub use statistics::{Statistics, StoreStatistics, VariableSummary};
/// Re-export: collaborators.
pub use store::{
    AttributeReader, Backends, DirectoryLookup, FieldDatasetOpener, NoFieldDatasets,
    StoreAttributes, StoreLookup, WindowRequest, WindowedStore, WindowedStoreOpener,
    ZarrAttributeReader,
};
/// Re-export: view contract and helpers.
pub use view::{View, ViewMetadata, merge_span};
