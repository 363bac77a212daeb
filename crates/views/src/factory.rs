//! Builds view graphs from configuration.
//!
//! Building is two-phase: [`ViewConfig::parse`] turns the mapping into a typed
//! tree and rejects malformed input, then [`build`] creates views bottom-up,
//! resolving every node with `mutate` before handing it to its parent.

use serde_json::Value;

use crate::config::ViewConfig;
use crate::error::ViewError;
use crate::multiple::Multiple;
use crate::observations::Observations;
use crate::padded::Padded;
use crate::rename::RenamePrefix;
use crate::store::Backends;
use crate::view::View;

/// Creates the views described by `config`.
///
/// # Errors
/// Any construction error of the nodes, or of the field dataset opener.
pub fn build(config: &ViewConfig, backends: &Backends) -> Result<Box<dyn View>, ViewError> {
    let view: Box<dyn View> = match config {
        ViewConfig::Pad { child, start, end } => {
            Box::new(Padded::new(build(child, backends)?, *start, *end))
        }
        ViewConfig::Multiple(children) => {
            let children = children
                .iter()
                .map(|child| build(child, backends))
                .collect::<Result<Vec<_>, _>>()?;
            Box::new(Multiple::new(children)?)
        }
        ViewConfig::RenamePrefix { prefix, child } => {
            Box::new(RenamePrefix::new(build(child, backends)?, prefix.clone()))
        }
        ViewConfig::Observations(leaf) => Box::new(Observations::new(
            &leaf.dataset,
            leaf.frequency,
            leaf.time_span.clone(),
            backends,
        )?),
        ViewConfig::Fields(value) => backends.fields.open(value)?,
    };
    Ok(view.mutate())
}

/// Parses and builds `config` in one go.
///
/// # Errors
/// See [`ViewConfig::parse`] and [`build`].
pub fn open_observations(config: &Value, backends: &Backends) -> Result<Box<dyn View>, ViewError> {
    let parsed = ViewConfig::parse(config)?;
    build(&parsed, backends)
}

/// Entry point for `{"observations": {...}}` configurations.
///
/// # Errors
/// [`ViewError::InvalidConfig`] unless `config` is a mapping with exactly the
/// `observations` key holding a mapping; otherwise as [`open_observations`].
pub fn observations_factory(
    config: &Value,
    backends: &Backends,
) -> Result<Box<dyn View>, ViewError> {
    let inner = match config {
        Value::Object(map) if map.len() == 1 => map.get("observations"),
        _ => None,
    };
    match inner {
        Some(inner @ Value::Object(_)) => open_observations(inner, backends),
        _ => Err(ViewError::invalid_config(format!(
            "expected {{\"observations\": {{...}}}}, got {config}"
        ))),
    }
}
