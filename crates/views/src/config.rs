//! Typed view-graph configuration, parsed from a JSON mapping.

use serde_json::{Map, Value};
use stratus_types::{Frequency, Timestamp, parse_timestamp};

use crate::error::ViewError;

/// One node of a parsed view-graph configuration.
///
/// Built by [`ViewConfig::parse`]; turned into views by
/// [`crate::factory::build`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewConfig {
    /// `{"pad": <child>, "start": .., "end": ..}`
    Pad {
        /// Padded view.
        child: Box<ViewConfig>,
        /// Start of the target range.
        start: Timestamp,
        /// End of the target range.
        end: Timestamp,
    },
    /// `{"multiple": [<child>, ...]}`
    Multiple(Vec<ViewConfig>),
    /// `{"rename_prefix": "p", ...child keys}`
    RenamePrefix {
        /// Prefix for every variable.
        prefix: String,
        /// View built from the remaining keys.
        child: Box<ViewConfig>,
    },
    /// `{"is_observations": true, "dataset": .., "frequency": ..}`
    Observations(ObservationsConfig),
    /// Anything else, handed to the field dataset opener untouched.
    Fields(Value),
}

/// Keys of an observations leaf.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObservationsConfig {
    /// Dataset name, resolved through the store lookup.
    pub dataset: String,
    /// Calendar spacing.
    pub frequency: Frequency,
    /// Accepted and kept, not interpreted.
    #[serde(default)]
    pub time_span: Option<Value>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct PadRange {
    start: String,
    end: String,
}

impl ViewConfig {
    /// Parses a configuration value.
    ///
    /// Mapping keys are tried in order `pad`, `multiple`, `rename_prefix`,
    /// `is_observations`; the first present one decides the node type. A
    /// mapping with none of them, or a bare string, is a field dataset.
    ///
    /// # Errors
    /// [`ViewError::InvalidConfig`] for wrong shapes or unknown keys, and
    /// [`ViewError::Core`] for unparseable dates or frequencies.
    pub fn parse(value: &Value) -> Result<Self, ViewError> {
        match value {
            Value::String(_) => Ok(ViewConfig::Fields(value.clone())),
            Value::Object(map) => Self::parse_mapping(map.clone()),
            other => Err(ViewError::invalid_config(format!(
                "expected a mapping or a dataset name, got {other}"
            ))),
        }
    }

    fn parse_mapping(mut map: Map<String, Value>) -> Result<Self, ViewError> {
        if let Some(pad) = map.remove("pad") {
            let child = Self::parse(&pad)?;
            let range: PadRange = serde_json::from_value(Value::Object(map))
                .map_err(|e| ViewError::invalid_config(format!("pad: {e}")))?;
            return Ok(ViewConfig::Pad {
                child: Box::new(child),
                start: parse_timestamp(&range.start)?,
                end: parse_timestamp(&range.end)?,
            });
        }

        if let Some(multiple) = map.remove("multiple") {
            if !map.is_empty() {
                return Err(ViewError::invalid_config(format!(
                    "multiple: unexpected keys {}",
                    key_list(&map)
                )));
            }
            let Value::Array(children) = multiple else {
                return Err(ViewError::invalid_config(
                    "multiple: expected a list of views",
                ));
            };
            let children = children
                .iter()
                .map(Self::parse)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(ViewConfig::Multiple(children));
        }

        if let Some(prefix) = map.remove("rename_prefix") {
            let Value::String(prefix) = prefix else {
                return Err(ViewError::invalid_config(
                    "rename_prefix: expected a string",
                ));
            };
            let child = Self::parse_mapping(map)?;
            return Ok(ViewConfig::RenamePrefix {
                prefix,
                child: Box::new(child),
            });
        }

        if map.remove("is_observations").is_some() {
            let config: ObservationsConfig = serde_json::from_value(Value::Object(map))
                .map_err(|e| ViewError::invalid_config(format!("observations: {e}")))?;
            return Ok(ViewConfig::Observations(config));
        }

        Ok(ViewConfig::Fields(Value::Object(map)))
    }
}

fn key_list(map: &Map<String, Value>) -> String {
    map.keys().cloned().collect::<Vec<_>>().join(", ")
}
