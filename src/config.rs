use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fs;

/// Engine-wide defaults applied while resolving a specification.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Breakpoint that receives the full grid width for `span` shorthand columns.
    pub narrow_breakpoint: String,
    /// Breakpoint that receives the declared span.
    pub wide_breakpoint: String,
    pub grid_columns: u8,
    pub row_gutter: Value,
    pub group_gap: Value,
    pub list_gap: Value,
    /// Derive a placeholder from the label when none is declared.
    pub auto_placeholder: bool,
    pub enter_verb: String,
    pub select_verb: String,
    /// Adds `allowClear` to clearable controls.
    pub allow_clear: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            narrow_breakpoint: "xs".to_string(),
            wide_breakpoint: "md".to_string(),
            grid_columns: 24,
            row_gutter: json!([16, 0]),
            group_gap: json!(8),
            list_gap: json!(16),
            auto_placeholder: true,
            enter_verb: "Please enter".to_string(),
            select_verb: "Please select".to_string(),
            allow_clear: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Loads a config from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_configs_keep_defaults() {
        let config = EngineConfig::from_json(r#"{"wideBreakpoint": "lg", "autoPlaceholder": false}"#).unwrap();
        assert_eq!(config.wide_breakpoint, "lg");
        assert!(!config.auto_placeholder);
        assert_eq!(config.narrow_breakpoint, "xs");
        assert_eq!(config.grid_columns, 24);
    }

    #[test]
    fn malformed_configs_are_rejected() {
        assert!(matches!(EngineConfig::from_json("{\"gridColumns\": \"wide\"}"), Err(ConfigError::Parse(_))));
    }
}
