//! Inspection configuration.

use serde::{Deserialize, Serialize};

use hone_selector::SelectorOptions;

/// Configuration for an inspection session. Field names serialize in
/// camelCase, so option bags written for the browser surface load as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InspectorConfig {
    /// Suppress navigation while inspecting
    pub block_redirection: bool,
    /// Create the floating highlight element on start
    pub create_inspector: bool,
    /// Selectors whose matches are never highlighted or picked
    pub excludes: Vec<String>,
    /// Options forwarded to the selector engine
    pub selector: SelectorOptions,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            block_redirection: true,
            create_inspector: true,
            excludes: Vec::new(),
            selector: SelectorOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_round_trip() {
        let config: InspectorConfig = serde_json::from_str(
            r#"{
                "blockRedirection": false,
                "excludes": [".inspector-element"],
                "selector": { "featureCount": 3, "minDepth": 0 }
            }"#,
        )
        .unwrap();

        assert!(!config.block_redirection);
        assert!(config.create_inspector);
        assert_eq!(config.excludes, vec![".inspector-element"]);
        assert_eq!(config.selector.feature_count, 3);
        assert_eq!(config.selector.min_depth, 0);
        assert!(!config.selector.to_root);

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("blockRedirection"));
        assert!(json.contains("featureCount"));
    }
}
