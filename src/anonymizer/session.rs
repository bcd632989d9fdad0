// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Session export / import

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use super::config::{validate_prefix, CustomPattern, EnhancerConfig, PatternType};
use super::error::{AnonymizerError, Result};
use super::registry::{MappingSnapshot, PlaceholderRegistry};

/// Output format for mapping exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    Json,
    #[default]
    Text,
}

impl ExportFormat {
    /// `"json"` selects JSON, anything else the plain-text table
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("json") {
            ExportFormat::Json
        } else {
            ExportFormat::Text
        }
    }
}

/// Full engine state: registry plus configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(flatten)]
    pub registry: MappingSnapshot,
    // Keyed by type id; missing ids count as enabled
    #[serde(default)]
    pub enabled_patterns: BTreeMap<String, bool>,
    #[serde(default)]
    pub custom_patterns: Vec<CustomPattern>,
    #[serde(default)]
    pub preserve_list: Vec<String>,
    #[serde(default)]
    pub enhancers: BTreeMap<String, EnhancerConfig>,
}

impl SessionState {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and sanity-check a session document
    pub fn from_json(data: &str) -> Result<Self> {
        let mut state: SessionState = serde_json::from_str(data)
            .map_err(|e| AnonymizerError::StateImport(e.to_string()))?;

        for pattern in &state.custom_patterns {
            validate_prefix(&pattern.prefix)
                .map_err(|e| AnonymizerError::StateImport(e.to_string()))?;
        }
        state.preserve_list.retain(|v| !v.is_empty());

        Ok(state)
    }

    /// Flag for every known type; unknown ids are dropped with a warning
    pub fn enabled_flags(&self) -> BTreeMap<PatternType, bool> {
        for id in self.enabled_patterns.keys() {
            if id.parse::<PatternType>().is_err() {
                warn!(pattern_type = %id, "ignoring unknown pattern type in session state");
            }
        }

        PatternType::ALL
            .iter()
            .map(|pt| {
                let enabled = self
                    .enabled_patterns
                    .get(pt.as_str())
                    .copied()
                    .unwrap_or(true);
                (*pt, enabled)
            })
            .collect()
    }
}

/// Render the registry in the requested format
pub fn export_mappings(registry: &PlaceholderRegistry, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(&registry.to_snapshot())?),
        ExportFormat::Text => Ok(registry.export_text()),
    }
}

/// Parse a `{mappings, reverse_mappings, counters}` document into a registry
pub fn import_mappings(data: &str) -> Result<PlaceholderRegistry> {
    let snapshot: MappingSnapshot =
        serde_json::from_str(data).map_err(|e| AnonymizerError::StateImport(e.to_string()))?;
    PlaceholderRegistry::from_snapshot(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_name() {
        assert_eq!(ExportFormat::from_name("json"), ExportFormat::Json);
        assert_eq!(ExportFormat::from_name("JSON"), ExportFormat::Json);
        assert_eq!(ExportFormat::from_name("text"), ExportFormat::Text);
        assert_eq!(ExportFormat::from_name("csv"), ExportFormat::Text);
    }

    #[test]
    fn test_session_json_shape() {
        let mut registry = PlaceholderRegistry::new();
        registry.get_or_create("10.0.0.1", "IP");

        let state = SessionState {
            registry: registry.to_snapshot(),
            enabled_patterns: [("ipv4".to_string(), false)].into_iter().collect(),
            custom_patterns: vec![CustomPattern::new(r"ACME-\d+", "ACME").unwrap()],
            preserve_list: vec!["localhost".to_string()],
            enhancers: BTreeMap::new(),
        };

        let value: serde_json::Value = serde_json::from_str(&state.to_json().unwrap()).unwrap();
        assert_eq!(value["mappings"]["10.0.0.1"], "[IP_001]");
        assert_eq!(value["reverse_mappings"]["[IP_001]"], "10.0.0.1");
        assert_eq!(value["counters"]["IP"], 1);
        assert_eq!(value["enabled_patterns"]["ipv4"], false);
        assert_eq!(value["custom_patterns"][0][1], "ACME");
        assert_eq!(value["preserve_list"][0], "localhost");
    }

    #[test]
    fn test_session_missing_sections_default() {
        let state = SessionState::from_json("{}").unwrap();
        assert!(state.registry.mappings.is_empty());
        assert!(state.enabled_flags().values().all(|enabled| *enabled));
    }

    #[test]
    fn test_enabled_flags_fill_missing_and_skip_unknown() {
        let state = SessionState::from_json(
            r#"{"enabled_patterns": {"email": false, "not_a_type": false}}"#,
        )
        .unwrap();
        let flags = state.enabled_flags();
        assert_eq!(flags.len(), PatternType::ALL.len());
        assert!(!flags[&PatternType::Email]);
        assert!(flags[&PatternType::Ipv4]);
    }

    #[test]
    fn test_session_rejects_bad_input() {
        assert!(matches!(
            SessionState::from_json("not json"),
            Err(AnonymizerError::StateImport(_))
        ));
        assert!(matches!(
            SessionState::from_json(r#"{"counters": {"IP": -1}}"#),
            Err(AnonymizerError::StateImport(_))
        ));
        assert!(matches!(
            SessionState::from_json(r#"{"custom_patterns": [["x", "BAD PREFIX"]]}"#),
            Err(AnonymizerError::StateImport(_))
        ));
    }

    #[test]
    fn test_mapping_export_import() {
        let mut registry = PlaceholderRegistry::new();
        registry.get_or_create("alice@example.com", "EMAIL");

        let json = export_mappings(&registry, ExportFormat::Json).unwrap();
        let restored = import_mappings(&json).unwrap();
        assert_eq!(restored.get("alice@example.com"), Some("[EMAIL_001]"));
        assert_eq!(restored.counter("EMAIL"), 1);

        let text = export_mappings(&registry, ExportFormat::Text).unwrap();
        assert!(text.ends_with("[EMAIL_001] -> alice@example.com"));
    }

    #[test]
    fn test_import_mappings_rejects_garbage() {
        assert!(import_mappings("[1, 2, 3]").is_err());
        assert!(import_mappings(r#"{"mappings": {"a": "[VAL_001]"}}"#).is_err());
    }
}
