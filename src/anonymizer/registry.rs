// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Placeholder registry: stable value <-> placeholder mapping per session

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

use super::config::validate_prefix;
use super::error::{AnonymizerError, Result};

/// Header line of the plain-text mapping export
pub const TEXT_EXPORT_HEADER: &str = "# Mapping Table (Placeholder -> Original)";

/// Serialized registry contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSnapshot {
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
    #[serde(default)]
    pub reverse_mappings: BTreeMap<String, String>,
    #[serde(default)]
    pub counters: BTreeMap<String, u64>,
}

/// Bijective original <-> placeholder map with a monotonic counter per prefix
#[derive(Debug, Clone, Default)]
pub struct PlaceholderRegistry {
    // original -> placeholder
    mappings: BTreeMap<String, String>,
    // placeholder -> original
    reverse: BTreeMap<String, String>,
    counters: BTreeMap<String, u64>,
}

impl PlaceholderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder for `value`, allocating `[PREFIX_NNN]` on first sight
    ///
    /// A value keeps its first placeholder for the life of the registry even
    /// when later seen under another prefix.
    pub fn get_or_create(&mut self, value: &str, prefix: &str) -> String {
        if let Some(existing) = self.mappings.get(value) {
            return existing.clone();
        }

        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        let placeholder = loop {
            *counter += 1;
            let candidate = format_placeholder(prefix, *counter);
            // Imported mappings may already hold this index
            if !self.reverse.contains_key(&candidate) {
                break candidate;
            }
        };

        self.mappings.insert(value.to_string(), placeholder.clone());
        self.reverse.insert(placeholder.clone(), value.to_string());
        placeholder
    }

    pub fn get(&self, value: &str) -> Option<&str> {
        self.mappings.get(value).map(String::as_str)
    }

    pub fn original(&self, placeholder: &str) -> Option<&str> {
        self.reverse.get(placeholder).map(String::as_str)
    }

    /// Last index handed out for `prefix`
    pub fn counter(&self, prefix: &str) -> u64 {
        self.counters.get(prefix).copied().unwrap_or(0)
    }

    pub fn mappings(&self) -> &BTreeMap<String, String> {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn clear(&mut self) {
        self.mappings.clear();
        self.reverse.clear();
        self.counters.clear();
    }

    /// Replace every known placeholder in `text` with its original
    ///
    /// Scans left to right once. Unknown bracketed tokens are left as-is and
    /// restored values are never rescanned.
    pub fn deanonymize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.reverse.is_empty() || !text.contains('[') {
            return Cow::Borrowed(text);
        }

        let mut out = String::with_capacity(text.len());
        let mut flushed = 0;
        let mut pos = 0;

        while let Some(open) = text[pos..].find('[').map(|i| pos + i) {
            let close = match text[open + 1..]
                .find(|c: char| c == '[' || c == ']')
                .map(|i| open + 1 + i)
            {
                Some(close) => close,
                None => break,
            };

            // Another '[' before any ']': restart the token there
            if text.as_bytes()[close] == b'[' {
                pos = close;
                continue;
            }

            if let Some(original) = self.reverse.get(&text[open..=close]) {
                out.push_str(&text[flushed..open]);
                out.push_str(original);
                flushed = close + 1;
            }
            pos = close + 1;
        }

        if flushed == 0 {
            return Cow::Borrowed(text);
        }
        out.push_str(&text[flushed..]);
        Cow::Owned(out)
    }

    /// `(placeholder, original)` pairs sorted by placeholder
    pub fn mapping_table(&self) -> Vec<(String, String)> {
        self.reverse
            .iter()
            .map(|(placeholder, original)| (placeholder.clone(), original.clone()))
            .collect()
    }

    /// Human-readable mapping table
    pub fn export_text(&self) -> String {
        let mut lines = Vec::with_capacity(self.reverse.len() + 2);
        lines.push(TEXT_EXPORT_HEADER.to_string());
        lines.push("=".repeat(60));
        for (placeholder, original) in &self.reverse {
            lines.push(format!("{} -> {}", placeholder, original));
        }
        lines.join("\n")
    }

    pub fn to_snapshot(&self) -> MappingSnapshot {
        MappingSnapshot {
            mappings: self.mappings.clone(),
            reverse_mappings: self.reverse.clone(),
            counters: self.counters.clone(),
        }
    }

    /// Rebuild a registry from a snapshot, checking it is consistent
    ///
    /// Forward and reverse maps must mirror each other, every placeholder
    /// must have the `[PREFIX_N]` shape and counters are raised to at least
    /// the highest imported index of their prefix.
    pub fn from_snapshot(snapshot: MappingSnapshot) -> Result<Self> {
        let MappingSnapshot {
            mappings,
            reverse_mappings,
            mut counters,
        } = snapshot;

        if mappings.len() != reverse_mappings.len() {
            return Err(AnonymizerError::StateImport(format!(
                "{} mappings but {} reverse mappings",
                mappings.len(),
                reverse_mappings.len()
            )));
        }

        for (original, placeholder) in &mappings {
            if reverse_mappings.get(placeholder) != Some(original) {
                return Err(AnonymizerError::StateImport(format!(
                    "placeholder {} is not mirrored in reverse mappings",
                    placeholder
                )));
            }

            let (prefix, index) = parse_placeholder(placeholder).ok_or_else(|| {
                AnonymizerError::StateImport(format!("malformed placeholder {}", placeholder))
            })?;
            let counter = counters.entry(prefix.to_string()).or_insert(0);
            *counter = (*counter).max(index);
        }

        for prefix in counters.keys() {
            validate_prefix(prefix).map_err(|e| AnonymizerError::StateImport(e.to_string()))?;
        }

        Ok(Self {
            mappings,
            reverse: reverse_mappings,
            counters,
        })
    }
}

fn format_placeholder(prefix: &str, index: u64) -> String {
    format!("[{}_{:03}]", prefix, index)
}

/// Split `[PREFIX_NNN]` into its prefix and index
pub fn parse_placeholder(token: &str) -> Option<(&str, u64)> {
    let inner = token.strip_prefix('[')?.strip_suffix(']')?;
    let (prefix, digits) = inner.rsplit_once('_')?;

    if validate_prefix(prefix).is_err()
        || digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    digits.parse().ok().map(|index| (prefix, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_format_and_stability() {
        let mut registry = PlaceholderRegistry::new();
        assert_eq!(registry.get_or_create("10.0.0.1", "IP"), "[IP_001]");
        assert_eq!(registry.get_or_create("10.0.0.2", "IP"), "[IP_002]");
        assert_eq!(registry.get_or_create("10.0.0.1", "IP"), "[IP_001]");
        assert_eq!(registry.get_or_create("a@b.io", "EMAIL"), "[EMAIL_001]");
        assert_eq!(registry.counter("IP"), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_padding_grows_past_three_digits() {
        let mut registry = PlaceholderRegistry::new();
        for i in 0..1000 {
            registry.get_or_create(&format!("v{}", i), "VAL");
        }
        assert_eq!(registry.get("v999"), Some("[VAL_1000]"));
        assert_eq!(registry.get("v0"), Some("[VAL_001]"));
    }

    #[test]
    fn test_value_keeps_first_prefix() {
        let mut registry = PlaceholderRegistry::new();
        let first = registry.get_or_create("db01.corp", "HOST");
        assert_eq!(registry.get_or_create("db01.corp", "SERVER"), first);
        assert_eq!(registry.counter("SERVER"), 0);
    }

    #[test]
    fn test_deanonymize_single_pass() {
        let mut registry = PlaceholderRegistry::new();
        registry.get_or_create("alice@example.com", "EMAIL");
        // An original that itself looks like a placeholder is not expanded again
        registry.get_or_create("[EMAIL_001]", "VAL");

        let restored = registry.deanonymize("to [EMAIL_001] cc [VAL_001] bcc [UNKNOWN_9]");
        assert_eq!(restored, "to alice@example.com cc [EMAIL_001] bcc [UNKNOWN_9]");
    }

    #[test]
    fn test_deanonymize_nested_brackets() {
        let mut registry = PlaceholderRegistry::new();
        registry.get_or_create("10.0.0.1", "IP");
        assert_eq!(registry.deanonymize("[[IP_001]]"), "[10.0.0.1]");
        assert_eq!(registry.deanonymize("x [ y [IP_001"), "x [ y [IP_001");
    }

    #[test]
    fn test_deanonymize_borrows_when_untouched() {
        let mut registry = PlaceholderRegistry::new();
        registry.get_or_create("10.0.0.1", "IP");
        assert!(matches!(registry.deanonymize("no tokens [here]"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_export_text() {
        let mut registry = PlaceholderRegistry::new();
        registry.get_or_create("192.168.1.5", "IP");
        registry.get_or_create("alice@example.com", "EMAIL");

        let text = registry.export_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], TEXT_EXPORT_HEADER);
        assert_eq!(lines[1], "=".repeat(60));
        assert_eq!(lines[2], "[EMAIL_001] -> alice@example.com");
        assert_eq!(lines[3], "[IP_001] -> 192.168.1.5");
    }

    #[test]
    fn test_parse_placeholder() {
        assert_eq!(parse_placeholder("[IP_001]"), Some(("IP", 1)));
        assert_eq!(parse_placeholder("[MY_PREFIX_1234]"), Some(("MY_PREFIX", 1234)));
        assert_eq!(parse_placeholder("[IP_]"), None);
        assert_eq!(parse_placeholder("IP_001"), None);
        assert_eq!(parse_placeholder("[_001]"), None);
        assert_eq!(parse_placeholder("[IP_0x1]"), None);
    }

    #[test]
    fn test_snapshot_round_trip_bumps_counters() {
        let mut snapshot = MappingSnapshot::default();
        snapshot
            .mappings
            .insert("10.0.0.7".to_string(), "[IP_007]".to_string());
        snapshot
            .reverse_mappings
            .insert("[IP_007]".to_string(), "10.0.0.7".to_string());
        snapshot.counters.insert("IP".to_string(), 2);

        let mut registry = PlaceholderRegistry::from_snapshot(snapshot).unwrap();
        assert_eq!(registry.counter("IP"), 7);
        assert_eq!(registry.get_or_create("10.0.0.8", "IP"), "[IP_008]");
    }

    #[test]
    fn test_snapshot_rejects_mismatch() {
        let mut snapshot = MappingSnapshot::default();
        snapshot
            .mappings
            .insert("a".to_string(), "[VAL_001]".to_string());
        snapshot
            .reverse_mappings
            .insert("[VAL_001]".to_string(), "b".to_string());

        let err = PlaceholderRegistry::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, AnonymizerError::StateImport(_)));
    }

    #[test]
    fn test_snapshot_rejects_malformed_placeholder() {
        let mut snapshot = MappingSnapshot::default();
        snapshot.mappings.insert("a".to_string(), "VAL-1".to_string());
        snapshot
            .reverse_mappings
            .insert("VAL-1".to_string(), "a".to_string());

        assert!(PlaceholderRegistry::from_snapshot(snapshot).is_err());
    }

    #[test]
    fn test_clear_resets_counters() {
        let mut registry = PlaceholderRegistry::new();
        registry.get_or_create("x", "VAL");
        registry.get_or_create("y", "VAL");
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.counter("VAL"), 0);
        assert_eq!(registry.get_or_create("y", "VAL"), "[VAL_001]");
    }
}
