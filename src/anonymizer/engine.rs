// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Anonymization pipeline: detect, resolve, assign placeholders, substitute

use once_cell::unsync::OnceCell;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};
use uuid::Uuid;

use super::config::{validate_prefix, AnonymizerConfig, CustomPattern, EnhancerConfig, PatternType};
use super::detector::{run_detectors, Detection};
use super::enhancer::{self, Enhancer, EnhancerKind, EnhancerStatus};
use super::error::{AnonymizerError, Result};
use super::highlight;
use super::masking;
use super::patterns::{compile_custom_patterns, CompiledCustomPattern};
use super::preset::{Preset, PresetSource};
use super::registry::PlaceholderRegistry;
use super::resolver::OverlapResolver;
use super::session::{self, ExportFormat, SessionState};
use super::validation::validate;

/// Output of [`Anonymizer::anonymize`]
#[derive(Debug, Clone, Serialize)]
pub struct AnonymizationResult {
    pub anonymized_text: String,
    /// Every original -> placeholder pair known to the session
    pub mappings: BTreeMap<String, String>,
    /// Occurrences per type in this text
    pub stats: BTreeMap<PatternType, usize>,
    /// Detections sorted by start, with placeholders assigned
    pub detections: Vec<Detection>,
}

/// Output of [`Anonymizer::preview`]
#[derive(Debug, Clone, Serialize)]
pub struct PreviewResult {
    pub detections: Vec<Detection>,
    pub stats: BTreeMap<PatternType, usize>,
}

/// Reversible log anonymizer
///
/// Owns the placeholder registry and the detection configuration for one
/// session. Identical values map to the same placeholder for the life of
/// the instance, until [`reset`](Anonymizer::reset) or an import.
///
/// # Example
/// ```
/// use anonymizer_rust::anonymizer::Anonymizer;
///
/// let mut anonymizer = Anonymizer::new();
/// let result = anonymizer.anonymize("User alice@example.com logged in from 192.168.1.5");
/// assert_eq!(result.anonymized_text, "User [EMAIL_001] logged in from [IP_001]");
///
/// let restored = anonymizer.deanonymize(&result.anonymized_text);
/// assert_eq!(restored, "User alice@example.com logged in from 192.168.1.5");
/// ```
pub struct Anonymizer {
    session_id: Uuid,
    config: AnonymizerConfig,
    registry: PlaceholderRegistry,
    enhancers: Vec<Box<dyn Enhancer>>,
    // Compiled lazily, dropped whenever the custom list changes
    custom_cache: OnceCell<Vec<CompiledCustomPattern>>,
}

impl Default for Anonymizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Anonymizer {
    pub fn new() -> Self {
        Self::with_config(AnonymizerConfig::default())
    }

    /// Build an engine from a configuration; unusable entries are dropped
    pub fn with_config(mut config: AnonymizerConfig) -> Self {
        config.custom_patterns.retain(|p| match validate_prefix(&p.prefix) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "dropping custom pattern");
                false
            }
        });
        config.preserve_list.retain(|v| !v.is_empty());

        let session_id = Uuid::new_v4();
        debug!(session = %session_id, "anonymizer created");

        Self {
            session_id,
            config,
            registry: PlaceholderRegistry::new(),
            enhancers: Vec::new(),
            custom_cache: OnceCell::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn config(&self) -> &AnonymizerConfig {
        &self.config
    }

    pub fn registry(&self) -> &PlaceholderRegistry {
        &self.registry
    }

    // ---- pipeline ----

    /// Find sensitive spans without touching the registry
    ///
    /// Returns pairwise-disjoint detections sorted by start offset.
    pub fn detect(&self, text: &str) -> Vec<Detection> {
        if text.is_empty() {
            return Vec::new();
        }

        let is_enabled = |pt: PatternType| self.config.is_enabled(pt);
        let enhanced = enhancer::collect_detections(
            text,
            &self.enhancers,
            &self.config.enhancers,
            is_enabled,
        );
        let candidates = run_detectors(text, is_enabled, self.custom_patterns(), enhanced);

        let preserve: Vec<String> = self
            .config
            .preserve_list
            .iter()
            .map(|v| v.to_lowercase())
            .collect();

        let raw = candidates.len();
        let mut invalid = 0usize;
        let mut preserved = 0usize;
        let mut resolver = OverlapResolver::new();

        for candidate in candidates {
            if !validate(&candidate.value, candidate.pattern_type) {
                invalid += 1;
                continue;
            }
            if !preserve.is_empty() {
                let lowered = candidate.value.to_lowercase();
                if preserve.iter().any(|p| lowered.contains(p.as_str())) {
                    preserved += 1;
                    continue;
                }
            }
            resolver.offer(candidate);
        }

        let detections = resolver.finish();

        debug!(
            session = %self.session_id,
            raw,
            invalid,
            preserved,
            kept = detections.len(),
            "detection run"
        );
        if self.config.log_detections {
            for detection in &detections {
                debug!(
                    session = %self.session_id,
                    pattern_type = %detection.pattern_type,
                    start = detection.start,
                    end = detection.end,
                    len = detection.len(),
                    "detected"
                );
            }
        }

        detections
    }

    /// Replace every detection with its session placeholder
    pub fn anonymize(&mut self, text: &str) -> AnonymizationResult {
        let mut detections = self.detect(text);

        // New values are numbered in text order
        for detection in detections.iter_mut() {
            let placeholder = self
                .registry
                .get_or_create(&detection.value, &detection.prefix);
            detection.placeholder = Some(placeholder);
        }

        let anonymized_text = masking::substitute(text, &detections).into_owned();
        let stats = count_by_type(&detections);

        debug!(
            session = %self.session_id,
            replaced = detections.len(),
            mappings = self.registry.len(),
            "anonymized text"
        );

        AnonymizationResult {
            anonymized_text,
            mappings: self.registry.mappings().clone(),
            stats,
            detections,
        }
    }

    /// Detections and counts, no substitution and no registry change
    pub fn preview(&self, text: &str) -> PreviewResult {
        let detections = self.detect(text);
        let stats = count_by_type(&detections);
        PreviewResult { detections, stats }
    }

    /// HTML rendering of `text` with detections highlighted
    pub fn preview_html(&self, text: &str) -> String {
        let detections = self.detect(text);
        highlight::render_html(text, &detections)
    }

    /// Restore originals for every placeholder known to this session
    pub fn deanonymize(&self, text: &str) -> String {
        self.registry.deanonymize(text).into_owned()
    }

    /// Forget all mappings and counters; configuration is kept
    pub fn reset(&mut self) {
        self.registry.clear();
        debug!(session = %self.session_id, "registry reset");
    }

    // ---- configuration ----

    pub fn set_pattern_enabled(&mut self, pattern_type: PatternType, enabled: bool) {
        self.config.enabled_patterns.insert(pattern_type, enabled);
    }

    pub fn is_pattern_enabled(&self, pattern_type: PatternType) -> bool {
        self.config.is_enabled(pattern_type)
    }

    /// Disable every type except the listed ones
    pub fn enable_only(&mut self, pattern_types: &[PatternType]) {
        for pt in PatternType::ALL {
            self.config
                .enabled_patterns
                .insert(pt, pattern_types.contains(&pt));
        }
    }

    /// Register a custom pattern, evaluated after the catalog
    ///
    /// The regex itself is compiled on the next run; a malformed one is
    /// skipped with a warning. Use [`compile_pattern`](super::patterns::compile_pattern)
    /// to check it up front.
    pub fn add_custom_pattern(&mut self, regex: &str, prefix: &str) -> Result<()> {
        let pattern = CustomPattern::new(regex, prefix)?;
        self.config.custom_patterns.push(pattern);
        self.custom_cache.take();
        Ok(())
    }

    pub fn clear_custom_patterns(&mut self) {
        self.config.custom_patterns.clear();
        self.custom_cache.take();
    }

    pub fn custom_patterns(&self) -> &[CompiledCustomPattern] {
        self.custom_cache.get_or_init(|| {
            compile_custom_patterns(&self.config.custom_patterns, self.config.backtrack_limit)
        })
    }

    /// Never anonymize values containing `value` (case-insensitive)
    pub fn add_preserve_value(&mut self, value: &str) {
        if !value.is_empty() {
            self.config.preserve_list.push(value.to_string());
        }
    }

    pub fn clear_preserve_list(&mut self) {
        self.config.preserve_list.clear();
    }

    // ---- enhancers ----

    /// Add an enhancer, replacing any registered under the same name
    pub fn register_enhancer(&mut self, enhancer: Box<dyn Enhancer>) {
        let name = enhancer.name().to_string();
        self.enhancers.retain(|e| e.name() != name);
        debug!(session = %self.session_id, enhancer = %name, "enhancer registered");
        self.enhancers.push(enhancer);
    }

    pub fn register_builtin_enhancer(&mut self, kind: EnhancerKind) {
        self.register_enhancer(kind.build());
    }

    pub fn set_enhancer_config(&mut self, name: &str, config: EnhancerConfig) {
        self.config.enhancers.insert(name.to_string(), config);
    }

    pub fn enhancer_status(&self) -> Vec<EnhancerStatus> {
        self.enhancers
            .iter()
            .map(|e| {
                let config = self
                    .config
                    .enhancers
                    .get(e.name())
                    .cloned()
                    .unwrap_or_default();
                EnhancerStatus {
                    name: e.name().to_string(),
                    available: e.is_available(),
                    enabled: config.enabled,
                    confidence_threshold: config.confidence_threshold,
                }
            })
            .collect()
    }

    // ---- presets ----

    /// Enable exactly the preset's types and replace preserve and custom lists
    pub fn apply_preset(&mut self, preset: &Preset) {
        self.enable_only(&preset.pattern_types());
        self.config.preserve_list = preset.preserve_values();
        self.config.custom_patterns = preset.valid_custom_patterns();
        self.custom_cache.take();
        debug!(session = %self.session_id, preset = %preset.id, "preset applied");
    }

    /// Look up `id` in `source` and apply it
    pub fn load_preset<S: PresetSource + ?Sized>(&mut self, source: &S, id: &str) -> Result<()> {
        match source.get(id) {
            Some(preset) => {
                self.apply_preset(&preset);
                Ok(())
            }
            None => {
                warn!(session = %self.session_id, preset = %id, "unknown preset");
                Err(AnonymizerError::UnknownPreset(id.to_string()))
            }
        }
    }

    // ---- persistence ----

    /// `(placeholder, original)` pairs sorted by placeholder
    pub fn mapping_table(&self) -> Vec<(String, String)> {
        self.registry.mapping_table()
    }

    pub fn export_mappings(&self, format: ExportFormat) -> Result<String> {
        session::export_mappings(&self.registry, format)
    }

    /// Replace the registry with an exported mapping document
    ///
    /// On error the current registry is left untouched.
    pub fn import_mappings(&mut self, data: &str) -> Result<()> {
        match session::import_mappings(data) {
            Ok(registry) => {
                self.registry = registry;
                debug!(session = %self.session_id, mappings = self.registry.len(), "mappings imported");
                Ok(())
            }
            Err(e) => {
                warn!(session = %self.session_id, error = %e, "rejected mapping import");
                Err(e)
            }
        }
    }

    pub fn session_state(&self) -> SessionState {
        SessionState {
            registry: self.registry.to_snapshot(),
            enabled_patterns: self
                .config
                .enabled_map()
                .into_iter()
                .map(|(pt, enabled)| (pt.as_str().to_string(), enabled))
                .collect(),
            custom_patterns: self.config.custom_patterns.clone(),
            preserve_list: self.config.preserve_list.clone(),
            enhancers: self.config.enhancers.clone(),
        }
    }

    pub fn export_session(&self) -> Result<String> {
        self.session_state().to_json()
    }

    /// Replace registry and configuration with a saved session
    ///
    /// Everything is validated before anything changes.
    pub fn load_session_state(&mut self, state: SessionState) -> Result<()> {
        for pattern in &state.custom_patterns {
            validate_prefix(&pattern.prefix)
                .map_err(|e| AnonymizerError::StateImport(e.to_string()))?;
        }
        let registry = PlaceholderRegistry::from_snapshot(state.registry.clone())?;
        let enabled = state.enabled_flags();

        self.registry = registry;
        self.config.enabled_patterns = enabled;
        self.config.custom_patterns = state.custom_patterns;
        self.config.preserve_list = state.preserve_list;
        self.config.preserve_list.retain(|v| !v.is_empty());
        self.config.enhancers = state.enhancers;
        self.custom_cache.take();

        debug!(session = %self.session_id, mappings = self.registry.len(), "session loaded");
        Ok(())
    }

    pub fn import_session(&mut self, data: &str) -> Result<()> {
        let result = SessionState::from_json(data).and_then(|state| self.load_session_state(state));
        if let Err(e) = &result {
            warn!(session = %self.session_id, error = %e, "rejected session import");
        }
        result
    }
}

fn count_by_type(detections: &[Detection]) -> BTreeMap<PatternType, usize> {
    let mut stats = BTreeMap::new();
    for detection in detections {
        *stats.entry(detection.pattern_type).or_insert(0) += 1;
    }
    stats
}

/// Options for [`anonymize_text`]
#[derive(Debug, Clone, Default)]
pub struct AnonymizeOptions {
    /// Types to enable; all when `None`. Ignored if a preset is given.
    pub enabled_patterns: Option<Vec<PatternType>>,
    pub custom_patterns: Vec<CustomPattern>,
    pub preserve_values: Vec<String>,
    pub preset: Option<Preset>,
}

/// Anonymize `text` with a fresh single-use engine
pub fn anonymize_text(text: &str, options: AnonymizeOptions) -> AnonymizationResult {
    let mut anonymizer = Anonymizer::new();

    if let Some(preset) = &options.preset {
        anonymizer.apply_preset(preset);
    } else if let Some(types) = &options.enabled_patterns {
        anonymizer.enable_only(types);
    }

    for pattern in options.custom_patterns {
        if let Err(e) = anonymizer.add_custom_pattern(&pattern.regex, &pattern.prefix) {
            warn!(error = %e, "skipping custom pattern");
        }
    }
    for value in &options.preserve_values {
        anonymizer.add_preserve_value(value);
    }

    anonymizer.anonymize(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymizer::enhancer::EnhancerResult;
    use crate::anonymizer::preset::PresetLibrary;

    const LOG_LINE: &str = "User alice@example.com logged in from 192.168.1.5";

    struct PersonEnhancer;

    impl Enhancer for PersonEnhancer {
        fn name(&self) -> &str {
            "person"
        }

        fn detect(&self, text: &str) -> Vec<EnhancerResult> {
            text.match_indices("Alice Martin")
                .map(|(start, value)| EnhancerResult {
                    value: value.to_string(),
                    entity_label: "PERSON".to_string(),
                    start,
                    end: start + value.len(),
                    confidence: 0.95,
                })
                .collect()
        }
    }

    #[test]
    fn test_anonymize_log_line() {
        let mut anonymizer = Anonymizer::new();
        let result = anonymizer.anonymize(LOG_LINE);

        assert_eq!(result.anonymized_text, "User [EMAIL_001] logged in from [IP_001]");
        assert_eq!(result.detections.len(), 2);
        assert_eq!(result.stats[&PatternType::Email], 1);
        assert_eq!(result.stats[&PatternType::Ipv4], 1);
        assert_eq!(result.stats.len(), 2);
        assert_eq!(result.mappings["192.168.1.5"], "[IP_001]");
    }

    #[test]
    fn test_placeholders_stable_across_calls() {
        let mut anonymizer = Anonymizer::new();
        anonymizer.anonymize("server 10.1.1.1 up");
        let second = anonymizer.anonymize("10.2.2.2 then 10.1.1.1 again");

        assert_eq!(second.anonymized_text, "[IP_002] then [IP_001] again");
    }

    #[test]
    fn test_preview_leaves_registry_alone() {
        let anonymizer = Anonymizer::new();
        let preview = anonymizer.preview(LOG_LINE);

        assert_eq!(preview.detections.len(), 2);
        assert!(preview.detections.iter().all(|d| d.placeholder.is_none()));
        assert!(anonymizer.registry().is_empty());
    }

    #[test]
    fn test_preview_html() {
        let anonymizer = Anonymizer::new();
        let html = anonymizer.preview_html("from 192.168.1.5");
        assert_eq!(
            html,
            "from&nbsp;<span class=\"detection\" data-type=\"ipv4\" title=\"IPV4\">192.168.1.5</span>"
        );
    }

    #[test]
    fn test_preserve_list() {
        let mut anonymizer = Anonymizer::new();
        anonymizer.add_preserve_value("127.0.0.1");
        let result = anonymizer.anonymize("connect to 127.0.0.1");

        assert_eq!(result.anonymized_text, "connect to 127.0.0.1");
        assert!(result.detections.is_empty());

        anonymizer.clear_preserve_list();
        let result = anonymizer.anonymize("connect to 127.0.0.1");
        assert_eq!(result.anonymized_text, "connect to [IP_001]");
    }

    #[test]
    fn test_disabled_pattern() {
        let mut anonymizer = Anonymizer::new();
        anonymizer.set_pattern_enabled(PatternType::Ipv4, false);
        assert!(!anonymizer.is_pattern_enabled(PatternType::Ipv4));

        let result = anonymizer.anonymize(LOG_LINE);
        assert_eq!(result.anonymized_text, "User [EMAIL_001] logged in from 192.168.1.5");
    }

    #[test]
    fn test_enable_only() {
        let mut anonymizer = Anonymizer::new();
        anonymizer.enable_only(&[PatternType::Ipv4]);
        assert!(!anonymizer.is_pattern_enabled(PatternType::Email));

        let result = anonymizer.anonymize(LOG_LINE);
        assert_eq!(result.anonymized_text, "User alice@example.com logged in from [IP_001]");
    }

    #[test]
    fn test_custom_pattern_uses_own_prefix() {
        let mut anonymizer = Anonymizer::new();
        anonymizer.add_custom_pattern(r"ACME-\d{4}", "ACME").unwrap();

        let result = anonymizer.anonymize("ticket ACME-1234 closed");
        assert_eq!(result.anonymized_text, "ticket [ACME_001] closed");
        assert_eq!(result.stats[&PatternType::Custom], 1);

        anonymizer.clear_custom_patterns();
        let result = anonymizer.anonymize("ticket ACME-5678 closed");
        assert_eq!(result.anonymized_text, "ticket ACME-5678 closed");
    }

    #[test]
    fn test_custom_pattern_rejects_bad_prefix() {
        let mut anonymizer = Anonymizer::new();
        assert!(matches!(
            anonymizer.add_custom_pattern("x+", "NO GOOD"),
            Err(AnonymizerError::InvalidPrefix(_))
        ));
        assert!(anonymizer.config().custom_patterns.is_empty());
    }

    #[test]
    fn test_malformed_custom_pattern_is_skipped() {
        let mut anonymizer = Anonymizer::new();
        anonymizer.add_custom_pattern("(broken", "BAD").unwrap();

        let result = anonymizer.anonymize(LOG_LINE);
        assert_eq!(result.anonymized_text, "User [EMAIL_001] logged in from [IP_001]");
    }

    #[test]
    fn test_runaway_custom_pattern_keeps_catalog_results() {
        let mut anonymizer = Anonymizer::with_config(AnonymizerConfig {
            backtrack_limit: 50,
            ..AnonymizerConfig::default()
        });
        anonymizer.add_custom_pattern(r"(?:(a)\1?)+(?=b)", "RUNAWAY").unwrap();

        let text = format!("{} 10.0.0.1", "a".repeat(200));
        let result = anonymizer.anonymize(&text);

        assert_eq!(result.anonymized_text, format!("{} [IP_001]", "a".repeat(200)));
        assert!(result.stats.get(&PatternType::Custom).is_none());
    }

    #[test]
    fn test_enhancer_runs_first() {
        let mut anonymizer = Anonymizer::new();
        anonymizer.register_enhancer(Box::new(PersonEnhancer));

        let result = anonymizer.anonymize("Alice Martin logged in from 10.0.0.1");
        assert_eq!(result.anonymized_text, "[USER_001] logged in from [IP_001]");

        anonymizer.set_enhancer_config(
            "person",
            EnhancerConfig {
                enabled: true,
                confidence_threshold: 0.99,
            },
        );
        let result = anonymizer.anonymize("Alice Martin logged in");
        assert_eq!(result.anonymized_text, "Alice Martin logged in");

        let status = anonymizer.enhancer_status();
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].confidence_threshold, 0.99);
    }

    #[test]
    fn test_register_enhancer_replaces_same_name() {
        let mut anonymizer = Anonymizer::new();
        anonymizer.register_builtin_enhancer(EnhancerKind::Entropy);
        anonymizer.register_builtin_enhancer(EnhancerKind::Entropy);
        assert_eq!(anonymizer.enhancer_status().len(), 1);
    }

    #[test]
    fn test_load_preset() {
        let library = PresetLibrary::from_json(
            r#"{"id": "net", "patterns": ["ipv4"], "preserve": ["10.0.0.1"],
                "custom_patterns": [{"regex": "HOST-\\d+", "prefix": "NODE"}]}"#,
        )
        .unwrap();

        let mut anonymizer = Anonymizer::new();
        anonymizer.add_preserve_value("something else");
        anonymizer.load_preset(&library, "net").unwrap();

        assert!(anonymizer.is_pattern_enabled(PatternType::Ipv4));
        assert!(!anonymizer.is_pattern_enabled(PatternType::Email));
        assert!(!anonymizer.is_pattern_enabled(PatternType::Custom));
        assert_eq!(anonymizer.config().preserve_list, vec!["10.0.0.1".to_string()]);
        assert_eq!(anonymizer.config().custom_patterns.len(), 1);
    }

    #[test]
    fn test_unknown_preset_leaves_state() {
        let library = PresetLibrary::new();
        let mut anonymizer = Anonymizer::new();
        anonymizer.add_preserve_value("keep");

        let err = anonymizer.load_preset(&library, "kubernetes").unwrap_err();
        assert!(matches!(err, AnonymizerError::UnknownPreset(_)));
        assert_eq!(anonymizer.config().preserve_list, vec!["keep".to_string()]);
        assert!(anonymizer.is_pattern_enabled(PatternType::Email));
    }

    #[test]
    fn test_reset_keeps_configuration() {
        let mut anonymizer = Anonymizer::new();
        anonymizer.set_pattern_enabled(PatternType::Email, false);
        anonymizer.anonymize(LOG_LINE);
        anonymizer.reset();

        assert!(anonymizer.registry().is_empty());
        assert!(!anonymizer.is_pattern_enabled(PatternType::Email));
        let result = anonymizer.anonymize("from 10.9.9.9");
        assert_eq!(result.anonymized_text, "from [IP_001]");
    }

    #[test]
    fn test_session_round_trip() {
        let mut original = Anonymizer::new();
        original.set_pattern_enabled(PatternType::Hostname, false);
        original.add_custom_pattern(r"ACME-\d{4}", "ACME").unwrap();
        original.add_preserve_value("localhost");
        let anonymized = original.anonymize("ACME-1234 from 10.0.0.1").anonymized_text;

        let exported = original.export_session().unwrap();

        let mut restored = Anonymizer::new();
        restored.import_session(&exported).unwrap();

        assert!(!restored.is_pattern_enabled(PatternType::Hostname));
        assert_eq!(restored.config().preserve_list, vec!["localhost".to_string()]);
        assert_eq!(restored.deanonymize(&anonymized), "ACME-1234 from 10.0.0.1");
        assert_eq!(
            restored.anonymize("ACME-9999").anonymized_text,
            "[ACME_002]"
        );
    }

    #[test]
    fn test_failed_import_leaves_state() {
        let mut anonymizer = Anonymizer::new();
        anonymizer.anonymize(LOG_LINE);
        let before = anonymizer.mapping_table();

        assert!(anonymizer.import_session("{not json").is_err());
        assert!(anonymizer
            .import_mappings(r#"{"mappings": {"x": "[VAL_001]"}, "reverse_mappings": {}}"#)
            .is_err());

        assert_eq!(anonymizer.mapping_table(), before);
    }

    #[test]
    fn test_anonymize_text_options() {
        let result = anonymize_text(
            "ticket ACME-1234 from 10.0.0.1 by alice@example.com",
            AnonymizeOptions {
                enabled_patterns: Some(vec![PatternType::Ipv4, PatternType::Custom]),
                custom_patterns: vec![CustomPattern::new(r"ACME-\d{4}", "ACME").unwrap()],
                preserve_values: vec!["10.0.0.1".to_string()],
                preset: None,
            },
        );
        assert_eq!(
            result.anonymized_text,
            "ticket [ACME_001] from 10.0.0.1 by alice@example.com"
        );
    }
}
