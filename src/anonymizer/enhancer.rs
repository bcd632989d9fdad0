// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Pluggable detection enhancers

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use super::config::{EnhancerConfig, PatternType};
use super::detector::Detection;

/// A span reported by an enhancer, labelled with its own entity vocabulary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnhancerResult {
    pub value: String,
    pub entity_label: String,
    pub start: usize,
    pub end: usize,
    pub confidence: f64,
}

/// Extra detector run ahead of the pattern catalog
pub trait Enhancer: Send {
    fn name(&self) -> &str;

    /// Whether the enhancer can run in this process
    fn is_available(&self) -> bool {
        true
    }

    /// Detect entities in `text`; offsets are UTF-8 byte offsets
    fn detect(&self, text: &str) -> Vec<EnhancerResult>;
}

/// Map an enhancer entity label onto a pattern type, `Custom` if unknown
pub fn label_to_pattern_type(label: &str) -> PatternType {
    match label.to_ascii_uppercase().as_str() {
        "EMAIL_ADDRESS" => PatternType::Email,
        "PHONE_NUMBER" => PatternType::Phone,
        "IP_ADDRESS" => PatternType::Ipv4,
        "URL" => PatternType::Url,
        "CREDIT_CARD" => PatternType::CreditCard,
        "IBAN_CODE" => PatternType::Iban,
        "DATE_TIME" => PatternType::Date,
        "PERSON" | "NRP" | "PII" => PatternType::Username,
        "DOMAIN_NAME" | "LOCATION" | "FQDN" | "SUBDOMAIN" | "DOMAIN" | "TLD" => {
            PatternType::Hostname
        }
        "US_SSN" | "FR_SSN" | "US_PASSPORT" | "US_DRIVER_LICENSE" | "UK_NHS" => PatternType::Ssn,
        "MEDICAL_LICENSE" | "CRYPTO" | "SECRET" | "API_KEY" | "PASSWORD" => PatternType::ApiKey,
        _ => PatternType::Custom,
    }
}

/// Built-in enhancers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnhancerKind {
    Entropy,
}

impl EnhancerKind {
    pub const ALL: [EnhancerKind; 1] = [EnhancerKind::Entropy];

    pub fn name(&self) -> &'static str {
        match self {
            EnhancerKind::Entropy => "entropy",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn build(&self) -> Box<dyn Enhancer> {
        match self {
            EnhancerKind::Entropy => Box::new(EntropyEnhancer::default()),
        }
    }
}

/// Default entropy threshold, in bits per character
pub const DEFAULT_ENTROPY_THRESHOLD: f64 = 4.0;

const MIN_TOKEN_CHARS: usize = 16;
const MAX_TOKEN_CHARS: usize = 256;

/// Shannon entropy of a string in bits per character
pub fn shannon_entropy(s: &str) -> f64 {
    let mut freq: HashMap<char, usize> = HashMap::new();
    let mut len = 0usize;
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
        len += 1;
    }

    if len == 0 {
        return 0.0;
    }

    let len = len as f64;
    freq.values()
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Flags high-entropy tokens as secrets
///
/// Tokens are runs of alphanumerics and `_-+/=`. A token is reported when it
/// is 16 to 256 characters long, at least 70% alphanumeric and its entropy
/// reaches the threshold.
#[derive(Debug, Clone)]
pub struct EntropyEnhancer {
    threshold: f64,
}

impl Default for EntropyEnhancer {
    fn default() -> Self {
        Self::new(DEFAULT_ENTROPY_THRESHOLD)
    }
}

impl EntropyEnhancer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Entropy of `token` if it looks like a secret
    fn score(&self, token: &str) -> Option<f64> {
        let total = token.chars().count();
        if !(MIN_TOKEN_CHARS..=MAX_TOKEN_CHARS).contains(&total) {
            return None;
        }

        let alphanumeric = token.chars().filter(|c| c.is_alphanumeric()).count();
        if (alphanumeric as f64) / (total as f64) < 0.7 {
            return None;
        }

        let entropy = shannon_entropy(token);
        (entropy >= self.threshold).then_some(entropy)
    }

    fn is_token_char(c: char) -> bool {
        c.is_alphanumeric() || matches!(c, '_' | '-' | '+' | '/' | '=')
    }
}

impl Enhancer for EntropyEnhancer {
    fn name(&self) -> &str {
        EnhancerKind::Entropy.name()
    }

    fn detect(&self, text: &str) -> Vec<EnhancerResult> {
        let mut results = Vec::new();
        let mut start: Option<usize> = None;

        // Trailing sentinel flushes the final token
        let chars = text.char_indices().chain(std::iter::once((text.len(), ' ')));
        for (idx, c) in chars {
            match (start, Self::is_token_char(c)) {
                (None, true) => start = Some(idx),
                (Some(s), false) => {
                    let token = &text[s..idx];
                    if let Some(entropy) = self.score(token) {
                        results.push(EnhancerResult {
                            value: token.to_string(),
                            entity_label: "SECRET".to_string(),
                            start: s,
                            end: idx,
                            confidence: (0.5 + (entropy - 3.0) * 0.2).clamp(0.0, 1.0),
                        });
                    }
                    start = None;
                }
                _ => {}
            }
        }

        results
    }
}

/// Snapshot of an enhancer's registration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnhancerStatus {
    pub name: String,
    pub available: bool,
    pub enabled: bool,
    pub confidence_threshold: f64,
}

/// Run registered enhancers and keep the results the engine may offer
///
/// Drops disabled or unavailable enhancers, results under the confidence
/// threshold, invalid spans and spans whose mapped type is disabled.
pub fn collect_detections<F>(
    text: &str,
    enhancers: &[Box<dyn Enhancer>],
    configs: &BTreeMap<String, EnhancerConfig>,
    is_enabled: F,
) -> Vec<Detection>
where
    F: Fn(PatternType) -> bool,
{
    let mut detections = Vec::new();

    for enhancer in enhancers {
        let config = configs.get(enhancer.name()).cloned().unwrap_or_default();
        if !config.enabled {
            continue;
        }
        if !enhancer.is_available() {
            debug!(enhancer = enhancer.name(), "enhancer unavailable, skipping");
            continue;
        }

        let mut kept = 0usize;
        for result in enhancer.detect(text) {
            if result.confidence < config.confidence_threshold {
                continue;
            }
            if result.start >= result.end
                || result.end > text.len()
                || !text.is_char_boundary(result.start)
                || !text.is_char_boundary(result.end)
            {
                warn!(
                    enhancer = enhancer.name(),
                    start = result.start,
                    end = result.end,
                    "dropping enhancer result with invalid span"
                );
                continue;
            }

            let pattern_type = label_to_pattern_type(&result.entity_label);
            if !is_enabled(pattern_type) {
                continue;
            }

            detections.push(Detection::new(
                text,
                pattern_type,
                pattern_type.prefix(),
                result.start,
                result.end,
            ));
            kept += 1;
        }

        debug!(enhancer = enhancer.name(), kept, "enhancer finished");
    }

    detections
}
