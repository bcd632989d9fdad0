// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Configuration types for the anonymization engine

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::{AnonymizerError, Result};

/// Sensitive data categories that can be detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Ipv4,
    Ipv6,
    Email,
    Hostname,
    Url,
    PathWindows,
    PathUnix,
    Uuid,
    Mac,
    Phone,
    ApiKey,
    Jwt,
    CreditCard,
    Date,
    Username,
    ServerName,
    Iban,
    Ssn,
    PrivateKey,
    ConnectionString,
    Custom,
}

impl PatternType {
    pub const ALL: [PatternType; 21] = [
        PatternType::Ipv4,
        PatternType::Ipv6,
        PatternType::Email,
        PatternType::Hostname,
        PatternType::Url,
        PatternType::PathWindows,
        PatternType::PathUnix,
        PatternType::Uuid,
        PatternType::Mac,
        PatternType::Phone,
        PatternType::ApiKey,
        PatternType::Jwt,
        PatternType::CreditCard,
        PatternType::Date,
        PatternType::Username,
        PatternType::ServerName,
        PatternType::Iban,
        PatternType::Ssn,
        PatternType::PrivateKey,
        PatternType::ConnectionString,
        PatternType::Custom,
    ];

    /// Identifier used in session state, stats and presets
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Ipv4 => "ipv4",
            PatternType::Ipv6 => "ipv6",
            PatternType::Email => "email",
            PatternType::Hostname => "hostname",
            PatternType::Url => "url",
            PatternType::PathWindows => "path_windows",
            PatternType::PathUnix => "path_unix",
            PatternType::Uuid => "uuid",
            PatternType::Mac => "mac",
            PatternType::Phone => "phone",
            PatternType::ApiKey => "api_key",
            PatternType::Jwt => "jwt",
            PatternType::CreditCard => "credit_card",
            PatternType::Date => "date",
            PatternType::Username => "username",
            PatternType::ServerName => "server_name",
            PatternType::Iban => "iban",
            PatternType::Ssn => "ssn",
            PatternType::PrivateKey => "private_key",
            PatternType::ConnectionString => "connection_string",
            PatternType::Custom => "custom",
        }
    }

    /// Placeholder prefix, e.g. `IP` in `[IP_001]`
    pub fn prefix(&self) -> &'static str {
        match self {
            PatternType::Ipv4 => "IP",
            PatternType::Ipv6 => "IPV6",
            PatternType::Email => "EMAIL",
            PatternType::Hostname => "HOST",
            PatternType::Url => "URL",
            PatternType::PathWindows | PatternType::PathUnix => "PATH",
            PatternType::Uuid => "UUID",
            PatternType::Mac => "MAC",
            PatternType::Phone => "PHONE",
            PatternType::ApiKey => "KEY",
            PatternType::Jwt => "TOKEN",
            PatternType::CreditCard => "CC",
            PatternType::Date => "DATE",
            PatternType::Username => "USER",
            PatternType::ServerName => "SERVER",
            PatternType::Iban => "IBAN",
            PatternType::Ssn => "SSN",
            PatternType::PrivateKey => "PRIVKEY",
            PatternType::ConnectionString => "CONNSTR",
            PatternType::Custom => "VAL",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternType {
    type Err = AnonymizerError;

    fn from_str(s: &str) -> Result<Self> {
        let id = s.trim().to_ascii_lowercase();
        PatternType::ALL
            .iter()
            .copied()
            .find(|pt| pt.as_str() == id)
            .ok_or_else(|| AnonymizerError::UnknownPatternType(s.to_string()))
    }
}

/// User-registered pattern, serialized as `[regex, prefix]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct CustomPattern {
    pub regex: String,
    pub prefix: String,
}

impl CustomPattern {
    /// Create a custom pattern, rejecting prefixes that cannot appear
    /// inside a `[PREFIX_NNN]` token
    pub fn new(regex: impl Into<String>, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        Ok(Self {
            regex: regex.into(),
            prefix,
        })
    }
}

impl From<(String, String)> for CustomPattern {
    fn from((regex, prefix): (String, String)) -> Self {
        Self { regex, prefix }
    }
}

impl From<CustomPattern> for (String, String) {
    fn from(pattern: CustomPattern) -> Self {
        (pattern.regex, pattern.prefix)
    }
}

/// Check that a prefix can be embedded in a placeholder token
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty()
        || prefix
            .chars()
            .any(|c| c == '[' || c == ']' || c.is_whitespace())
    {
        return Err(AnonymizerError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Per-enhancer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_confidence_threshold() -> f64 {
    0.7
}

/// Step budget for patterns that need the backtracking engine
pub const DEFAULT_BACKTRACK_LIMIT: usize = 100_000;

fn default_backtrack_limit() -> usize {
    DEFAULT_BACKTRACK_LIMIT
}

/// Configuration for an `Anonymizer` instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizerConfig {
    // Detection flags, missing entries count as enabled
    #[serde(default)]
    pub enabled_patterns: BTreeMap<PatternType, bool>,

    #[serde(default)]
    pub custom_patterns: Vec<CustomPattern>,

    // Literal values never anonymized (case-insensitive containment)
    #[serde(default)]
    pub preserve_list: Vec<String>,

    #[serde(default)]
    pub enhancers: BTreeMap<String, EnhancerConfig>,

    #[serde(default = "default_backtrack_limit")]
    pub backtrack_limit: usize,

    #[serde(default = "default_true")]
    pub log_detections: bool,
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            enabled_patterns: PatternType::ALL.iter().map(|pt| (*pt, true)).collect(),
            custom_patterns: Vec::new(),
            preserve_list: Vec::new(),
            enhancers: BTreeMap::new(),
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
            log_detections: true,
        }
    }
}

impl AnonymizerConfig {
    /// Parse a configuration from JSON
    pub fn from_json(data: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(data)?;
        for pattern in &config.custom_patterns {
            validate_prefix(&pattern.prefix)?;
        }
        config.preserve_list.retain(|v| !v.is_empty());
        Ok(config)
    }

    pub fn is_enabled(&self, pattern_type: PatternType) -> bool {
        self.enabled_patterns
            .get(&pattern_type)
            .copied()
            .unwrap_or(true)
    }

    /// Flag map with an explicit entry for every type
    pub fn enabled_map(&self) -> BTreeMap<PatternType, bool> {
        PatternType::ALL
            .iter()
            .map(|pt| (*pt, self.is_enabled(*pt)))
            .collect()
    }
}
