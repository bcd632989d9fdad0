// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Built-in pattern catalog and regex compilation
//
// Patterns compile with the linear-time `regex` engine. Only patterns that
// need look-around fall back to `fancy-regex`, with a bounded backtrack limit.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder, RegexSet};
use tracing::{debug, warn};

use super::config::{CustomPattern, PatternType, DEFAULT_BACKTRACK_LIMIT};
use super::error::{AnonymizerError, Result};

/// Catalog entry: category plus regex source
type PatternDef = (PatternType, &'static str);

/// Built-in detectors. Position is priority: earlier entries win ties.
static CATALOG_PATTERNS: Lazy<Vec<PatternDef>> = Lazy::new(|| {
    vec![
        // Specific formats that broader patterns would otherwise swallow
        (
            PatternType::PrivateKey,
            r"-----BEGIN (?:RSA |EC |DSA |OPENSSH |PGP |ENCRYPTED )?PRIVATE KEY-----[\s\S]*?-----END (?:RSA |EC |DSA |OPENSSH |PGP |ENCRYPTED )?PRIVATE KEY-----",
        ),
        (
            PatternType::Jwt,
            r"\beyJ[A-Za-z0-9_-]{10,}\.eyJ[A-Za-z0-9_-]{10,}\.[A-Za-z0-9_-]{10,}\b",
        ),
        (
            PatternType::ConnectionString,
            r"(?:Server|Data Source|Host|jdbc:[a-z]+:)=[^;\s]+(?:;[^;\s]+)*(?:;(?:Password|Pwd|PWD)=[^;\s]+)",
        ),
        // URLs before hostnames
        (
            PatternType::Url,
            r#"https?://[^\s<>"'{}|\\^`\[\]]+(?:\?[^\s<>"'{}|\\^`\[\]]*)?"#,
        ),
        (
            PatternType::Email,
            r"\b[A-Za-z0-9](?:[A-Za-z0-9._%+-]{0,62}[A-Za-z0-9])?@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}\b",
        ),
        (
            PatternType::Uuid,
            r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[1-5][0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}\b",
        ),
        (
            PatternType::Ipv4,
            r"\b(?:(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])(?:/[0-9]{1,2})?\b",
        ),
        (
            PatternType::Ipv6,
            concat!(
                r"(?:",
                r"(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}|",
                r"(?:[0-9a-fA-F]{1,4}:){6}:[0-9a-fA-F]{1,4}|",
                r"(?:[0-9a-fA-F]{1,4}:){5}(?::[0-9a-fA-F]{1,4}){1,2}|",
                r"(?:[0-9a-fA-F]{1,4}:){4}(?::[0-9a-fA-F]{1,4}){1,3}|",
                r"(?:[0-9a-fA-F]{1,4}:){3}(?::[0-9a-fA-F]{1,4}){1,4}|",
                r"(?:[0-9a-fA-F]{1,4}:){2}(?::[0-9a-fA-F]{1,4}){1,5}|",
                r"(?:[0-9a-fA-F]{1,4}:){1}(?::[0-9a-fA-F]{1,4}){1,6}|",
                r"::(?:[0-9a-fA-F]{1,4}:){0,5}[0-9a-fA-F]{1,4}|",
                r"(?:[0-9a-fA-F]{1,4}:){1,7}:|",
                r"::",
                r")(?:/[0-9]{1,3})?",
            ),
        ),
        (
            PatternType::Hostname,
            concat!(
                r"\b(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+",
                r"(?:com|org|net|edu|gov|mil|int|io|fr|de|uk|eu|es|it|nl|be|ch|at|ca|au|nz|jp|cn|kr|br|ru|in|mx|za",
                r"|local|internal|corp|lan|intra|cloud|app|dev|test|staging|prod|localhost|example|invalid",
                r"|onion|i2p|bit|eth|crypto|web3|xyz|online|site|tech|info|biz|co|me|tv|cc|ws|mobi|name|pro",
                r"|aero|coop|museum|travel|jobs|asia|tel|post|arpa",
                r"|amazonaws|azure|gcp|cloudflare|digitalocean|heroku|vercel|netlify)\b",
            ),
        ),
        (
            PatternType::Mac,
            r"\b(?:[0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}\b|\b[0-9A-Fa-f]{4}\.[0-9A-Fa-f]{4}\.[0-9A-Fa-f]{4}\b",
        ),
        (
            PatternType::Phone,
            concat!(
                r"(?:",
                r"(?:\+|00)[1-9][0-9]{0,3}[\s.-]?[0-9]{1,2}(?:[\s.-]?[0-9]{2}){4}|",
                r"\b0[1-9](?:[\s.-]?[0-9]{2}){4}\b|",
                r"\([0-9]{3}\)[\s.-]?[0-9]{3}[\s.-]?[0-9]{4}|",
                r"\b[0-9]{3}[\s.-][0-9]{3}[\s.-][0-9]{4}\b|",
                r"(?:\+|00)[1-9][0-9]{0,2}[\s.-]?\(?[0-9]{2,4}\)?(?:[\s.-]?[0-9]{2,4}){2,4}",
                r")",
            ),
        ),
        (
            PatternType::ApiKey,
            concat!(
                r"(?:",
                r"(?:api[_-]?key|apikey|api_secret|secret[_-]?key|auth[_-]?token|access[_-]?token",
                r#"|password|passwd|pwd|credentials?|private[_-]?key)[=:\s]+["']?([A-Za-z0-9_\-\.=+/]{16,})["']?|"#,
                r"\b(?:sk|pk|rk|ak)[-_](?:[a-zA-Z]+-)?[a-zA-Z0-9]{16,}\b|",
                r"\b(?:ghp|gho|ghu|ghs|ghr)_[A-Za-z0-9]{36,}\b|",
                r"\bxox[baprs]-[A-Za-z0-9-]{10,}\b|",
                r"\bAIza[A-Za-z0-9_-]{35}\b",
                r")",
            ),
        ),
        (
            PatternType::PathWindows,
            r#"[A-Za-z]:\\(?:[^\\/:*?"<>|\r\n\s]+\\)*[^\\/:*?"<>|\r\n\s]+"#,
        ),
        // Leading context is matched, the path itself is group 1
        (
            PatternType::PathUnix,
            r"(?:^|[^A-Za-z0-9])(/(?:home|var|etc|usr|opt|tmp|root|mnt|srv|data|app|apps?)/[a-zA-Z0-9._/-]+)",
        ),
        (
            PatternType::CreditCard,
            concat!(
                r"\b(?:",
                r"4[0-9]{3}[\s-]?[0-9]{4}[\s-]?[0-9]{4}[\s-]?[0-9]{4}|",
                r"5[1-5][0-9]{2}[\s-]?[0-9]{4}[\s-]?[0-9]{4}[\s-]?[0-9]{4}|",
                r"3[47][0-9]{2}[\s-]?[0-9]{6}[\s-]?[0-9]{5}|",
                r"6(?:011|5[0-9]{2})[\s-]?[0-9]{4}[\s-]?[0-9]{4}[\s-]?[0-9]{4}",
                r")\b",
            ),
        ),
        (
            PatternType::Date,
            concat!(
                r"\b(?:0?[1-9]|[12][0-9]|3[01])[/-](?:0?[1-9]|1[012])[/-](?:19|20)?\d{2}\b|",
                r"\b(?:19|20)\d{2}[/-](?:0?[1-9]|1[012])[/-](?:0?[1-9]|[12][0-9]|3[01])\b",
            ),
        ),
        (
            PatternType::Iban,
            r"\b[A-Z]{2}[0-9]{2}[\s]?(?:[A-Z0-9]{4}[\s]?){2,7}[A-Z0-9]{1,4}\b",
        ),
        // US and French formats
        (
            PatternType::Ssn,
            r"\b(?:[0-9]{3}-[0-9]{2}-[0-9]{4}|[12][0-9]{2}(?:0[1-9]|1[0-2]|[2-9][0-9])(?:0[1-9]|[1-8][0-9]|9[0-8]|2[AB])[0-9]{3}[0-9]{3}[0-9]{2})\b",
        ),
        // u=xxx, user=xxx, xxx@<ipv4>
        (
            PatternType::Username,
            concat!(
                r"(?:",
                r"(?:^|[\s|])u=([a-zA-Z][a-zA-Z0-9_-]{1,31})(?=[\s|,;]|$)|",
                r#"(?:user|username|usr|login)[=:\s]+["']?([a-zA-Z][a-zA-Z0-9_.-]{1,63})["']?|"#,
                r"(?:^|[\s]|\\r\\n|\\n)([a-zA-Z][a-zA-Z0-9_-]{1,31})@(?=\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})",
                r")",
            ),
        ),
        // Ansible-style host markers and recap lines
        (
            PatternType::ServerName,
            concat!(
                r"(?:",
                r"(?:fatal|ok|changed|unreachable|failed|skipped|rescued|ignored):\s*\[([A-Za-z][A-Za-z0-9_-]{2,})\]|",
                r"\[([A-Z][A-Z0-9_-]*(?:-[A-Za-z0-9_]+)+)\]|",
                r"(?:^|\|)\s*([A-Z][A-Z0-9]*(?:-[A-Za-z0-9_]+)+)\s*(?=[|:]|\s+ok=)",
                r")",
            ),
        ),
    ]
});

/// A compiled pattern on whichever engine could accept it
#[derive(Debug)]
pub enum CompiledRegex {
    Linear(Regex),
    Backtracking(fancy_regex::Regex),
}

impl CompiledRegex {
    /// Compile case-insensitively, falling back to the backtracking engine
    /// only when the linear engine rejects the syntax
    pub fn compile(pattern: &str, backtrack_limit: usize) -> Result<Self> {
        match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => Ok(CompiledRegex::Linear(regex)),
            Err(_) => fancy_regex::RegexBuilder::new(&format!("(?i){}", pattern))
                .backtrack_limit(backtrack_limit)
                .build()
                .map(CompiledRegex::Backtracking)
                .map_err(|e| AnonymizerError::PatternCompile {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, CompiledRegex::Linear(_))
    }

    /// Byte spans of every match in `text`
    ///
    /// A match with capture groups yields the first non-empty group instead
    /// of the whole match. Empty spans are dropped. A backtracking pattern
    /// that exceeds its step budget stops early and keeps what it found.
    pub fn spans(&self, text: &str) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();

        match self {
            CompiledRegex::Linear(regex) => {
                for caps in regex.captures_iter(text) {
                    let group = (1..caps.len())
                        .filter_map(|i| caps.get(i))
                        .find(|m| !m.is_empty())
                        .or_else(|| caps.get(0));
                    if let Some(m) = group {
                        if !m.is_empty() {
                            spans.push((m.start(), m.end()));
                        }
                    }
                }
            }
            CompiledRegex::Backtracking(regex) => {
                for caps in regex.captures_iter(text) {
                    let caps = match caps {
                        Ok(caps) => caps,
                        Err(e) => {
                            warn!(pattern = regex.as_str(), error = %e, "pattern aborted");
                            break;
                        }
                    };
                    let group = (1..caps.len())
                        .filter_map(|i| caps.get(i))
                        .find(|m| m.start() < m.end())
                        .or_else(|| caps.get(0));
                    if let Some(m) = group {
                        if m.start() < m.end() {
                            spans.push((m.start(), m.end()));
                        }
                    }
                }
            }
        }

        spans
    }
}

/// Compiled catalog entry
#[derive(Debug)]
pub struct CatalogPattern {
    pub pattern_type: PatternType,
    pub regex: CompiledRegex,
    // Index into the prefilter set, linear patterns only
    set_index: Option<usize>,
}

/// Compiled built-in catalog with a `RegexSet` prefilter
pub struct Catalog {
    pub patterns: Vec<CatalogPattern>,
    prefilter: Option<RegexSet>,
}

/// Process-wide catalog, compiled on first use and read-only afterwards
pub static CATALOG: Lazy<Catalog> = Lazy::new(|| Catalog::compile(DEFAULT_BACKTRACK_LIMIT));

impl Catalog {
    /// Compile every catalog pattern, skipping any that fail
    pub fn compile(backtrack_limit: usize) -> Self {
        let mut patterns = Vec::with_capacity(CATALOG_PATTERNS.len());
        let mut set_sources = Vec::new();

        for (pattern_type, source) in CATALOG_PATTERNS.iter() {
            match CompiledRegex::compile(source, backtrack_limit) {
                Ok(regex) => {
                    let set_index = if regex.is_linear() {
                        set_sources.push(format!("(?i){}", source));
                        Some(set_sources.len() - 1)
                    } else {
                        None
                    };
                    patterns.push(CatalogPattern {
                        pattern_type: *pattern_type,
                        regex,
                        set_index,
                    });
                }
                Err(e) => warn!(pattern_type = %pattern_type, error = %e, "skipping catalog pattern"),
            }
        }

        // Without a prefilter every pattern simply runs
        let prefilter = match RegexSet::new(&set_sources) {
            Ok(set) => Some(set),
            Err(e) => {
                warn!(error = %e, "catalog prefilter unavailable");
                None
            }
        };

        debug!(
            patterns = patterns.len(),
            prefiltered = set_sources.len(),
            "compiled pattern catalog"
        );

        Self {
            patterns,
            prefilter,
        }
    }

    /// Catalog patterns, in priority order, that can match `text`
    pub fn candidates(&self, text: &str) -> Vec<&CatalogPattern> {
        let matched = self.prefilter.as_ref().map(|set| set.matches(text));

        self.patterns
            .iter()
            .filter(|p| match (&matched, p.set_index) {
                (Some(matched), Some(idx)) => matched.matched(idx),
                _ => true,
            })
            .collect()
    }
}

/// Custom pattern ready to run
#[derive(Debug)]
pub struct CompiledCustomPattern {
    pub regex: CompiledRegex,
    pub prefix: String,
}

/// Check that `pattern` compiles on either engine
pub fn compile_pattern(pattern: &str) -> Result<()> {
    CompiledRegex::compile(pattern, DEFAULT_BACKTRACK_LIMIT).map(|_| ())
}

/// Compile custom patterns in registration order; malformed ones are skipped
pub fn compile_custom_patterns(
    patterns: &[CustomPattern],
    backtrack_limit: usize,
) -> Vec<CompiledCustomPattern> {
    patterns
        .iter()
        .filter_map(
            |custom| match CompiledRegex::compile(&custom.regex, backtrack_limit) {
                Ok(regex) => Some(CompiledCustomPattern {
                    regex,
                    prefix: custom.prefix.clone(),
                }),
                Err(e) => {
                    warn!(prefix = %custom.prefix, error = %e, "skipping custom pattern");
                    None
                }
            },
        )
        .collect()
}
