// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Error types for the anonymization engine

use thiserror::Error;

/// Errors surfaced by the anonymization engine.
///
/// None of these abort an `anonymize`/`detect` run: pattern failures are
/// logged and the pattern is skipped, import failures leave the current
/// state untouched.
#[derive(Error, Debug)]
pub enum AnonymizerError {
    #[error("Failed to compile pattern '{pattern}': {reason}")]
    PatternCompile { pattern: String, reason: String },

    #[error("Invalid session state: {0}")]
    StateImport(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Unknown pattern type: {0}")]
    UnknownPatternType(String),

    #[error("Invalid placeholder prefix: '{0}'")]
    InvalidPrefix(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using `AnonymizerError`.
pub type Result<T> = std::result::Result<T, AnonymizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AnonymizerError::UnknownPreset("kubernetes".to_string());
        assert_eq!(err.to_string(), "Unknown preset: kubernetes");

        let err = AnonymizerError::PatternCompile {
            pattern: "(".to_string(),
            reason: "unclosed group".to_string(),
        };
        assert!(err.to_string().contains("'('"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: AnonymizerError = parse.unwrap_err().into();
        assert!(matches!(err, AnonymizerError::Json(_)));
    }
}
