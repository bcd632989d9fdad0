// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Log Anonymizer - Rust Implementation
//
// Reversible anonymization of logs and config dumps:
// - Linear-time regex catalog with a RegexSet prefilter
// - Interval-based overlap resolution (longest / earliest wins)
// - Stable [PREFIX_NNN] placeholders with JSON session export

pub mod config;
pub mod detector;
pub mod engine;
pub mod enhancer;
pub mod error;
pub mod highlight;
pub mod masking;
pub mod patterns;
pub mod preset;
#[cfg(feature = "python")]
pub mod python;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod validation;

pub use config::{AnonymizerConfig, CustomPattern, EnhancerConfig, PatternType};
pub use detector::Detection;
pub use engine::{anonymize_text, AnonymizationResult, AnonymizeOptions, Anonymizer, PreviewResult};
pub use enhancer::{Enhancer, EnhancerKind, EnhancerResult, EntropyEnhancer};
pub use error::{AnonymizerError, Result};
pub use preset::{Preset, PresetLibrary, PresetSource};
#[cfg(feature = "python")]
pub use python::AnonymizerRust;
pub use session::{ExportFormat, SessionState};
