// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Detector engine: turns text into raw candidate spans

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::config::PatternType;
use super::patterns::{CompiledCustomPattern, CATALOG};

/// A single sensitive span in the scanned text
///
/// `start`/`end` are UTF-8 byte offsets (half-open) into the original text
/// and `value == text[start..end]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub value: String,
    pub pattern_type: PatternType,
    pub prefix: String,
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl Detection {
    pub fn new(
        text: &str,
        pattern_type: PatternType,
        prefix: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            value: text[start..end].to_string(),
            pattern_type,
            prefix: prefix.into(),
            start,
            end,
            placeholder: None,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn overlaps(&self, other: &Detection) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Run every detector over `text`, returning candidates in offer order:
/// enhancer detections, then catalog patterns in priority order, then
/// custom patterns in registration order.
///
/// Disabled catalog categories are skipped. Registered custom patterns
/// always run.
pub fn run_detectors<F>(
    text: &str,
    is_enabled: F,
    custom_patterns: &[CompiledCustomPattern],
    enhancer_detections: Vec<Detection>,
) -> Vec<Detection>
where
    F: Fn(PatternType) -> bool,
{
    let mut candidates = enhancer_detections;

    for pattern in CATALOG.candidates(text) {
        if !is_enabled(pattern.pattern_type) {
            continue;
        }
        for (start, end) in pattern.regex.spans(text) {
            candidates.push(Detection::new(
                text,
                pattern.pattern_type,
                pattern.pattern_type.prefix(),
                start,
                end,
            ));
        }
    }

    for custom in custom_patterns {
        for (start, end) in custom.regex.spans(text) {
            candidates.push(Detection::new(
                text,
                PatternType::Custom,
                custom.prefix.as_str(),
                start,
                end,
            ));
        }
    }

    trace!(candidates = candidates.len(), "detectors finished");
    candidates
}

/// `(start, end)` of each detection in Unicode scalar values instead of bytes
///
/// One forward pass when detections are sorted by start.
pub fn char_spans(text: &str, detections: &[Detection]) -> Vec<(usize, usize)> {
    let mut byte_pos = 0usize;
    let mut char_pos = 0usize;
    let mut advance = |to: usize| {
        if to < byte_pos {
            byte_pos = 0;
            char_pos = 0;
        }
        char_pos += text[byte_pos..to].chars().count();
        byte_pos = to;
        char_pos
    };

    detections
        .iter()
        .map(|d| {
            let start = advance(d.start);
            let end = advance(d.end);
            (start, end)
        })
        .collect()
}
