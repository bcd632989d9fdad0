// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Named configuration presets

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use super::config::{CustomPattern, PatternType};
use super::error::Result;

/// Custom pattern as written in preset documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetCustomPattern {
    #[serde(default)]
    pub regex: String,
    #[serde(default)]
    pub prefix: String,
}

/// A named bundle of enabled types, preserved values and custom patterns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub preserve: Vec<String>,
    #[serde(default)]
    pub custom_patterns: Vec<PresetCustomPattern>,
}

impl Preset {
    /// Known pattern types named by the preset; unknown ids are skipped
    pub fn pattern_types(&self) -> Vec<PatternType> {
        self.patterns
            .iter()
            .filter_map(|id| match id.parse::<PatternType>() {
                Ok(pt) => Some(pt),
                Err(_) => {
                    warn!(preset = %self.id, pattern_type = %id, "ignoring unknown pattern type in preset");
                    None
                }
            })
            .collect()
    }

    /// Usable custom patterns; entries with an empty or invalid field are skipped
    pub fn valid_custom_patterns(&self) -> Vec<CustomPattern> {
        self.custom_patterns
            .iter()
            .filter(|cp| !cp.regex.is_empty() && !cp.prefix.is_empty())
            .filter_map(|cp| match CustomPattern::new(cp.regex.clone(), cp.prefix.clone()) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!(preset = %self.id, error = %e, "ignoring custom pattern in preset");
                    None
                }
            })
            .collect()
    }

    pub fn preserve_values(&self) -> Vec<String> {
        self.preserve
            .iter()
            .filter(|v| !v.is_empty())
            .cloned()
            .collect()
    }
}

/// Lookup of presets by id
pub trait PresetSource {
    fn get(&self, id: &str) -> Option<Preset>;
}

/// In-memory preset collection
#[derive(Debug, Clone, Default)]
pub struct PresetLibrary {
    presets: BTreeMap<String, Preset>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PresetDocument {
    Many(Vec<Preset>),
    One(Preset),
}

impl PresetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load presets from a JSON array of presets or a single preset object
    pub fn from_json(data: &str) -> Result<Self> {
        let mut library = Self::new();
        match serde_json::from_str::<PresetDocument>(data)? {
            PresetDocument::Many(presets) => {
                for preset in presets {
                    library.insert(preset);
                }
            }
            PresetDocument::One(preset) => {
                library.insert(preset);
            }
        }
        Ok(library)
    }

    /// Add or replace a preset; presets without an id are refused
    pub fn insert(&mut self, preset: Preset) -> bool {
        if preset.id.is_empty() {
            warn!("refusing preset without id");
            return false;
        }
        self.presets.insert(preset.id.clone(), preset);
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<Preset> {
        self.presets.remove(id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.presets.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl PresetSource for PresetLibrary {
    fn get(&self, id: &str) -> Option<Preset> {
        self.presets.get(id).cloned()
    }
}
