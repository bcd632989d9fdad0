// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// PyO3 bindings for the anonymization engine

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use std::collections::{BTreeMap, HashMap};

use super::config::{AnonymizerConfig, CustomPattern, EnhancerConfig, PatternType};
use super::detector::{char_spans, Detection};
use super::engine::Anonymizer;
use super::enhancer::EnhancerKind;
use super::error::AnonymizerError;
use super::preset::Preset;
use super::session::ExportFormat;

impl From<AnonymizerError> for PyErr {
    fn from(err: AnonymizerError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// Anonymizer exposed to Python
///
/// # Example (Python)
/// ```python
/// from anonymizer_rust import AnonymizerRust
///
/// anonymizer = AnonymizerRust({"enabled_patterns": {"hostname": False}})
/// result = anonymizer.anonymize("User alice@example.com logged in from 192.168.1.5")
/// print(result["anonymized_text"])  # "User [EMAIL_001] logged in from [IP_001]"
/// print(result["stats"])            # {"email": 1, "ipv4": 1}
///
/// print(anonymizer.export_mappings("text"))
/// ```
#[pyclass(unsendable)]
pub struct AnonymizerRust {
    inner: Anonymizer,
}

#[pymethods]
impl AnonymizerRust {
    /// Create a new anonymizer
    ///
    /// # Configuration Keys
    /// * `enabled_patterns` (dict[str, bool]): Per-type flags, missing types stay enabled
    /// * `custom_patterns` (list[tuple[str, str]]): `(regex, prefix)` pairs
    /// * `preserve_list` (list[str]): Values never anonymized
    /// * `enhancers` (dict[str, dict]): `{"enabled": bool, "confidence_threshold": float}` per name
    /// * `entropy_enhancer` (bool): Register the built-in entropy enhancer
    /// * `backtrack_limit` (int): Step budget for look-around patterns
    /// * `log_detections` (bool): Emit a debug event per detection
    #[new]
    #[pyo3(signature = (config_dict=None))]
    pub fn new(config_dict: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let (config, entropy) = match config_dict {
            Some(dict) => config_from_py_dict(dict).map_err(|e| {
                PyValueError::new_err(format!("Invalid config: {}", e))
            })?,
            None => (AnonymizerConfig::default(), false),
        };

        let mut inner = Anonymizer::with_config(config);
        if entropy {
            inner.register_builtin_enhancer(EnhancerKind::Entropy);
        }
        Ok(Self { inner })
    }

    /// Anonymize text
    ///
    /// # Returns
    /// ```python
    /// {
    ///     "anonymized_text": "User [EMAIL_001] ...",
    ///     "mappings": {"alice@example.com": "[EMAIL_001]"},
    ///     "stats": {"email": 1},
    ///     "detections": [{"value": ..., "pattern_type": "email", "start": 5, "end": 22,
    ///                     "prefix": "EMAIL", "placeholder": "[EMAIL_001]"}]
    /// }
    /// ```
    ///
    /// `start`/`end` are character offsets, so `text[start:end] == value`.
    pub fn anonymize<'py>(&mut self, py: Python<'py>, text: &str) -> PyResult<Bound<'py, PyDict>> {
        let result = self.inner.anonymize(text);

        let out = PyDict::new(py);
        out.set_item("anonymized_text", result.anonymized_text)?;
        out.set_item("mappings", result.mappings)?;
        out.set_item("stats", stats_to_py(&result.stats))?;
        out.set_item("detections", detections_to_py(py, text, &result.detections)?)?;
        Ok(out)
    }

    /// Detections, stats and highlighted HTML without changing mappings
    pub fn preview<'py>(&self, py: Python<'py>, text: &str) -> PyResult<Bound<'py, PyDict>> {
        let preview = self.inner.preview(text);
        let html = super::highlight::render_html(text, &preview.detections);

        let out = PyDict::new(py);
        out.set_item("detections", detections_to_py(py, text, &preview.detections)?)?;
        out.set_item("stats", stats_to_py(&preview.stats))?;
        out.set_item("highlighted_html", html)?;
        Ok(out)
    }

    pub fn deanonymize(&self, text: &str) -> String {
        self.inner.deanonymize(text)
    }

    pub fn set_pattern_enabled(&mut self, pattern_type: &str, enabled: bool) -> PyResult<()> {
        let pattern_type: PatternType = pattern_type.parse()?;
        self.inner.set_pattern_enabled(pattern_type, enabled);
        Ok(())
    }

    #[pyo3(signature = (regex, prefix="CUSTOM"))]
    pub fn add_custom_pattern(&mut self, regex: &str, prefix: &str) -> PyResult<()> {
        Ok(self.inner.add_custom_pattern(regex, prefix)?)
    }

    pub fn clear_custom_patterns(&mut self) {
        self.inner.clear_custom_patterns();
    }

    pub fn add_preserve_value(&mut self, value: &str) {
        self.inner.add_preserve_value(value);
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Export mappings as `"json"` or the plain-text table
    #[pyo3(signature = (format="text"))]
    pub fn export_mappings(&self, format: &str) -> PyResult<String> {
        Ok(self.inner.export_mappings(ExportFormat::from_name(format))?)
    }

    /// Replace mappings from a JSON export; `False` leaves them untouched
    pub fn import_mappings(&mut self, data: &str) -> bool {
        self.inner.import_mappings(data).is_ok()
    }

    /// Full session state as a JSON string
    pub fn get_session_state(&self) -> PyResult<String> {
        Ok(self.inner.export_session()?)
    }

    pub fn load_session_state(&mut self, data: &str) -> bool {
        self.inner.import_session(data).is_ok()
    }

    /// Apply a preset given as a JSON object
    pub fn apply_preset_json(&mut self, data: &str) -> bool {
        match serde_json::from_str::<Preset>(data) {
            Ok(preset) => {
                self.inner.apply_preset(&preset);
                true
            }
            Err(_) => false,
        }
    }
}

/// Build a configuration from a Python dict; also returns whether the
/// entropy enhancer was requested
fn config_from_py_dict(dict: &Bound<'_, PyDict>) -> PyResult<(AnonymizerConfig, bool)> {
    let mut config = AnonymizerConfig::default();
    let mut entropy = false;

    if let Some(value) = dict.get_item("enabled_patterns")? {
        let flags: HashMap<String, bool> = value.extract()?;
        for (id, enabled) in flags {
            let pattern_type: PatternType = id.parse()?;
            config.enabled_patterns.insert(pattern_type, enabled);
        }
    }

    if let Some(value) = dict.get_item("custom_patterns")? {
        let pairs: Vec<(String, String)> = value.extract()?;
        for (regex, prefix) in pairs {
            config.custom_patterns.push(CustomPattern::new(regex, prefix)?);
        }
    }

    if let Some(value) = dict.get_item("preserve_list")? {
        config.preserve_list = value.extract()?;
    }

    if let Some(value) = dict.get_item("enhancers")? {
        let enhancers = value.downcast::<PyDict>()?;
        for (name, settings) in enhancers.iter() {
            let name: String = name.extract()?;
            let settings = settings.downcast::<PyDict>()?;
            let mut enhancer = EnhancerConfig::default();
            if let Some(enabled) = settings.get_item("enabled")? {
                enhancer.enabled = enabled.extract()?;
            }
            if let Some(threshold) = settings.get_item("confidence_threshold")? {
                enhancer.confidence_threshold = threshold.extract()?;
            }
            config.enhancers.insert(name, enhancer);
        }
    }

    if let Some(value) = dict.get_item("entropy_enhancer")? {
        entropy = value.extract()?;
    }

    if let Some(value) = dict.get_item("backtrack_limit")? {
        config.backtrack_limit = value.extract()?;
    }

    if let Some(value) = dict.get_item("log_detections")? {
        config.log_detections = value.extract()?;
    }

    Ok((config, entropy))
}

fn stats_to_py(stats: &BTreeMap<PatternType, usize>) -> BTreeMap<&'static str, usize> {
    stats
        .iter()
        .map(|(pattern_type, count)| (pattern_type.as_str(), *count))
        .collect()
}

/// Detections as dicts; offsets are converted from bytes to characters
fn detections_to_py<'py>(
    py: Python<'py>,
    text: &str,
    detections: &[Detection],
) -> PyResult<Bound<'py, PyList>> {
    let py_list = PyList::empty(py);

    for (detection, (start, end)) in detections.iter().zip(char_spans(text, detections)) {
        let item_dict = PyDict::new(py);
        item_dict.set_item("value", &detection.value)?;
        item_dict.set_item("pattern_type", detection.pattern_type.as_str())?;
        item_dict.set_item("prefix", &detection.prefix)?;
        item_dict.set_item("start", start)?;
        item_dict.set_item("end", end)?;
        item_dict.set_item("placeholder", detection.placeholder.as_deref())?;

        py_list.append(item_dict)?;
    }

    Ok(py_list)
}
