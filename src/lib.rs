// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Reversible log anonymizer
// Optional PyO3 bindings behind the `python` feature

// PyO3 macro expansion can trip non_local_definitions on some toolchains
#![cfg_attr(feature = "python", allow(non_local_definitions))]

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod anonymizer;

/// Python module: anonymizer_rust
///
/// # Examples
///
/// ```python
/// from anonymizer_rust import AnonymizerRust
///
/// anonymizer = AnonymizerRust({"preserve_list": ["localhost"]})
/// result = anonymizer.anonymize("User alice@example.com logged in from 192.168.1.5")
/// print(result["anonymized_text"])  # "User [EMAIL_001] logged in from [IP_001]"
///
/// original = anonymizer.deanonymize(result["anonymized_text"])
/// state = anonymizer.get_session_state()  # JSON string, reload with load_session_state()
/// ```
#[cfg(feature = "python")]
#[pymodule]
fn anonymizer_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<anonymizer::AnonymizerRust>()?;

    // Module metadata
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add(
        "__doc__",
        "Reversible anonymization of logs with stable placeholders",
    )?;

    Ok(())
}
