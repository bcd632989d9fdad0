// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Placeholder substitution for resolved detections

use std::borrow::Cow;

use super::detector::Detection;

/// Replace every detection carrying a placeholder
///
/// # Arguments
/// * `text` - Original text the detections were found in
/// * `detections` - Disjoint detections; order does not matter
///
/// # Returns
/// Text with each span swapped for its placeholder. Detections without a
/// placeholder are left in place.
pub fn substitute<'a>(text: &'a str, detections: &[Detection]) -> Cow<'a, str> {
    let mut pending: Vec<(&Detection, &str)> = detections
        .iter()
        .filter_map(|d| d.placeholder.as_deref().map(|ph| (d, ph)))
        .collect();

    if pending.is_empty() {
        return Cow::Borrowed(text);
    }

    // Back to front so earlier offsets stay valid
    pending.sort_by(|a, b| b.0.start.cmp(&a.0.start));

    let mut result = text.to_string();
    for (detection, placeholder) in pending {
        result.replace_range(detection.start..detection.end, placeholder);
    }

    Cow::Owned(result)
}
