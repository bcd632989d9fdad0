// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// HTML rendering of detections for previews

use super::detector::Detection;

/// Escape text for inline HTML display, keeping line breaks and spacing
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            ' ' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render `text` with each detection wrapped in a `<span class="detection">`
///
/// `detections` must be disjoint and sorted by start, as returned by the
/// resolver.
pub fn render_html(text: &str, detections: &[Detection]) -> String {
    let mut html = String::with_capacity(text.len() * 2);
    let mut last_end = 0;

    for detection in detections {
        if detection.start > last_end {
            html.push_str(&escape_html(&text[last_end..detection.start]));
        }
        let type_id = detection.pattern_type.as_str();
        html.push_str(&format!(
            "<span class=\"detection\" data-type=\"{}\" title=\"{}\">{}</span>",
            type_id,
            type_id.to_ascii_uppercase(),
            escape_html(&detection.value)
        ));
        last_end = detection.end;
    }

    if last_end < text.len() {
        html.push_str(&escape_html(&text[last_end..]));
    }

    html
}
