//! `{{key}}` placeholder rendering for embed text and email bodies.

use std::collections::HashMap;

/// Replaces every `{{key}}` placeholder in `template` with its value from `vars`.
///
/// Whitespace inside the braces is ignored, so `{{ image.name }}` matches the key
/// `image.name`. Placeholders with no matching key are left untouched, as is an
/// unterminated `{{`.
pub fn render(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = after_open[..end].trim();
        match vars.get(key) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }

        rest = &after_open[end + 2..];
    }

    out.push_str(rest);
    out
}

/// Formats a byte count using binary units with one decimal, e.g. `1.5 MiB`.
///
/// Values under 1 KiB are printed as whole bytes.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", value, UNITS[unit])
}
