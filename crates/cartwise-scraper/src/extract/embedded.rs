//! Strategy 2: embedded page-state JSON.
//!
//! Scans the raw HTML for `<script type="application/ld+json">` bodies and
//! for inline assignments of well-known client-state globals, parses each as
//! JSON, and feeds the roots through the same recursive walk as the
//! captured-network strategy.

use regex::Regex;
use serde_json::Value;

use cartwise_core::Deal;

use crate::builder::DealContext;
use crate::walk::walk_value;

use super::ExtractOptions;

const STATE_GLOBALS: [&str; 4] = [
    "window.__NEXT_DATA__",
    "window.__NUXT__",
    "window.__PRELOADED_STATE__",
    "window.__INITIAL_STATE__",
];

pub(super) fn extract(html: &str, ctx: &DealContext<'_>, options: &ExtractOptions) -> Vec<Deal> {
    let mut out = Vec::new();
    for root in embedded_json_roots(html) {
        let mut budget = options.max_walk_nodes;
        walk_value(&root, ctx, &mut budget, &mut out);
        if budget == 0 {
            tracing::debug!("embedded page-state payload exhausted the walk budget");
        }
    }
    out
}

fn embedded_json_roots(html: &str) -> Vec<Value> {
    let script_re = Regex::new(
        r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#,
    )
    .expect("valid regex");

    let mut roots = Vec::new();

    for cap in script_re.captures_iter(html) {
        let json_text = match cap.get(1) {
            Some(m) => m.as_str(),
            None => continue,
        };
        match serde_json::from_str::<Value>(json_text) {
            Ok(value) => roots.push(value),
            // Malformed block: skip it, keep scanning the rest of the page.
            Err(_) => continue,
        }
    }

    for marker in STATE_GLOBALS {
        for fragment in assigned_objects(html, marker) {
            if let Ok(value) = serde_json::from_str::<Value>(fragment) {
                roots.push(value);
            }
        }
    }

    roots
}

/// Find every `<marker> = {…}` assignment in the page and return the balanced
/// object literal for each.
fn assigned_objects<'a>(html: &'a str, marker: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut from = 0;

    while let Some(rel_pos) = html[from..].find(marker) {
        let after_marker = from + rel_pos + marker.len();
        from = after_marker;

        let rest = html[after_marker..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        if let Some(object) = extract_balanced_object(rest.trim_start()) {
            found.push(object);
        }
    }

    found
}

/// Try to extract a balanced JSON object from the start of `s`.
///
/// Scans character-by-character tracking brace depth, respecting string
/// literals and escape sequences. Returns the shortest prefix of `s` that
/// forms a complete `{…}` object, or `None` if it is unterminated. Only `}`
/// (not `]`) at depth 0 triggers a return, so malformed input like `{42]` is
/// never accepted.
fn extract_balanced_object(s: &str) -> Option<&str> {
    if !s.starts_with('{') {
        return None;
    }
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape = false;
    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            ']' => depth -= 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
