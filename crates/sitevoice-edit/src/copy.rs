use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::replace_first_match;
use crate::{EditResult, SkipReason};

/// Copy fields of the `app.js` state literal that commands may rewrite.
pub const ALLOWED_FIELDS: [&str; 8] = [
    "eyebrow", "headline", "subhead", "cta", "price", "metric1", "metric2", "metric3",
];

// A single-quoted literal; backslash escapes (including `\'`) stay inside it.
const QUOTED_LITERAL: &str = r"'(?:[^'\\]|\\.)*'";

static FIELD_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    ALLOWED_FIELDS
        .iter()
        .map(|field| {
            let pattern = format!(r"{}:\s*{}", regex::escape(field), QUOTED_LITERAL);
            (*field, Regex::new(&pattern).expect("copy field regex"))
        })
        .collect()
});

static THEME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"theme:\s*{}", QUOTED_LITERAL)).expect("theme regex")
});

/// Escape a value for a single-quoted JavaScript string literal.
pub fn to_safe_js_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn field_pattern(field: &str) -> Option<&'static Regex> {
    FIELD_PATTERNS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, pattern)| pattern)
}

/// `update_copy`: rewrite `<field>: '...'` for an allow-listed field.
pub fn update_copy(content: &str, field: &str, value: &str) -> EditResult {
    let Some(pattern) = field_pattern(field) else {
        return Err(SkipReason::FieldNotEditable(field.to_string()));
    };
    let literal = format!("{}: '{}'", field, to_safe_js_string(value));
    replace_first_match(content, pattern, &literal).ok_or(SkipReason::PatternMissing("copy field"))
}

/// `update_theme`: rewrite `theme: '...'`. Any theme name is accepted.
pub fn update_theme(content: &str, theme: &str) -> EditResult {
    let literal = format!("theme: '{}'", to_safe_js_string(theme));
    replace_first_match(content, &THEME_PATTERN, &literal)
        .ok_or(SkipReason::PatternMissing("theme literal"))
}
