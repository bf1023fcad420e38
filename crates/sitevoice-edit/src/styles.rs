use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::replace_first_match;
use crate::{EditResult, SkipReason};

const MONETIZATION_RULES: &str = "\n\n.monetization {\n  background: linear-gradient(180deg, rgba(255, 255, 255, 0.05), transparent);\n  border-top: 1px solid rgba(255, 255, 255, 0.06);\n}\n";

static BACKGROUND_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"background-image:\s*url\([^)]*\)").expect("background-image regex")
});

/// Companion rules for the monetization block, appended once.
pub fn ensure_monetization_styles(content: &str) -> EditResult {
    if content.contains(".monetization") {
        return Err(SkipReason::AlreadyPresent(".monetization".to_string()));
    }
    Ok(format!("{}{}", content, MONETIZATION_RULES))
}

/// `update_wallpaper`: repoint the first `background-image: url(...)`, or add
/// a body rule when the stylesheet has none.
pub fn update_wallpaper(content: &str, src: &str) -> EditResult {
    if src.is_empty() {
        return Err(SkipReason::MissingParameter("src"));
    }
    let value = format!("background-image: url(\"{}\")", src);
    if content.contains("background-image: url(") {
        if let Some(updated) = replace_first_match(content, &BACKGROUND_IMAGE, &value) {
            return Ok(updated);
        }
    }
    Ok(format!(
        "{}\nbody {{ {}; background-size: cover; background-repeat: no-repeat; }}\n",
        content, value
    ))
}

/// `inject_css`: append raw CSS. Not idempotent.
pub fn inject_css(content: &str, css: &str) -> EditResult {
    if css.is_empty() {
        return Err(SkipReason::MissingParameter("css"));
    }
    Ok(format!("{}\n\n/* Voice-injected styles */\n{}\n", content, css))
}
