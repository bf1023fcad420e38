//! Action appliers: pure text transformations over the site documents.
//!
//! Every applier takes the current document text and returns the new text, or
//! a [`SkipReason`] when the action cannot change it. Substitutions are
//! pattern based against the known document shapes; nothing is parsed.

pub mod apply;
pub mod copy;
pub mod markup;
pub mod page;
pub mod styles;
pub mod text;

pub use apply::{apply, synthesize_page};
pub use copy::{to_safe_js_string, update_copy, update_theme, ALLOWED_FIELDS};
pub use page::{build_page_template, PageSpec};

pub use sitevoice_types::SkipReason;

/// Outcome of one applier call.
pub type EditResult = Result<String, SkipReason>;
