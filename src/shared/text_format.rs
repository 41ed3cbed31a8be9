use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[　\s]+").unwrap());

/// Canonicalize an organization name into a lookup key.
///
/// NFKC folds full-width alphanumerics to half-width, then every whitespace
/// class (ideographic space and tabs included) is removed without a separator.
pub fn normalize_key(text: &str) -> String {
    let folded: String = text.nfkc().collect();
    let stripped = WHITESPACE_PATTERN.replace_all(&folded, "");
    // Marks that whitespace kept apart may compose once it is gone.
    stripped.nfkc().collect()
}

/// Trim and collapse whitespace runs into single spaces
pub fn clean_text(text: &str) -> String {
    WHITESPACE_PATTERN
        .replace_all(text.trim(), " ")
        .into_owned()
}

/// Strip embedded line breaks from a table cell
pub fn strip_line_breaks(text: &str) -> String {
    text.replace(['\n', '\r'], "")
}

/// Format a duration as `HHh MMm SSs`
pub fn format_elapsed(elapsed: std::time::Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}
