//! Filename and label helpers for participant names

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\-]").expect("valid regex"));
static UNDERSCORE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").expect("valid regex"));

/// Convert a free-text name into a filename-safe token
///
/// Spaces become underscores, anything that is not a word character, `_` or
/// `-` is dropped, and runs of underscores collapse to one.
pub fn sanitize_filename(name: &str) -> String {
    let spaced = name.replace(' ', "_");
    let stripped = DISALLOWED.replace_all(&spaced, "");
    UNDERSCORE_RUNS.replace_all(&stripped, "_").into_owned()
}

/// Shorten a name for printing on a badge
///
/// Names up to `max_chars` are kept. Longer names keep `keep_chars`
/// characters followed by `...`.
pub fn display_name(name: &str, max_chars: usize, keep_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let head: String = name.chars().take(keep_chars).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_punctuation() {
        assert_eq!(sanitize_filename("O'Brien  Singh!!"), "OBrien_Singh");
    }

    #[test]
    fn test_sanitize_keeps_hyphen_and_digits() {
        assert_eq!(sanitize_filename("Mary-Jane 2nd"), "Mary-Jane_2nd");
    }

    #[test]
    fn test_sanitize_collapses_underscores() {
        assert_eq!(sanitize_filename("A _ _ B"), "A_B");
        assert_eq!(sanitize_filename("a__b"), "a_b");
    }

    #[test]
    fn test_sanitize_keeps_unicode_letters() {
        assert_eq!(sanitize_filename("Zoë Ålund"), "Zoë_Ålund");
    }

    #[test]
    fn test_display_name_short_names_untouched() {
        assert_eq!(display_name("Short Name", 30, 27), "Short Name");
        let exact: String = "x".repeat(30);
        assert_eq!(display_name(&exact, 30, 27), exact);
    }

    #[test]
    fn test_display_name_truncates() {
        let long = "abcdefghijklmnopqrstuvwxyz0123456789";
        assert_eq!(
            display_name(long, 30, 27),
            "abcdefghijklmnopqrstuvwxyz0..."
        );
        assert_eq!(
            display_name(long, 30, 30),
            "abcdefghijklmnopqrstuvwxyz0123..."
        );
    }
}
