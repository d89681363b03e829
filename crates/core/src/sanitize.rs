//! Free-text input sanitization.
//!
//! All user-supplied text that ends up on a public page (testimonials,
//! profile names) passes through [`sanitize_text`] before it is stored.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));

static SPACES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("valid whitespace regex"));

static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank-line regex"));

/// Strip markup and control characters from `input` and bound its length.
///
/// - HTML/XML tags are removed (their text content is kept).
/// - Control characters are dropped, except `\n` and `\t`; `\r\n` becomes `\n`.
/// - Runs of spaces/tabs collapse to one space; more than one blank line
///   collapses to a single blank line.
/// - Leading/trailing whitespace is trimmed.
/// - The result is truncated to `max_chars` characters.
pub fn sanitize_text(input: &str, max_chars: usize) -> String {
    let normalized = input.replace("\r\n", "\n");
    let without_tags = TAG_RE.replace_all(&normalized, "");
    let without_controls: String = without_tags
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();
    let collapsed = SPACES_RE.replace_all(&without_controls, " ");
    let collapsed = BLANK_LINES_RE.replace_all(&collapsed, "\n\n");

    collapsed.trim().chars().take(max_chars).collect::<String>().trim_end().to_string()
}

/// Sanitize a single-line field (names, titles): newlines become spaces.
pub fn sanitize_line(input: &str, max_chars: usize) -> String {
    sanitize_text(&input.replace(['\n', '\r', '\t'], " "), max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_but_keeps_text() {
        assert_eq!(
            sanitize_text("<b>Excelente</b> <script>alert(1)</script>curso", 100),
            "Excelente alert(1)curso"
        );
    }

    #[test]
    fn drops_control_characters() {
        assert_eq!(sanitize_text("Hola\u{0}\u{7} mundo", 100), "Hola mundo");
    }

    #[test]
    fn collapses_whitespace_and_blank_lines() {
        assert_eq!(
            sanitize_text("  uno    dos\r\n\r\n\r\n\r\ntres  ", 100),
            "uno dos\n\ntres"
        );
    }

    #[test]
    fn truncates_by_characters_not_bytes() {
        assert_eq!(sanitize_text("ñañaña", 3), "ñañ");
    }

    #[test]
    fn line_fields_lose_newlines() {
        assert_eq!(sanitize_line("Ana\nMaría", 50), "Ana María");
    }
}
