//! Input sanitization and HTML escaping.
//!
//! Sanitizing cleans text before it is stored or checked. Escaping prepares
//! text for display. The two are independent and the field validators only
//! sanitize.

use crate::raw::RawInput;
use regex::Regex;
use std::sync::OnceLock;

/// Maximum length of sanitized text, in characters.
pub const MAX_SANITIZED_LEN: usize = 1000;

/// Maximum number of ids kept by [`sanitize_id_list`].
pub const MAX_ID_LIST_LEN: usize = 100;

static ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn id_regex() -> &'static Regex {
    ID_REGEX.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap())
}

fn is_ascii_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{1F}' | '\u{7F}')
}

/// Replace every run of whitespace with a single space.
pub(crate) fn collapse_whitespace(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.chars() {
        if c.is_whitespace() {
            if !in_run {
                output.push(' ');
                in_run = true;
            }
        } else {
            output.push(c);
            in_run = false;
        }
    }
    output
}

/// Clean up free text.
///
/// Trims, strips ASCII control characters, collapses whitespace runs to a
/// single space and caps the result at [`MAX_SANITIZED_LEN`] characters.
/// Whitespace left at either edge by the stripping or the cap is trimmed too,
/// so `sanitize(&sanitize(x)) == sanitize(x)`.
pub fn sanitize(input: &str) -> String {
    let stripped: String = input
        .trim()
        .chars()
        .filter(|c| !is_ascii_control(*c))
        .collect();
    let collapsed = collapse_whitespace(&stripped);
    let capped: String = collapsed.chars().take(MAX_SANITIZED_LEN).collect();
    capped.trim().to_string()
}

/// Sanitize a raw form value. Anything that is not text yields `""`.
pub fn sanitize_raw(input: &RawInput) -> String {
    input.as_text().map(sanitize).unwrap_or_default()
}

/// Escape HTML and attribute special characters for display.
///
/// Replaces `< > " ' / & ` =` with entities; every other character passes
/// through unchanged.
pub fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            '/' => output.push_str("&#x2F;"),
            '&' => output.push_str("&amp;"),
            '`' => output.push_str("&#96;"),
            '=' => output.push_str("&#x3D;"),
            _ => output.push(c),
        }
    }
    output
}

/// Clean a list of record ids.
///
/// Drops missing entries and anything that is not `[A-Za-z0-9_-]+` after
/// trimming, and keeps at most [`MAX_ID_LIST_LEN`] ids.
pub fn sanitize_id_list(ids: &[RawInput]) -> Vec<String> {
    ids.iter()
        .filter(|id| !matches!(id, RawInput::Missing))
        .map(|id| id.to_string().trim().to_string())
        .filter(|id| !id.is_empty() && id_regex().is_match(id))
        .take(MAX_ID_LIST_LEN)
        .collect()
}
