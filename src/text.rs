//! Helpful utilities for working with text.

use htmlentity::entity::{self, ICodedDataTrait};

/// Converts HTML entities into their single-character equivalents.
///
/// For example, Reddit returns "&" as "&amp;", ">" as "&gt;",
/// and "<" as "&lt;"; this function will convert those HTML
/// entities into single, human-readable characters.
///
/// Leading and trailing whitespace will also be trimmed from the string.
///
/// # Examples
///
/// ```
/// use snooscrape::text::convert_html_entities;
/// let raw = "&lt;This &amp; That&gt;";
/// let converted = convert_html_entities(raw);
/// assert_eq!(converted, "<This & That>");
/// ```
///
/// ```
/// use snooscrape::text::convert_html_entities;
/// let raw = "  &lt;This &amp; That&gt;  ";
/// let converted = convert_html_entities(raw);
/// assert_eq!(converted, "<This & That>");
/// ```
///
/// ```
/// use snooscrape::text::convert_html_entities;
/// let raw = "A Plaintext Post";
/// let converted = convert_html_entities(raw);
/// assert_eq!(converted, raw);
/// ```
pub fn convert_html_entities(text: &str) -> String {
    let text = text.trim();
    entity::decode(text.as_bytes())
        .to_string()
        .unwrap_or(text.to_string())
}

/// Collapses a block of text onto a single line.
///
/// All runs of whitespace, including newlines, are replaced with a single
/// space. Useful when writing one record per line to a plain-text file,
/// where an embedded newline would silently split a record in two.
///
/// # Examples
///
/// ```
/// use snooscrape::text::flatten_line;
/// let raw = "First paragraph.\n\nSecond\tparagraph.";
/// assert_eq!(flatten_line(raw), "First paragraph. Second paragraph.");
/// ```
///
/// ```
/// use snooscrape::text::flatten_line;
/// assert_eq!(flatten_line("   \n  "), "");
/// ```
pub fn flatten_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
