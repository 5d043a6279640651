//! HTML rendering for the home, search and watch pages.
//!
//! Everything here is a pure function of its input: no network or storage
//! access. Missing optional fields fall back to display defaults.

pub mod cards;
pub mod format;
pub mod pages;

pub use format::{avatar_placeholder, format_duration, format_number, time_ago};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left as-is inside a query value (the RFC 3986 unreserved set)
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a value for use in a URL query string
pub fn encode_query(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// HTML-escape a string
///
/// Escapes: & < > " '
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Paragraph carrying an inline status message (`loading-text`, `error-text`, ...)
pub fn message(class: &str, text: &str) -> String {
    format!(r#"<p class="{class}">{}</p>"#, html_escape(text))
}
