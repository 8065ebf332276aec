//! Utility functions for the templating system.

/// Escape text for safe inclusion in markup.
///
/// Covers the five characters that can break out of text or a quoted
/// attribute: `&`, `<`, `>`, `"` and `'`.
///
/// # Examples
///
/// ```
/// use repeatkit::templating::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
///     "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Decode the entities [`escape_html`] produces, plus `&#39;` and `&apos;`.
///
/// Directive attributes are read as expressions, and authors sometimes have
/// to entity-encode quotes inside them.
pub(crate) fn unescape_attribute(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
