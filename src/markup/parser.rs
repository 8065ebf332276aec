//! HTML fragment parsing on top of html5ever (through `scraper`).
//!
//! Templates are fragments, not documents, and they carry `{{ ... }}`
//! placeholders that may contain `<` and `>`. Parsing therefore goes:
//!
//! 1. every complete placeholder is swapped for an opaque marker, so the HTML
//!    tokenizer never sees its contents; an unterminated `{{` stays plain text,
//! 2. fragments starting with table parts (`<tr>`, `<td>`, ...) are wrapped in
//!    the context they need, as a browser-side `innerHTML` helper would,
//! 3. the html5ever tree is converted into [`Node`]s, re-escaping decoded text
//!    so the tree holds markup text, and the markers are swapped back.

use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::OnceLock;

use super::node::{Attribute, Element, Node, is_raw_text_element};

const MARK_OPEN: char = '\u{E000}';
const MARK_CLOSE: char = '\u{E001}';

/// Parse a markup fragment into a list of top-level nodes.
pub fn parse_fragment(source: &str) -> Vec<Node> {
    let placeholders = Placeholders::protect(source);
    let (prefix, suffix, path) = context_wrap(source);
    let html = Html::parse_fragment(&format!("{prefix}{}{suffix}", placeholders.text));

    let mut parent = html.root_element();
    for name in path {
        match parent.children().filter_map(ElementRef::wrap).find(|el| el.value().name() == *name) {
            Some(child) => parent = child,
            None => return Vec::new(),
        }
    }
    convert_children(parent, &placeholders)
}

/// Wrapper markup and the element path to unwrap for fragments whose first
/// tag only parses inside a table.
fn context_wrap(source: &str) -> (&'static str, &'static str, &'static [&'static str]) {
    static FIRST_TAG: OnceLock<Option<Regex>> = OnceLock::new();
    let first_tag = FIRST_TAG
        .get_or_init(|| Regex::new(r"<([A-Za-z][^/\x00>\x20\t\r\n\x0C]*)").ok())
        .as_ref()
        .and_then(|pattern| pattern.captures(source))
        .map(|caps| caps[1].to_ascii_lowercase());

    match first_tag.as_deref() {
        Some("thead" | "tbody" | "tfoot" | "colgroup" | "caption") => {
            ("<table>", "</table>", &["table"])
        }
        Some("col") => ("<table><colgroup>", "</colgroup></table>", &["table", "colgroup"]),
        Some("tr") => ("<table><tbody>", "</tbody></table>", &["table", "tbody"]),
        Some("td" | "th") => {
            ("<table><tbody><tr>", "</tr></tbody></table>", &["table", "tbody", "tr"])
        }
        _ => ("", "", &[]),
    }
}

fn convert_children(parent: ElementRef<'_>, placeholders: &Placeholders) -> Vec<Node> {
    let raw_text = is_raw_text_element(parent.value().name());
    parent
        .children()
        .filter_map(|child| match child.value() {
            scraper::Node::Element(_) => {
                ElementRef::wrap(child).map(|el| Node::Element(convert_element(el, placeholders)))
            }
            scraper::Node::Text(text) if raw_text => Some(Node::Text(placeholders.restore(text))),
            scraper::Node::Text(text) => {
                Some(Node::Text(placeholders.restore(&escape_text(text))))
            }
            scraper::Node::Comment(comment) => {
                Some(Node::Comment(placeholders.restore(comment)))
            }
            _ => None,
        })
        .collect()
}

fn convert_element(element: ElementRef<'_>, placeholders: &Placeholders) -> Element {
    let mut converted = Element::new(element.value().name());
    converted.attributes = element
        .value()
        .attrs()
        .map(|(name, value)| Attribute {
            name: name.to_string(),
            value: Some(placeholders.restore(&escape_attribute(value))),
        })
        .collect();
    converted.children = convert_children(element, placeholders);
    converted
}

/// Back to markup text: `&`, `<`, `>` and no-break spaces become entities.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\u{A0}' => escaped.push_str("&nbsp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Attribute values only need `&` re-encoded; the serializer picks quotes.
fn escape_attribute(value: &str) -> String {
    if !value.contains(['&', '\u{A0}']) {
        return value.to_string();
    }
    value.replace('&', "&amp;").replace('\u{A0}', "&nbsp;")
}

/// Complete `{{ ... }}` spans lifted out of a template before parsing.
struct Placeholders {
    text: String,
    spans: Vec<String>,
}

impl Placeholders {
    /// Replace each `{{ ... }}` with a marker. A `{{` whose span would run
    /// into another `{{` before closing is left as text.
    fn protect(source: &str) -> Self {
        if source.contains([MARK_OPEN, MARK_CLOSE]) || !source.contains("{{") {
            return Self {
                text: source.to_string(),
                spans: Vec::new(),
            };
        }

        let mut text = String::with_capacity(source.len());
        let mut spans = Vec::new();
        let mut rest = source;
        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                break;
            };
            if let Some(inner) = after[..end].find("{{") {
                text.push_str(&rest[..start + 2 + inner]);
                rest = &after[inner..];
                continue;
            }

            text.push_str(&rest[..start]);
            text.push(MARK_OPEN);
            text.push_str(&spans.len().to_string());
            text.push(MARK_CLOSE);
            spans.push(rest[start..start + 2 + end + 2].to_string());
            rest = &after[end + 2..];
        }
        text.push_str(rest);

        Self {
            text,
            spans,
        }
    }

    fn restore(&self, text: &str) -> String {
        if self.spans.is_empty() || !text.contains(MARK_OPEN) {
            return text.to_string();
        }

        let mut restored = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(open) = rest.find(MARK_OPEN) {
            restored.push_str(&rest[..open]);
            let after = &rest[open + MARK_OPEN.len_utf8()..];
            let span = after.find(MARK_CLOSE).and_then(|close| {
                let index: usize = after[..close].parse().ok()?;
                Some((self.spans.get(index)?, close))
            });
            match span {
                Some((span, close)) => {
                    restored.push_str(span);
                    rest = &after[close + MARK_CLOSE.len_utf8()..];
                }
                None => {
                    restored.push(MARK_OPEN);
                    rest = after;
                }
            }
        }
        restored.push_str(rest);
        restored
    }
}
