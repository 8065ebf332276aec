//! Markup fragments: an HTML5 fragment parser, a node tree and a serializer.
//!
//! Fragments are parsed with html5ever (through `scraper`), so malformed
//! markup is repaired the way a browser repairs it. Directive processing and
//! interpolation then operate on this tree instead of on raw strings, so
//! attribute values and text nodes can be addressed directly. Text and
//! attribute values are kept as markup (entities encoded) and written back
//! verbatim; only attribute quoting is normalized.

mod node;
mod parser;

pub use node::{Attribute, Element, Node};
pub use parser::parse_fragment;

/// Serialize a list of nodes back to markup.
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) | Node::Raw(text) => out.push_str(text),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::Element(element) => write_element(out, element),
    }
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.name);
    for attr in &element.attributes {
        if attr.name.is_empty() {
            continue;
        }
        out.push(' ');
        out.push_str(&attr.name);
        if let Some(value) = &attr.value {
            out.push('=');
            write_attribute_value(out, value);
        }
    }
    out.push('>');

    if element.is_void() {
        return;
    }

    for child in &element.children {
        write_node(out, child);
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

/// Double quotes unless the value contains `"` but no `'`; in that case single
/// quotes avoid escaping.
fn write_attribute_value(out: &mut String, value: &str) {
    if value.contains('"') && !value.contains('\'') {
        out.push('\'');
        out.push_str(value);
        out.push('\'');
    } else {
        out.push('"');
        out.push_str(&value.replace('"', "&quot;"));
        out.push('"');
    }
}
