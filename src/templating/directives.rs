//! Directive processing for template fragments.
//!
//! Four attribute directives are applied in separate passes over the tree, in
//! this order: every `data-if`, then every `data-show`, then every `data-class`,
//! then every `data-each`. A pass visits each element that is not inside a
//! `data-each` element; the `data-each` element itself is visited, its
//! descendants belong to the nested renders it performs.
//!
//! No directive fails. Expression faults evaluate to absent and the directive
//! treats absent as falsy (or as "nothing to repeat").

use serde_json::Value;

use super::TemplateRenderer;
use super::utils::unescape_attribute;
use crate::constants::{
    DIRECTIVE_CLASS, DIRECTIVE_EACH, DIRECTIVE_IF, DIRECTIVE_SHOW, HIDE_CLASS, INDEX_BINDING,
    ITEM_BINDING, SHOW_CLASS,
};
use crate::expr::{Scope, is_truthy};
use crate::markup::{Element, Node, to_html};

/// Apply all directives to a parsed fragment in place.
pub fn expand(nodes: &mut Vec<Node>, scope: &Scope<'_>, renderer: &TemplateRenderer) {
    remove_conditionals(nodes, scope, renderer);
    visit(nodes, &mut |element| apply_show(element, scope, renderer));
    visit(nodes, &mut |element| apply_class_map(element, scope, renderer));
    visit(nodes, &mut |element| apply_each(element, scope, renderer));
}

/// Depth-first walk that does not descend into `data-each` elements.
fn visit<F>(nodes: &mut [Node], action: &mut F)
where
    F: FnMut(&mut Element),
{
    for node in nodes {
        if let Node::Element(element) = node {
            action(element);
            if !element.has_attribute(DIRECTIVE_EACH) {
                visit(&mut element.children, action);
            }
        }
    }
}

fn directive_value(
    element: &Element,
    directive: &str,
    scope: &Scope<'_>,
    renderer: &TemplateRenderer,
) -> Option<Option<Value>> {
    let source = unescape_attribute(element.attribute(directive)?);
    Some(renderer.evaluator().evaluate(&source, scope))
}

fn remove_conditionals(nodes: &mut Vec<Node>, scope: &Scope<'_>, renderer: &TemplateRenderer) {
    nodes.retain_mut(|node| {
        let Node::Element(element) = node else {
            return true;
        };
        if let Some(value) = directive_value(element, DIRECTIVE_IF, scope, renderer)
            && !is_truthy(value.as_ref())
        {
            return false;
        }
        if !element.has_attribute(DIRECTIVE_EACH) {
            remove_conditionals(&mut element.children, scope, renderer);
        }
        true
    });
}

fn apply_show(element: &mut Element, scope: &Scope<'_>, renderer: &TemplateRenderer) {
    let Some(value) = directive_value(element, DIRECTIVE_SHOW, scope, renderer) else {
        return;
    };
    if is_truthy(value.as_ref()) {
        element.add_class(SHOW_CLASS);
        element.remove_class(HIDE_CLASS);
    } else {
        element.add_class(HIDE_CLASS);
        element.remove_class(SHOW_CLASS);
    }
}

fn apply_class_map(element: &mut Element, scope: &Scope<'_>, renderer: &TemplateRenderer) {
    let Some(Some(Value::Object(map))) = directive_value(element, DIRECTIVE_CLASS, scope, renderer)
    else {
        return;
    };
    for (names, enabled) in &map {
        let enabled = is_truthy(Some(enabled));
        for class in names.split_whitespace() {
            if enabled {
                element.add_class(class);
            } else {
                element.remove_class(class);
            }
        }
    }
}

fn apply_each(element: &mut Element, scope: &Scope<'_>, renderer: &TemplateRenderer) {
    let Some(value) = directive_value(element, DIRECTIVE_EACH, scope, renderer) else {
        return;
    };

    let entries: Vec<(Value, Value)> = match value {
        Some(Value::Array(items)) => {
            items.into_iter().enumerate().map(|(i, item)| (Value::from(i), item)).collect()
        }
        Some(Value::Object(map)) => map.into_iter().map(|(k, v)| (Value::String(k), v)).collect(),
        _ => Vec::new(),
    };

    let (index_name, item_name) = loop_bindings(scope);
    let inner = to_html(&element.children);
    let mut output = String::new();
    for (index, item) in entries {
        let mut vars = scope.vars.clone();
        vars.insert(index_name.clone(), index);
        vars.insert(item_name.clone(), item);
        let nested = Scope::new(scope.state, &vars, scope.helpers);
        output.push_str(&renderer.render(&inner, &nested));
    }

    element.children = if output.is_empty() {
        Vec::new()
    } else {
        vec![Node::Raw(output)]
    };
}

/// Names for the next nesting level: `index`/`item`, then `index1`/`item1`...
///
/// The suffix counts the `index*` variables already in scope, so a list-mode
/// item (which binds `index`) starts its first `data-each` at `index1`.
fn loop_bindings(scope: &Scope<'_>) -> (String, String) {
    let depth = scope.vars.keys().filter(|name| is_index_binding(name)).count();
    if depth == 0 {
        (INDEX_BINDING.to_string(), ITEM_BINDING.to_string())
    } else {
        (format!("{INDEX_BINDING}{depth}"), format!("{ITEM_BINDING}{depth}"))
    }
}

/// `index`, `index1`, `index2`...
fn is_index_binding(name: &str) -> bool {
    name.strip_prefix(INDEX_BINDING)
        .is_some_and(|suffix| suffix.bytes().all(|b| b.is_ascii_digit()))
}
