//! Template rendering: directive expansion followed by interpolation.

use regex::{Captures, Regex};
use std::sync::{Arc, OnceLock};

use super::cache::TemplateCache;
use super::directives;
use super::utils::escape_html;
use crate::codec;
use crate::expr::{Evaluator, Scope};
use crate::markup::{Node, parse_fragment, to_html};

/// Matches one `{{ expression }}` placeholder (non-greedy, may span lines).
fn placeholder_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)\{\{(.*?)\}\}").ok()).as_ref()
}

/// Renders templates against a scope, memoizing the output.
///
/// A render parses the template into a fragment, applies the directives, then
/// replaces every `{{ expression }}` in text, comments and attribute values
/// with the HTML-escaped display form of its value. Output of `data-each`
/// expansion is already final and is not interpolated again.
///
/// Output is cached in the shared [`TemplateCache`] under a hash of the
/// template text, the canonical state, the canonical scope variables and the
/// helper names. A cache hit skips both stages. Nothing invalidates the cache
/// automatically; call [`TemplateRenderer::reset`].
///
/// # Examples
///
/// ```
/// use repeatkit::expr::{Helpers, Scope, ScopeVars};
/// use repeatkit::templating::TemplateRenderer;
/// use serde_json::json;
///
/// let renderer = TemplateRenderer::default();
/// let state = json!({ "items": ["a", "b"], "title": "<List>" });
/// let vars = ScopeVars::new();
/// let helpers = Helpers::new();
/// let scope = Scope::new(&state, &vars, &helpers);
///
/// let html = renderer.render(
///     r#"<h1>{{ title }}</h1><ul data-each="items"><li>{{ $item }}</li></ul>"#,
///     &scope,
/// );
/// assert_eq!(
///     html,
///     r#"<h1>&lt;List&gt;</h1><ul data-each="items"><li>a</li><li>b</li></ul>"#
/// );
/// ```
#[derive(Clone, Debug)]
pub struct TemplateRenderer {
    cache: Arc<TemplateCache>,
    evaluator: Evaluator,
}

impl TemplateRenderer {
    /// Create a renderer sharing the given cache.
    pub fn new(cache: Arc<TemplateCache>) -> Self {
        Self {
            evaluator: Evaluator::new(Arc::clone(&cache)),
            cache,
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn cache(&self) -> &Arc<TemplateCache> {
        &self.cache
    }

    /// Render a template against a scope.
    pub fn render(&self, template: &str, scope: &Scope<'_>) -> String {
        let key = self.content_hash(template, scope);
        if let Some(markup) = self.cache.rendered(key) {
            tracing::debug!(key, "Render cache hit");
            return markup;
        }

        tracing::debug!(key, "Render cache miss");
        let mut nodes = parse_fragment(template);
        directives::expand(&mut nodes, scope, self);
        self.interpolate_nodes(&mut nodes, scope);
        let markup = to_html(&nodes);

        self.cache.store_rendered(key, markup.clone());
        markup
    }

    /// Hash identifying the output of rendering `template` against `scope`.
    ///
    /// Two calls with equal hashes produce equal output, which lets list items
    /// be compared without rendering them.
    pub fn content_hash(&self, template: &str, scope: &Scope<'_>) -> u64 {
        let state = codec::canonical(Some(scope.state));
        let vars = serde_json::to_string(scope.vars).unwrap_or_default();
        let helpers = scope.helpers.fingerprint();
        codec::content_hash(["template", template, state.as_str(), vars.as_str(), helpers.as_str()])
    }

    /// Replace every placeholder in `text` with its escaped display value.
    pub fn interpolate(&self, text: &str, scope: &Scope<'_>) -> String {
        let Some(pattern) = placeholder_pattern() else {
            return text.to_string();
        };
        if !text.contains("{{") {
            return text.to_string();
        }
        pattern
            .replace_all(text, |caps: &Captures<'_>| {
                let value = self.evaluator.evaluate(&caps[1], scope);
                escape_html(&codec::display(value.as_ref()))
            })
            .into_owned()
    }

    /// Drop every cached compiled expression and render output.
    pub fn reset(&self) {
        self.cache.clear();
    }

    fn interpolate_nodes(&self, nodes: &mut [Node], scope: &Scope<'_>) {
        for node in nodes {
            match node {
                Node::Text(text) | Node::Comment(text) => {
                    *text = self.interpolate(text, scope);
                }
                Node::Element(element) => {
                    for attr in &mut element.attributes {
                        if let Some(value) = &mut attr.value {
                            *value = self.interpolate(value, scope);
                        }
                    }
                    self.interpolate_nodes(&mut element.children, scope);
                }
                Node::Raw(_) => {}
            }
        }
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new(Arc::new(TemplateCache::new()))
    }
}
