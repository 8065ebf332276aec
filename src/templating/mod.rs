//! Markup templating engine.
//!
//! A template is an HTML fragment with two kinds of dynamic content:
//!
//! - **Placeholders**: `{{ expression }}` in text, comments and attribute
//!   values, replaced by the HTML-escaped display form of the value.
//! - **Directives**: attributes evaluated as expressions before interpolation.
//!
//! | Directive | Effect |
//! |-----------|--------|
//! | `data-if="expr"` | removes the element unless `expr` is truthy |
//! | `data-show="expr"` | adds `show` (truthy) or `hide` (falsy) |
//! | `data-class="{ name: expr }"` | adds or removes each class by truthiness |
//! | `data-each="expr"` | repeats the element's children per array element or object entry |
//!
//! Inside `data-each`, the children see `$index` and `$item`; nested
//! `data-each` levels see `$index1`/`$item1`, `$index2`/`$item2` and so on.
//!
//! # Caching
//!
//! Compiled expressions and render output live in a [`TemplateCache`] shared
//! through an `Arc`. Renders are pure functions of the template, the state, the
//! scope variables and the helper names, so entries never go stale; the only
//! invalidation is [`TemplateRenderer::reset`].
//!
//! # Examples
//!
//! ```
//! use repeatkit::expr::{Scope, ScopeVars};
//! use repeatkit::templating::{Helpers, TemplateRenderer};
//! use serde_json::json;
//!
//! let renderer = TemplateRenderer::default();
//! let state = json!({ "todos": [{ "text": "write", "done": true }, { "text": "test", "done": false }] });
//! let vars = ScopeVars::new();
//! let helpers = Helpers::builtin();
//!
//! let html = renderer.render(
//!     r#"<ul data-each="todos"><li data-class='{"done": $item.done}'>{{ upper($item.text) }}</li></ul>"#,
//!     &Scope::new(&state, &vars, &helpers),
//! );
//! assert!(html.contains(r#"class="done">WRITE</li>"#));
//! assert!(html.contains("WRITE"));
//! ```

mod cache;
pub mod directives;
mod renderer;
mod utils;

pub use cache::TemplateCache;
pub use renderer::TemplateRenderer;
pub use utils::escape_html;

pub use crate::expr::{HelperFn, Helpers};
