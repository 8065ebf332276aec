//! repeatkit - keyed list templating
//!
//! repeatkit renders HTML templates against JSON state and keeps rendered
//! lists up to date incrementally. A template is plain markup with
//! `{{ expression }}` placeholders and a handful of `data-*` directives;
//! expressions run in a small sandboxed language that can only read the
//! state, the loop variables and registered helper functions.
//!
//! # Architecture Overview
//!
//! Rendering is layered, leaves first:
//!
//! 1. [`codec`] converts values to and from the text stored in attributes.
//! 2. [`expr`] parses and evaluates expressions against a layered scope.
//! 3. [`markup`] parses template text into a node tree and writes it back.
//! 4. [`templating`] applies the `data-if`, `data-show`, `data-class` and
//!    `data-each` directives, interpolates placeholders and memoizes output.
//! 5. [`reconcile`] diffs two keyed item sequences into a commit plan.
//! 6. [`view`] binds all of the above to a container through a
//!    [`host::Host`]: [`view::TemplateView`] for a single template,
//!    [`view::Repeater`] for lists with filtering, sorting, pagination and
//!    enter/exit transitions.
//!
//! ## Key Features
//!
//! - **Keyed updates**: list items are identified by index or by a track-by
//!   expression; unchanged items keep their node across renders
//! - **Memoized rendering**: output is cached by a hash of the template and
//!   every input it can observe
//! - **Sandboxed expressions**: no code generation, no access outside the scope
//! - **Host agnostic**: views drive any container implementing [`host::Host`];
//!   [`host::MemoryHost`] records every operation
//!
//! # Example
//!
//! ```
//! use repeatkit::host::{Host, MemoryHost};
//! use repeatkit::templating::TemplateRenderer;
//! use repeatkit::view::{Repeater, ViewOptions};
//! use serde_json::json;
//!
//! let mut list = Repeater::attach(
//!     MemoryHost::new(),
//!     ViewOptions::new()
//!         .with_state(json!([{ "id": 1, "name": "a" }, { "id": 2, "name": "b" }]))
//!         .with_template("<li>{{ name }}</li>")
//!         .with_track_by("id"),
//!     TemplateRenderer::default(),
//! )?;
//! list.render(false)?;
//! assert_eq!(list.host().inner_html(), "<li>a</li><li>b</li>");
//!
//! list.set("state", json!([{ "id": 2, "name": "b" }])).render(false)?;
//! assert_eq!(list.host().inner_html(), "<li>b</li>");
//! # Ok::<(), repeatkit::core::RepeatError>(())
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! repeatkit render --json '{"name":"Ada"}' --template '<b>{{ upper(name) }}</b>'
//! repeatkit list --state todos.json --template-file row.html --limit 10 --page 2
//! repeatkit codec decode '[1,2]'
//! ```

// Templating kernel
pub mod codec;
pub mod expr;
pub mod markup;
pub mod templating;

// Lists and views
pub mod host;
pub mod reconcile;
pub mod view;

// Front end and shared infrastructure
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
