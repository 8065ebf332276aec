//! Views: stateful renderers bound to a container.
//!
//! Two kinds of view share the same templating kernel:
//!
//! - [`TemplateView`] renders one template against the whole state and writes
//!   the container content only when the markup changed.
//! - [`Repeater`] renders a template once per element of an array state,
//!   keeps every element as an independently updatable item and reconciles the
//!   item sequence on each render, with filtering, sorting and pagination.
//!
//! Views talk to their container only through a [`Host`](crate::host::Host).
//! A [`Registry`] keeps one view per container and merges options when a
//! container is attached again.

mod options;
mod properties;
mod registry;
mod repeater;
mod template_view;

pub use options::ViewOptions;
pub use properties::{PropertyStore, attribute_name};
pub use registry::{Registry, View};
pub use repeater::{FilterFn, Repeater, SortFn};
pub use template_view::TemplateView;

use crate::host::NodeId;

/// What changed in the container, passed to update callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affected<'a> {
    /// The whole container content was rewritten.
    Container,
    /// These items were inserted by the commit.
    Items(&'a [NodeId]),
}

/// Counters describing a view's caches and commit state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewStats {
    /// Entries in the key to item cache.
    pub cached_items: usize,
    /// Items in the committed sequence.
    pub committed_items: usize,
    pub pending_commit: bool,
    pub render_hits: usize,
    pub render_misses: usize,
}
