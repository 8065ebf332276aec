//! The markup tree a view renders into.
//!
//! Views never touch a document directly. Every read and mutation of the
//! container and its item nodes goes through the [`Host`] trait, so the same
//! view logic can drive a browser binding, a server-side string buffer or the
//! in-memory [`MemoryHost`] used by the command-line tool and the tests.

mod memory;

pub use memory::{HostOp, MemoryHost};

use std::fmt;

/// Identity of one rendered list item inside a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A list item ready to be placed in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemNode {
    pub id: NodeId,
    pub markup: String,
}

/// Where an inserted item goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Directly after an item already in the container.
    After(NodeId),
    /// At the start of the container.
    Prepend,
}

/// Mutation primitives of the container a view is attached to.
///
/// Item operations address items by [`NodeId`]. Inserting an item that is
/// already in the container moves it.
pub trait Host {
    /// Read a container attribute.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Write a container attribute; `None` removes it.
    fn set_attribute(&mut self, name: &str, value: Option<&str>);

    /// Look up template text by identifier (a `<script type="text/template">`
    /// in a browser, a file or a registry elsewhere).
    fn resolve_template(&self, id: &str) -> Option<String>;

    /// Current markup of the container's content.
    fn inner_html(&self) -> String;

    /// Replace the container's content wholesale.
    fn set_inner_html(&mut self, markup: &str);

    fn add_container_class(&mut self, class: &str);

    /// Replace the container's content with exactly these items, in order.
    fn replace_items(&mut self, items: &[ItemNode]);

    fn insert_item(&mut self, item: &ItemNode, anchor: Anchor);

    /// Put `item` where `old` currently is.
    fn replace_item(&mut self, old: NodeId, item: &ItemNode);

    /// Take an item out of the container.
    fn detach_item(&mut self, node: NodeId);

    /// Add (`enabled`) or remove a class on the top-level elements of an item.
    fn set_item_class(&mut self, node: NodeId, class: &str, enabled: bool);
}

impl<H: Host + ?Sized> Host for &mut H {
    fn attribute(&self, name: &str) -> Option<String> {
        (**self).attribute(name)
    }

    fn set_attribute(&mut self, name: &str, value: Option<&str>) {
        (**self).set_attribute(name, value);
    }

    fn resolve_template(&self, id: &str) -> Option<String> {
        (**self).resolve_template(id)
    }

    fn inner_html(&self) -> String {
        (**self).inner_html()
    }

    fn set_inner_html(&mut self, markup: &str) {
        (**self).set_inner_html(markup);
    }

    fn add_container_class(&mut self, class: &str) {
        (**self).add_container_class(class);
    }

    fn replace_items(&mut self, items: &[ItemNode]) {
        (**self).replace_items(items);
    }

    fn insert_item(&mut self, item: &ItemNode, anchor: Anchor) {
        (**self).insert_item(item, anchor);
    }

    fn replace_item(&mut self, old: NodeId, item: &ItemNode) {
        (**self).replace_item(old, item);
    }

    fn detach_item(&mut self, node: NodeId) {
        (**self).detach_item(node);
    }

    fn set_item_class(&mut self, node: NodeId, class: &str, enabled: bool) {
        (**self).set_item_class(node, class, enabled);
    }
}
