use std::collections::{BTreeMap, HashMap};

use super::{Anchor, Host, ItemNode, NodeId};
use crate::markup::{Node, parse_fragment, to_html};

/// A mutation recorded by [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOp {
    SetAttribute {
        name: String,
        value: Option<String>,
    },
    SetInnerHtml,
    AddContainerClass(String),
    ReplaceItems(Vec<NodeId>),
    Insert {
        node: NodeId,
        anchor: Anchor,
    },
    Replace {
        old: NodeId,
        new: NodeId,
    },
    Detach(NodeId),
    ItemClass {
        node: NodeId,
        class: String,
        enabled: bool,
    },
}

/// In-memory container that records every mutation applied to it.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    templates: HashMap<String, String>,
    content: String,
    /// Item view of the content, once items have been placed.
    items: Option<Vec<ItemNode>>,
    ops: Vec<HostOp>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing markup inside the container.
    pub fn with_content(mut self, markup: impl Into<String>) -> Self {
        self.content = markup.into();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Register template text that [`Host::resolve_template`] can find.
    pub fn with_template(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.templates.insert(id.into(), text.into());
        self
    }

    pub fn items(&self) -> &[ItemNode] {
        self.items.as_deref().unwrap_or_default()
    }

    pub fn item_ids(&self) -> Vec<NodeId> {
        self.items().iter().map(|item| item.id).collect()
    }

    pub fn item(&self, node: NodeId) -> Option<&ItemNode> {
        self.items().iter().find(|item| item.id == node)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    /// Return and forget the recorded mutations.
    pub fn take_ops(&mut self) -> Vec<HostOp> {
        std::mem::take(&mut self.ops)
    }

    fn items_mut(&mut self) -> &mut Vec<ItemNode> {
        self.items.get_or_insert_with(Vec::new)
    }

    fn position(&self, node: NodeId) -> Option<usize> {
        self.items().iter().position(|item| item.id == node)
    }
}

impl Host for MemoryHost {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.attributes.insert(name.to_string(), value.to_string());
            }
            None => {
                self.attributes.remove(name);
            }
        }
        self.ops.push(HostOp::SetAttribute {
            name: name.to_string(),
            value: value.map(str::to_string),
        });
    }

    fn resolve_template(&self, id: &str) -> Option<String> {
        self.templates.get(id).cloned()
    }

    fn inner_html(&self) -> String {
        match &self.items {
            Some(items) => items.iter().map(|item| item.markup.as_str()).collect(),
            None => self.content.clone(),
        }
    }

    fn set_inner_html(&mut self, markup: &str) {
        self.content = markup.to_string();
        self.items = None;
        self.ops.push(HostOp::SetInnerHtml);
    }

    fn add_container_class(&mut self, class: &str) {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
        self.ops.push(HostOp::AddContainerClass(class.to_string()));
    }

    fn replace_items(&mut self, items: &[ItemNode]) {
        self.items = Some(items.to_vec());
        self.ops.push(HostOp::ReplaceItems(items.iter().map(|item| item.id).collect()));
    }

    fn insert_item(&mut self, item: &ItemNode, anchor: Anchor) {
        if let Some(existing) = self.position(item.id) {
            self.items_mut().remove(existing);
        }
        let index = match anchor {
            Anchor::Prepend => 0,
            Anchor::After(node) => self.position(node).map_or(self.items().len(), |i| i + 1),
        };
        self.items_mut().insert(index, item.clone());
        self.ops.push(HostOp::Insert {
            node: item.id,
            anchor,
        });
    }

    fn replace_item(&mut self, old: NodeId, item: &ItemNode) {
        match self.position(old) {
            Some(index) => self.items_mut()[index] = item.clone(),
            None => self.items_mut().push(item.clone()),
        }
        self.ops.push(HostOp::Replace {
            old,
            new: item.id,
        });
    }

    fn detach_item(&mut self, node: NodeId) {
        if let Some(index) = self.position(node) {
            self.items_mut().remove(index);
        }
        self.ops.push(HostOp::Detach(node));
    }

    fn set_item_class(&mut self, node: NodeId, class: &str, enabled: bool) {
        if let Some(index) = self.position(node) {
            let item = &mut self.items_mut()[index];
            let mut nodes = parse_fragment(&item.markup);
            for top in &mut nodes {
                if let Node::Element(element) = top {
                    if enabled {
                        element.add_class(class);
                    } else {
                        element.remove_class(class);
                    }
                }
            }
            item.markup = to_html(&nodes);
        }
        self.ops.push(HostOp::ItemClass {
            node,
            class: class.to_string(),
            enabled,
        });
    }
}
