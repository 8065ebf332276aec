//! Instance property bag with attribute mirroring.
//!
//! Every view keeps its configuration (`state`, `template`, `limit`, ...) as
//! named JSON values. Names in the view's *synced* set are also mirrored onto
//! the container as `data-<kebab-name>` attributes through the value codec, so
//! the container markup always shows the current configuration and edits made
//! to those attributes from outside are picked up on the next read.

use serde_json::{Map, Value};

use crate::codec;
use crate::constants::ATTRIBUTE_PREFIX;
use crate::host::Host;

/// Named property values of one view instance.
#[derive(Debug, Clone)]
pub struct PropertyStore {
    values: Map<String, Value>,
    synced: &'static [&'static str],
}

impl PropertyStore {
    /// Seed a store in order: `defaults`, then existing container attributes
    /// for synced names, then `options`. Every synced property is then written
    /// back to its attribute.
    pub fn seed<H: Host>(
        host: &mut H,
        synced: &'static [&'static str],
        defaults: Map<String, Value>,
        options: Map<String, Value>,
    ) -> Self {
        let mut store = Self {
            values: defaults,
            synced,
        };

        for name in synced {
            if let Some(value) =
                host.attribute(&attribute_name(name)).and_then(|text| codec::decode(&text))
            {
                store.values.insert((*name).to_string(), value);
            }
        }

        for (name, value) in options {
            store.values.insert(name, value);
        }

        store.sync_all(host);
        store
    }

    pub fn is_synced(&self, name: &str) -> bool {
        self.synced.contains(&name)
    }

    /// Read a property.
    ///
    /// A synced property is re-decoded from its attribute when the attribute is
    /// present; otherwise the in-memory value is returned.
    pub fn get<H: Host>(&self, host: &H, name: &str) -> Option<Value> {
        if self.is_synced(name)
            && let Some(text) = host.attribute(&attribute_name(name))
        {
            return codec::decode(&text);
        }
        self.values.get(name).cloned()
    }

    /// Write a property; `None` clears it. Synced properties are mirrored.
    pub fn set<H: Host>(&mut self, host: &mut H, name: &str, value: Option<Value>) {
        match &value {
            Some(value) => {
                self.values.insert(name.to_string(), value.clone());
            }
            None => {
                self.values.remove(name);
            }
        }
        if self.is_synced(name) {
            let encoded = codec::encode(value.as_ref());
            host.set_attribute(&attribute_name(name), Some(&encoded));
        }
    }

    /// Write every synced property to its attribute.
    pub fn sync_all<H: Host>(&self, host: &mut H) {
        for name in self.synced {
            let encoded = codec::encode(self.values.get(*name));
            host.set_attribute(&attribute_name(name), Some(&encoded));
        }
    }

    /// The in-memory values, without consulting attributes.
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }
}

/// `transitionExit` -> `data-transition-exit`.
pub fn attribute_name(property: &str) -> String {
    let mut name = String::with_capacity(ATTRIBUTE_PREFIX.len() + property.len() + 4);
    name.push_str(ATTRIBUTE_PREFIX);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}
