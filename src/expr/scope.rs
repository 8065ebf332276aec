//! Explicit scope resolution for template expressions.
//!
//! A [`Scope`] stacks four layers, later layers overriding earlier ones on a
//! name collision:
//!
//! 1. the state's own properties (when the state is an object),
//! 2. `$self`, the raw state value,
//! 3. extra scope variables, each exposed with a `$` prefix (`$index`, `$item1`),
//! 4. helper functions by name.
//!
//! Nothing outside these layers is reachable: an unknown identifier resolves
//! to absent.

use serde_json::{Map, Value};

use super::helpers::{HelperFn, Helpers};

/// Extra scope variables such as loop bindings, exposed with a `$` prefix.
pub type ScopeVars = Map<String, Value>;

/// Name of the binding that exposes the raw state value.
pub const SELF_BINDING: &str = "self";

/// What an identifier resolved to.
pub enum Binding<'a> {
    Value(&'a Value),
    Helper(&'a HelperFn),
}

/// The composed evaluation scope of one expression.
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    pub state: &'a Value,
    pub vars: &'a ScopeVars,
    pub helpers: &'a Helpers,
}

impl<'a> Scope<'a> {
    pub fn new(state: &'a Value, vars: &'a ScopeVars, helpers: &'a Helpers) -> Self {
        Self {
            state,
            vars,
            helpers,
        }
    }

    /// Resolve a single identifier against the layers, outermost first.
    pub fn resolve(&self, name: &str) -> Option<Binding<'a>> {
        if let Some(function) = self.helpers.get(name) {
            return Some(Binding::Helper(function.as_ref()));
        }

        if let Some(local) = name.strip_prefix('$') {
            if let Some(value) = self.vars.get(local) {
                return Some(Binding::Value(value));
            }
            if local == SELF_BINDING {
                return Some(Binding::Value(self.state));
            }
        }

        self.state.as_object()?.get(name).map(Binding::Value)
    }

    /// Resolve a dotted path such as `user.address.city`.
    ///
    /// Returns `None` (absent) as soon as any segment is missing, or when the
    /// path names a helper function rather than a value.
    pub fn lookup_path<S: AsRef<str>>(&self, segments: &[S]) -> Option<Value> {
        let (head, rest) = segments.split_first()?;
        let mut current = match self.resolve(head.as_ref())? {
            Binding::Value(value) => value.clone(),
            Binding::Helper(_) => return None,
        };
        for segment in rest {
            current = member(&current, segment.as_ref())?;
        }
        Some(current)
    }

    /// Convenience form of [`Scope::lookup_path`] taking `a.b.c` text.
    pub fn lookup(&self, dotted: &str) -> Option<Value> {
        let segments: Vec<&str> = dotted.split('.').map(str::trim).collect();
        self.lookup_path(&segments)
    }
}

/// Read a named member of a value.
///
/// Objects are indexed by key, arrays and strings by position, and both also
/// expose `length`. Everything else has no members.
pub(crate) fn member(value: &Value, key: &str) -> Option<Value> {
    match value {
        Value::Object(map) => map.get(key).cloned(),
        Value::Array(items) => {
            if key == "length" {
                Some(Value::from(items.len()))
            } else {
                key.parse::<usize>().ok().and_then(|i| items.get(i).cloned())
            }
        }
        Value::String(s) => {
            if key == "length" {
                Some(Value::from(s.chars().count()))
            } else {
                key.parse::<usize>()
                    .ok()
                    .and_then(|i| s.chars().nth(i))
                    .map(|c| Value::String(c.to_string()))
            }
        }
        _ => None,
    }
}
