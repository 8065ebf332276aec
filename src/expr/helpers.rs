//! Helper functions: the outermost scope layer of an expression.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::codec;

/// Signature of a helper callable from template expressions.
///
/// Arguments arrive already evaluated; `None` is an absent argument. Returning
/// `None` yields absent.
pub type HelperFn = dyn Fn(&[Option<Value>]) -> Option<Value> + Send + Sync;

/// Named helper functions available to every expression of a render.
///
/// Cloning is cheap; the functions themselves are shared.
#[derive(Clone, Default)]
pub struct Helpers {
    functions: BTreeMap<String, Arc<HelperFn>>,
}

impl Helpers {
    pub fn new() -> Self {
        Self::default()
    }

    /// The helper set used by the command-line front end.
    ///
    /// - `upper(s)` / `lower(s)`: change case of the display form
    /// - `len(v)`: length of a string, array or object
    /// - `json(v)`: JSON text of a value
    /// - `default(v, fallback)`: `fallback` when `v` is absent, null or empty
    pub fn builtin() -> Self {
        Self::new()
            .with("upper", |args| {
                Some(Value::String(codec::display(first(args)).to_uppercase()))
            })
            .with("lower", |args| {
                Some(Value::String(codec::display(first(args)).to_lowercase()))
            })
            .with("len", |args| match first(args)? {
                Value::String(s) => Some(Value::from(s.chars().count())),
                Value::Array(items) => Some(Value::from(items.len())),
                Value::Object(map) => Some(Value::from(map.len())),
                _ => None,
            })
            .with("json", |args| Some(Value::String(codec::canonical(first(args)))))
            .with("default", |args| match first(args) {
                None | Some(Value::Null) => args.get(1).cloned().flatten(),
                Some(Value::String(s)) if s.is_empty() => args.get(1).cloned().flatten(),
                Some(value) => Some(value.clone()),
            })
    }

    /// Register a helper, replacing any previous helper with the same name.
    pub fn insert<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: Fn(&[Option<Value>]) -> Option<Value> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    /// Builder form of [`Helpers::insert`].
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[Option<Value>]) -> Option<Value> + Send + Sync + 'static,
    {
        self.insert(name, function);
        self
    }

    /// Add every helper of `other`, overriding on name collision.
    pub fn extend(&mut self, other: &Helpers) {
        for (name, function) in &other.functions {
            self.functions.insert(name.clone(), Arc::clone(function));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<HelperFn>> {
        self.functions.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Stable text identifying this helper set, used as hashing input.
    ///
    /// Functions cannot be compared, so the fingerprint is the sorted name list.
    pub fn fingerprint(&self) -> String {
        self.names().collect::<Vec<_>>().join(",")
    }
}

impl fmt::Debug for Helpers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

fn first(args: &[Option<Value>]) -> Option<&Value> {
    args.first().and_then(Option::as_ref)
}
