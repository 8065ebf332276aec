//! Sandboxed expression evaluator.
//!
//! Template expressions (`{{ user.name }}`, `data-if="items.length > 0"`) are
//! compiled once into an operation tree ([`Expr`]) and evaluated by a small
//! interpreter against an explicit [`Scope`]. There is no access to anything
//! outside the scope: unknown identifiers evaluate to absent.
//!
//! # Fault handling
//!
//! [`Evaluator::evaluate`] never fails. Missing paths and member access on
//! absent values are a normal interpreter branch returning absent; any other
//! fault ([`ExprError`]) is logged with `tracing::warn!` and also yields absent,
//! so a single broken expression never aborts the surrounding render.
//!
//! # Examples
//!
//! ```
//! use repeatkit::expr::{Evaluator, Helpers, Scope, ScopeVars};
//! use repeatkit::templating::TemplateCache;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let evaluator = Evaluator::new(Arc::new(TemplateCache::new()));
//! let state = json!({ "user": { "name": "Ada" } });
//! let vars = ScopeVars::new();
//! let helpers = Helpers::builtin();
//! let scope = Scope::new(&state, &vars, &helpers);
//!
//! assert_eq!(evaluator.evaluate("upper(user.name)", &scope), Some(json!("ADA")));
//! assert_eq!(evaluator.evaluate("user.address.city", &scope), None);
//! ```

mod error;
mod eval;
mod helpers;
mod lexer;
mod parser;
mod scope;

use std::sync::Arc;

pub use error::ExprError;
pub use eval::{Evaluated, is_truthy};
pub use helpers::{HelperFn, Helpers};
pub use parser::{BinaryOp, Expr, LogicalOp, MAX_NESTING, UnaryOp, parse};
pub use scope::{Binding, SELF_BINDING, Scope, ScopeVars};

use crate::templating::TemplateCache;

/// Compiles and evaluates expressions, sharing compiled trees through a
/// [`TemplateCache`].
#[derive(Clone, Debug)]
pub struct Evaluator {
    cache: Arc<TemplateCache>,
}

impl Evaluator {
    pub fn new(cache: Arc<TemplateCache>) -> Self {
        Self {
            cache,
        }
    }

    /// Compile expression text, reusing a cached tree when one exists.
    pub fn compile(&self, source: &str) -> Result<Arc<Expr>, ExprError> {
        if let Some(compiled) = self.cache.compiled(source) {
            return Ok(compiled);
        }
        let compiled = Arc::new(parse(source)?);
        self.cache.store_compiled(source, Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Evaluate expression text, surfacing faults to the caller.
    ///
    /// Empty or whitespace-only text evaluates to absent.
    pub fn try_evaluate(&self, source: &str, scope: &Scope<'_>) -> Result<Evaluated, ExprError> {
        if source.trim().is_empty() {
            return Ok(None);
        }
        let compiled = self.compile(source)?;
        eval::eval(&compiled, scope)
    }

    /// Evaluate expression text, logging any fault and returning absent for it.
    pub fn evaluate(&self, source: &str, scope: &Scope<'_>) -> Evaluated {
        match self.try_evaluate(source, scope) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(expression = source, "Expression fault: {}", error);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compiled_expressions_are_cached_and_reused() {
        let cache = Arc::new(TemplateCache::new());
        let evaluator = Evaluator::new(Arc::clone(&cache));
        let vars = ScopeVars::new();
        let helpers = Helpers::new();

        let first = json!({ "n": 1 });
        let second = json!({ "n": 41 });
        assert_eq!(evaluator.evaluate("n + 1", &Scope::new(&first, &vars, &helpers)), Some(json!(2)));
        assert_eq!(
            evaluator.evaluate("n + 1", &Scope::new(&second, &vars, &helpers)),
            Some(json!(42))
        );
        assert_eq!(cache.compiled_len(), 1);

        let a = evaluator.compile("n + 1").unwrap();
        let b = evaluator.compile("n + 1").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_faults_become_absent() {
        let evaluator = Evaluator::new(Arc::new(TemplateCache::new()));
        let state = json!({ "n": 1 });
        let vars = ScopeVars::new();
        let helpers = Helpers::new();
        let scope = Scope::new(&state, &vars, &helpers);

        assert_eq!(evaluator.evaluate("n +", &scope), None);
        assert_eq!(evaluator.evaluate("n()", &scope), None);
        assert_eq!(evaluator.evaluate("   ", &scope), None);
        assert!(evaluator.try_evaluate("n +", &scope).is_err());
    }

    #[test]
    fn test_deeply_nested_expression_is_absent() {
        let evaluator = Evaluator::new(Arc::new(TemplateCache::new()));
        let state = json!({ "a": 1 });
        let vars = ScopeVars::new();
        let helpers = Helpers::new();
        let scope = Scope::new(&state, &vars, &helpers);

        let deep = format!("{}a{}", "(".repeat(20_000), ")".repeat(20_000));
        assert_eq!(evaluator.evaluate(&deep, &scope), None);
        let shallow = format!("{}a{}", "(".repeat(40), ")".repeat(40));
        assert_eq!(evaluator.evaluate(&shallow, &scope), Some(json!(1)));
    }
}
