//! Shared caches for compiled expressions and rendered templates.
//!
//! A single [`TemplateCache`] is meant to be shared (behind an [`Arc`]) by every
//! renderer and view of a process, so that identical expressions are compiled
//! once and identical `(template, state, scope, helpers)` inputs render once.
//!
//! # Cache Invalidation
//!
//! Entries are keyed by content hashes, so they never go stale on their own:
//! compilation and rendering are pure functions of their inputs. The only
//! invalidation is an explicit [`TemplateCache::clear`]. Both maps are
//! unbounded until cleared.
//!
//! [`Arc`]: std::sync::Arc

use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::codec;
use crate::expr::Expr;

/// Cache for compiled expressions and render output.
///
/// Backed by [`DashMap`] so it can be shared across threads; rendering itself
/// is single-threaded.
#[derive(Debug, Default)]
pub struct TemplateCache {
    /// Compiled operation trees keyed by a hash of the expression text
    expressions: DashMap<u64, Arc<Expr>>,
    /// Render output keyed by a hash of all render inputs
    renders: DashMap<u64, String>,
    /// Render cache statistics
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl TemplateCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a compiled expression if one is cached
    pub fn compiled(&self, source: &str) -> Option<Arc<Expr>> {
        self.expressions
            .get(&Self::expression_key(source))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Store a compiled expression
    pub fn store_compiled(&self, source: &str, compiled: Arc<Expr>) {
        self.expressions.insert(Self::expression_key(source), compiled);
    }

    /// Number of compiled expressions held
    pub fn compiled_len(&self) -> usize {
        self.expressions.len()
    }

    /// Get cached render output if available
    pub fn rendered(&self, key: u64) -> Option<String> {
        if let Some(entry) = self.renders.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            Some(entry.value().clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Insert render output into the cache
    pub fn store_rendered(&self, key: u64, markup: String) {
        self.renders.insert(key, markup);
    }

    /// Number of render outputs held
    pub fn rendered_len(&self) -> usize {
        self.renders.len()
    }

    /// Clear all cached content
    pub fn clear(&self) {
        self.expressions.clear();
        self.renders.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        tracing::debug!("Template cache cleared");
    }

    /// Get render cache statistics as `(hits, misses)`
    pub fn stats(&self) -> (usize, usize) {
        (self.hits.load(Ordering::Relaxed), self.misses.load(Ordering::Relaxed))
    }

    /// Calculate render cache hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let (hits, misses) = self.stats();
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }

    fn expression_key(source: &str) -> u64 {
        codec::content_hash(["expression", source])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse;

    #[test]
    fn test_render_stats_and_clear() {
        let cache = TemplateCache::new();
        assert!(cache.rendered(7).is_none());
        cache.store_rendered(7, "<b>x</b>".to_string());
        assert_eq!(cache.rendered(7).as_deref(), Some("<b>x</b>"));
        assert_eq!(cache.stats(), (1, 1));
        assert!((cache.hit_rate() - 50.0).abs() < f64::EPSILON);

        cache.store_compiled("a", Arc::new(parse("a").unwrap()));
        cache.clear();
        assert_eq!(cache.rendered_len(), 0);
        assert_eq!(cache.compiled_len(), 0);
        assert_eq!(cache.stats(), (0, 0));
    }
}
