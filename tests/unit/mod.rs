//! Unit test suite for repeatkit
//!
//! Exercises the library through its public API: rendering, the list view
//! and its reconciliation, and the view registry.
//!
//! ```bash
//! cargo test --test unit
//! ```

mod list_view;
mod reconcile;
mod registry;
mod rendering;
