//! Integration test suite for repeatkit
//!
//! End-to-end tests that run the `repeatkit` binary against files in a
//! scratch directory.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **render**: single-template rendering from files, inline JSON and stdin
//! - **list**: list mode, pagination, filtering, sorting and reconciliation traces
//! - **codec**: attribute form conversions
//! - **config**: configuration file lookup and error reporting

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod codec;
mod config;
mod list;
mod render;
