//! Test utilities for repeatkit
//!
//! Helpers shared by unit tests and the integration suites: one-time logging
//! setup and fixtures for states, templates and configuration files.
//!
//! # Example
//!
//! ```rust,no_run
//! use repeatkit::test_utils::{StateFixture, init_test_logging};
//!
//! init_test_logging(None);
//! let todos = StateFixture::todos();
//! assert!(todos.value.is_array());
//! ```

pub mod fixtures;

pub use fixtures::{ConfigFixture, StateFixture, TemplateFixture};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. Uses `level` when given, else
/// `RUST_LOG` when set; with neither, tests run without a subscriber.
///
/// ```bash
/// RUST_LOG=repeatkit=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
