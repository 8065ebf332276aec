//! Core types for repeatkit
//!
//! This module holds the error taxonomy shared by the library and the
//! command-line front end.
//!
//! # Error Management
//!
//! - **Strongly-typed errors** ([`RepeatError`]) for precise handling in code
//! - **User-friendly contexts** ([`ErrorContext`]) with actionable suggestions for CLI users
//! - **Automatic conversion** from [`std::io::Error`] and [`serde_json::Error`]
//!
//! Expression faults are not part of this taxonomy: they are recovered where
//! they happen (see [`crate::expr::ExprError`]) and never surface as a
//! [`RepeatError`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use repeatkit::core::{RepeatError, user_friendly_error};
//!
//! fn attach() -> Result<(), RepeatError> {
//!     Err(RepeatError::MissingState)
//! }
//!
//! if let Err(e) = attach() {
//!     user_friendly_error(anyhow::Error::from(e)).display();
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, RepeatError, create_error_context, user_friendly_error};
