//! Error handling for repeatkit
//!
//! [`RepeatError`] enumerates every failure the library reports.
//! [`ErrorContext`] wraps one with a suggestion and details for display in a
//! terminal, and [`user_friendly_error`] builds that wrapper from any
//! [`anyhow::Error`] coming out of the command-line front end.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Errors reported by views, configuration loading and the CLI.
#[derive(Error, Debug)]
pub enum RepeatError {
    /// A view was attached, or asked to render, without a state value.
    #[error("No state was provided for the view")]
    MissingState,

    /// List mode needs an array state.
    #[error("List mode needs an array state, got {kind}")]
    StateNotList {
        /// JSON type of the state that was supplied
        kind: String,
    },

    /// A `templateId` did not resolve to any template text.
    #[error("Template not found: {id}")]
    TemplateNotFound {
        id: String,
    },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        path: String,
    },

    #[error("Invalid configuration in {file}: {reason}")]
    ConfigParse {
        file: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{message}")]
    Other {
        message: String,
    },
}

impl RepeatError {
    /// Name the JSON type of a value for [`RepeatError::StateNotList`].
    pub fn state_not_list(value: &serde_json::Value) -> Self {
        let kind = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        };
        Self::StateNotList {
            kind: kind.to_string(),
        }
    }
}

/// An error plus optional details and a suggestion for resolving it.
#[derive(Debug)]
pub struct ErrorContext {
    pub error: RepeatError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: RepeatError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion, shown in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error, shown in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly format with contextual suggestions.
///
/// The error chain is searched for a [`RepeatError`]; failing that, IO and
/// JSON errors get generic suggestions and anything else is reported as-is
/// with its full context chain as details.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(repeat_error) = cause.downcast_ref::<RepeatError>() {
            let context = create_error_context(repeat_error);
            return if context.details.is_none() && error.chain().count() > 1 {
                let message = error.to_string();
                context.with_details(message)
            } else {
                context
            };
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        return ErrorContext::new(RepeatError::Other {
            message: error.to_string(),
        })
        .with_details(io_error.to_string())
        .with_suggestion("Check that the path exists and you have the necessary permissions");
    }

    if let Some(json_error) = error.downcast_ref::<serde_json::Error>() {
        return ErrorContext::new(RepeatError::Other {
            message: error.to_string(),
        })
        .with_details(format!("Invalid JSON: {json_error}"))
        .with_suggestion("Check the state is valid JSON");
    }

    let details = error.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>().join(": ");
    let context = ErrorContext::new(RepeatError::Other {
        message: error.to_string(),
    });
    if details.is_empty() {
        context
    } else {
        context.with_details(details)
    }
}

/// Attach the standard suggestion for a [`RepeatError`].
#[must_use]
pub fn create_error_context(error: &RepeatError) -> ErrorContext {
    match error {
        RepeatError::MissingState => ErrorContext::new(RepeatError::MissingState)
            .with_suggestion("Pass a state value, e.g. --state items.json or --json '[1,2,3]'"),
        RepeatError::StateNotList {
            kind,
        } => ErrorContext::new(RepeatError::StateNotList {
            kind: kind.clone(),
        })
        .with_suggestion("Use the 'render' command for non-list state"),
        RepeatError::TemplateNotFound {
            id,
        } => ErrorContext::new(RepeatError::TemplateNotFound {
            id: id.clone(),
        })
        .with_suggestion("Check the template id, or pass the template text directly")
        .with_details(format!("No template is registered under '{id}'")),
        RepeatError::ConfigNotFound {
            path,
        } => ErrorContext::new(RepeatError::ConfigNotFound {
            path: path.clone(),
        })
        .with_suggestion("Create the file or drop the --config flag"),
        RepeatError::ConfigParse {
            file,
            reason,
        } => ErrorContext::new(RepeatError::ConfigParse {
            file: file.clone(),
            reason: reason.clone(),
        })
        .with_suggestion("Check the TOML syntax and field names of the configuration file"),
        RepeatError::Io(e) => ErrorContext::new(RepeatError::Other {
            message: format!("IO error: {e}"),
        })
        .with_suggestion("Check that the path exists and you have the necessary permissions"),
        RepeatError::Json(e) => ErrorContext::new(RepeatError::Other {
            message: format!("JSON error: {e}"),
        })
        .with_suggestion("Check the state file is valid JSON"),
        RepeatError::Other {
            message,
        } => ErrorContext::new(RepeatError::Other {
            message: message.clone(),
        }),
    }
}
