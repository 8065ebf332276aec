//! Expression faults.

use thiserror::Error;

/// A fault raised while compiling or evaluating a template expression.
///
/// These never escape a render: the evaluator logs them and treats the
/// expression result as absent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// The expression text could not be tokenized or parsed.
    #[error("syntax error at offset {offset}: {message}")]
    Syntax {
        /// Byte offset into the expression text.
        offset: usize,
        /// What the parser expected or found.
        message: String,
    },

    /// A call targeted a value that is not a helper function.
    #[error("'{name}' is not a function")]
    NotCallable {
        /// The callee as written in the expression.
        name: String,
    },

    /// A method call named a method the receiver does not provide.
    #[error("unknown method '{method}' on {receiver}")]
    UnknownMethod {
        /// Method name.
        method: String,
        /// Type description of the receiver.
        receiver: &'static str,
    },

    /// Arithmetic produced a value with no JSON representation (NaN, infinity).
    #[error("'{operator}' produced a non-finite number")]
    NonFinite {
        /// Operator that produced the value.
        operator: &'static str,
    },
}

impl ExprError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }
}
