//! Hook error types.

use thiserror::Error;

/// Invalid-argument errors raised by the hooks.
///
/// Hooks fail synchronously when a required option is missing or malformed.
/// There is no recovery path: the caller fixes its inputs, and the
/// surrounding descriptor build is expected to abort.
#[derive(Debug, Error)]
pub enum HookError {
    /// A required hook option was not supplied.
    #[error("missing required hook option '{0}'")]
    MissingOption(&'static str),

    /// A hook option was supplied with the wrong type or an invalid value.
    #[error("invalid hook option '{option}': {reason}")]
    InvalidOption {
        /// Name of the offending option.
        option: &'static str,
        /// Single-line description of what was expected.
        reason: String,
    },
}

impl HookError {
    pub(crate) fn invalid(option: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option,
            reason: reason.into(),
        }
    }
}
