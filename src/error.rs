//! Errors raised by the mode-stack protocol.
//!
//! Every error is a precondition violation reported to the direct caller
//! before the slot is touched.

use thiserror::Error;

/// Errors that can occur while constructing, enabling or pushing a mode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModeError {
    /// A handler was built from an initializer that carried no `inner`.
    #[error(
        "missing inner argument; instead of constructing a {handler} directly, \
         pass the constructor to push_{kind}_mode"
    )]
    InvalidConstruction {
        /// Name of the mode-kind.
        kind: &'static str,
        /// Type name of the handler being constructed.
        handler: &'static str,
    },

    /// The wrong kind of value was handed to `enable` or `push`.
    #[error("{operation}_{kind}_mode: {reason}")]
    InvalidArgument {
        kind: &'static str,
        /// `"enable"` or `"push"`.
        operation: &'static str,
        reason: String,
    },

    /// Another mode already occupies the slot and the request did not
    /// permit overriding it.
    #[error("attempted to enable_{kind}_mode, but there is already an active mode {active}. {help}")]
    ConflictingMode {
        kind: &'static str,
        /// Description of the mode currently in the slot.
        active: String,
        /// What the caller should do instead.
        help: String,
    },

    /// The candidate does not provide the capability the kind requires.
    #[error("the argument passed to enable_{kind}_mode ({candidate}) must implement {capability}")]
    MissingCapability {
        kind: &'static str,
        candidate: &'static str,
        capability: &'static str,
    },
}

impl ModeError {
    /// Name of the mode-kind the error was raised for.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidConstruction { kind, .. }
            | Self::InvalidArgument { kind, .. }
            | Self::ConflictingMode { kind, .. }
            | Self::MissingCapability { kind, .. } => kind,
        }
    }
}
