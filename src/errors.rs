//! Time Tick Inspector Error Hierarchy
//!
//! Two classes of failure exist at this layer:
//! - [`Error`]: recoverable failures surfaced through `Result` (configuration).
//! - [`InvariantViolation`]: channel lifecycle bugs in the caller. These are
//!   never returned to the caller; the inspector raises them as a panic whose
//!   payload is the violation itself.

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Inspector configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Broken channel lifecycle contract between the WAL layer and the inspector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// The same physical channel was registered twice without unregistering.
    #[error("sync operator already exists for channel {channel}, critical bug in code")]
    DuplicateOperator { channel: String },

    /// Unregister or must-lookup of a channel that has no operator.
    #[error("sync operator not found for channel {channel}, critical bug in code")]
    OperatorNotFound { channel: String },
}

impl InvariantViolation {
    pub fn channel(&self) -> &str {
        match self {
            InvariantViolation::DuplicateOperator { channel } => channel,
            InvariantViolation::OperatorNotFound { channel } => channel,
        }
    }

    /// Aborts the current task with `self` as the panic payload.
    ///
    /// Callers catching the unwind can `downcast_ref::<InvariantViolation>()`
    /// to tell a lifecycle bug apart from any other fault.
    pub(crate) fn raise(self) -> ! {
        tracing::error!(channel = %self.channel(), "{}", self);
        std::panic::panic_any(self)
    }
}
