//! Shared error classification for the simulation core.
//!
//! Domain errors (`CommandError`, `MomentumError`, `TurnError`, `SetupError`)
//! live next to the operations they guard; this module only provides the
//! severity scale and the trait that lets callers treat them uniformly.

/// How a caller should react to a failed operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same request may succeed later (e.g. once an animation settles
    /// or momentum is regained).
    Recoverable,
    /// The request itself is invalid and should not be retried unchanged.
    Validation,
    /// Internal bookkeeping disagrees with itself.
    Internal,
    /// The battle cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common interface over every error enum in the core.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the variant, suitable for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
