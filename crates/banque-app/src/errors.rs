//! Categorized application errors
//!
//! Provides structured error types that enable:
//! - Categorized error handling (auth vs network vs user action)
//! - Appropriate toast severity routing
//! - Recovery hints for user-actionable errors

use banque_core::{SyncError, VerificationStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    /// Neutral information
    Info,
    /// Completed action
    Success,
    /// Transient problem, state unchanged
    Warning,
    /// Failure needing attention
    Error,
}

// ============================================================================
// Error Categories
// ============================================================================

/// High-level error categories for frontend error handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Session missing or expired
    Auth,
    /// Remote store unreachable (often transient)
    Network,
    /// Action not allowed in the current verification state
    Input,
    /// Unexpected failures (catch-all)
    Operation,
}

impl ErrorCategory {
    /// Check if this error category is likely transient.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get the appropriate toast severity for this category.
    #[must_use]
    pub fn toast_severity(&self) -> ToastLevel {
        match self {
            Self::Auth => ToastLevel::Error,
            Self::Network => ToastLevel::Warning,
            Self::Input => ToastLevel::Info,
            Self::Operation => ToastLevel::Error,
        }
    }

    /// Get a short label for this category.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Auth => "Sign-in",
            Self::Network => "Network",
            Self::Input => "Input",
            Self::Operation => "Operation",
        }
    }

    /// Get a hint for the user on how to resolve this category of error.
    #[must_use]
    pub fn resolution_hint(&self) -> &'static str {
        match self {
            Self::Auth => "Sign in again to continue",
            Self::Network => "Check your network connection and retry",
            Self::Input => "This action is not available right now",
            Self::Operation => "An unexpected error occurred",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Categorized application errors
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppError {
    /// No authenticated session
    SignInRequired,
    /// Remote store failures
    Network {
        /// Failure reported by the store
        message: String,
        /// Whether retrying may succeed
        recoverable: bool,
    },
    /// User action failures (with recovery hint)
    UserAction {
        /// What the user tried to do
        action: String,
        /// How to get unblocked
        hint: String,
    },
    /// Internal errors (unexpected conditions)
    Internal {
        /// Component that failed
        source: String,
        /// Error description
        message: String,
    },
}

impl AppError {
    /// Create a recoverable network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            recoverable: true,
        }
    }

    /// Create a user action error with recovery hint
    pub fn user_action(action: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::UserAction {
            action: action.into(),
            hint: hint.into(),
        }
    }

    /// Create an internal error
    pub fn internal(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal {
            source: source.into(),
            message: message.into(),
        }
    }

    /// Category used for UI treatment
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SignInRequired => ErrorCategory::Auth,
            Self::Network { .. } => ErrorCategory::Network,
            Self::UserAction { .. } => ErrorCategory::Input,
            Self::Internal { .. } => ErrorCategory::Operation,
        }
    }

    /// Get the appropriate toast severity for this error
    pub fn toast_level(&self) -> ToastLevel {
        match self {
            Self::Network { recoverable, .. } => {
                if *recoverable {
                    ToastLevel::Warning
                } else {
                    ToastLevel::Error
                }
            }
            other => other.category().toast_severity(),
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::SignInRequired => true,
            Self::Network { recoverable, .. } => *recoverable,
            Self::UserAction { .. } => true,
            Self::Internal { .. } => false,
        }
    }

    /// Get a short error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::SignInRequired => "AUTH_SIGN_IN",
            Self::Network { recoverable, .. } => {
                if *recoverable {
                    "NET_UNAVAILABLE"
                } else {
                    "NET_FATAL"
                }
            }
            Self::UserAction { .. } => "USER_ACTION",
            Self::Internal { .. } => "INTERNAL",
        }
    }
}

fn transition_hint(from: VerificationStatus) -> &'static str {
    match from {
        VerificationStatus::Pending => "Your documents are already under review",
        VerificationStatus::Verified => "Your identity is already verified",
        VerificationStatus::Unverified | VerificationStatus::Rejected => {
            "Refresh your status and try again"
        }
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::NotAuthenticated => Self::SignInRequired,
            SyncError::RemoteUnavailable { message } => Self::network(message),
            SyncError::InvalidTransition { from, action } => {
                Self::user_action(format!("Cannot {action}"), transition_hint(from))
            }
            SyncError::Internal { message } => Self::internal("status-sync", message),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignInRequired => write!(f, "Sign-in required"),
            Self::Network { message, .. } => write!(f, "Network error: {message}"),
            Self::UserAction { action, hint } => write!(f, "{action} - {hint}"),
            Self::Internal { source, message } => write!(f, "{source}: {message}"),
        }
    }
}

impl std::error::Error for AppError {}
