//! Shared error codes
//!
//! Stable codes attached to engine errors so host applications can map
//! failures to user-facing messages without string matching.

/// Standardized error codes
///
/// Ranges: 0xxx general, 2xxx permission, 4xxx inventory, 5xxx marketplace,
/// 9xxx system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed input, rejected before any write
    Validation,
    /// Actor lacks department/role permission
    Authorization,
    /// Referenced document does not exist
    NotFound,
    /// Conditional decrement found less stock than requested
    InsufficientStock,
    /// A multi-step operation failed after earlier steps committed
    PartialWrite,
    /// Storage/ledger collaborator unreachable
    RemoteUnavailable,
    /// Anything else
    Internal,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation => "E0002",
            Self::Authorization => "E2001",
            Self::NotFound => "E0003",
            Self::InsufficientStock => "E4001",
            Self::PartialWrite => "E5001",
            Self::RemoteUnavailable => "E9002",
            Self::Internal => "E9001",
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::Validation => "Validation failed",
            Self::Authorization => "Permission denied",
            Self::NotFound => "Resource not found",
            Self::InsufficientStock => "Insufficient stock",
            Self::PartialWrite => "Operation partially applied",
            Self::RemoteUnavailable => "Storage unavailable",
            Self::Internal => "Internal error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
