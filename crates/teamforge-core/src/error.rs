//! Error types for TeamForge

use thiserror::Error;

/// Main error type for partitioning operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    /// Too few participants for the requested group count or caller minimum
    #[error("Insufficient participants: found {found}, at least {required} required")]
    InsufficientParticipants { found: usize, required: usize },

    /// A partition into zero groups was requested
    #[error("Group count must be at least 1")]
    NoGroups,

    /// A participant record without a usable skill level
    #[error("Malformed participant '{name}': {reason}")]
    MalformedParticipant { name: String, reason: String },

    /// Internal accounting error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PartitionError {
    pub(crate) fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        PartitionError::MalformedParticipant {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for partitioning operations
pub type Result<T> = std::result::Result<T, PartitionError>;
