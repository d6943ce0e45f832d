//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Thread not found: {0}")]
    ThreadNotFound(Snowflake),

    #[error("Reply not found: {0}")]
    ReplyNotFound(Snowflake),

    #[error("Thread {0} has no poll")]
    PollNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid option index {index}: poll has {count} options")]
    InvalidOptionIndex { index: usize, count: usize },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Only the author can delete this thread")]
    NotThreadAuthor,

    #[error("Only the author can delete this reply")]
    NotReplyAuthor,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Name already in use: {0}")]
    NameAlreadyExists(String),

    #[error("You have already voted on this poll")]
    AlreadyVoted,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::AccountNotFound(_) => "UNKNOWN_ACCOUNT",
            Self::ProfileNotFound(_) => "UNKNOWN_PROFILE",
            Self::ThreadNotFound(_) => "UNKNOWN_THREAD",
            Self::ReplyNotFound(_) => "UNKNOWN_REPLY",
            Self::PollNotFound(_) => "UNKNOWN_POLL",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidOptionIndex { .. } => "INVALID_OPTION",

            // Authorization
            Self::NotThreadAuthor => "NOT_THREAD_AUTHOR",
            Self::NotReplyAuthor => "NOT_REPLY_AUTHOR",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::NameAlreadyExists(_) => "NAME_ALREADY_EXISTS",
            Self::AlreadyVoted => "ALREADY_VOTED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound(_)
                | Self::ProfileNotFound(_)
                | Self::ThreadNotFound(_)
                | Self::ReplyNotFound(_)
                | Self::PollNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::InvalidOptionIndex { .. })
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotThreadAuthor | Self::NotReplyAuthor)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists | Self::NameAlreadyExists(_) | Self::AlreadyVoted
        )
    }
}
