//! Handler error types

use crate::protocol::{CloseCode, OpCode};
use alumni_core::DomainError;
use alumni_service::ServiceError;
use thiserror::Error;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Op {0} cannot be sent by clients")]
    UnknownOpcode(OpCode),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Already authenticated")]
    AlreadyAuthenticated,

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Close code for this error.
    ///
    /// `None` means the frame is rejected but the connection stays open,
    /// which is the case for client errors coming back from the service layer.
    pub fn to_close_code(&self) -> Option<CloseCode> {
        match self {
            Self::UnknownOpcode(_) => Some(CloseCode::UnknownOpcode),
            Self::InvalidPayload(_) => Some(CloseCode::DecodeError),
            Self::AuthenticationFailed(_) => Some(CloseCode::AuthenticationFailed),
            Self::NotAuthenticated => Some(CloseCode::NotAuthenticated),
            Self::AlreadyAuthenticated => Some(CloseCode::AlreadyAuthenticated),
            Self::Service(e) if e.status_code() < 500 => None,
            Self::Service(_) | Self::Domain(_) | Self::Internal(_) => Some(CloseCode::UnknownError),
        }
    }
}

pub type HandlerResult<T> = Result<T, HandlerError>;
