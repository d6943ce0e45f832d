//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreatePollRequest, CreateThreadRequest, LoginRequest, RegisterRequest, ReplyRequest,
    SendMessageRequest, UpdateProfileRequest, VoteRequest,
};

pub use responses::{
    AccountResponse, AlumniSummary, ChatMessageResponse, HealthChecks, HealthResponse,
    LoginResponse, MessageResponse, PollOptionResponse, PollResponse, ProfileResponse,
    ReadinessResponse, ReplyResponse, ThreadResponse,
};

/// Flatten validator output into one line, e.g. `email: Invalid email format`
pub fn describe_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
