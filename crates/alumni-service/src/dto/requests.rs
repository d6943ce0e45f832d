//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Field names follow what existing web clients already send.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Account Requests
// ============================================================================

/// Alumni registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, max = 128, message = "Password must be 6-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Occupation must be 1-100 characters"))]
    pub occupation: String,

    #[validate(length(max = 500, message = "Interests must be at most 500 characters"))]
    #[serde(default)]
    pub interests: Option<String>,

    #[validate(length(max = 500, message = "Experience must be at most 500 characters"))]
    #[serde(default)]
    pub experience: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

// ============================================================================
// Profile Requests
// ============================================================================

/// Profile upsert. The picture arrives separately as an uploaded file.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100, message = "Department must be at most 100 characters"))]
    #[serde(default)]
    pub department: String,

    #[validate(length(max = 100, message = "Degree must be at most 100 characters"))]
    #[serde(default)]
    pub degree: String,

    #[validate(length(max = 2000, message = "About must be at most 2000 characters"))]
    #[serde(default)]
    pub about: String,
}

// ============================================================================
// Forum Requests
// ============================================================================

/// Discussion thread. `tags` is a comma-separated list.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateThreadRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    #[serde(default)]
    pub title: String,

    #[validate(length(max = 10000, message = "Content must be at most 10000 characters"))]
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub tags: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    #[validate(length(max = 300, message = "Poll question must be at most 300 characters"))]
    #[serde(default)]
    pub poll_question: String,

    #[validate(length(max = 20, message = "A poll may have at most 20 options"))]
    #[serde(default)]
    pub poll_options: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReplyRequest {
    #[validate(length(max = 4000, message = "Reply must be at most 4000 characters"))]
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub option_index: usize,
}

// ============================================================================
// Chat Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(max = 100, message = "Receiver must be at most 100 characters"))]
    #[serde(default)]
    pub receiver: String,

    #[validate(length(max = 4000, message = "Message must be at most 4000 characters"))]
    #[serde(default)]
    pub message: String,
}
