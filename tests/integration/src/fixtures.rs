//! Test fixtures and data generators

use reqwest::multipart;
use serde::{Deserialize, Serialize};

/// Unique suffix so repeated runs against the same database never collide
pub fn unique_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..12].to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub occupation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            name: format!("alum-{suffix}"),
            email: format!("alum-{suffix}@example.com"),
            password: "secret123".to_string(),
            occupation: "Engineer".to_string(),
            interests: Some("rust, hiking".to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub alumni: AccountResponse,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub occupation: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct AlumniSummary {
    pub name: String,
    pub occupation: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub name: String,
    pub department: String,
    pub degree: String,
    pub about: String,
    pub profile_pic: Option<String>,
}

/// Multipart body for `POST /forum/create-thread`
pub fn thread_form(title: &str, content: &str, tags: &str) -> multipart::Form {
    multipart::Form::new()
        .text("title", title.to_string())
        .text("content", content.to_string())
        .text("tags", tags.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    pub poll_question: String,
    pub poll_options: Vec<String>,
}

impl CreatePollRequest {
    pub fn new(question: &str, options: &[&str]) -> Self {
        Self {
            poll_question: question.to_string(),
            poll_options: options.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub option_index: usize,
}

#[derive(Debug, Serialize)]
pub struct ReplyRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadResponse {
    pub id: String,
    pub author: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub replies: Vec<ReplyResponse>,
    pub poll: Option<PollResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub id: String,
    pub author: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct PollResponse {
    pub question: String,
    pub options: Vec<PollOptionResponse>,
    pub voted_users: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PollOptionResponse {
    pub option: String,
    pub votes: i32,
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest {
    pub receiver: String,
    pub message: String,
}

impl SendMessageRequest {
    pub fn new(receiver: &str, message: &str) -> Self {
        Self {
            receiver: receiver.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub id: String,
    pub sender: String,
    pub receiver: String,
    pub message: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error response
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
