//! Path parameter extractors
//!
//! Type-safe extraction of Snowflake IDs from path parameters.

use alumni_core::Snowflake;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::Deserialize;

use crate::response::ApiError;

fn parse_id(raw: &str, name: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

/// `/:id` where the id names a thread
#[derive(Debug, Clone, Copy)]
pub struct ThreadIdPath(pub Snowflake);

#[derive(Deserialize)]
struct RawThreadId {
    id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for ThreadIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<RawThreadId>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        Ok(Self(parse_id(&raw.id, "thread id")?))
    }
}

/// `/:id/reply/:reply_id`
#[derive(Debug, Clone, Copy)]
pub struct ReplyPath {
    pub thread_id: Snowflake,
    pub reply_id: Snowflake,
}

#[derive(Deserialize)]
struct RawReplyPath {
    id: String,
    reply_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for ReplyPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<RawReplyPath>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        Ok(Self {
            thread_id: parse_id(&raw.id, "thread id")?,
            reply_id: parse_id(&raw.reply_id, "reply id")?,
        })
    }
}
