//! Forum database models
//!
//! A thread is spread over four tables. The repository loads each table in
//! one batched query and the mapper stitches the rows back together.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for threads table
#[derive(Debug, Clone, FromRow)]
pub struct ThreadModel {
    pub id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub poll_question: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Database model for thread_replies table
#[derive(Debug, Clone, FromRow)]
pub struct ReplyModel {
    pub id: i64,
    pub thread_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Database model for poll_options table
#[derive(Debug, Clone, FromRow)]
pub struct PollOptionModel {
    pub thread_id: i64,
    pub position: i32,
    pub label: String,
    pub votes: i32,
}

/// One entry of a poll's voted-set
#[derive(Debug, Clone, FromRow)]
pub struct PollVoteModel {
    pub thread_id: i64,
    pub voter_id: i64,
}
