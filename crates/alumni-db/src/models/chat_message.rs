//! Chat message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ChatMessageModel {
    pub id: i64,
    pub sender: String,
    pub receiver: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
