//! Account database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the accounts table, minus the password hash
#[derive(Debug, Clone, FromRow)]
pub struct AccountModel {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub occupation: String,
    pub interests: Option<String>,
    pub experience: Option<String>,
    pub created_at: DateTime<Utc>,
}
