//! Profile database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ProfileModel {
    pub name: String,
    pub department: String,
    pub degree: String,
    pub about: String,
    pub profile_pic: Option<String>,
    pub updated_at: DateTime<Utc>,
}
