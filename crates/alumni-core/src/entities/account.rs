//! Account entity - a registered alumnus

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Registered account. The password hash is stored separately and never
/// travels with the entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Snowflake,
    pub name: String,
    pub email: String,
    pub occupation: String,
    pub interests: Option<String>,
    pub experience: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new Account with required fields
    pub fn new(id: Snowflake, name: String, email: String, occupation: String) -> Self {
        Self {
            id,
            name,
            email: normalize_email(&email),
            occupation,
            interests: None,
            experience: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_interests(mut self, interests: Option<String>) -> Self {
        self.interests = interests.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_experience(mut self, experience: Option<String>) -> Self {
        self.experience = experience.filter(|s| !s.trim().is_empty());
        self
    }
}

/// Emails are compared case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
