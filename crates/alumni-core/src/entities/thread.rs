//! Thread entity - a forum post with its replies and optional poll

use chrono::{DateTime, Utc};

use crate::entities::Poll;
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Forum thread. `replies` are kept in ascending id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thread {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub author_name: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub replies: Vec<Reply>,
    pub poll: Option<Poll>,
    pub created_at: DateTime<Utc>,
}

impl Thread {
    /// Create a discussion thread. Title and content must be non-blank.
    pub fn new_discussion(
        id: Snowflake,
        author_id: Snowflake,
        author_name: String,
        title: &str,
        content: &str,
    ) -> Result<Self, DomainError> {
        let title = require("title", title)?;
        let content = require("content", content)?;

        Ok(Self {
            id,
            author_id,
            author_name,
            title: Some(title),
            content: Some(content),
            image: None,
            tags: Vec::new(),
            replies: Vec::new(),
            poll: None,
            created_at: Utc::now(),
        })
    }

    /// Create a thread that carries only a poll
    pub fn new_poll(id: Snowflake, author_id: Snowflake, author_name: String, poll: Poll) -> Self {
        Self {
            id,
            author_id,
            author_name,
            title: None,
            content: None,
            image: None,
            tags: Vec::new(),
            replies: Vec::new(),
            poll: Some(poll),
            created_at: Utc::now(),
        }
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Ownership is decided by account id, never by display name
    #[inline]
    pub fn is_authored_by(&self, account_id: Snowflake) -> bool {
        self.author_id == account_id
    }

    /// Check if this thread should appear in the poll listing
    pub fn has_poll(&self) -> bool {
        self.poll.as_ref().is_some_and(|p| !p.question.is_empty())
    }

    pub fn find_reply(&self, reply_id: Snowflake) -> Option<&Reply> {
        self.replies.iter().find(|r| r.id == reply_id)
    }

    pub fn push_reply(&mut self, reply: Reply) {
        self.replies.push(reply);
    }

    /// Remove a reply by id, preserving the order of the rest
    pub fn remove_reply(&mut self, reply_id: Snowflake) -> Option<Reply> {
        let pos = self.replies.iter().position(|r| r.id == reply_id)?;
        Some(self.replies.remove(pos))
    }
}

/// Reply to a thread, stored with a back-reference to its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub id: Snowflake,
    pub thread_id: Snowflake,
    pub author_id: Snowflake,
    pub author_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Reply {
    /// Create a new Reply. The message must be non-blank.
    pub fn new(
        id: Snowflake,
        thread_id: Snowflake,
        author_id: Snowflake,
        author_name: String,
        message: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            thread_id,
            author_id,
            author_name,
            message: require("message", message)?,
            created_at: Utc::now(),
        })
    }

    #[inline]
    pub fn is_authored_by(&self, account_id: Snowflake) -> bool {
        self.author_id == account_id
    }
}

/// Split a comma-separated tag string into trimmed, non-empty tags
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn require(field: &str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::ValidationError(format!("{field} is required")));
    }
    Ok(value.to_string())
}
