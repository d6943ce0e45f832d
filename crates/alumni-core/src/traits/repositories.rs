//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer states what it needs from storage and the
//! infrastructure layer (`alumni-db`) provides it.

use async_trait::async_trait;

use crate::entities::{Account, ChatMessage, Profile, Reply, Thread};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Account Repository
// ============================================================================

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Account>>;

    /// Find account by (normalized) email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Check if a display name is already taken (exact match)
    async fn name_exists(&self, name: &str) -> RepoResult<bool>;

    /// Create a new account.
    /// Fails with `EmailAlreadyExists` or `NameAlreadyExists` when either is
    /// taken, even under a race.
    async fn create(&self, account: &Account, password_hash: &str) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    /// All accounts, oldest first
    async fn list_all(&self) -> RepoResult<Vec<Account>>;
}

// ============================================================================
// Profile Repository
// ============================================================================

/// Values written by a profile upsert.
/// `profile_pic: None` leaves any stored picture untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: String,
    pub department: String,
    pub degree: String,
    pub about: String,
    pub profile_pic: Option<String>,
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find profile by name
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Profile>>;

    /// Insert or update the profile in one statement, returning the stored row
    async fn upsert(&self, changes: &ProfileChanges) -> RepoResult<Profile>;
}

// ============================================================================
// Thread Repository
// ============================================================================

/// Threads are returned fully hydrated: replies in id order and poll state included.
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    /// Find thread by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Thread>>;

    /// All threads, newest first
    async fn list_all(&self) -> RepoResult<Vec<Thread>>;

    /// Threads written under `author_name`, newest first
    async fn list_by_author(&self, author_name: &str) -> RepoResult<Vec<Thread>>;

    /// Threads carrying a poll with a non-empty question, newest first
    async fn list_polls(&self) -> RepoResult<Vec<Thread>>;

    /// Create a thread together with its poll options
    async fn create(&self, thread: &Thread) -> RepoResult<()>;

    /// Delete a thread and everything hanging off it
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Append a reply to its thread
    async fn add_reply(&self, reply: &Reply) -> RepoResult<()>;

    /// Remove a single reply
    async fn delete_reply(&self, thread_id: Snowflake, reply_id: Snowflake) -> RepoResult<()>;

    /// Record a vote atomically.
    ///
    /// Either the voter is added to the voted-set and the option counter is
    /// incremented, or nothing changes. A voter already present yields
    /// `AlreadyVoted`. A missing option yields `InvalidOptionIndex`.
    async fn cast_vote(
        &self,
        thread_id: Snowflake,
        voter_id: Snowflake,
        option_index: usize,
    ) -> RepoResult<()>;
}

// ============================================================================
// Chat Repository
// ============================================================================

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Persist a new message
    async fn create(&self, message: &ChatMessage) -> RepoResult<()>;

    /// Messages exchanged between `a` and `b` in either direction, oldest first
    async fn find_conversation(&self, a: &str, b: &str) -> RepoResult<Vec<ChatMessage>>;

    /// Distinct names `name` has exchanged messages with, sorted
    async fn find_partners(&self, name: &str) -> RepoResult<Vec<String>>;
}
