//! # alumni-core
//!
//! Domain layer for the alumni network: entities, value objects and repository traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{normalize_email, parse_tags, Account, ChatMessage, Poll, PollOption, Profile, Reply, Thread};
pub use error::DomainError;
pub use traits::{
    AccountRepository, ChatRepository, ProfileChanges, ProfileRepository, RepoResult,
    ThreadRepository,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
