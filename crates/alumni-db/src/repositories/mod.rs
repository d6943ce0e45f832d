//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in alumni-core.

mod account;
mod chat;
mod error;
mod profile;
mod thread;

pub use account::PgAccountRepository;
pub use chat::PgChatRepository;
pub use profile::PgProfileRepository;
pub use thread::PgThreadRepository;
