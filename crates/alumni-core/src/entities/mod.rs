//! Domain entities - core business objects

mod account;
mod chat_message;
mod poll;
mod profile;
mod thread;

pub use account::{normalize_email, Account};
pub use chat_message::ChatMessage;
pub use poll::{Poll, PollOption};
pub use profile::Profile;
pub use thread::{parse_tags, Reply, Thread};
