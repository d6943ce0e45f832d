//! Database models - SQLx-compatible structs for PostgreSQL tables

mod account;
mod chat_message;
mod profile;
mod thread;

pub use account::AccountModel;
pub use chat_message::ChatMessageModel;
pub use profile::ProfileModel;
pub use thread::{PollOptionModel, PollVoteModel, ReplyModel, ThreadModel};
