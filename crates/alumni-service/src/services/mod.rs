//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of one
//! request and owns no state of its own.

pub mod account;
pub mod actor;
pub mod chat;
pub mod context;
pub mod error;
pub mod forum;
pub mod mirror;
pub mod profile;
pub mod relay;

#[cfg(test)]
pub(crate) mod test_support;

pub use account::AccountService;
pub use actor::Actor;
pub use chat::ChatService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use forum::ForumService;
pub use mirror::{RegistrationMirror, RegistrationRow, WebhookMirror};
pub use profile::ProfileService;
pub use relay::{MessageRelay, MESSAGE_CREATE};
