//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, path ids and upload forms.

mod auth;
mod multipart;
mod path;
mod validated;

pub use auth::AuthUser;
pub use multipart::{ProfileForm, ThreadForm, UploadedFile};
pub use path::{ReplyPath, ThreadIdPath};
pub use validated::ValidatedJson;
pub(crate) use validated::json_rejection;
