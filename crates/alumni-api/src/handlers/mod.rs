//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod alumni;
pub mod chat;
pub mod forum;
pub mod health;
pub mod profile;
