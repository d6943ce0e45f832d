//! # alumni-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    AccountService, Actor, ChatService, ForumService, MessageRelay, ProfileService,
    RegistrationMirror, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    WebhookMirror, MESSAGE_CREATE,
};
