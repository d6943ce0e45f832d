//! # alumni-gateway
//!
//! WebSocket gateway for real-time chat delivery.
//!
//! Clients identify with the same bearer token the REST API issues. The
//! gateway then subscribes to the Redis channel `user:{name}` and forwards
//! every `MESSAGE_CREATE` published there to that name's live connections.

pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use server::{create_app, create_gateway_state, run, GatewayState};
