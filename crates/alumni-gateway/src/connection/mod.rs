//! Connection management
//!
//! Tracks live WebSocket connections and which display name each belongs to.

mod connection;
mod manager;

pub use connection::{Connection, ConnectionState, Outbound};
pub use manager::ConnectionManager;
