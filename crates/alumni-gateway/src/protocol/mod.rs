//! Gateway protocol definitions
//!
//! Op codes, the frame format and close codes spoken on `/gateway`.

mod close_codes;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, IdentifyPayload, ReadyPayload, SendMessagePayload};
