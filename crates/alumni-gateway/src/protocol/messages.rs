//! Gateway message format

use super::{CloseCode, HelloPayload, IdentifyPayload, OpCode, SendMessagePayload};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// A single gateway frame, `{op, d, s?, t?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    pub op: OpCode,

    /// Event type (only for op=0 Dispatch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Sequence number (only for op=0 Dispatch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

impl GatewayMessage {
    // === Server Messages ===

    /// Create a Dispatch message (op=0)
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            t: Some(event_type.into()),
            s: Some(sequence),
            d: Some(data),
        }
    }

    /// Create a Hello message (op=10)
    #[must_use]
    pub fn hello(payload: HelloPayload) -> Self {
        Self {
            op: OpCode::Hello,
            t: None,
            s: None,
            d: Some(serde_json::to_value(payload).unwrap_or_default()),
        }
    }

    /// Create a Heartbeat ACK message (op=11)
    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self {
            op: OpCode::HeartbeatAck,
            t: None,
            s: None,
            d: None,
        }
    }

    // === Parsing Client Messages ===

    /// Parse a text frame from a client.
    ///
    /// A frame whose `op` is a number the protocol does not define fails
    /// with `UnknownOpcode`; anything else that does not decode fails
    /// with `DecodeError`.
    pub fn parse(text: &str) -> Result<Self, CloseCode> {
        let value: Value = serde_json::from_str(text).map_err(|_| CloseCode::DecodeError)?;

        let op = value
            .get("op")
            .and_then(Value::as_u64)
            .ok_or(CloseCode::DecodeError)?;
        if u8::try_from(op).ok().and_then(OpCode::from_u8).is_none() {
            return Err(CloseCode::UnknownOpcode);
        }

        serde_json::from_value(value).map_err(|_| CloseCode::DecodeError)
    }

    /// Try to parse as an Identify payload (op=2)
    pub fn as_identify(&self) -> Option<IdentifyPayload> {
        self.payload_for(OpCode::Identify)
    }

    /// Try to parse as a SendMessage payload (op=3)
    pub fn as_send_message(&self) -> Option<SendMessagePayload> {
        self.payload_for(OpCode::SendMessage)
    }

    /// Try to parse the heartbeat sequence number (op=1)
    pub fn as_heartbeat_seq(&self) -> Option<Option<u64>> {
        if self.op != OpCode::Heartbeat {
            return None;
        }
        Some(self.d.as_ref().and_then(Value::as_u64))
    }

    fn payload_for<T: DeserializeOwned>(&self, op: OpCode) -> Option<T> {
        if self.op != op {
            return None;
        }
        self.d.as_ref().and_then(|d| serde_json::from_value(d.clone()).ok())
    }

    // === Utilities ===

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "GatewayMessage(op={}, t={}", self.op, t)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "GatewayMessage(op={})", self.op)
        }
    }
}
