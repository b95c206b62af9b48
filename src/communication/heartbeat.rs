use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::errors::{new_err, ElectionError};
use crate::leadership::{NodeIdentity, Role};

/// Heartbeat payload exchanged between gateway nodes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatMessage {
    #[serde(rename = "gatewayID")]
    pub sender_id: String,
    #[serde(rename = "isActive")]
    pub sender_is_active: bool,
    #[serde(rename = "bootTimeEPOCH")]
    pub sender_boot_epoch: i64,
}

impl HeartbeatMessage {
    pub fn new(identity: &NodeIdentity, role: Role) -> HeartbeatMessage {
        HeartbeatMessage {
            sender_id: identity.id.clone(),
            sender_is_active: role.is_active(),
            sender_boot_epoch: identity.boot_epoch,
        }
    }

    pub fn sender_role(&self) -> Role {
        Role::from_active_flag(self.sender_is_active)
    }
}

/// Why a datagram could not be turned into a heartbeat.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum DecodeError {
    /// Not a structured payload at all.
    #[display(fmt = "malformed heartbeat: {}", _0)]
    Malformed(String),
    /// Structured payload with a missing or mistyped required field.
    #[display(fmt = "incomplete heartbeat: {}", _0)]
    Incomplete(String),
}

pub fn encode(message: &HeartbeatMessage) -> Result<Vec<u8>, ElectionError> {
    match serde_json::to_vec(message) {
        Ok(bytes) => Ok(bytes),
        Err(err) => new_err("Cannot encode heartbeat".to_string(), err.to_string()),
    }
}

/// Decodes a datagram. Unknown fields are ignored.
pub fn decode(payload: &[u8]) -> Result<HeartbeatMessage, DecodeError> {
    let value: serde_json::Value =
        serde_json::from_slice(payload).map_err(|err| DecodeError::Malformed(err.to_string()))?;

    serde_json::from_value(value).map_err(|err| DecodeError::Incomplete(err.to_string()))
}
