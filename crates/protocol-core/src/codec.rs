//! JSON text codec for signaling frames

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::error::{ProtocolError, ProtocolResult};
use crate::message::{ClientMessage, InboundMessage, ServerMessage};

/// Encode a participant message to a JSON text frame
pub fn encode_client(message: &ClientMessage) -> ProtocolResult<String> {
    encode(message.id(), message)
}

/// Encode a coordinator message to a JSON text frame
pub fn encode_server(message: &ServerMessage) -> ProtocolResult<String> {
    encode(message.id(), message)
}

/// Decode a coordinator frame
///
/// Unknown ids decode to [`InboundMessage::Unrecognized`]. Malformed JSON,
/// a missing id or bad fields on a known id are errors.
pub fn decode_server(text: &str) -> ProtocolResult<InboundMessage> {
    let (id, value) = split_id(text)?;
    if !ServerMessage::IDS.contains(&id.as_str()) {
        trace!(id = %id, "Unrecognized coordinator message id");
        return Ok(InboundMessage::Unrecognized { id, raw: value });
    }
    decode_known::<ServerMessage>(id, value).map(InboundMessage::Known)
}

/// Decode a participant frame, used on the coordinator side and in tests
pub fn decode_client(text: &str) -> ProtocolResult<ClientMessage> {
    let (id, value) = split_id(text)?;
    if !ClientMessage::IDS.contains(&id.as_str()) {
        return Err(ProtocolError::invalid_fields(id, "unknown client message id"));
    }
    decode_known(id, value)
}

fn encode<T: Serialize>(id: &str, message: &T) -> ProtocolResult<String> {
    serde_json::to_string(message).map_err(|e| ProtocolError::Serialization {
        id: id.to_string(),
        reason: e.to_string(),
    })
}

fn split_id(text: &str) -> ProtocolResult<(String, Value)> {
    let value: Value = serde_json::from_str(text)?;
    let object = value.as_object().ok_or(ProtocolError::NotAnObject)?;
    let id = object
        .get("id")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingId)?
        .to_string();
    Ok((id, value))
}

fn decode_known<T: DeserializeOwned>(id: String, value: Value) -> ProtocolResult<T> {
    serde_json::from_value(value).map_err(|e| ProtocolError::invalid_fields(id, e.to_string()))
}
