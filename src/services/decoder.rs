use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use crate::domains::envelope::{Envelope, EnvelopeType, FetchBatch};
use crate::error::{RelayError, Result};

/// Decodes a `GET /v1/messages` response body into a page of envelopes.
///
/// A missing body or a body without a `messages` array fails the whole
/// page. Individual records that do not carry every required field are
/// skipped; the remaining envelopes keep their server order.
pub fn parse_messages_response(response: Option<&Value>) -> Result<FetchBatch> {
    let response = response
        .and_then(Value::as_object)
        .ok_or(RelayError::UnprocessableResponse)?;
    let messages = response
        .get("messages")
        .and_then(Value::as_array)
        .ok_or(RelayError::UnprocessableResponse)?;
    let more = response
        .get("more")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let envelopes = messages.iter().filter_map(build_envelope).collect();
    Ok(FetchBatch { envelopes, more })
}

pub fn build_envelope(record: &Value) -> Option<Envelope> {
    let record = record.as_object()?;

    let raw_type = record.get("type").and_then(Value::as_i64)?;
    let envelope_type = EnvelopeType::from_raw(i32::try_from(raw_type).ok()?)?;
    let relay = record
        .get("relay")
        .and_then(Value::as_str)
        .map(str::to_string);
    let timestamp = record.get("timestamp").and_then(Value::as_u64)?;
    let source = record.get("source").and_then(Value::as_str)?.to_string();
    let source_device = record
        .get("sourceDevice")
        .and_then(Value::as_u64)
        .and_then(|value| u32::try_from(value).ok())?;

    Some(Envelope {
        envelope_type,
        relay,
        timestamp,
        source,
        source_device,
        legacy_message: decode_optional_base64(record.get("message")),
        content: decode_optional_base64(record.get("content")),
    })
}

// Undecodable payloads are treated as absent.
fn decode_optional_base64(value: Option<&Value>) -> Option<Vec<u8>> {
    let encoded = value?.as_str()?;
    STANDARD.decode(encoded).ok()
}
