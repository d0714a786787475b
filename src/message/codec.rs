use std::collections::HashSet;
use std::io;

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use serde_json::{Map, Value};

use super::{Field, Message};
use crate::error::{Error, Result};
use crate::identity::derive_userid;
use crate::policy::UsernamePolicy;
use crate::signer;
use crate::transport::{InboundUnit, MAX_PAYLOAD_LENGTH};

/// Body carried inside a ledger unit. Nothing receiver-local is transmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePayload {
    pub username: String,
    pub message: String,
    pub signature: String,
    pub public_key: String,
}

/// What a chat view renders. Signature and key are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMessage {
    pub timestamp: i64,
    pub username: String,
    pub user_id: String,
    pub message: String,
    pub channel: String,
    pub is_trusted: bool,
    pub is_own: bool,
}

fn required_string(object: &Map<String, Value>, field: Field) -> Result<String> {
    match object.get(field.as_str()) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(Error::Format(format!(
            "key `{}` must be a string, got {}",
            field, other
        ))),
        None => Err(Error::Format(format!("missing key `{}`", field))),
    }
}

pub fn decode_payload(body: &str) -> Result<WirePayload> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| Error::Format(format!("not JSON: {}", e)))?;
    let object = value
        .as_object()
        .ok_or_else(|| Error::Format("payload is not a JSON object".to_string()))?;

    Ok(WirePayload {
        username: required_string(object, Field::Username)?,
        message: required_string(object, Field::Message)?,
        signature: required_string(object, Field::Signature)?,
        public_key: required_string(object, Field::PublicKey)?,
    })
}

/// Turn an inbound unit into a verified, classified [`Message`].
///
/// Nothing is produced unless every step passes.
pub fn decode<P: UsernamePolicy + ?Sized>(
    unit: &InboundUnit,
    contacts: &HashSet<String>,
    own_userid: &str,
    policy: &P,
) -> Result<Message> {
    let payload = decode_payload(&unit.body)?;
    policy.validate(&payload.username)?;

    let userid = derive_userid(&payload.public_key);
    signer::verify(
        &payload.username,
        &payload.message,
        &unit.address,
        &payload.signature,
        &payload.public_key,
    )?;

    let (is_trusted, is_own) = classify(&userid, contacts, own_userid);
    tracing::debug!(
        "accepted message from {}#{} on {} (trusted: {}, own: {})",
        payload.username,
        userid,
        unit.address,
        is_trusted,
        is_own
    );

    Ok(Message {
        timestamp: unit.issuance_timestamp,
        username: payload.username,
        userid,
        content: payload.message,
        channel: unit.address.clone(),
        signature: payload.signature,
        public_key: payload.public_key,
        is_trusted,
        is_own,
    })
}

/// Trust and ownership of a verified sender: `(is_trusted, is_own)`
pub fn classify(userid: &str, contacts: &HashSet<String>, own_userid: &str) -> (bool, bool) {
    (contacts.contains(userid), userid == own_userid)
}

/// Compact JSON that escapes every non-ASCII code point as `\uXXXX`
/// (surrogate pairs above the BMP), so the text is also its own byte count.
struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, c) in fragment.char_indices() {
            if c.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..index].as_bytes())?;
            for unit in c.encode_utf16(&mut [0u16; 2]).iter() {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = index + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Serialize the wire payload as ASCII JSON, refusing anything above
/// [`MAX_PAYLOAD_LENGTH`].
pub fn encode(message: &Message) -> Result<String> {
    let payload = WirePayload {
        username: message.username.clone(),
        message: message.content.clone(),
        signature: message.signature.clone(),
        public_key: message.public_key.clone(),
    };

    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, AsciiFormatter);
    payload
        .serialize(&mut serializer)
        .map_err(|e| Error::Format(e.to_string()))?;
    let text = String::from_utf8(out).map_err(|e| Error::Format(e.to_string()))?;

    let len = text.len();
    if len > MAX_PAYLOAD_LENGTH {
        return Err(Error::TooLarge {
            len,
            max: MAX_PAYLOAD_LENGTH,
        });
    }
    tracing::trace!("encoded payload of {} characters", len);
    Ok(text)
}

pub fn to_display(message: &Message) -> DisplayMessage {
    DisplayMessage {
        timestamp: message.timestamp,
        username: message.username.clone(),
        user_id: message.userid.clone(),
        message: message.content.clone(),
        channel: message.channel.clone(),
        is_trusted: message.is_trusted,
        is_own: message.is_own,
    }
}
