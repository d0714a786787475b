use std::collections::HashSet;
use std::fmt;

pub use codec::{DisplayMessage, WirePayload};

pub mod codec;

use crate::error::Result;
use crate::identity::{derive_userid, KeyPair};
use crate::policy::{DefaultUsernamePolicy, UsernamePolicy};
use crate::signer;
use crate::transport::{life_sign_tag, InboundUnit, OutboundUnit};

/// Key names shared by the wire payload and the display record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    UserId,
    Message,
    Timestamp,
    Channel,
    PublicKey,
    Signature,
    IsTrusted,
    IsOwn,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::UserId => "user_id",
            Field::Message => "message",
            Field::Timestamp => "timestamp",
            Field::Channel => "channel",
            Field::PublicKey => "public_key",
            Field::Signature => "signature",
            Field::IsTrusted => "is_trusted",
            Field::IsOwn => "is_own",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signed chat message.
///
/// Built once, through [`Message::from_wire`] or [`Message::from_author`],
/// and read-only afterwards. The userid is always derived from the public key
/// and the signature always covers `username ‖ content ‖ channel`.
/// [`Message::empty`] is the one exception: a sentinel meaning "no message",
/// never signed or verified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    timestamp: i64,
    username: String,
    userid: String,
    content: String,
    channel: String,
    signature: String,
    public_key: String,
    is_trusted: bool,
    is_own: bool,
}

impl Message {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Decode and verify a received unit with the default username policy
    pub fn from_wire(
        unit: &InboundUnit,
        contacts: &HashSet<String>,
        own_userid: &str,
    ) -> Result<Self> {
        codec::decode(unit, contacts, own_userid, &DefaultUsernamePolicy)
    }

    pub fn from_wire_with_policy<P: UsernamePolicy + ?Sized>(
        unit: &InboundUnit,
        contacts: &HashSet<String>,
        own_userid: &str,
        policy: &P,
    ) -> Result<Self> {
        codec::decode(unit, contacts, own_userid, policy)
    }

    /// Sign new content with the local keypair, stamped with the current time.
    ///
    /// Authors always own and trust what they write. The username must pass
    /// the default policy, so nothing is signed that receivers would refuse.
    pub fn from_author(
        username: &str,
        content: &str,
        channel: &str,
        keys: &KeyPair,
    ) -> Result<Self> {
        Self::from_author_with_policy(username, content, channel, keys, &DefaultUsernamePolicy)
    }

    pub fn from_author_with_policy<P: UsernamePolicy + ?Sized>(
        username: &str,
        content: &str,
        channel: &str,
        keys: &KeyPair,
        policy: &P,
    ) -> Result<Self> {
        policy.validate(username)?;
        let signature = signer::sign(username, content, channel, keys);
        let public_key = keys.public_key().to_string();

        Ok(Self {
            timestamp: chrono::Utc::now().timestamp_millis(),
            username: username.to_string(),
            userid: derive_userid(&public_key),
            content: content.to_string(),
            channel: channel.to_string(),
            signature,
            public_key,
            is_trusted: true,
            is_own: true,
        })
    }

    pub fn to_display(&self) -> DisplayMessage {
        codec::to_display(self)
    }

    /// Build the outbound unit, stamped with a tag for the current minute
    pub fn to_wire(&self) -> Result<OutboundUnit> {
        self.to_wire_at(chrono::Utc::now().timestamp_millis())
    }

    pub fn to_wire_at(&self, now_millis: i64) -> Result<OutboundUnit> {
        let body = codec::encode(self)?;
        Ok(OutboundUnit {
            address: self.channel.clone(),
            body,
            tag: life_sign_tag(now_millis),
        })
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn userid(&self) -> &str {
        &self.userid
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn is_trusted(&self) -> bool {
        self.is_trusted
    }

    pub fn is_own(&self) -> bool {
        self.is_own
    }
}
