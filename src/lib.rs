//! Signed chat messages for ledger channels.
//!
//! An authored [`Message`] is signed over `username ‖ content ‖ channel`
//! with the author's key and encoded into a JSON payload small enough for one
//! ledger unit. A received unit is decoded, its signature verified, the
//! sender's userid derived from their public key, and the result classified
//! as trusted (the userid is a contact) and/or own (the userid is ours).

pub mod channels;
pub mod config;
pub mod error;
pub mod identity;
pub mod message;
pub mod policy;
pub mod signer;
pub mod transport;
pub mod trytes;

pub use error::{Error, Result};
pub use identity::{derive_userid, KeyPair};
pub use message::{DisplayMessage, Field, Message, WirePayload};
pub use policy::{DefaultUsernamePolicy, UsernamePolicy};
pub use transport::{InboundUnit, OutboundUnit, MAX_PAYLOAD_LENGTH};
