//! Error types for message construction, verification and encoding.

use thiserror::Error;

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every way building, decoding or encoding a message can fail.
///
/// None of these are retried inside the crate; the caller drops the message
/// (decode) or asks the author to shorten it (encode).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Payload is not a JSON object or lacks a required string key
    #[error("Malformed payload: {0}")]
    Format(String),

    /// Username rejected by the username policy
    #[error("Invalid username: {0}")]
    UsernameInvalid(String),

    /// Signature does not verify, or the key/signature text is malformed
    #[error("Invalid signature: {0}")]
    SignatureInvalid(String),

    /// Encoded payload does not fit into a ledger unit
    #[error("Message too long: payload is {len} characters, limit is {max}")]
    TooLarge { len: usize, max: usize },

    /// Local key material is unusable
    #[error("Invalid key: {0}")]
    Key(String),
}
