//! Canonical signable data and Ed25519 signatures over it.
//!
//! The signed data is `username ‖ content ‖ channel` with no separators or
//! length prefixes. Two messages whose fields split differently but
//! concatenate to the same text share a signature, e.g. username `bob` with
//! content `by` and username `bobb` with content `y`. Receivers already in
//! the field rely on this exact byte layout, so it is kept as is.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::error::{Error, Result};
use crate::identity::KeyPair;

pub fn canonical_data(username: &str, content: &str, channel: &str) -> String {
    let mut data = String::with_capacity(username.len() + content.len() + channel.len());
    data.push_str(username);
    data.push_str(content);
    data.push_str(channel);
    data
}

/// Sign the canonical data, returning the signature as 128 hex characters.
pub fn sign(username: &str, content: &str, channel: &str, keys: &KeyPair) -> String {
    let signature = keys.sign_bytes(canonical_data(username, content, channel).as_bytes());
    hex::encode(signature.to_bytes())
}

/// Check `signature` over the canonical data under `public_key`.
///
/// Malformed signature or key text fails the same way as a wrong signature.
pub fn verify(
    username: &str,
    content: &str,
    channel: &str,
    signature: &str,
    public_key: &str,
) -> Result<()> {
    let key_bytes: [u8; 32] = hex::decode(public_key)
        .ok()
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| Error::SignatureInvalid("malformed public key".to_string()))?;
    let public_key = VerifyingKey::from_bytes(&key_bytes)
        .map_err(|e| Error::SignatureInvalid(format!("malformed public key: {}", e)))?;

    let signature_bytes = hex::decode(signature)
        .map_err(|e| Error::SignatureInvalid(format!("malformed signature: {}", e)))?;
    let signature = Signature::from_slice(&signature_bytes)
        .map_err(|e| Error::SignatureInvalid(format!("malformed signature: {}", e)))?;

    public_key
        .verify(canonical_data(username, content, channel).as_bytes(), &signature)
        .map_err(|_| Error::SignatureInvalid("signature does not match".to_string()))
}
