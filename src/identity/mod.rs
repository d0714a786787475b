//! Userid derivation and local keypairs.
//!
//! A userid is the first [`USERID_LENGTH`] trytes of the Curl hash of the
//! public key's text. It is never stored independently of the key it came
//! from: every holder recomputes it with [`derive_userid`].

pub use keypair::{generate_random_username, KeyPair};

pub mod curl;
mod keypair;

use crate::trytes;

pub const USERID_LENGTH: usize = 8;

/// Curl rounds used for userids. Not the ledger's transaction rounds.
pub const USERID_HASH_ROUNDS: usize = 123;

/// Map a text-encoded public key to its 8-character userid.
pub fn derive_userid(public_key: &str) -> String {
    let public_key_trytes = trytes::from_ascii(public_key);
    let digest = curl::hash(&public_key_trytes, USERID_HASH_ROUNDS);
    digest[..USERID_LENGTH].to_string()
}
