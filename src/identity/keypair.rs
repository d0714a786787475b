use ed25519_dalek::{Signature, Signer, SigningKey};
use rand::rngs::OsRng;
use rand::{thread_rng, Rng};

use super::derive_userid;
use crate::error::{Error, Result};

/// Local signing identity: an Ed25519 keypair plus its text-encoded public key.
#[derive(Debug, Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
    public_key: String,
}

impl KeyPair {
    /// Generate a fresh keypair
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Import a secret key given as 64 hex characters
    pub fn from_secret(secret: &str) -> Result<Self> {
        let bytes = hex::decode(secret.trim())
            .map_err(|e| Error::Key(format!("invalid hex secret key: {}", e)))?;
        let bytes: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            Error::Key(format!(
                "invalid key length: expected 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::from_signing_key(SigningKey::from_bytes(&bytes)))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let public_key = hex::encode(signing_key.verifying_key().as_bytes());
        Self {
            signing_key,
            public_key,
        }
    }

    /// Public key as 64 lowercase hex characters
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Userid derived from the public key
    pub fn userid(&self) -> String {
        derive_userid(&self.public_key)
    }

    /// Export the secret half as 64 hex characters
    pub fn secret_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    pub(crate) fn sign_bytes(&self, data: &[u8]) -> Signature {
        self.signing_key.sign(data)
    }
}

/// Generate a random username in the form {adjective}{noun}{number}
pub fn generate_random_username() -> String {
    let adjectives = [
        "shadow", "cyber", "quantum", "neon", "digital", "ghost", "phantom", "void",
        "dark", "bright", "swift", "silent", "electric", "cosmic", "neural", "lunar",
    ];

    let nouns = [
        "agent", "runner", "node", "byte", "cipher", "signal", "pulse", "wave",
        "core", "link", "port", "daemon", "thread", "kernel", "shell", "root",
    ];

    let mut rng = thread_rng();
    let adjective = adjectives[rng.gen_range(0..adjectives.len())];
    let noun = nouns[rng.gen_range(0..nouns.len())];
    let number: u16 = rng.gen_range(100..999);

    format!("{}{}{}", adjective, noun, number)
}
