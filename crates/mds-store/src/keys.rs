//! API key generation and secret hashing.

use sha2::{Digest, Sha256};

/// Random bytes in a generated API key.
pub const API_KEY_BYTES: usize = 24;

/// Generate a new plaintext API key: 24 random bytes, hex-encoded.
///
/// The plaintext is shown once to the operator; only [`hash_secret`] of it
/// is stored.
#[must_use]
pub fn generate_api_key() -> String {
    let bytes: [u8; API_KEY_BYTES] = rand::random();
    hex::encode(bytes)
}

/// Hex SHA-256 digest used to store API keys and identity provider uids.
#[must_use]
pub fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}
