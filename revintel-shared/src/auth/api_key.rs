/// Client API key utilities
///
/// A key is issued once when a client is created. Only its SHA-256 hash is
/// kept on the client record; no endpoint currently accepts the key as a
/// credential.
///
/// # Key Format
///
/// `rk_live_` followed by 32 base62 characters (40 chars total).
///
/// # Example
///
/// ```
/// use revintel_shared::auth::api_key::{generate_api_key, hash_api_key, API_KEY_LENGTH};
///
/// let (key, hash) = generate_api_key();
/// assert!(key.starts_with("rk_live_"));
/// assert_eq!(key.len(), API_KEY_LENGTH);
/// assert_eq!(hash, hash_api_key(&key));
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of the key
const KEY_RANDOM_LENGTH: usize = 32;

/// Key prefix
const KEY_PREFIX: &str = "rk_live_";

/// Total length of an API key
pub const API_KEY_LENGTH: usize = KEY_PREFIX.len() + KEY_RANDOM_LENGTH;

/// Generates a new API key
///
/// Returns `(plaintext_key, sha256_hex_hash)`.
pub fn generate_api_key() -> (String, String) {
    let key = format!("{}{}", KEY_PREFIX, random_base62(KEY_RANDOM_LENGTH));
    let hash = hash_api_key(&key);

    (key, hash)
}

fn random_base62(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Hashes an API key with SHA-256, hex-encoded
pub fn hash_api_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_keys_are_well_formed() {
        let (key, hash) = generate_api_key();

        assert_eq!(key.len(), API_KEY_LENGTH);
        assert!(key["rk_live_".len()..].chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_keys_are_unique() {
        let (a, _) = generate_api_key();
        let (b, _) = generate_api_key();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_api_key("rk_live_x"), hash_api_key("rk_live_x"));
        assert_ne!(hash_api_key("rk_live_x"), hash_api_key("rk_live_y"));
    }
}
