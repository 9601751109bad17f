use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute HMAC-SHA256 for session tokens and return as hexadecimal string
pub fn hmac_sha256_token(key: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(token.as_bytes());
    let result = mac.finalize();
    format!("{:x}", result.into_bytes())
}

/// Generate a unique audit log entry identifier
///
/// Combines a millisecond timestamp with a random hex suffix so entries
/// sort chronologically while staying collision-free within a burst.
pub fn generate_audit_id() -> String {
    const SUFFIX_LENGTH: usize = 16;
    const CHARSET: &[u8] = b"0123456789abcdef";

    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();

    format!("audit_{}_{}", chrono::Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_sha256_token_is_deterministic() {
        let first = hmac_sha256_token("secret-key", "token-value");
        let second = hmac_sha256_token("secret-key", "token-value");

        assert_eq!(first, second);
    }

    #[test]
    fn test_hmac_sha256_token_differs_by_key() {
        let first = hmac_sha256_token("secret-key-a", "token-value");
        let second = hmac_sha256_token("secret-key-b", "token-value");

        assert_ne!(first, second);
    }

    #[test]
    fn test_hmac_sha256_token_is_hex_digest() {
        let digest = hmac_sha256_token("secret-key", "token-value");

        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_audit_id_format() {
        let id = generate_audit_id();
        let parts: Vec<&str> = id.splitn(3, '_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "audit");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 16);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_audit_id_uniqueness() {
        let first = generate_audit_id();
        let second = generate_audit_id();

        assert_ne!(first, second);
    }
}
