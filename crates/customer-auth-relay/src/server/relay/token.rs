//! Random identifiers for sessions and state tokens.

use rand::RngCore;

/// Session identifier length in bytes (32 hex chars).
pub const SESSION_ID_BYTES: usize = 16;

/// State token length in bytes (16 hex chars).
pub const STATE_BYTES: usize = 8;

/// Generate `len` bytes from the thread-local CSPRNG, hex encoded.
pub fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generate a new session identifier.
pub fn session_id() -> String {
    random_hex(SESSION_ID_BYTES)
}

/// Generate a new anti-forgery state token.
pub fn state_token() -> String {
    random_hex(STATE_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths() {
        assert_eq!(session_id().len(), 32);
        assert_eq!(state_token().len(), 16);
    }

    #[test]
    fn test_lowercase_hex() {
        let id = session_id();
        assert!(id.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_random_hex_decodes_to_requested_length() {
        let text = random_hex(5);
        assert_eq!(text.len(), 10);
        assert_eq!(hex::decode(&text).unwrap().len(), 5);
    }

    #[test]
    fn test_ids_differ() {
        assert_ne!(session_id(), session_id());
        assert_ne!(state_token(), state_token());
    }
}
