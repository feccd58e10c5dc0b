//! Opaque refresh token generation.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;

/// Number of random bytes in a refresh token before encoding.
const REFRESH_TOKEN_BYTES: usize = 64;

/// Generate a new opaque refresh token: 64 cryptographically random
/// bytes, base64-encoded. Carries no claims; all state lives server-side.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_refresh_token();
        let b = generate_refresh_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_encodes_64_bytes() {
        let token = generate_refresh_token();
        let decoded = STANDARD.decode(&token).unwrap();
        assert_eq!(decoded.len(), REFRESH_TOKEN_BYTES);
    }
}
