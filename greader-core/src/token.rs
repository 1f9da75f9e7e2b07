//! Per-user API tokens.
//!
//! A token is derived, not stored: `hex(SHA-256(salt ‖ username ‖ hash))`
//! where `hash` is the user's API password hash. The 64-character digest
//! always meets the [`TOKEN_MIN_LEN`] clients expect. Changing the API
//! password revokes every outstanding token.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::account::INTERNAL_USER;

/// Minimum token length accepted by Reader clients.
pub const TOKEN_MIN_LEN: usize = 57;

/// Derives and verifies API tokens from the system salt.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct TokenService {
    salt: String,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").field("salt", &"[REDACTED]").finish()
    }
}

impl TokenService {
    /// Create a service keyed by the system salt.
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// Token for `username` with the given API password hash.
    pub fn issue(&self, username: &str, credential_hash: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(username.as_bytes());
        hasher.update(credential_hash.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Check an action token (`T` parameter).
    ///
    /// WARNING: the empty string and `x` are accepted for every account
    /// except the internal one. Some clients never fetch a token and send
    /// these placeholders instead; accepting them means action requests are
    /// protected by the session credential alone.
    pub fn verify(&self, username: &str, credential_hash: &str, presented: &str) -> bool {
        if username != INTERNAL_USER && (presented.is_empty() || presented == "x") {
            return true;
        }
        self.verify_exact(username, credential_hash, presented)
    }

    /// Check a token with no placeholder bypass.
    pub fn verify_exact(&self, username: &str, credential_hash: &str, presented: &str) -> bool {
        let expected = self.issue(username, credential_hash);
        constant_time_eq(expected.as_bytes(), presented.as_bytes())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
