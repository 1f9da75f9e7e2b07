//! User directory and API password handling.
//!
//! Accounts come from the `[[users]]` table of the configuration. The API
//! password is stored as an argon2 PHC string; the same string keys the
//! user's API token, so re-hashing the password revokes old tokens.

use crate::config::UserConfig;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::collections::HashMap;

/// An account allowed to use the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Username.
    pub name: String,
    /// Argon2 PHC string of the API password. Empty when unset.
    pub api_password_hash: String,
    /// Contact e-mail address.
    pub email: String,
    /// Disabled accounts are rejected.
    pub enabled: bool,
}

impl From<&UserConfig> for UserAccount {
    fn from(config: &UserConfig) -> Self {
        Self {
            name: config.name.clone(),
            api_password_hash: config.api_password_hash.clone(),
            email: config.email.clone(),
            enabled: config.enabled,
        }
    }
}

/// Lookup of accounts by username.
pub trait UserDirectory: Send + Sync {
    /// Find an account by exact username.
    fn find(&self, username: &str) -> Option<UserAccount>;
}

/// Directory backed by the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigUsers {
    users: HashMap<String, UserAccount>,
}

impl ConfigUsers {
    /// Build the directory from `[[users]]` entries. Later duplicates win.
    pub fn new(users: &[UserConfig]) -> Self {
        let users = users
            .iter()
            .map(|user| (user.name.clone(), UserAccount::from(user)))
            .collect();
        Self { users }
    }

    /// Number of configured accounts.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no account is configured.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserDirectory for ConfigUsers {
    fn find(&self, username: &str) -> Option<UserAccount> {
        self.users.get(username).cloned()
    }
}

/// Check a password against a PHC string.
///
/// An empty or unparsable hash never verifies.
pub fn verify_password(password: &str, phc: &str) -> bool {
    if phc.is_empty() {
        return false;
    }
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Unparsable API password hash: {}", e);
            false
        }
    }
}

/// Hash a password into an argon2id PHC string with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}
