//! Username rules.

/// Name of the internal system account. It never authenticates through the
/// API and never benefits from the legacy token bypass.
pub const INTERNAL_USER: &str = "_";

const MAX_LEN: usize = 40;

/// Whether `name` is an acceptable username.
///
/// Either a single alphanumeric character, or 2 to 40 characters of
/// `[0-9a-zA-Z_.@-]` whose first character is alphanumeric or `_`.
pub fn is_valid_username(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes {
        [] => false,
        [only] => only.is_ascii_alphanumeric(),
        [first, rest @ ..] => {
            bytes.len() <= MAX_LEN
                && (first.is_ascii_alphanumeric() || *first == b'_')
                && rest
                    .iter()
                    .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'@' | b'-'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_names() {
        for name in ["alice", "a", "7", "bob.smith", "me@example.test", "_x", "dash-ed"] {
            assert!(is_valid_username(name), "{name}");
        }
    }

    #[test]
    fn rejects_malformed_names() {
        for name in ["", "_", ".alice", "-bob", "@me", "has space", "slash/name", "ünï"] {
            assert!(!is_valid_username(name), "{name}");
        }
    }

    #[test]
    fn enforces_length_limit() {
        assert!(is_valid_username(&"a".repeat(40)));
        assert!(!is_valid_username(&"a".repeat(41)));
    }

    #[test]
    fn internal_user_is_not_a_valid_login() {
        assert!(!is_valid_username(INTERNAL_USER));
    }
}
