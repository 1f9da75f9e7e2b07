//! Error types for the wire vocabulary.

use thiserror::Error;

/// Errors raised while interpreting client-supplied protocol values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// An entry identifier was neither decimal nor a hexadecimal long form.
    #[error("invalid entry id: {0:?}")]
    InvalidEntryId(String),

    /// A subscription action other than subscribe/unsubscribe/edit.
    #[error("unknown subscription action: {0:?}")]
    UnknownAction(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TypesError::InvalidEntryId("xyz".into());
        assert_eq!(err.to_string(), "invalid entry id: \"xyz\"");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypesError>();
    }
}
