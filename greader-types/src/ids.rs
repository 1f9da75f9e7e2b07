//! Identity types for the Reader Sync API.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// Prefix of the long-form item identifier used by Google Reader clients.
pub const ITEM_ID_PREFIX: &str = "tag:google.com,2005:reader/item/";

/// Identifier of a stored entry (article).
///
/// Entry ids are 64-bit unsigned integers issued monotonically by the
/// store, so a larger id always means a more recently inserted entry.
/// Clients send them either as plain decimal strings or in the long form
/// (`tag:google.com,2005:reader/item/00000000000001c8`), whose trailing
/// component is hexadecimal.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    /// Largest id the store can hold (SQLite rowids are signed 64-bit).
    pub const MAX: Self = Self(i64::MAX as u64);

    /// Create an EntryId from its numeric value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the numeric value.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Parse an entry identifier as received on the wire.
    ///
    /// A string of decimal digits without a leading zero is taken as-is.
    /// Anything else is treated as the long form: the component after the
    /// last `/` must be hexadecimal and is converted to decimal.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let invalid = || TypesError::InvalidEntryId(raw.to_string());

        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) && !raw.starts_with('0') {
            return raw
                .parse::<u64>()
                .ok()
                .map(Self)
                .filter(|id| *id <= Self::MAX)
                .ok_or_else(invalid);
        }

        let tail = raw.rsplit_once('/').map_or(raw, |(_, tail)| tail);
        if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        u64::from_str_radix(tail, 16)
            .ok()
            .map(Self)
            .filter(|id| *id <= Self::MAX)
            .ok_or_else(invalid)
    }

    /// Long-form identifier (`tag:google.com,2005:reader/item/<16 hex digits>`).
    pub fn long_form(&self) -> String {
        format!("{ITEM_ID_PREFIX}{:016x}", self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({})", self.0)
    }
}

macro_rules! store_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create an id from its numeric value.
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Get the numeric value.
            pub const fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

store_id!(
    /// Identifier of a subscribed feed.
    FeedId
);

store_id!(
    /// Identifier of a category (a folder holding feeds).
    CategoryId
);

store_id!(
    /// Identifier of a user tag (a label attached to individual entries).
    TagId
);
