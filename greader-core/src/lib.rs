//! # greader-core
//!
//! Pure protocol logic for the Reader Sync API (no I/O, instant tests).
//!
//! This crate implements the parts of the protocol that can be decided
//! without touching the store:
//! - [`stream`]: classifying opaque stream identifiers
//! - [`escape`]: the HTML-escape normalization applied to names before lookups
//! - [`filter`]: compiling include/exclude state filters and date ranges
//! - [`cursor`]: the over-fetch-by-one continuation window
//! - [`token`]: deriving and verifying per-user API tokens
//! - [`account`]: username rules
//!
//! The store-backed resolution and the request executors live in
//! `greader-api`, which feeds these functions and interprets their output.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod account;
pub mod cursor;
pub mod escape;
pub mod filter;
pub mod stream;
pub mod token;

pub use account::{is_valid_username, INTERNAL_USER};
pub use cursor::{parse_continuation, Page, PageWindow};
pub use escape::{escape_html, unescape_html};
pub use filter::{DateRange, EntryFilter, StateMask, Tristate};
pub use stream::{StreamHint, StreamSpec};
pub use token::{TokenService, TOKEN_MIN_LEN};
