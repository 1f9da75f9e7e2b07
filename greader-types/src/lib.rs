//! # greader-types
//!
//! Wire vocabulary for the Reader Sync API (the Google Reader compatible
//! protocol spoken by third-party feed readers).
//!
//! This crate provides the foundational types used across all greader crates:
//! - [`EntryId`], [`FeedId`], [`CategoryId`], [`TagId`] - Identity types
//! - [`StateToken`], [`StreamRef`] - Stream vocabulary
//! - [`TagAction`], [`SubscriptionAction`] - Mutation actions
//! - [`wire`] - JSON response payloads
//! - [`TypesError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod action;
mod error;
mod ids;
mod stream;
pub mod wire;

pub use action::{SubscriptionAction, TagAction};
pub use error::TypesError;
pub use ids::{CategoryId, EntryId, FeedId, TagId, ITEM_ID_PREFIX};
pub use stream::{
    feed_stream_id, label_name, label_stream_id, StateToken, StreamRef, FEED_PREFIX,
    LABEL_PREFIX, READING_LIST, STARRED,
};
