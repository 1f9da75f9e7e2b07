//! # greader-api
//!
//! Google Reader compatible sync API for feed readers.
//!
//! This crate implements an HTTP adapter that:
//! - Authenticates clients with ClientLogin and per-user API tokens
//! - Resolves the protocol's string stream ids against a feed store
//! - Serves paginated entry listings, id listings and unread counts
//! - Applies tag, subscription and mark-as-read mutations
//!
//! ## Architecture
//!
//! ```text
//! Reader app ──► http (positional router)
//!                  │
//!                  ├── auth ──► users (UserDirectory)
//!                  ├── query ─┐
//!                  └── mutation ──► resolver ──► storage (ReaderStore)
//!                                                   │
//!                                              SQLite (sqlx)
//! ```
//!
//! ## Routes
//!
//! Everything below `reader/api/0/` needs an
//! `Authorization: GoogleLogin auth=<user>/<token>` header obtained from
//! `accounts/ClientLogin`. Mutations additionally carry the `T` action
//! token from `reader/api/0/token`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod mutation;
pub mod query;
pub mod resolver;
pub mod server;
pub mod storage;
pub mod users;
