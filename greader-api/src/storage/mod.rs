//! Storage layer for greader-api.
//!
//! The adapter owns no data. Categories, feeds, tags and entries live in a
//! [`ReaderStore`]; names and URLs are passed to it already HTML-escaped
//! and come back escaped.

mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::StorageError;
use async_trait::async_trait;
use greader_core::EntryFilter;
use greader_types::{CategoryId, EntryId, FeedId, StreamRef, TagId};
use std::collections::HashMap;

/// The protected default category. Created with the store and never deleted.
pub const DEFAULT_CATEGORY: CategoryId = CategoryId::new(1);

/// Whether `url` can be subscribed to: an absolute http(s) URL.
pub fn is_valid_feed_url(url: &str) -> bool {
    url::Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.has_host())
        .unwrap_or(false)
}

/// A feed category (folder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category id.
    pub id: CategoryId,
    /// Escaped name.
    pub name: String,
}

/// A subscribed feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    /// Feed id.
    pub id: FeedId,
    /// Category the feed is filed under.
    pub category_id: CategoryId,
    /// Escaped display name.
    pub name: String,
    /// Escaped feed URL.
    pub url: String,
    /// Escaped website URL.
    pub website: String,
    /// Unread entries of this feed.
    pub unread: u64,
}

/// A user tag (label on entries).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag id.
    pub id: TagId,
    /// Escaped name.
    pub name: String,
    /// Unread entries carrying the tag.
    pub unread: u64,
}

/// A stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Entry id, issued monotonically.
    pub id: EntryId,
    /// Feed the entry belongs to.
    pub feed_id: FeedId,
    /// Title.
    pub title: String,
    /// Author, empty when unknown.
    pub author: String,
    /// Permalink.
    pub link: String,
    /// HTML content.
    pub content: String,
    /// Publication time in epoch seconds.
    pub published: i64,
    /// Crawl time in epoch microseconds.
    pub added_usec: i64,
    /// Read flag.
    pub is_read: bool,
    /// Starred flag.
    pub is_starred: bool,
}

/// Request to subscribe to a feed.
#[derive(Debug, Clone, Default)]
pub struct NewFeed {
    /// Escaped feed URL.
    pub url: String,
    /// Escaped title. Empty means "use the URL".
    pub title: String,
    /// Target category.
    pub category_id: Option<CategoryId>,
    /// Escaped website URL.
    pub website: String,
}

/// Request to store a new entry.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    /// Feed the entry belongs to.
    pub feed_id: FeedId,
    /// Title.
    pub title: String,
    /// Author.
    pub author: String,
    /// Permalink.
    pub link: String,
    /// HTML content.
    pub content: String,
    /// Publication time in epoch seconds.
    pub published: i64,
    /// Crawl time in epoch microseconds.
    pub added_usec: i64,
    /// Initial read flag.
    pub is_read: bool,
    /// Initial starred flag.
    pub is_starred: bool,
}

/// Listing order by entry id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first (`r=o`).
    Ascending,
    /// Newest first.
    #[default]
    Descending,
}

impl SortOrder {
    /// Parse the `r` parameter: `o` is ascending, anything else descending.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("o") => Self::Ascending,
            _ => Self::Descending,
        }
    }
}

/// A filtered, windowed entry listing.
#[derive(Debug, Clone)]
pub struct EntryQuery {
    /// Stream to list.
    pub stream: StreamRef,
    /// State and date filter.
    pub filter: EntryFilter,
    /// Id order.
    pub order: SortOrder,
    /// Maximum rows to return.
    pub limit: u32,
    /// Inclusive starting entry, in `order`.
    pub start_at: Option<EntryId>,
}

/// Scope of a bulk mark-as-read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadScope {
    /// One feed.
    Feed(FeedId),
    /// Every feed of a category.
    Category(CategoryId),
    /// Every entry carrying a tag.
    Tag(TagId),
    /// Every entry.
    All,
}

/// Trait for reader storage backends.
#[async_trait]
pub trait ReaderStore: Send + Sync {
    /// List categories, ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError>;

    /// Find a category by escaped name.
    async fn category_by_name(&self, name: &str) -> Result<Option<Category>, StorageError>;

    /// Create a category.
    async fn create_category(&self, name: &str) -> Result<CategoryId, StorageError>;

    /// Rename a category.
    async fn rename_category(&self, id: CategoryId, name: &str) -> Result<(), StorageError>;

    /// Delete a category, moving its feeds to [`DEFAULT_CATEGORY`].
    ///
    /// Deleting the default category fails with
    /// [`StorageError::ProtectedCategory`].
    async fn delete_category(&self, id: CategoryId) -> Result<(), StorageError>;

    /// List feeds with their unread counts, ordered by name.
    async fn list_feeds(&self) -> Result<Vec<Feed>, StorageError>;

    /// Find a feed by id.
    async fn feed_by_id(&self, id: FeedId) -> Result<Option<Feed>, StorageError>;

    /// Find a feed by escaped URL.
    async fn feed_by_url(&self, url: &str) -> Result<Option<Feed>, StorageError>;

    /// Subscribe to a feed.
    ///
    /// Fails with [`StorageError::InvalidFeedUrl`] for anything but an
    /// absolute http(s) URL, and with [`StorageError::DuplicateFeed`] when
    /// the URL is already subscribed.
    async fn add_feed(&self, feed: NewFeed) -> Result<Feed, StorageError>;

    /// Delete a feed and its entries. Returns whether it existed.
    async fn delete_feed(&self, id: FeedId) -> Result<bool, StorageError>;

    /// File a feed under another category.
    async fn move_feed(&self, id: FeedId, category: CategoryId) -> Result<(), StorageError>;

    /// Rename a feed.
    async fn rename_feed(&self, id: FeedId, name: &str) -> Result<(), StorageError>;

    /// Move every feed of `from` to `to`. Returns the number moved.
    async fn reassign_feeds(&self, from: CategoryId, to: CategoryId)
        -> Result<u64, StorageError>;

    /// Crawl time (µs) of the newest entry of each non-empty feed.
    async fn feeds_newest_item_usec(&self) -> Result<HashMap<FeedId, i64>, StorageError>;

    /// List tags with their unread counts, ordered by name.
    async fn list_tags(&self) -> Result<Vec<Tag>, StorageError>;

    /// Find a tag by escaped name.
    async fn tag_by_name(&self, name: &str) -> Result<Option<Tag>, StorageError>;

    /// Create a tag.
    async fn create_tag(&self, name: &str) -> Result<TagId, StorageError>;

    /// Rename a tag.
    async fn rename_tag(&self, id: TagId, name: &str) -> Result<(), StorageError>;

    /// Delete a tag and its associations.
    async fn delete_tag(&self, id: TagId) -> Result<(), StorageError>;

    /// Associate (`tagged = true`) or dissociate an entry and a tag.
    /// Idempotent.
    async fn set_entry_tag(
        &self,
        tag: TagId,
        entry: EntryId,
        tagged: bool,
    ) -> Result<(), StorageError>;

    /// Escaped tag names of each given entry, in one round trip.
    async fn entry_tag_names(
        &self,
        entries: &[EntryId],
    ) -> Result<HashMap<EntryId, Vec<String>>, StorageError>;

    /// Crawl time (µs) of the newest entry carrying each tag.
    async fn tags_newest_item_usec(&self) -> Result<HashMap<TagId, i64>, StorageError>;

    /// List entries matching `query`.
    async fn list_entries(&self, query: &EntryQuery) -> Result<Vec<Entry>, StorageError>;

    /// List the ids of entries matching `query`.
    async fn list_entry_ids(&self, query: &EntryQuery) -> Result<Vec<EntryId>, StorageError>;

    /// Fetch exactly the given entries. Unknown ids are skipped.
    async fn entries_by_ids(
        &self,
        ids: &[EntryId],
        order: SortOrder,
    ) -> Result<Vec<Entry>, StorageError>;

    /// Set the read flag. Returns the number of entries changed.
    async fn mark_read(&self, ids: &[EntryId], read: bool) -> Result<u64, StorageError>;

    /// Set the starred flag. Returns the number of entries changed.
    async fn mark_starred(&self, ids: &[EntryId], starred: bool) -> Result<u64, StorageError>;

    /// Mark every unread entry of `scope` read, optionally only those
    /// crawled at or before `up_to_usec`. Returns the number changed.
    async fn mark_read_up_to(
        &self,
        scope: ReadScope,
        up_to_usec: Option<i64>,
    ) -> Result<u64, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_urls_must_be_absolute_http() {
        assert!(is_valid_feed_url("http://example.test/rss"));
        assert!(is_valid_feed_url("https://example.test/feed.xml?a=1&amp;b=2"));
        assert!(!is_valid_feed_url("ftp://example.test/rss"));
        assert!(!is_valid_feed_url("example.test/rss"));
        assert!(!is_valid_feed_url(""));
    }

    #[test]
    fn sort_order_param() {
        assert_eq!(SortOrder::from_param(Some("o")), SortOrder::Ascending);
        assert_eq!(SortOrder::from_param(Some("d")), SortOrder::Descending);
        assert_eq!(SortOrder::from_param(Some("n")), SortOrder::Descending);
        assert_eq!(SortOrder::from_param(None), SortOrder::Descending);
    }
}
