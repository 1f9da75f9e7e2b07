//! JSON payloads returned by the Reader Sync API.
//!
//! Field names follow the protocol (camelCase, with a few historical
//! exceptions such as `unread_count` and `unreadcounts`).

use serde::{Deserialize, Serialize};

/// Response of `stream/contents` and `stream/items/contents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamContents {
    /// Always the reading-list stream id.
    pub id: String,
    /// Server time in epoch seconds.
    pub updated: i64,
    /// Projected entries.
    pub items: Vec<Item>,
    /// Id of the last entry when more entries may follow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation: Option<String>,
}

/// Wire projection of one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Long-form item id.
    pub id: String,
    /// Crawl time in milliseconds, as a decimal string.
    pub crawl_time_msec: String,
    /// Crawl time in microseconds, as a decimal string.
    pub timestamp_usec: String,
    /// Publication time in epoch seconds.
    pub published: i64,
    /// Entry title.
    pub title: String,
    /// Entry author, omitted when unknown.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,
    /// Canonical link.
    pub canonical: Vec<Link>,
    /// Alternate (HTML) link.
    pub alternate: Vec<Link>,
    /// Stream ids the entry belongs to: reading list, label, states, tags.
    pub categories: Vec<String>,
    /// Feed the entry came from.
    pub origin: Origin,
    /// Entry body.
    pub summary: Summary,
}

/// A hyperlink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target URL.
    pub href: String,
    /// MIME type, when known.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Feed an item originates from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Origin {
    /// Feed stream id (`feed/<id>`).
    pub stream_id: String,
    /// Feed title.
    pub title: String,
    /// Feed website.
    pub html_url: String,
    /// Feed URL.
    pub feed_url: String,
}

/// Entry body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// HTML content.
    pub content: String,
}

/// Response of `stream/items/ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRefs {
    /// Entry references, decimal ids.
    pub item_refs: Vec<ItemRef>,
    /// Id of the last entry when more entries may follow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation: Option<String>,
}

/// A bare entry reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    /// Decimal entry id.
    pub id: String,
}

/// Response of `tag/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagList {
    /// Starred pseudo-tag first, then categories, then user tags.
    pub tags: Vec<TagDescriptor>,
}

/// One entry of the tag list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDescriptor {
    /// Stream id.
    pub id: String,
    /// `folder` for categories, `tag` for user tags.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Unread entries carrying the tag (user tags only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread_count: Option<u64>,
}

/// Response of `subscription/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionList {
    /// One element per feed.
    pub subscriptions: Vec<Subscription>,
}

/// A feed subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Feed stream id.
    pub id: String,
    /// Feed title.
    pub title: String,
    /// The feed's category.
    pub categories: Vec<SubscriptionCategory>,
    /// Feed URL.
    pub url: String,
    /// Feed website.
    pub html_url: String,
    /// Favicon URL.
    pub icon_url: String,
}

/// Category reference inside a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionCategory {
    /// Label stream id.
    pub id: String,
    /// Category name.
    pub label: String,
}

/// Response of `unread-count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCounts {
    /// Total unread entries.
    pub max: u64,
    /// Per-stream counts.
    pub unreadcounts: Vec<UnreadCount>,
}

/// Unread count of one stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    /// Stream id.
    pub id: String,
    /// Unread entries.
    pub count: u64,
    /// Crawl time of the newest entry in microseconds, decimal string.
    pub newest_item_timestamp_usec: String,
}

/// Response of `subscription/quickadd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuickAdd {
    /// The feed was added.
    Added {
        /// Always 1.
        #[serde(rename = "numResults")]
        num_results: u32,
        /// URL of the new feed.
        query: String,
        /// Stream id of the new feed.
        #[serde(rename = "streamId")]
        stream_id: String,
        /// Title of the new feed.
        #[serde(rename = "streamName")]
        stream_name: String,
    },
    /// The feed could not be added.
    Failed {
        /// Always 0.
        #[serde(rename = "numResults")]
        num_results: u32,
        /// Reason reported by the store.
        error: String,
    },
}

/// Response of `user-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Username.
    pub user_id: String,
    /// Username.
    pub user_name: String,
    /// Username.
    pub user_profile_id: String,
    /// Contact e-mail address.
    pub user_email: String,
}
