//! Store-backed stream resolution.
//!
//! Completes what [`StreamSpec::classify`] started: feed URLs and label
//! names are looked up, and a feed id is only accepted if the feed exists.
//! Anything that does not resolve becomes [`StreamRef::Unresolved`], never
//! a guessed id.

use crate::error::StorageResult;
use crate::storage::{Category, ReaderStore, Tag};
use greader_core::StreamSpec;
use greader_types::StreamRef;

/// A label name matched against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelTarget {
    /// The name belongs to a category.
    Category(Category),
    /// The name belongs to a user tag.
    Tag(Tag),
}

/// Look up an escaped label name: categories first, then tags.
pub async fn resolve_label(
    store: &dyn ReaderStore,
    escaped_name: &str,
) -> StorageResult<Option<LabelTarget>> {
    if let Some(category) = store.category_by_name(escaped_name).await? {
        return Ok(Some(LabelTarget::Category(category)));
    }
    Ok(store
        .tag_by_name(escaped_name)
        .await?
        .map(LabelTarget::Tag))
}

/// Resolve a classified stream into a concrete reference.
pub async fn resolve(store: &dyn ReaderStore, spec: &StreamSpec) -> StorageResult<StreamRef> {
    let stream = match spec {
        StreamSpec::AllItems => StreamRef::AllItems,
        StreamSpec::Starred => StreamRef::Starred,
        StreamSpec::FeedId(id) => match store.feed_by_id(*id).await? {
            Some(feed) => StreamRef::Feed(feed.id),
            None => StreamRef::Unresolved,
        },
        StreamSpec::FeedUrl(url) => match store.feed_by_url(url).await? {
            Some(feed) => StreamRef::Feed(feed.id),
            None => StreamRef::Unresolved,
        },
        StreamSpec::Label(name) => match resolve_label(store, name).await? {
            Some(LabelTarget::Category(category)) => StreamRef::Category(category.id),
            Some(LabelTarget::Tag(tag)) => StreamRef::Tag(tag.id),
            None => StreamRef::Unresolved,
        },
        StreamSpec::Unresolved => StreamRef::Unresolved,
    };

    if !stream.is_resolved() {
        tracing::debug!("Stream {:?} did not resolve", spec);
    }
    Ok(stream)
}
