//! Mutation Executor: edit-tag, subscription edit, quickadd, rename-tag,
//! disable-tag and mark-all-as-read.
//!
//! Every handler validates its whole input before touching the store, so
//! a rejected request leaves no partial mutation behind. Store failures
//! are logged and reported to the client as a bad request.

use crate::auth::Session;
use crate::error::{ApiError, ApiResult, StorageError, StorageResult};
use crate::resolver::{resolve_label, LabelTarget};
use crate::server::ReaderApi;
use crate::storage::{is_valid_feed_url, NewFeed, ReadScope, ReaderStore, DEFAULT_CATEGORY};
use greader_core::{escape_html, unescape_html};
use greader_types::wire::QuickAdd;
use greader_types::{
    feed_stream_id, label_name, CategoryId, EntryId, FeedId, SubscriptionAction, TagAction,
    FEED_PREFIX, LABEL_PREFIX, READING_LIST,
};
use std::collections::HashSet;

/// Parameters of `subscription/edit`.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionEdit {
    /// Stream ids (`s`), in request order.
    pub streams: Vec<String>,
    /// Titles (`t`), parallel to `streams`.
    pub titles: Vec<String>,
    /// Action (`ac`).
    pub action: String,
    /// Category to file the feeds under (`a`).
    pub add: String,
    /// Category to take the feeds out of (`r`).
    pub remove: String,
}

fn store_failure(operation: &'static str) -> impl Fn(StorageError) -> ApiError {
    move |err| {
        tracing::error!("{} error: {}", operation, err);
        ApiError::bad_request(format!("{operation} failed in the store"))
    }
}

/// Parse entry ids; the list must be non-empty and every id valid.
fn parse_entry_ids(raw_ids: &[String]) -> ApiResult<Vec<EntryId>> {
    if raw_ids.is_empty() {
        return Err(ApiError::bad_request("no item ids"));
    }
    raw_ids
        .iter()
        .map(|raw| EntryId::parse(raw).map_err(|e| ApiError::bad_request(e.to_string())))
        .collect()
}

/// `edit-tag`: apply the `a` action, then the `r` action, to every entry.
///
/// Unrecognized tokens are ignored.
pub async fn edit_tag(
    api: &ReaderApi,
    session: &Session,
    raw_ids: &[String],
    add: &str,
    remove: &str,
) -> ApiResult<()> {
    let ids = parse_entry_ids(raw_ids)?;
    let username = Some(session.username());

    let actions = [
        TagAction::from_add_token(add, username),
        TagAction::from_remove_token(remove, username),
    ];
    for action in actions.into_iter().flatten() {
        tracing::debug!("edit-tag {:?} on {} entries", action, ids.len());
        apply_tag_action(api.store(), &ids, action)
            .await
            .map_err(store_failure("edit-tag"))?;
    }
    Ok(())
}

async fn apply_tag_action(
    store: &dyn ReaderStore,
    ids: &[EntryId],
    action: TagAction,
) -> StorageResult<()> {
    match action {
        TagAction::MarkRead => {
            store.mark_read(ids, true).await?;
        }
        TagAction::MarkUnread => {
            store.mark_read(ids, false).await?;
        }
        TagAction::MarkStarred => {
            store.mark_starred(ids, true).await?;
        }
        TagAction::MarkUnstarred => {
            store.mark_starred(ids, false).await?;
        }
        TagAction::AddLabel(name) => {
            let name = escape_html(&name);
            let tag = match store.tag_by_name(&name).await? {
                Some(tag) => tag.id,
                None => store.create_tag(&name).await?,
            };
            for id in ids {
                store.set_entry_tag(tag, *id, true).await?;
            }
        }
        TagAction::RemoveLabel(name) => {
            if let Some(tag) = store.tag_by_name(&escape_html(&name)).await? {
                for id in ids {
                    store.set_entry_tag(tag.id, *id, false).await?;
                }
            }
        }
    }
    Ok(())
}

enum CategoryTarget {
    Keep,
    Existing(CategoryId),
    Create(String),
}

enum FeedStep {
    Subscribe { url: String, title: String },
    Unsubscribe(FeedId),
    Edit { id: FeedId, title: String },
}

/// `subscription/edit`.
///
/// Streams are processed last to first. Numeric feed ids are skipped on
/// subscribe.
pub async fn subscription_edit(
    api: &ReaderApi,
    session: &Session,
    edit: &SubscriptionEdit,
) -> ApiResult<()> {
    let action: SubscriptionAction = edit
        .action
        .parse()
        .map_err(|e: greader_types::TypesError| ApiError::bad_request(e.to_string()))?;
    if edit.streams.is_empty() {
        return Err(ApiError::bad_request("no stream ids"));
    }

    let store = api.store();
    let failed = store_failure("subscription/edit");

    let category = if edit.add.starts_with("user/") {
        match label_name(&edit.add, Some(session.username())) {
            Some(name) => {
                let name = escape_html(name);
                match store.category_by_name(&name).await.map_err(&failed)? {
                    Some(category) => CategoryTarget::Existing(category.id),
                    None => CategoryTarget::Create(name),
                }
            }
            None => CategoryTarget::Keep,
        }
    } else if edit.remove.starts_with(LABEL_PREFIX) {
        CategoryTarget::Existing(DEFAULT_CATEGORY)
    } else {
        CategoryTarget::Keep
    };

    let mut steps = Vec::new();
    let mut subscribing = HashSet::new();

    for (i, stream) in edit.streams.iter().enumerate().rev() {
        let Some(mut target) = stream.strip_prefix(FEED_PREFIX) else {
            continue;
        };
        while let Some(rest) = target.strip_prefix(FEED_PREFIX) {
            target = rest;
        }
        let title = escape_html(edit.titles.get(i).map_or("", String::as_str));

        let numeric = !target.is_empty() && target.bytes().all(|b| b.is_ascii_digit());
        if numeric && action == SubscriptionAction::Subscribe {
            continue;
        }

        let url = escape_html(target);
        let existing = if numeric {
            let id = target
                .parse::<u64>()
                .map_err(|_| ApiError::bad_request("feed id out of range"))?;
            store.feed_by_id(FeedId::new(id)).await.map_err(&failed)?
        } else {
            store.feed_by_url(&url).await.map_err(&failed)?
        };

        let step = match (action, existing) {
            (SubscriptionAction::Subscribe, None) => {
                if !is_valid_feed_url(&url) || !subscribing.insert(url.clone()) {
                    return Err(ApiError::bad_request(format!("cannot subscribe to {url}")));
                }
                FeedStep::Subscribe { url, title }
            }
            (SubscriptionAction::Unsubscribe, Some(feed)) => FeedStep::Unsubscribe(feed.id),
            (SubscriptionAction::Edit, Some(feed)) => FeedStep::Edit { id: feed.id, title },
            (action, _) => {
                return Err(ApiError::bad_request(format!("cannot {action} {stream}")));
            }
        };
        steps.push(step);
    }

    let category_id = match category {
        CategoryTarget::Keep => None,
        CategoryTarget::Existing(id) => Some(id),
        CategoryTarget::Create(name) if steps.is_empty() => {
            tracing::debug!("Not creating category {}: nothing to file", name);
            None
        }
        CategoryTarget::Create(name) => {
            Some(store.create_category(&name).await.map_err(&failed)?)
        }
    };

    for step in steps {
        match step {
            FeedStep::Subscribe { url, title } => {
                let feed = store
                    .add_feed(NewFeed {
                        url,
                        title,
                        category_id,
                        website: String::new(),
                    })
                    .await
                    .map_err(&failed)?;
                tracing::info!("Subscribed to feed {} ({})", feed.id, feed.url);
            }
            FeedStep::Unsubscribe(id) => {
                store.delete_feed(id).await.map_err(&failed)?;
                tracing::info!("Unsubscribed from feed {}", id);
            }
            FeedStep::Edit { id, title } => {
                if let Some(category) = category_id {
                    store.move_feed(id, category).await.map_err(&failed)?;
                }
                if !title.is_empty() {
                    store.rename_feed(id, &title).await.map_err(&failed)?;
                }
            }
        }
    }
    Ok(())
}

/// `subscription/quickadd`. Never fails: a store error is reported in
/// the response body.
pub async fn quickadd(api: &ReaderApi, raw_url: &str) -> QuickAdd {
    let escaped = escape_html(raw_url);
    let url = escaped
        .strip_prefix(FEED_PREFIX)
        .map(str::to_string)
        .unwrap_or(escaped);

    match api
        .store()
        .add_feed(NewFeed {
            url,
            ..Default::default()
        })
        .await
    {
        Ok(feed) => {
            tracing::info!("quickadd subscribed to feed {} ({})", feed.id, feed.url);
            QuickAdd::Added {
                num_results: 1,
                query: unescape_html(&feed.url),
                stream_id: feed_stream_id(feed.id),
                stream_name: unescape_html(&feed.name),
            }
        }
        Err(e) => {
            tracing::error!("quickadd error: {}", e);
            QuickAdd::Failed {
                num_results: 0,
                error: e.to_string(),
            }
        }
    }
}

/// `rename-tag`: rename the category, or else the tag, named by `source`.
pub async fn rename_tag(api: &ReaderApi, source: &str, dest: &str) -> ApiResult<()> {
    let (Some(from), Some(to)) = (label_name(source, None), label_name(dest, None)) else {
        return Err(ApiError::bad_request("rename-tag needs two user/-/label/ ids"));
    };
    let to = escape_html(to);
    let store = api.store();
    let failed = store_failure("rename-tag");

    match resolve_label(store, &escape_html(from))
        .await
        .map_err(&failed)?
    {
        Some(LabelTarget::Category(category)) => {
            store.rename_category(category.id, &to).await.map_err(&failed)?
        }
        Some(LabelTarget::Tag(tag)) => store.rename_tag(tag.id, &to).await.map_err(&failed)?,
        None => return Err(ApiError::bad_request(format!("unknown label {from}"))),
    }
    Ok(())
}

/// `disable-tag`: delete each named category (moving its feeds to the
/// default category) or tag. Every name must resolve first.
pub async fn disable_tag(api: &ReaderApi, streams: &[String]) -> ApiResult<()> {
    if streams.is_empty() {
        return Err(ApiError::bad_request("no label ids"));
    }
    let store = api.store();
    let failed = store_failure("disable-tag");

    let mut targets = Vec::with_capacity(streams.len());
    for stream in streams {
        let Some(name) = label_name(stream, None) else {
            return Err(ApiError::bad_request(format!("not a label: {stream}")));
        };
        match resolve_label(store, &escape_html(name))
            .await
            .map_err(&failed)?
        {
            Some(target) => targets.push(target),
            None => return Err(ApiError::bad_request(format!("unknown label {name}"))),
        }
    }

    for target in targets {
        match target {
            LabelTarget::Category(category) => {
                let moved = store
                    .reassign_feeds(category.id, DEFAULT_CATEGORY)
                    .await
                    .map_err(&failed)?;
                if category.id != DEFAULT_CATEGORY {
                    store.delete_category(category.id).await.map_err(&failed)?;
                }
                tracing::info!("Disabled category {} ({} feeds moved)", category.id, moved);
            }
            LabelTarget::Tag(tag) => {
                store.delete_tag(tag.id).await.map_err(&failed)?;
                tracing::info!("Disabled tag {}", tag.id);
            }
        }
    }
    Ok(())
}

/// Parse `ts`: decimal microseconds, absent or `0` meaning no bound.
fn parse_older_than(ts: Option<&str>) -> ApiResult<Option<i64>> {
    let Some(raw) = ts.map(str::trim) else {
        return Ok(None);
    };
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::bad_request("ts must be decimal"));
    }
    let usec = raw
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request("ts out of range"))?;
    Ok((usec > 0).then_some(usec))
}

/// `mark-all-as-read`: mark a feed, label or the reading list read, up to
/// the crawl time `ts`.
pub async fn mark_all_as_read(
    api: &ReaderApi,
    stream_id: &str,
    ts: Option<&str>,
) -> ApiResult<u64> {
    let up_to = parse_older_than(ts)?;
    let stream = stream_id.trim();
    let store = api.store();
    let failed = store_failure("mark-all-as-read");

    let scope = if let Some(feed) = stream.strip_prefix(FEED_PREFIX) {
        let id = feed
            .parse::<u64>()
            .ok()
            .filter(|_| feed.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| ApiError::bad_request(format!("not a feed id: {feed}")))?;
        ReadScope::Feed(FeedId::new(id))
    } else if let Some(name) = label_name(stream, None) {
        match resolve_label(store, &escape_html(name))
            .await
            .map_err(&failed)?
        {
            Some(LabelTarget::Category(category)) => ReadScope::Category(category.id),
            Some(LabelTarget::Tag(tag)) => ReadScope::Tag(tag.id),
            None => return Err(ApiError::bad_request(format!("unknown label {name}"))),
        }
    } else if stream == READING_LIST {
        ReadScope::All
    } else {
        return Err(ApiError::bad_request(format!("cannot mark {stream} as read")));
    };

    let changed = store
        .mark_read_up_to(scope, up_to)
        .await
        .map_err(&failed)?;
    tracing::debug!("mark-all-as-read {:?}: {} entries", scope, changed);
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tests::session_for;
    use crate::server::tests::{test_api, TEST_USER};
    use crate::storage::{NewEntry, SortOrder, SqliteStore};

    const READ: &str = "user/-/state/com.google/read";
    const STARRED: &str = "user/-/state/com.google/starred";

    async fn seed_entries(store: &SqliteStore, count: i64) -> (FeedId, Vec<EntryId>) {
        let feed = store
            .add_feed(NewFeed {
                url: "http://example.test/rss".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let mut ids = Vec::new();
        for i in 1..=count {
            ids.push(
                store
                    .insert_entry(NewEntry {
                        feed_id: feed.id,
                        title: format!("Post {i}"),
                        added_usec: i * 1_000_000,
                        ..Default::default()
                    })
                    .await
                    .unwrap(),
            );
        }
        (feed.id, ids)
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    async fn entry(store: &SqliteStore, id: EntryId) -> crate::storage::Entry {
        store
            .entries_by_ids(&[id], SortOrder::Descending)
            .await
            .unwrap()
            .remove(0)
    }

    #[tokio::test]
    async fn edit_tag_marks_read_idempotently() {
        let (api, store) = test_api().await;
        let (_, ids) = seed_entries(&store, 1).await;
        let session = session_for(&api, TEST_USER);
        let raw = vec![ids[0].to_string()];

        edit_tag(&api, &session, &raw, READ, "").await.unwrap();
        assert!(entry(&store, ids[0]).await.is_read);

        edit_tag(&api, &session, &raw, READ, "").await.unwrap();
        assert!(entry(&store, ids[0]).await.is_read);
    }

    #[tokio::test]
    async fn edit_tag_add_runs_before_remove() {
        let (api, store) = test_api().await;
        let (_, ids) = seed_entries(&store, 1).await;
        let session = session_for(&api, TEST_USER);

        edit_tag(&api, &session, &[ids[0].long_form()], STARRED, STARRED)
            .await
            .unwrap();
        assert!(!entry(&store, ids[0]).await.is_starred);
    }

    #[tokio::test]
    async fn edit_tag_creates_labels_once() {
        let (api, store) = test_api().await;
        let (_, ids) = seed_entries(&store, 2).await;
        let session = session_for(&api, TEST_USER);
        let raw: Vec<String> = ids.iter().map(|id| id.to_string()).collect();

        edit_tag(&api, &session, &raw, "user/-/label/R&D", "").await.unwrap();
        edit_tag(&api, &session, &raw, "user/alice/label/R&D", "").await.unwrap();

        let tags = store.list_tags().await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "R&amp;D");
        assert_eq!(tags[0].unread, 2);

        edit_tag(&api, &session, &raw[..1], "", "user/-/label/R&D").await.unwrap();
        let names = store.entry_tag_names(&ids).await.unwrap();
        assert!(!names.contains_key(&ids[0]));
        assert_eq!(names[&ids[1]], vec!["R&amp;D".to_string()]);
    }

    #[tokio::test]
    async fn edit_tag_ignores_unknown_tokens() {
        let (api, store) = test_api().await;
        let (_, ids) = seed_entries(&store, 1).await;
        let session = session_for(&api, TEST_USER);

        edit_tag(
            &api,
            &session,
            &[ids[0].to_string()],
            "user/-/state/com.google/like",
            "bogus",
        )
        .await
        .unwrap();
        let e = entry(&store, ids[0]).await;
        assert!(!e.is_read && !e.is_starred);
    }

    #[tokio::test]
    async fn edit_tag_rejects_bad_ids_before_mutating() {
        let (api, store) = test_api().await;
        let (_, ids) = seed_entries(&store, 1).await;
        let session = session_for(&api, TEST_USER);

        let empty = edit_tag(&api, &session, &[], READ, "").await;
        assert!(matches!(empty, Err(ApiError::BadRequest(_))));

        let mixed = vec![ids[0].to_string(), "zz-not-hex".to_string()];
        let result = edit_tag(&api, &session, &mixed, READ, "").await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
        assert!(!entry(&store, ids[0]).await.is_read);
    }

    fn subscribe(url: &str) -> SubscriptionEdit {
        SubscriptionEdit {
            streams: vec![format!("feed/{url}")],
            action: "subscribe".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn subscribe_twice_is_rejected() {
        let (api, store) = test_api().await;
        let session = session_for(&api, TEST_USER);
        let edit = subscribe("http://example.test/feed.xml");

        subscription_edit(&api, &session, &edit).await.unwrap();
        let feed = store
            .feed_by_url("http://example.test/feed.xml")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(feed.category_id, DEFAULT_CATEGORY);

        let again = subscription_edit(&api, &session, &edit).await;
        assert!(matches!(again, Err(ApiError::BadRequest(_))));
        assert_eq!(store.list_feeds().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn subscribe_files_under_new_category() {
        let (api, store) = test_api().await;
        let session = session_for(&api, TEST_USER);
        let edit = SubscriptionEdit {
            streams: strings(&["feed/http://a.test/rss", "feed/feed/http://b.test/rss"]),
            titles: strings(&["A", "B"]),
            action: "subscribe".into(),
            add: "user/-/label/News".into(),
            ..Default::default()
        };

        subscription_edit(&api, &session, &edit).await.unwrap();

        let news = store.category_by_name("News").await.unwrap().unwrap();
        let feeds = store.list_feeds().await.unwrap();
        assert_eq!(feeds.len(), 2);
        assert!(feeds.iter().all(|f| f.category_id == news.id));
        let b = store.feed_by_url("http://b.test/rss").await.unwrap().unwrap();
        assert_eq!(b.name, "B");
        // Reverse processing: the second stream is created first.
        let a = store.feed_by_url("http://a.test/rss").await.unwrap().unwrap();
        assert!(b.id < a.id);
    }

    #[tokio::test]
    async fn subscribe_validates_every_stream_first() {
        let (api, store) = test_api().await;
        let session = session_for(&api, TEST_USER);
        let edit = SubscriptionEdit {
            streams: strings(&["feed/not a url", "feed/http://ok.test/rss"]),
            action: "subscribe".into(),
            ..Default::default()
        };

        let result = subscription_edit(&api, &session, &edit).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
        assert!(store.list_feeds().await.unwrap().is_empty());

        let duplicate = SubscriptionEdit {
            streams: strings(&["feed/http://ok.test/rss", "feed/http://ok.test/rss"]),
            action: "subscribe".into(),
            ..Default::default()
        };
        let result = subscription_edit(&api, &session, &duplicate).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
        assert!(store.list_feeds().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn subscribe_skips_numeric_ids() {
        let (api, store) = test_api().await;
        let session = session_for(&api, TEST_USER);
        let edit = SubscriptionEdit {
            streams: strings(&["feed/42"]),
            action: "subscribe".into(),
            ..Default::default()
        };
        subscription_edit(&api, &session, &edit).await.unwrap();
        assert!(store.list_feeds().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unsubscribe_and_edit() {
        let (api, store) = test_api().await;
        let session = session_for(&api, TEST_USER);
        let (feed, _) = seed_entries(&store, 1).await;
        let tech = store.create_category("Tech").await.unwrap();

        let edit = SubscriptionEdit {
            streams: vec![feed_stream_id(feed)],
            titles: strings(&["Renamed <feed>"]),
            action: "edit".into(),
            add: "user/-/label/Tech".into(),
            ..Default::default()
        };
        subscription_edit(&api, &session, &edit).await.unwrap();
        let edited = store.feed_by_id(feed).await.unwrap().unwrap();
        assert_eq!(edited.category_id, tech);
        assert_eq!(edited.name, "Renamed &lt;feed&gt;");

        let back = SubscriptionEdit {
            streams: strings(&["feed/http://example.test/rss"]),
            action: "edit".into(),
            remove: "user/-/label/Tech".into(),
            ..Default::default()
        };
        subscription_edit(&api, &session, &back).await.unwrap();
        let moved = store.feed_by_id(feed).await.unwrap().unwrap();
        assert_eq!(moved.category_id, DEFAULT_CATEGORY);
        assert_eq!(moved.name, "Renamed &lt;feed&gt;");

        let unsubscribe = SubscriptionEdit {
            streams: vec![feed_stream_id(feed)],
            action: "unsubscribe".into(),
            ..Default::default()
        };
        subscription_edit(&api, &session, &unsubscribe).await.unwrap();
        assert!(store.feed_by_id(feed).await.unwrap().is_none());

        let missing = subscription_edit(&api, &session, &unsubscribe).await;
        assert!(matches!(missing, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn subscription_edit_rejects_unknown_action_and_empty_streams() {
        let (api, _) = test_api().await;
        let session = session_for(&api, TEST_USER);

        let mut edit = subscribe("http://example.test/rss");
        edit.action = "follow".into();
        assert!(subscription_edit(&api, &session, &edit).await.is_err());

        let empty = SubscriptionEdit {
            action: "subscribe".into(),
            ..Default::default()
        };
        assert!(subscription_edit(&api, &session, &empty).await.is_err());
    }

    #[tokio::test]
    async fn quickadd_reports_success_and_failure() {
        let (api, _) = test_api().await;

        match quickadd(&api, "feed/http://example.test/rss?a=1&b=2").await {
            QuickAdd::Added {
                num_results,
                query,
                stream_id,
                stream_name,
            } => {
                assert_eq!(num_results, 1);
                assert_eq!(query, "http://example.test/rss?a=1&b=2");
                assert_eq!(stream_id, "feed/1");
                assert_eq!(stream_name, "http://example.test/rss?a=1&b=2");
            }
            other => panic!("unexpected {other:?}"),
        }

        match quickadd(&api, "http://example.test/rss?a=1&b=2").await {
            QuickAdd::Failed { num_results, error } => {
                assert_eq!(num_results, 0);
                assert!(error.contains("already subscribed"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn rename_tag_prefers_categories() {
        let (api, store) = test_api().await;
        store.create_category("Shared").await.unwrap();
        store.create_tag("Shared").await.unwrap();

        rename_tag(&api, "user/-/label/Shared", "user/-/label/Renamed")
            .await
            .unwrap();
        assert!(store.category_by_name("Renamed").await.unwrap().is_some());
        assert!(store.tag_by_name("Shared").await.unwrap().is_some());

        rename_tag(&api, "user/-/label/Shared", "user/-/label/Tagged")
            .await
            .unwrap();
        assert!(store.tag_by_name("Tagged").await.unwrap().is_some());

        let missing = rename_tag(&api, "user/-/label/Nope", "user/-/label/X").await;
        assert!(matches!(missing, Err(ApiError::BadRequest(_))));
        let malformed = rename_tag(&api, "Renamed", "user/-/label/X").await;
        assert!(matches!(malformed, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn disable_tag_moves_feeds_and_deletes() {
        let (api, store) = test_api().await;
        let tech = store.create_category("Tech").await.unwrap();
        store.create_tag("Later").await.unwrap();
        let feed = store
            .add_feed(NewFeed {
                url: "http://example.test/rss".into(),
                category_id: Some(tech),
                ..Default::default()
            })
            .await
            .unwrap();

        disable_tag(&api, &strings(&["user/-/label/Tech", "user/-/label/Later"]))
            .await
            .unwrap();

        assert!(store.category_by_name("Tech").await.unwrap().is_none());
        assert!(store.tag_by_name("Later").await.unwrap().is_none());
        let moved = store.feed_by_id(feed.id).await.unwrap().unwrap();
        assert_eq!(moved.category_id, DEFAULT_CATEGORY);
    }

    #[tokio::test]
    async fn disable_tag_keeps_default_category_and_validates_first() {
        let (api, store) = test_api().await;
        store.create_tag("Later").await.unwrap();

        disable_tag(&api, &strings(&["user/-/label/Uncategorized"]))
            .await
            .unwrap();
        assert!(store.category_by_name("Uncategorized").await.unwrap().is_some());

        let result = disable_tag(&api, &strings(&["user/-/label/Later", "user/-/label/Nope"])).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
        assert!(store.tag_by_name("Later").await.unwrap().is_some());

        assert!(disable_tag(&api, &[]).await.is_err());
    }

    #[tokio::test]
    async fn mark_all_as_read_scopes() {
        let (api, store) = test_api().await;
        let (feed, ids) = seed_entries(&store, 3).await;

        let changed = mark_all_as_read(&api, &feed_stream_id(feed), Some("2000000"))
            .await
            .unwrap();
        assert_eq!(changed, 2);
        assert!(!entry(&store, ids[2]).await.is_read);

        let changed = mark_all_as_read(&api, READING_LIST, None).await.unwrap();
        assert_eq!(changed, 1);
    }

    #[tokio::test]
    async fn mark_all_as_read_by_label() {
        let (api, store) = test_api().await;
        let (_, ids) = seed_entries(&store, 2).await;
        let tag = store.create_tag("Later").await.unwrap();
        store.set_entry_tag(tag, ids[0], true).await.unwrap();

        assert_eq!(
            mark_all_as_read(&api, "user/-/label/Later", Some("0")).await.unwrap(),
            1
        );
        assert_eq!(
            mark_all_as_read(&api, "user/-/label/Uncategorized", None)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn mark_all_as_read_rejects_bad_input() {
        let (api, _) = test_api().await;
        for (stream, ts) in [
            (READING_LIST, Some("12abc")),
            (READING_LIST, Some("")),
            ("feed/http://example.test/rss", None),
            ("user/-/label/Nope", None),
            ("user/-/state/com.google/starred", None),
        ] {
            let result = mark_all_as_read(&api, stream, ts).await;
            assert!(matches!(result, Err(ApiError::BadRequest(_))), "{stream} {ts:?}");
        }
    }
}
