//! Content Query Executor: read-only endpoints.
//!
//! Every listing runs the same pipeline: resolve the stream, compile the
//! filter, fetch one page window from the store, then project entries to
//! their wire form.

use crate::auth::Session;
use crate::error::ApiResult;
use crate::resolver;
use crate::server::ReaderApi;
use crate::storage::{Category, Entry, EntryQuery, Feed, SortOrder};
use greader_core::{unescape_html, EntryFilter, PageWindow, StreamSpec};
use greader_types::wire::{
    Item, ItemRef, ItemRefs, Link, Origin, StreamContents, Subscription, SubscriptionCategory,
    SubscriptionList, Summary, TagDescriptor, TagList, UnreadCount, UnreadCounts, UserInfo,
};
use greader_types::{
    feed_stream_id, label_stream_id, CategoryId, EntryId, FeedId, StateToken, StreamRef,
    READING_LIST, STARRED,
};
use std::collections::HashMap;

/// Default page size when `n` is absent or unparsable.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Filter, order and window of a listing request.
#[derive(Debug, Clone, Copy)]
pub struct Listing {
    /// State and date filter.
    pub filter: EntryFilter,
    /// Id order.
    pub order: SortOrder,
    /// Page window.
    pub window: PageWindow,
}

impl Listing {
    fn query(&self, stream: StreamRef) -> EntryQuery {
        EntryQuery {
            stream,
            filter: self.filter,
            order: self.order,
            limit: self.window.fetch_limit(),
            start_at: self.window.start_at(),
        }
    }
}

/// List entries of a stream (`stream/contents`).
pub async fn stream_contents(
    api: &ReaderApi,
    spec: &StreamSpec,
    listing: &Listing,
) -> ApiResult<StreamContents> {
    let stream = resolver::resolve(api.store(), spec).await?;
    let rows = api.store().list_entries(&listing.query(stream)).await?;
    let page = listing.window.finish(rows, |entry| entry.id);

    tracing::debug!(
        "stream/contents {:?}: {} items, continuation={:?}",
        stream,
        page.items.len(),
        page.continuation
    );

    Ok(StreamContents {
        id: READING_LIST.to_string(),
        updated: now_secs(),
        items: project_entries(api, page.items).await?,
        continuation: page.continuation.map(|id| id.to_string()),
    })
}

/// List entry ids of a stream (`stream/items/ids`).
///
/// With `newsplus_placeholder`, an empty page is answered with the single
/// id `0` instead of an empty list.
pub async fn item_ids(
    api: &ReaderApi,
    session: &Session,
    stream_id: &str,
    listing: &Listing,
    newsplus_placeholder: bool,
) -> ApiResult<ItemRefs> {
    let spec = StreamSpec::classify(
        stream_id,
        greader_core::StreamHint::Generic,
        Some(session.username()),
    );
    let stream = resolver::resolve(api.store(), &spec).await?;
    let ids = api.store().list_entry_ids(&listing.query(stream)).await?;
    let page = listing.window.finish(ids, |id| *id);

    let mut ids = page.items;
    if ids.is_empty() && newsplus_placeholder {
        ids.push(EntryId::new(0));
    }

    Ok(ItemRefs {
        item_refs: ids
            .into_iter()
            .map(|id| ItemRef { id: id.to_string() })
            .collect(),
        continuation: page.continuation.map(|id| id.to_string()),
    })
}

/// Fetch explicitly named entries (`stream/items/contents`).
///
/// Ids that do not parse are skipped.
pub async fn items_by_ids(
    api: &ReaderApi,
    raw_ids: &[String],
    order: SortOrder,
) -> ApiResult<StreamContents> {
    let ids: Vec<EntryId> = raw_ids
        .iter()
        .filter_map(|raw| match EntryId::parse(raw) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::debug!("Skipping item: {}", e);
                None
            }
        })
        .collect();

    let entries = api.store().entries_by_ids(&ids, order).await?;
    Ok(StreamContents {
        id: READING_LIST.to_string(),
        updated: now_secs(),
        items: project_entries(api, entries).await?,
        continuation: None,
    })
}

/// `tag/list`: the starred pseudo-tag, then categories, then user tags.
pub async fn tag_list(api: &ReaderApi) -> ApiResult<TagList> {
    let mut tags = vec![TagDescriptor {
        id: STARRED.to_string(),
        kind: None,
        unread_count: None,
    }];

    for category in api.store().list_categories().await? {
        tags.push(TagDescriptor {
            id: label_stream_id(&unescape_html(&category.name)),
            kind: Some("folder".to_string()),
            unread_count: None,
        });
    }

    for tag in api.store().list_tags().await? {
        tags.push(TagDescriptor {
            id: label_stream_id(&unescape_html(&tag.name)),
            kind: Some("tag".to_string()),
            unread_count: Some(tag.unread),
        });
    }

    Ok(TagList { tags })
}

/// `subscription/list`: every feed, grouped by category.
pub async fn subscription_list(api: &ReaderApi) -> ApiResult<SubscriptionList> {
    // Fail early without a salt, even with no feeds.
    api.tokens()?;

    let mut subscriptions = Vec::new();
    for (category, feeds) in feeds_by_category(api).await? {
        let name = unescape_html(&category.name);
        for feed in feeds {
            subscriptions.push(Subscription {
                id: feed_stream_id(feed.id),
                title: unescape_html(&feed.name),
                categories: vec![SubscriptionCategory {
                    id: label_stream_id(&name),
                    label: name.clone(),
                }],
                url: unescape_html(&feed.url),
                html_url: unescape_html(&feed.website),
                icon_url: api.icon_url(&feed.url)?,
            });
        }
    }

    Ok(SubscriptionList { subscriptions })
}

/// `unread-count`: every feed then its category, every tag, and the
/// reading list.
pub async fn unread_counts(api: &ReaderApi) -> ApiResult<UnreadCounts> {
    let feed_newest = api.store().feeds_newest_item_usec().await?;
    let tag_newest = api.store().tags_newest_item_usec().await?;

    let mut counts = Vec::new();
    let mut total_unread = 0u64;
    let mut total_newest = 0i64;

    for (category, feeds) in feeds_by_category(api).await? {
        let mut category_unread = 0u64;
        let mut category_newest = 0i64;

        for feed in feeds {
            let newest = feed_newest.get(&feed.id).copied().unwrap_or(0);
            counts.push(UnreadCount {
                id: feed_stream_id(feed.id),
                count: feed.unread,
                newest_item_timestamp_usec: newest.to_string(),
            });
            category_unread += feed.unread;
            category_newest = category_newest.max(newest);
        }

        counts.push(UnreadCount {
            id: label_stream_id(&unescape_html(&category.name)),
            count: category_unread,
            newest_item_timestamp_usec: category_newest.to_string(),
        });
        total_unread += category_unread;
        total_newest = total_newest.max(category_newest);
    }

    for tag in api.store().list_tags().await? {
        let newest = tag_newest.get(&tag.id).copied().unwrap_or(0);
        counts.push(UnreadCount {
            id: label_stream_id(&unescape_html(&tag.name)),
            count: tag.unread,
            newest_item_timestamp_usec: newest.to_string(),
        });
    }

    counts.push(UnreadCount {
        id: READING_LIST.to_string(),
        count: total_unread,
        newest_item_timestamp_usec: total_newest.to_string(),
    });

    Ok(UnreadCounts {
        max: total_unread,
        unreadcounts: counts,
    })
}

/// `user-info`.
pub fn user_info(session: &Session) -> UserInfo {
    let name = session.username().to_string();
    UserInfo {
        user_id: name.clone(),
        user_name: name.clone(),
        user_profile_id: name,
        user_email: session.user().email.clone(),
    }
}

/// Categories in name order, each with its feeds in name order.
async fn feeds_by_category(api: &ReaderApi) -> ApiResult<Vec<(Category, Vec<Feed>)>> {
    let mut by_category: HashMap<CategoryId, Vec<Feed>> = HashMap::new();
    for feed in api.store().list_feeds().await? {
        by_category.entry(feed.category_id).or_default().push(feed);
    }

    Ok(api
        .store()
        .list_categories()
        .await?
        .into_iter()
        .map(|category| {
            let feeds = by_category.remove(&category.id).unwrap_or_default();
            (category, feeds)
        })
        .collect())
}

/// Project entries to their wire form.
///
/// Tag names are fetched in one batch. Entries whose feed (or the feed's
/// category) is gone are dropped.
async fn project_entries(api: &ReaderApi, entries: Vec<Entry>) -> ApiResult<Vec<Item>> {
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let categories: HashMap<CategoryId, Category> = api
        .store()
        .list_categories()
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let feeds: HashMap<FeedId, Feed> = api
        .store()
        .list_feeds()
        .await?
        .into_iter()
        .map(|f| (f.id, f))
        .collect();

    let ids: Vec<EntryId> = entries.iter().map(|e| e.id).collect();
    let mut tag_names = api.store().entry_tag_names(&ids).await?;

    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(feed) = feeds.get(&entry.feed_id) else {
            tracing::debug!("Dropping entry {}: feed {} not visible", entry.id, entry.feed_id);
            continue;
        };
        let Some(category) = categories.get(&feed.category_id) else {
            tracing::debug!("Dropping entry {}: category {} not visible", entry.id, feed.category_id);
            continue;
        };
        let tags = tag_names.remove(&entry.id).unwrap_or_default();
        items.push(project_entry(entry, feed, category, &tags));
    }
    Ok(items)
}

fn project_entry(entry: Entry, feed: &Feed, category: &Category, tags: &[String]) -> Item {
    let mut categories = vec![
        READING_LIST.to_string(),
        label_stream_id(&unescape_html(&category.name)),
    ];
    if entry.is_read {
        categories.push(StateToken::Read.as_str().to_string());
    }
    if entry.is_starred {
        categories.push(STARRED.to_string());
    }
    categories.extend(tags.iter().map(|tag| label_stream_id(&unescape_html(tag))));

    Item {
        id: entry.id.long_form(),
        crawl_time_msec: (entry.added_usec / 1000).to_string(),
        timestamp_usec: entry.added_usec.to_string(),
        published: entry.published,
        title: entry.title,
        author: entry.author,
        canonical: vec![Link {
            href: entry.link.clone(),
            kind: None,
        }],
        alternate: vec![Link {
            href: entry.link,
            kind: Some("text/html".to_string()),
        }],
        categories,
        origin: Origin {
            stream_id: feed_stream_id(feed.id),
            title: unescape_html(&feed.name),
            html_url: unescape_html(&feed.website),
            feed_url: unescape_html(&feed.url),
        },
        summary: Summary {
            content: entry.content,
        },
    }
}

fn now_secs() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::tests::{test_api, TEST_USER};
    use crate::storage::{NewEntry, NewFeed, ReaderStore, SqliteStore};
    use greader_core::{parse_continuation, StreamHint};

    fn session(api: &ReaderApi) -> Session {
        crate::auth::tests::session_for(api, TEST_USER)
    }

    fn listing(count: u32, continuation: Option<&str>) -> Listing {
        Listing {
            filter: EntryFilter::default(),
            order: SortOrder::Descending,
            window: PageWindow::new(count, continuation.and_then(parse_continuation)),
        }
    }

    async fn seed(store: &SqliteStore) -> (FeedId, Vec<EntryId>) {
        let category = store.create_category("Tech").await.unwrap();
        let feed = store
            .add_feed(NewFeed {
                url: "http://example.test/rss".into(),
                title: "Example &amp; Co".into(),
                category_id: Some(category),
                website: "http://example.test/".into(),
            })
            .await
            .unwrap();

        let mut ids = Vec::new();
        for i in 1..=5 {
            let id = store
                .insert_entry(NewEntry {
                    feed_id: feed.id,
                    title: format!("Post {i}"),
                    link: format!("http://example.test/{i}"),
                    content: "<p>hi</p>".into(),
                    published: 1_700_000_000 + i,
                    added_usec: (1_700_000_000 + i) * 1_000_000,
                    is_starred: true,
                    ..Default::default()
                })
                .await
                .unwrap();
            ids.push(id);
        }
        (feed.id, ids)
    }

    fn item_numbers(contents: &StreamContents) -> Vec<u64> {
        contents
            .items
            .iter()
            .map(|item| EntryId::parse(&item.id).unwrap().value())
            .collect()
    }

    #[tokio::test]
    async fn starred_pagination_walkthrough() {
        let (api, store) = test_api().await;
        seed(&store).await;

        let first = stream_contents(&api, &StreamSpec::Starred, &listing(2, None))
            .await
            .unwrap();
        assert_eq!(item_numbers(&first), vec![5, 4]);
        assert_eq!(first.continuation.as_deref(), Some("4"));

        let second = stream_contents(&api, &StreamSpec::Starred, &listing(2, Some("4")))
            .await
            .unwrap();
        assert_eq!(item_numbers(&second), vec![3, 2]);
        assert_eq!(second.continuation.as_deref(), Some("2"));

        let third = stream_contents(&api, &StreamSpec::Starred, &listing(2, Some("2")))
            .await
            .unwrap();
        assert_eq!(item_numbers(&third), vec![1]);
        assert_eq!(third.continuation.as_deref(), Some("1"));

        let last = stream_contents(&api, &StreamSpec::Starred, &listing(2, Some("1")))
            .await
            .unwrap();
        assert!(last.items.is_empty());
        assert_eq!(last.continuation, None);
    }

    #[tokio::test]
    async fn item_projection() {
        let (api, store) = test_api().await;
        let (feed, ids) = seed(&store).await;
        let tag = store.create_tag("Later").await.unwrap();
        store.set_entry_tag(tag, ids[0], true).await.unwrap();
        store.mark_read(&[ids[0]], true).await.unwrap();

        let contents = items_by_ids(&api, &[ids[0].to_string()], SortOrder::Descending)
            .await
            .unwrap();
        assert_eq!(contents.id, READING_LIST);
        let item = &contents.items[0];

        assert_eq!(item.id, "tag:google.com,2005:reader/item/0000000000000001");
        assert_eq!(item.timestamp_usec, "1700000001000000");
        assert_eq!(item.crawl_time_msec, "1700000001000");
        assert_eq!(item.published, 1_700_000_001);
        assert_eq!(item.alternate[0].kind.as_deref(), Some("text/html"));
        assert_eq!(item.canonical[0].href, "http://example.test/1");
        assert_eq!(
            item.categories,
            vec![
                READING_LIST.to_string(),
                "user/-/label/Tech".to_string(),
                "user/-/state/com.google/read".to_string(),
                STARRED.to_string(),
                "user/-/label/Later".to_string(),
            ]
        );
        assert_eq!(item.origin.stream_id, feed_stream_id(feed));
        assert_eq!(item.origin.title, "Example & Co");
        assert_eq!(item.origin.html_url, "http://example.test/");
        assert_eq!(item.summary.content, "<p>hi</p>");
    }

    #[tokio::test]
    async fn items_by_ids_accepts_long_form_and_skips_garbage() {
        let (api, store) = test_api().await;
        seed(&store).await;

        let raw = vec![
            "tag:google.com,2005:reader/item/0000000000000003".to_string(),
            "2".to_string(),
            "not-an-id!".to_string(),
        ];
        let contents = items_by_ids(&api, &raw, SortOrder::Ascending).await.unwrap();
        assert_eq!(item_numbers(&contents), vec![2, 3]);
        assert!(contents.continuation.is_none());
    }

    #[tokio::test]
    async fn item_ids_filters_and_pages() {
        let (api, store) = test_api().await;
        let (_, ids) = seed(&store).await;
        store.mark_read(&ids[..2], true).await.unwrap();
        let session = session(&api);

        let mut unread = listing(10, None);
        unread.filter = EntryFilter::compile("", "user/-/state/com.google/read", 0, 0);
        let refs = item_ids(&api, &session, READING_LIST, &unread, false)
            .await
            .unwrap();
        let got: Vec<&str> = refs.item_refs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(got, vec!["5", "4", "3"]);
        assert!(refs.continuation.is_none());

        let paged = item_ids(&api, &session, "user/-/label/Tech", &listing(3, None), false)
            .await
            .unwrap();
        assert_eq!(paged.item_refs.len(), 3);
        assert_eq!(paged.continuation.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn newsplus_placeholder_only_when_empty() {
        let (api, _) = test_api().await;
        let session = session(&api);

        let refs = item_ids(&api, &session, READING_LIST, &listing(5, None), true)
            .await
            .unwrap();
        assert_eq!(refs.item_refs, vec![ItemRef { id: "0".into() }]);

        let plain = item_ids(&api, &session, READING_LIST, &listing(5, None), false)
            .await
            .unwrap();
        assert!(plain.item_refs.is_empty());
    }

    #[tokio::test]
    async fn unresolved_stream_lists_nothing() {
        let (api, store) = test_api().await;
        seed(&store).await;

        let spec = StreamSpec::classify("Unknown", StreamHint::Label, None);
        let contents = stream_contents(&api, &spec, &listing(10, None)).await.unwrap();
        assert!(contents.items.is_empty());
        assert!(contents.continuation.is_none());
    }

    #[tokio::test]
    async fn tag_list_order() {
        let (api, store) = test_api().await;
        store.create_category("Tech").await.unwrap();
        store.create_tag("Later").await.unwrap();

        let list = tag_list(&api).await.unwrap();
        let ids: Vec<&str> = list.tags.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![STARRED, "user/-/label/Tech", "user/-/label/Uncategorized", "user/-/label/Later"]
        );
        assert_eq!(list.tags[1].kind.as_deref(), Some("folder"));
        assert_eq!(list.tags[3].kind.as_deref(), Some("tag"));
        assert_eq!(list.tags[3].unread_count, Some(0));
    }

    #[tokio::test]
    async fn subscription_list_groups_by_category() {
        let (api, store) = test_api().await;
        let (feed, _) = seed(&store).await;

        let list = subscription_list(&api).await.unwrap();
        assert_eq!(list.subscriptions.len(), 1);
        let sub = &list.subscriptions[0];
        assert_eq!(sub.id, feed_stream_id(feed));
        assert_eq!(sub.title, "Example & Co");
        assert_eq!(sub.categories[0].id, "user/-/label/Tech");
        assert_eq!(sub.categories[0].label, "Tech");
        assert_eq!(sub.url, "http://example.test/rss");
        assert!(sub.icon_url.starts_with("https://reader.example.test/f.php?"));
    }

    #[tokio::test]
    async fn unread_counts_roll_up() {
        let (api, store) = test_api().await;
        let (feed, ids) = seed(&store).await;
        store.mark_read(&[ids[0]], true).await.unwrap();
        let tag = store.create_tag("Later").await.unwrap();
        store.set_entry_tag(tag, ids[1], true).await.unwrap();

        let counts = unread_counts(&api).await.unwrap();
        assert_eq!(counts.max, 4);

        let by_id: HashMap<&str, &UnreadCount> = counts
            .unreadcounts
            .iter()
            .map(|c| (c.id.as_str(), c))
            .collect();
        let feed_id = feed_stream_id(feed);
        assert_eq!(by_id[feed_id.as_str()].count, 4);
        assert_eq!(
            by_id[feed_id.as_str()].newest_item_timestamp_usec,
            "1700000005000000"
        );
        assert_eq!(by_id["user/-/label/Tech"].count, 4);
        assert_eq!(by_id["user/-/label/Uncategorized"].count, 0);
        assert_eq!(by_id["user/-/label/Later"].count, 1);
        assert_eq!(
            by_id["user/-/label/Later"].newest_item_timestamp_usec,
            "1700000002000000"
        );
        assert_eq!(counts.unreadcounts.last().unwrap().id, READING_LIST);
        assert_eq!(counts.unreadcounts.last().unwrap().count, 4);
    }

    #[tokio::test]
    async fn user_info_reports_session_user() {
        let (api, _) = test_api().await;
        let info = user_info(&session(&api));
        assert_eq!(info.user_id, TEST_USER);
        assert_eq!(info.user_profile_id, TEST_USER);
        assert_eq!(info.user_email, "alice@example.test");
    }

    #[tokio::test]
    async fn entries_of_deleted_feeds_disappear() {
        let (api, store) = test_api().await;
        let (feed, _) = seed(&store).await;
        store.delete_feed(feed).await.unwrap();

        let contents = stream_contents(&api, &StreamSpec::AllItems, &listing(10, None))
            .await
            .unwrap();
        assert!(contents.items.is_empty());
    }
}
