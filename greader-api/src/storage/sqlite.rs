//! SQLite storage backend for greader-api.

use super::{
    is_valid_feed_url, Category, Entry, EntryQuery, Feed, NewEntry, NewFeed, ReadScope,
    ReaderStore, SortOrder, Tag, DEFAULT_CATEGORY,
};
use crate::error::StorageError;
use async_trait::async_trait;
use greader_core::Tristate;
use greader_types::{CategoryId, EntryId, FeedId, StreamRef, TagId};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

const ENTRY_COLUMNS: &str = "e.id, e.feed_id, e.title, e.author, e.link, e.content, \
                             e.published, e.added_usec, e.is_read, e.is_starred";

const FEED_SELECT: &str = r#"
    SELECT f.id, f.category_id, f.name, f.url, f.website,
           (SELECT COUNT(*) FROM entries e WHERE e.feed_id = f.id AND e.is_read = 0) AS unread
    FROM feeds f
"#;

const TAG_SELECT: &str = r#"
    SELECT t.id, t.name,
           (SELECT COUNT(*) FROM entry_tags et
              JOIN entries e ON e.id = et.entry_id
             WHERE et.tag_id = t.id AND e.is_read = 0) AS unread
    FROM tags t
"#;

/// SQLite-based reader storage.
///
/// Uses WAL mode for concurrent reads/writes. Entry ids come from an
/// `AUTOINCREMENT` key and are never reused.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open a SQLite store from a database path.
    ///
    /// Creates the database file if it doesn't exist.
    pub async fn new(path: &Path) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .map_err(StorageError::Database)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(":memory:")
            .map_err(StorageError::Database)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(StorageError::Database)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run database migrations.
    async fn run_migrations(&self) -> Result<(), StorageError> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            )
            "#,
            "INSERT OR IGNORE INTO categories (id, name) VALUES (1, 'Uncategorized')",
            r#"
            CREATE TABLE IF NOT EXISTS feeds (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category_id INTEGER NOT NULL DEFAULT 1 REFERENCES categories(id),
                name TEXT NOT NULL,
                url TEXT NOT NULL UNIQUE,
                website TEXT NOT NULL DEFAULT ''
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                feed_id INTEGER NOT NULL REFERENCES feeds(id) ON DELETE CASCADE,
                title TEXT NOT NULL DEFAULT '',
                author TEXT NOT NULL DEFAULT '',
                link TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL DEFAULT '',
                published INTEGER NOT NULL DEFAULT 0,
                added_usec INTEGER NOT NULL,
                is_read INTEGER NOT NULL DEFAULT 0,
                is_starred INTEGER NOT NULL DEFAULT 0
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS entry_tags (
                tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                entry_id INTEGER NOT NULL REFERENCES entries(id) ON DELETE CASCADE,
                PRIMARY KEY (tag_id, entry_id)
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_feeds_category ON feeds(category_id)",
            "CREATE INDEX IF NOT EXISTS idx_entries_feed ON entries(feed_id, id)",
            "CREATE INDEX IF NOT EXISTS idx_entries_added ON entries(added_usec)",
            "CREATE INDEX IF NOT EXISTS idx_entry_tags_entry ON entry_tags(entry_id)",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(StorageError::Database)?;
        }

        Ok(())
    }

    /// Store a crawled entry. Returns its id.
    ///
    /// Feed crawling is outside this crate; this is the hook for whatever
    /// fills the database.
    pub async fn insert_entry(&self, entry: NewEntry) -> Result<EntryId, StorageError> {
        let result = sqlx::query(
            r#"
            INSERT INTO entries (feed_id, title, author, link, content, published, added_usec, is_read, is_starred)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(entry.feed_id.value() as i64)
        .bind(&entry.title)
        .bind(&entry.author)
        .bind(&entry.link)
        .bind(&entry.content)
        .bind(entry.published)
        .bind(entry.added_usec)
        .bind(entry.is_read)
        .bind(entry.is_starred)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Database)?;

        Ok(EntryId::new(result.last_insert_rowid() as u64))
    }

    /// Build the filtered listing query, or `None` when nothing can match.
    fn entry_listing<'a>(select: &str, query: &EntryQuery) -> Option<QueryBuilder<'a, Sqlite>> {
        if !query.stream.is_resolved() || query.filter.state.matches_nothing() {
            return None;
        }

        let mut qb = QueryBuilder::new(format!(
            "SELECT {select} FROM entries e JOIN feeds f ON f.id = e.feed_id WHERE 1 = 1"
        ));

        match query.stream {
            StreamRef::AllItems | StreamRef::Unresolved => {}
            StreamRef::Starred => {
                qb.push(" AND e.is_starred = 1");
            }
            StreamRef::Feed(id) => {
                qb.push(" AND e.feed_id = ").push_bind(id.value() as i64);
            }
            StreamRef::Category(id) => {
                qb.push(" AND f.category_id = ").push_bind(id.value() as i64);
            }
            StreamRef::Tag(id) => {
                qb.push(" AND e.id IN (SELECT entry_id FROM entry_tags WHERE tag_id = ")
                    .push_bind(id.value() as i64)
                    .push(")");
            }
        }

        if let Tristate::Only(read) = query.filter.state.read_state() {
            qb.push(" AND e.is_read = ").push_bind(read);
        }
        if let Tristate::Only(starred) = query.filter.state.starred_state() {
            qb.push(" AND e.is_starred = ").push_bind(starred);
        }

        if let Some(min) = query.filter.dates.min {
            qb.push(" AND e.added_usec >= ")
                .push_bind(min.saturating_mul(1_000_000));
        }
        if let Some(max) = query.filter.dates.max {
            qb.push(" AND e.added_usec < ")
                .push_bind(max.saturating_add(1).saturating_mul(1_000_000));
        }

        if let Some(start) = query.start_at {
            let op = match query.order {
                SortOrder::Descending => " AND e.id <= ",
                SortOrder::Ascending => " AND e.id >= ",
            };
            qb.push(op).push_bind(sql_entry_id(start));
        }

        qb.push(order_clause(query.order));
        qb.push(" LIMIT ").push_bind(i64::from(query.limit));
        Some(qb)
    }
}

fn order_clause(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Ascending => " ORDER BY e.id ASC",
        SortOrder::Descending => " ORDER BY e.id DESC",
    }
}

/// Entry ids past the rowid range saturate instead of wrapping negative.
fn sql_entry_id(id: EntryId) -> i64 {
    i64::try_from(id.value()).unwrap_or(i64::MAX)
}

fn push_id_list<'a>(qb: &mut QueryBuilder<'a, Sqlite>, ids: &[EntryId]) {
    qb.push("(");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(sql_entry_id(*id));
    }
    separated.push_unseparated(")");
}

fn not_found(what: &'static str, id: u64) -> StorageError {
    StorageError::NotFound { what, id }
}

#[async_trait]
impl ReaderStore for SqliteStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        let rows = sqlx::query_as::<_, CategoryRow>("SELECT id, name FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn category_by_name(&self, name: &str) -> Result<Option<Category>, StorageError> {
        let row = sqlx::query_as::<_, CategoryRow>("SELECT id, name FROM categories WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(row.map(Category::from))
    }

    async fn create_category(&self, name: &str) -> Result<CategoryId, StorageError> {
        let result = sqlx::query("INSERT INTO categories (name) VALUES (?1)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(CategoryId::new(result.last_insert_rowid() as u64))
    }

    async fn rename_category(&self, id: CategoryId, name: &str) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE categories SET name = ?1 WHERE id = ?2")
            .bind(name)
            .bind(id.value() as i64)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        if result.rows_affected() == 0 {
            return Err(not_found("category", id.value()));
        }
        Ok(())
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), StorageError> {
        if id == DEFAULT_CATEGORY {
            return Err(StorageError::ProtectedCategory);
        }

        let mut tx = self.pool.begin().await.map_err(StorageError::Database)?;

        sqlx::query("UPDATE feeds SET category_id = ?1 WHERE category_id = ?2")
            .bind(DEFAULT_CATEGORY.value() as i64)
            .bind(id.value() as i64)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Database)?;

        sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id.value() as i64)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Database)?;

        tx.commit().await.map_err(StorageError::Database)?;
        Ok(())
    }

    async fn list_feeds(&self) -> Result<Vec<Feed>, StorageError> {
        let rows = sqlx::query_as::<_, FeedRow>(&format!("{FEED_SELECT} ORDER BY f.name"))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(rows.into_iter().map(Feed::from).collect())
    }

    async fn feed_by_id(&self, id: FeedId) -> Result<Option<Feed>, StorageError> {
        let row = sqlx::query_as::<_, FeedRow>(&format!("{FEED_SELECT} WHERE f.id = ?1"))
            .bind(id.value() as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(row.map(Feed::from))
    }

    async fn feed_by_url(&self, url: &str) -> Result<Option<Feed>, StorageError> {
        let row = sqlx::query_as::<_, FeedRow>(&format!("{FEED_SELECT} WHERE f.url = ?1"))
            .bind(url)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(row.map(Feed::from))
    }

    async fn add_feed(&self, feed: NewFeed) -> Result<Feed, StorageError> {
        if !is_valid_feed_url(&feed.url) {
            return Err(StorageError::InvalidFeedUrl { url: feed.url });
        }

        if self.feed_by_url(&feed.url).await?.is_some() {
            return Err(StorageError::DuplicateFeed { url: feed.url });
        }

        let category_id = feed.category_id.unwrap_or(DEFAULT_CATEGORY);
        let name = if feed.title.is_empty() {
            feed.url.clone()
        } else {
            feed.title
        };

        let result = sqlx::query(
            "INSERT INTO feeds (category_id, name, url, website) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(category_id.value() as i64)
        .bind(&name)
        .bind(&feed.url)
        .bind(&feed.website)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Database)?;

        Ok(Feed {
            id: FeedId::new(result.last_insert_rowid() as u64),
            category_id,
            name,
            url: feed.url,
            website: feed.website,
            unread: 0,
        })
    }

    async fn delete_feed(&self, id: FeedId) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM feeds WHERE id = ?1")
            .bind(id.value() as i64)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn move_feed(&self, id: FeedId, category: CategoryId) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE feeds SET category_id = ?1 WHERE id = ?2")
            .bind(category.value() as i64)
            .bind(id.value() as i64)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        if result.rows_affected() == 0 {
            return Err(not_found("feed", id.value()));
        }
        Ok(())
    }

    async fn rename_feed(&self, id: FeedId, name: &str) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE feeds SET name = ?1 WHERE id = ?2")
            .bind(name)
            .bind(id.value() as i64)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        if result.rows_affected() == 0 {
            return Err(not_found("feed", id.value()));
        }
        Ok(())
    }

    async fn reassign_feeds(
        &self,
        from: CategoryId,
        to: CategoryId,
    ) -> Result<u64, StorageError> {
        let result = sqlx::query("UPDATE feeds SET category_id = ?1 WHERE category_id = ?2")
            .bind(to.value() as i64)
            .bind(from.value() as i64)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(result.rows_affected())
    }

    async fn feeds_newest_item_usec(&self) -> Result<HashMap<FeedId, i64>, StorageError> {
        let rows: Vec<(i64, i64)> =
            sqlx::query_as("SELECT feed_id, MAX(added_usec) FROM entries GROUP BY feed_id")
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::Database)?;

        Ok(rows
            .into_iter()
            .map(|(id, usec)| (FeedId::new(id as u64), usec))
            .collect())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, StorageError> {
        let rows = sqlx::query_as::<_, TagRow>(&format!("{TAG_SELECT} ORDER BY t.name"))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn tag_by_name(&self, name: &str) -> Result<Option<Tag>, StorageError> {
        let row = sqlx::query_as::<_, TagRow>(&format!("{TAG_SELECT} WHERE t.name = ?1"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(row.map(Tag::from))
    }

    async fn create_tag(&self, name: &str) -> Result<TagId, StorageError> {
        let result = sqlx::query("INSERT INTO tags (name) VALUES (?1)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(TagId::new(result.last_insert_rowid() as u64))
    }

    async fn rename_tag(&self, id: TagId, name: &str) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE tags SET name = ?1 WHERE id = ?2")
            .bind(name)
            .bind(id.value() as i64)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        if result.rows_affected() == 0 {
            return Err(not_found("tag", id.value()));
        }
        Ok(())
    }

    async fn delete_tag(&self, id: TagId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM tags WHERE id = ?1")
            .bind(id.value() as i64)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(())
    }

    async fn set_entry_tag(
        &self,
        tag: TagId,
        entry: EntryId,
        tagged: bool,
    ) -> Result<(), StorageError> {
        let sql = if tagged {
            // Unknown entry ids are skipped rather than violating the foreign key.
            "INSERT OR IGNORE INTO entry_tags (tag_id, entry_id) \
             SELECT ?1, id FROM entries WHERE id = ?2"
        } else {
            "DELETE FROM entry_tags WHERE tag_id = ?1 AND entry_id = ?2"
        };

        sqlx::query(sql)
            .bind(tag.value() as i64)
            .bind(entry.value() as i64)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(())
    }

    async fn entry_tag_names(
        &self,
        entries: &[EntryId],
    ) -> Result<HashMap<EntryId, Vec<String>>, StorageError> {
        let mut names: HashMap<EntryId, Vec<String>> = HashMap::new();
        if entries.is_empty() {
            return Ok(names);
        }

        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT et.entry_id, t.name FROM entry_tags et \
             JOIN tags t ON t.id = et.tag_id WHERE et.entry_id IN ",
        );
        push_id_list(&mut qb, entries);
        qb.push(" ORDER BY t.name");

        let rows: Vec<(i64, String)> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        for (entry_id, name) in rows {
            names
                .entry(EntryId::new(entry_id as u64))
                .or_default()
                .push(name);
        }
        Ok(names)
    }

    async fn tags_newest_item_usec(&self) -> Result<HashMap<TagId, i64>, StorageError> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT et.tag_id, MAX(e.added_usec)
            FROM entry_tags et JOIN entries e ON e.id = et.entry_id
            GROUP BY et.tag_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Database)?;

        Ok(rows
            .into_iter()
            .map(|(id, usec)| (TagId::new(id as u64), usec))
            .collect())
    }

    async fn list_entries(&self, query: &EntryQuery) -> Result<Vec<Entry>, StorageError> {
        let Some(mut qb) = Self::entry_listing(ENTRY_COLUMNS, query) else {
            return Ok(Vec::new());
        };

        let rows: Vec<EntryRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(rows.into_iter().map(Entry::from).collect())
    }

    async fn list_entry_ids(&self, query: &EntryQuery) -> Result<Vec<EntryId>, StorageError> {
        let Some(mut qb) = Self::entry_listing("e.id", query) else {
            return Ok(Vec::new());
        };

        let ids: Vec<i64> = qb
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(ids.into_iter().map(|id| EntryId::new(id as u64)).collect())
    }

    async fn entries_by_ids(
        &self,
        ids: &[EntryId],
        order: SortOrder,
    ) -> Result<Vec<Entry>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {ENTRY_COLUMNS} FROM entries e WHERE e.id IN "
        ));
        push_id_list(&mut qb, ids);
        qb.push(order_clause(order));

        let rows: Vec<EntryRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(rows.into_iter().map(Entry::from).collect())
    }

    async fn mark_read(&self, ids: &[EntryId], read: bool) -> Result<u64, StorageError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE entries SET is_read = ");
        qb.push_bind(read)
            .push(" WHERE is_read <> ")
            .push_bind(read)
            .push(" AND id IN ");
        push_id_list(&mut qb, ids);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(result.rows_affected())
    }

    async fn mark_starred(&self, ids: &[EntryId], starred: bool) -> Result<u64, StorageError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE entries SET is_starred = ");
        qb.push_bind(starred)
            .push(" WHERE is_starred <> ")
            .push_bind(starred)
            .push(" AND id IN ");
        push_id_list(&mut qb, ids);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(result.rows_affected())
    }

    async fn mark_read_up_to(
        &self,
        scope: ReadScope,
        up_to_usec: Option<i64>,
    ) -> Result<u64, StorageError> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE entries SET is_read = 1 WHERE is_read = 0");

        match scope {
            ReadScope::Feed(id) => {
                qb.push(" AND feed_id = ").push_bind(id.value() as i64);
            }
            ReadScope::Category(id) => {
                qb.push(" AND feed_id IN (SELECT id FROM feeds WHERE category_id = ")
                    .push_bind(id.value() as i64)
                    .push(")");
            }
            ReadScope::Tag(id) => {
                qb.push(" AND id IN (SELECT entry_id FROM entry_tags WHERE tag_id = ")
                    .push_bind(id.value() as i64)
                    .push(")");
            }
            ReadScope::All => {}
        }

        if let Some(limit) = up_to_usec {
            qb.push(" AND added_usec <= ").push_bind(limit);
        }

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(result.rows_affected())
    }
}

/// Internal row types for SQLite queries.
#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
}

#[derive(sqlx::FromRow)]
struct FeedRow {
    id: i64,
    category_id: i64,
    name: String,
    url: String,
    website: String,
    unread: i64,
}

#[derive(sqlx::FromRow)]
struct TagRow {
    id: i64,
    name: String,
    unread: i64,
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: i64,
    feed_id: i64,
    title: String,
    author: String,
    link: String,
    content: String,
    published: i64,
    added_usec: i64,
    is_read: bool,
    is_starred: bool,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: CategoryId::new(row.id as u64),
            name: row.name,
        }
    }
}

impl From<FeedRow> for Feed {
    fn from(row: FeedRow) -> Self {
        Feed {
            id: FeedId::new(row.id as u64),
            category_id: CategoryId::new(row.category_id as u64),
            name: row.name,
            url: row.url,
            website: row.website,
            unread: row.unread.max(0) as u64,
        }
    }
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag {
            id: TagId::new(row.id as u64),
            name: row.name,
            unread: row.unread.max(0) as u64,
        }
    }
}

impl From<EntryRow> for Entry {
    fn from(row: EntryRow) -> Self {
        Entry {
            id: EntryId::new(row.id as u64),
            feed_id: FeedId::new(row.feed_id as u64),
            title: row.title,
            author: row.author,
            link: row.link,
            content: row.content,
            published: row.published,
            added_usec: row.added_usec,
            is_read: row.is_read,
            is_starred: row.is_starred,
        }
    }
}
