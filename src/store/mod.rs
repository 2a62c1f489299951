//! Durable item storage using SQLite
//!
//! One table of items keyed by source-qualified id, plus an FTS5 index
//! over title/summary/comment. Upserts merge content fields and never
//! touch user state; the FTS row is refreshed in the same transaction.

mod schema;

pub use schema::*;

use crate::error::{Error, Result};
use crate::models::{Item, UserStatePatch};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::path::Path;
use tracing::{debug, info};

/// Raw row shape; `tags_json` is decoded into `Item::tags`
#[derive(Debug, FromRow)]
struct ItemRow {
    id: String,
    kind: String,
    source: String,
    title: String,
    author: String,
    summary: String,
    url: String,
    date: String,
    tags_json: Option<String>,
    score: Option<i64>,
    comment: Option<String>,
    media_url: Option<String>,
    stars: Option<i64>,
    is_read: bool,
    is_star: bool,
    user_notes: Option<String>,
    fetched_at: String,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        let tags = row
            .tags_json
            .as_deref()
            .and_then(|j| serde_json::from_str(j).ok())
            .unwrap_or_default();
        Item {
            id: row.id,
            kind: row.kind,
            source: row.source,
            title: row.title,
            author: row.author,
            summary: row.summary,
            url: row.url,
            date: row.date,
            tags,
            score: row.score,
            comment: row.comment,
            media_url: row.media_url,
            stars: row.stars,
            is_read: row.is_read,
            is_star: row.is_star,
            user_notes: row.user_notes,
            fetched_at: row.fetched_at,
        }
    }
}

/// Item database handle
#[derive(Clone)]
pub struct ItemStore {
    pool: SqlitePool,
}

impl ItemStore {
    /// Open (creating if missing) the item database at the given path
    pub async fn connect(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        debug!("Connecting to SQLite database at {:?}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Initialize the database schema
    pub async fn init_schema(&self) -> Result<()> {
        info!("Initializing database schema");
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert a new item, or merge into the existing row with the same id.
    ///
    /// On conflict, content fields are overwritten; `score`, `comment`,
    /// `media_url` and `stars` keep their stored value when the incoming
    /// value is None (an incoming Some(0) is a real overwrite); the
    /// user-state fields are never touched. The FTS row is rebuilt from
    /// the merged row inside the same transaction, so a successful upsert
    /// never leaves the index stale.
    pub async fn upsert(&self, item: &Item) -> Result<()> {
        let tags_json = serde_json::to_string(&item.tags)?;
        let fetched_at = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO items (
                id, kind, source, title, author, summary, url, date,
                tags_json, score, comment, media_url, stars,
                is_read, is_star, user_notes, fetched_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                kind = excluded.kind,
                source = excluded.source,
                title = excluded.title,
                author = excluded.author,
                summary = excluded.summary,
                url = excluded.url,
                date = excluded.date,
                tags_json = excluded.tags_json,
                score = COALESCE(excluded.score, items.score),
                comment = COALESCE(excluded.comment, items.comment),
                media_url = COALESCE(excluded.media_url, items.media_url),
                stars = COALESCE(excluded.stars, items.stars),
                fetched_at = excluded.fetched_at
            "#,
        )
        .bind(&item.id)
        .bind(&item.kind)
        .bind(&item.source)
        .bind(&item.title)
        .bind(&item.author)
        .bind(&item.summary)
        .bind(&item.url)
        .bind(&item.date)
        .bind(&tags_json)
        .bind(item.score)
        .bind(&item.comment)
        .bind(&item.media_url)
        .bind(item.stars)
        .bind(item.is_read)
        .bind(item.is_star)
        .bind(&item.user_notes)
        .bind(&fetched_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM items_fts WHERE id = ?")
            .bind(&item.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO items_fts (id, title, summary, comment)
            SELECT id, title, summary, COALESCE(comment, '') FROM items WHERE id = ?
            "#,
        )
        .bind(&item.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Get an item by id
    pub async fn get(&self, id: &str) -> Result<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>("SELECT * FROM items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Item::from))
    }

    /// Items with score >= min_score (unscored rows count as 0), newest
    /// first, ties broken by score descending.
    pub async fn fetch(&self, min_score: i64, limit: i64) -> Result<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT * FROM items
            WHERE COALESCE(score, 0) >= ?
            ORDER BY date DESC, COALESCE(score, 0) DESC
            LIMIT ?
            "#,
        )
        .bind(min_score)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    /// Full-text search over title, summary and oracle comment
    pub async fn search(&self, query: &str, limit: i64) -> Result<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT i.* FROM items_fts
            JOIN items i ON i.id = items_fts.id
            WHERE items_fts MATCH ?
            ORDER BY items_fts.rank
            LIMIT ?
            "#,
        )
        .bind(query)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    /// Partially update user-state fields. Only supplied fields change.
    /// Fails with [`Error::ItemNotFound`] when the id does not exist, to
    /// surface caller bugs.
    pub async fn update_user_state(&self, id: &str, patch: &UserStatePatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut sets: Vec<&str> = Vec::new();
        if patch.is_read.is_some() {
            sets.push("is_read = ?");
        }
        if patch.is_star.is_some() {
            sets.push("is_star = ?");
        }
        if patch.notes.is_some() {
            sets.push("user_notes = ?");
        }

        let sql = format!("UPDATE items SET {} WHERE id = ?", sets.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(is_read) = patch.is_read {
            query = query.bind(is_read);
        }
        if let Some(is_star) = patch.is_star {
            query = query.bind(is_star);
        }
        if let Some(notes) = &patch.notes {
            query = query.bind(notes);
        }

        let result = query.bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(Error::ItemNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Total number of stored items
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}
