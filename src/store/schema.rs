//! SQLite schema definition

/// SQL schema for the item store
pub const SCHEMA_SQL: &str = r#"
-- Items: unified records for papers, repositories and model releases
CREATE TABLE IF NOT EXISTS items (
    id TEXT PRIMARY KEY,
    kind TEXT NOT NULL,
    source TEXT NOT NULL,
    title TEXT NOT NULL,
    author TEXT NOT NULL DEFAULT '',
    summary TEXT NOT NULL DEFAULT '',
    url TEXT NOT NULL DEFAULT '',
    date TEXT NOT NULL DEFAULT '',
    tags_json TEXT,
    score INTEGER,
    comment TEXT,
    media_url TEXT,
    stars INTEGER,
    is_read INTEGER NOT NULL DEFAULT 0,
    is_star INTEGER NOT NULL DEFAULT 0,
    user_notes TEXT,
    fetched_at TEXT NOT NULL
);

-- Full-text index over title/summary/comment, keyed by item id
CREATE VIRTUAL TABLE IF NOT EXISTS items_fts USING fts5(
    id UNINDEXED,
    title,
    summary,
    comment
);

-- Indexes for the fetch ordering
CREATE INDEX IF NOT EXISTS idx_items_date ON items(date DESC);
CREATE INDEX IF NOT EXISTS idx_items_score ON items(score DESC);
"#;
