//! Unified item model shared by every source adapter and the store.

use crate::error::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of research artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Paper,
    Project,
    Model,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Paper => write!(f, "paper"),
            ItemKind::Project => write!(f, "project"),
            ItemKind::Model => write!(f, "model"),
        }
    }
}

impl FromStr for ItemKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "paper" => Ok(ItemKind::Paper),
            "project" => Ok(ItemKind::Project),
            "model" => Ok(ItemKind::Model),
            _ => Err(Error::Config(format!("Unknown item kind: {}", s))),
        }
    }
}

/// A research artifact: a paper, a code repository, or a model release.
///
/// `id` is source-qualified (`arxiv:2501.01234`, `github:123456`,
/// `hf:org/model`) and stable across re-ingestion. Content and provenance
/// fields are refreshed on every scrape; the user-state fields (`is_read`,
/// `is_star`, `user_notes`) are only ever changed through
/// [`crate::store::ItemStore::update_user_state`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub kind: String,
    pub source: String,
    pub title: String,
    pub author: String,
    pub summary: String,
    pub url: String,
    /// Publication / last-update date at origin (ISO `YYYY-MM-DD`),
    /// not the ingestion time.
    pub date: String,
    pub tags: Vec<String>,
    /// None means "not yet scored"; Some(0) is a real score of zero.
    pub score: Option<i64>,
    pub comment: Option<String>,
    pub media_url: Option<String>,
    pub stars: Option<i64>,
    pub is_read: bool,
    pub is_star: bool,
    pub user_notes: Option<String>,
    pub fetched_at: String,
}

impl Item {
    pub fn new(id: String, kind: ItemKind, source: &str) -> Self {
        Self {
            id,
            kind: kind.to_string(),
            source: source.to_string(),
            title: String::new(),
            author: String::new(),
            summary: String::new(),
            url: String::new(),
            date: String::new(),
            tags: Vec::new(),
            score: None,
            comment: None,
            media_url: None,
            stars: None,
            is_read: false,
            is_star: false,
            user_notes: None,
            fetched_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn get_kind(&self) -> Result<ItemKind> {
        self.kind.parse()
    }

    /// Title and summary combined, the input to tagging and scoring.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }
}

/// Partial update of user-state fields. Only supplied fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStatePatch {
    pub is_read: Option<bool>,
    pub is_star: Option<bool>,
    pub notes: Option<String>,
}

impl UserStatePatch {
    pub fn is_empty(&self) -> bool {
        self.is_read.is_none() && self.is_star.is_none() && self.notes.is_none()
    }
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [ItemKind::Paper, ItemKind::Project, ItemKind::Model] {
            let parsed: ItemKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("dataset".parse::<ItemKind>().is_err());
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("a\n b\t\tc  d"), "a b c d");
        assert_eq!(clean_text("  "), "");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(UserStatePatch::default().is_empty());
        let patch = UserStatePatch {
            is_read: Some(true),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
