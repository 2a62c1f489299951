//! Derived snapshot consumed by the dashboard
//!
//! A point-in-time JSON artifact: full item list sorted by score, the
//! distinct tag set, an optional daily summary and a timestamp. Written
//! through serde_json so arbitrary titles and summaries always produce
//! valid output.

use crate::error::Result;
use crate::models::Item;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub generated_at: String,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub items: Vec<Item>,
}

impl Snapshot {
    /// Assemble a snapshot: items sorted by score descending (unscored
    /// last), tags as the distinct sorted union across the items.
    pub fn build(mut items: Vec<Item>, summary: Option<String>) -> Self {
        items.sort_by_key(|item| std::cmp::Reverse(item.score.unwrap_or(i64::MIN)));
        let tags = distinct_tags(&items);
        Self {
            generated_at: Utc::now().to_rfc3339(),
            summary,
            tags,
            items,
        }
    }

    /// Write the snapshot as pretty JSON
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), items = self.items.len(), "Snapshot written");
        Ok(())
    }
}

/// Distinct non-empty tags across a batch, sorted
pub fn distinct_tags(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| item.tags.iter())
        .filter(|t| !t.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemKind;
    use tempfile::TempDir;

    fn item(id: &str, score: Option<i64>, tags: &[&str]) -> Item {
        let mut item = Item::new(id.to_string(), ItemKind::Paper, "arXiv");
        item.title = format!("Title {}", id);
        item.score = score;
        item.tags = tags.iter().map(|t| t.to_string()).collect();
        item
    }

    #[test]
    fn test_build_sorts_by_score_unscored_last() {
        let snapshot = Snapshot::build(
            vec![
                item("a", Some(3), &["manipulation"]),
                item("b", None, &["General"]),
                item("c", Some(9), &["humanoid", "manipulation"]),
            ],
            None,
        );
        let ids: Vec<_> = snapshot.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(snapshot.tags, vec!["General", "humanoid", "manipulation"]);
    }

    #[test]
    fn test_write_and_read_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out").join("snapshot.json");

        // Quote-heavy text must survive encoding untouched
        let mut tricky = item("a", Some(1), &["General"]);
        tricky.title = "Say \"hello\",\nworld \\ {json}".to_string();

        let snapshot = Snapshot::build(vec![tricky], Some("daily **digest**".to_string()));
        snapshot.write(&path).unwrap();

        let loaded: Snapshot =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.items[0].title, "Say \"hello\",\nworld \\ {json}");
        assert_eq!(loaded.summary, Some("daily **digest**".to_string()));
    }
}
