//! Batch deduplication: exact id collapse plus a fuzzy-title predicate.

use crate::models::Item;
use std::collections::HashMap;

/// Titles with a character-level similarity ratio above this are treated
/// as the same artifact published under two keys.
const TITLE_SIMILARITY_THRESHOLD: f64 = 0.95;

/// Collapse a batch by item id: the last-seen item for a given id wins,
/// insertion order is otherwise preserved.
pub fn collapse_by_id(items: Vec<Item>) -> Vec<Item> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Item> = Vec::with_capacity(items.len());

    for item in items {
        match index.get(&item.id) {
            Some(&pos) => out[pos] = item,
            None => {
                index.insert(item.id.clone(), out.len());
                out.push(item);
            }
        }
    }

    out
}

/// True when two titles are near-duplicates (case-insensitive similarity
/// ratio > 0.95). Exposed as an on-demand utility; the pipeline only runs
/// it within a single scraped batch, never across the stored corpus.
pub fn is_near_duplicate(title_a: &str, title_b: &str) -> bool {
    let a = title_a.to_lowercase();
    let b = title_b.to_lowercase();
    strsim::normalized_levenshtein(&a, &b) > TITLE_SIMILARITY_THRESHOLD
}

/// Drop later items whose title is a near-duplicate of an earlier one.
/// First occurrence wins. Quadratic in the batch size, which is bounded
/// by the per-source result caps.
pub fn collapse_near_titles(items: Vec<Item>) -> Vec<Item> {
    let mut out: Vec<Item> = Vec::with_capacity(items.len());

    for item in items {
        if out.iter().any(|kept| is_near_duplicate(&kept.title, &item.title)) {
            tracing::debug!(id = %item.id, title = %item.title, "Dropping near-duplicate title");
            continue;
        }
        out.push(item);
    }

    out
}
