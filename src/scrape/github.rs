//! GitHub code-hosting adapter (repository search)

use crate::config::{Config, InterestScoringConfig};
use crate::error::Result;
use crate::models::{clean_text, Item, ItemKind};
use crate::scrape::{Fetcher, SourceAdapter};
use crate::tag;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{info, warn};

const SOURCE: &str = "GitHub";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Repo {
    id: i64,
    full_name: String,
    #[serde(default)]
    description: Option<String>,
    html_url: String,
    updated_at: String,
    #[serde(default)]
    stargazers_count: i64,
    owner: RepoOwner,
}

#[derive(Debug, Deserialize)]
struct RepoOwner {
    login: String,
    #[serde(default)]
    avatar_url: Option<String>,
}

/// Code-hosting adapter over the GitHub search API. One query per
/// configured topic, capped per topic, deduplicated across topics by
/// repository id (first occurrence wins).
pub struct GithubAdapter {
    fetcher: Fetcher,
    base_url: String,
    topics: Vec<String>,
    per_topic_cap: usize,
    scoring: InterestScoringConfig,
}

impl GithubAdapter {
    pub fn new(config: &Config, fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            base_url: config.endpoints.github.clone(),
            topics: config.github_topics.clone(),
            per_topic_cap: config.max_github,
            scoring: config.interest_scoring.clone(),
        }
    }

    fn repo_to_item(&self, repo: Repo) -> Item {
        let description = repo.description.unwrap_or_default();

        let mut score = tag::interest_score(
            &format!("{} {}", repo.full_name, description),
            &self.scoring,
        );
        // Popularity bonuses on top of the keyword heuristic
        if repo.stargazers_count > 1000 {
            score += 2;
        }
        if repo.stargazers_count > 5000 {
            score += 3;
        }

        let mut item = Item::new(format!("github:{}", repo.id), ItemKind::Project, SOURCE);
        item.title = repo.full_name;
        item.author = repo.owner.login;
        item.summary = clean_text(&description);
        item.url = repo.html_url;
        item.date = repo.updated_at.get(..10).unwrap_or_default().to_string();
        item.stars = Some(repo.stargazers_count);
        item.media_url = repo.owner.avatar_url;
        item.score = Some(score);
        item
    }
}

#[async_trait]
impl SourceAdapter for GithubAdapter {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn scrape(&self) -> Result<Vec<Item>> {
        let url = format!("{}/search/repositories", self.base_url);
        let mut seen: HashSet<String> = HashSet::new();
        let mut items = Vec::new();

        for topic in &self.topics {
            let query = [
                ("q", format!("topic:{} stars:>10", topic)),
                ("sort", "updated".to_string()),
                ("order", "desc".to_string()),
            ];

            let response: SearchResponse = match self.fetcher.get_json(&url, &query).await {
                Ok(r) => r,
                Err(e) => {
                    // Partial-success policy: keep what earlier topics yielded
                    warn!(topic = %topic, error = %e, "GitHub topic fetch failed, skipping");
                    continue;
                }
            };

            for value in response.items.into_iter().take(self.per_topic_cap) {
                let repo: Repo = match serde_json::from_value(value) {
                    Ok(repo) => repo,
                    Err(e) => {
                        warn!(topic = %topic, error = %e, "Skipping malformed GitHub record");
                        continue;
                    }
                };
                let item = self.repo_to_item(repo);
                if seen.insert(item.id.clone()) {
                    items.push(item);
                }
            }
        }

        info!(collected = items.len(), topics = self.topics.len(), "GitHub scrape complete");
        Ok(items)
    }
}
