//! Hugging Face model-hub adapter (trending + official org releases)

use crate::config::{Config, InterestScoringConfig};
use crate::error::Result;
use crate::models::{Item, ItemKind};
use crate::scrape::{Fetcher, SourceAdapter};
use crate::tag;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{info, warn};

const SOURCE: &str = "HuggingFace";

/// Trending models per task
const TRENDING_LIMIT: usize = 5;
/// Latest models per watched organization
const ORG_LIMIT: usize = 3;
/// Organization releases older than this are ignored
const ORG_RECENCY_DAYS: i64 = 7;
/// Fixed score for official org releases, above any heuristic score
const ORG_SCORE: i64 = 10;
/// Base score for trending models, before keyword hits
const TRENDING_BASE_SCORE: i64 = 5;

#[derive(Debug, Deserialize)]
struct HubModel {
    #[serde(alias = "modelId")]
    id: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    likes: i64,
    #[serde(default)]
    pipeline_tag: Option<String>,
    #[serde(default, rename = "lastModified")]
    last_modified: Option<String>,
}

/// Model-hub adapter over the Hugging Face listing API. Two passes:
/// per-task trending (short-window popularity) and per-organization
/// official releases restricted to the last 7 days. Deduplicated across
/// passes by model id, first seen wins.
pub struct HuggingFaceAdapter {
    fetcher: Fetcher,
    base_url: String,
    tasks: Vec<String>,
    orgs: Vec<String>,
    scoring: InterestScoringConfig,
}

impl HuggingFaceAdapter {
    pub fn new(config: &Config, fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            base_url: config.endpoints.huggingface.clone(),
            tasks: config.huggingface.tasks.clone(),
            orgs: config.huggingface.orgs.clone(),
            scoring: config.interest_scoring.clone(),
        }
    }

    fn listing_url(&self) -> String {
        format!("{}/api/models", self.base_url)
    }

    fn base_item(&self, model: &HubModel) -> Item {
        let mut item = Item::new(format!("hf:{}", model.id), ItemKind::Model, SOURCE);
        item.title = model.id.clone();
        item.author = model
            .author
            .clone()
            .unwrap_or_else(|| model.id.split('/').next().unwrap_or_default().to_string());
        item.url = format!("{}/{}", self.base_url, model.id);
        item.date = model
            .last_modified
            .as_deref()
            .and_then(|s| s.get(..10))
            .unwrap_or_default()
            .to_string();
        item.stars = Some(model.likes);
        item
    }

    fn trending_item(&self, model: HubModel) -> Item {
        let mut item = self.base_item(&model);
        item.summary = format!(
            "Trending on Hugging Face ({} likes). Task: {}",
            model.likes,
            model.pipeline_tag.as_deref().unwrap_or("unknown")
        );
        item.score = Some(TRENDING_BASE_SCORE + tag::interest_score(&model.id, &self.scoring));
        item
    }

    fn org_item(&self, model: HubModel, org: &str) -> Item {
        let mut item = self.base_item(&model);
        item.author = org.to_string();
        item.summary = format!(
            "Official release from {}. Task: {}",
            org,
            model.pipeline_tag.as_deref().unwrap_or("unknown")
        );
        item.score = Some(ORG_SCORE);
        item
    }

    async fn fetch_models(&self, query: &[(&str, String)]) -> Vec<HubModel> {
        let records: Vec<serde_json::Value> =
            match self.fetcher.get_json(&self.listing_url(), query).await {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "Hugging Face listing fetch failed, skipping");
                    return Vec::new();
                }
            };

        records
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<HubModel>(value) {
                Ok(model) => Some(model),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed Hugging Face record");
                    None
                }
            })
            .collect()
    }
}

/// True when the date string parses as `YYYY-MM-DD` within the recency
/// window. Unparseable dates count as "not recent enough".
fn is_recent(date_prefix: Option<&str>, max_age_days: i64) -> bool {
    let Some(prefix) = date_prefix else {
        return false;
    };
    match NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
        Ok(date) => (Utc::now().date_naive() - date).num_days() <= max_age_days,
        Err(_) => false,
    }
}

#[async_trait]
impl SourceAdapter for HuggingFaceAdapter {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn scrape(&self) -> Result<Vec<Item>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut items = Vec::new();

        // Pass 1: trending by short-window likes, per task
        for task in &self.tasks {
            let query = [
                ("filter", task.clone()),
                ("sort", "likes7d".to_string()),
                ("direction", "-1".to_string()),
                ("limit", TRENDING_LIMIT.to_string()),
            ];
            for model in self.fetch_models(&query).await {
                if !seen.insert(model.id.clone()) {
                    continue;
                }
                items.push(self.trending_item(model));
            }
        }

        // Pass 2: official releases from watched orgs, last 7 days only
        for org in &self.orgs {
            let query = [
                ("author", org.clone()),
                ("sort", "lastModified".to_string()),
                ("direction", "-1".to_string()),
                ("limit", ORG_LIMIT.to_string()),
            ];
            for model in self.fetch_models(&query).await {
                let prefix = model.last_modified.as_deref().and_then(|s| s.get(..10));
                if !is_recent(prefix, ORG_RECENCY_DAYS) {
                    continue;
                }
                if !seen.insert(model.id.clone()) {
                    continue;
                }
                items.push(self.org_item(model, org));
            }
        }

        info!(collected = items.len(), "Hugging Face scrape complete");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use chrono::Duration;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn model_json(id: &str, likes: i64, last_modified: &str) -> serde_json::Value {
        json!({
            "id": id,
            "author": id.split('/').next().unwrap(),
            "likes": likes,
            "pipeline_tag": "robotics",
            "lastModified": last_modified
        })
    }

    fn adapter(base_url: String, tasks: Vec<&str>, orgs: Vec<&str>) -> HuggingFaceAdapter {
        let mut config = Config::default();
        config.endpoints.huggingface = base_url;
        config.huggingface.tasks = tasks.into_iter().map(String::from).collect();
        config.huggingface.orgs = orgs.into_iter().map(String::from).collect();
        let fetcher = Fetcher::new(&HttpConfig {
            timeout_secs: 5,
            backoff_base_ms: 1,
        })
        .unwrap();
        HuggingFaceAdapter::new(&config, fetcher)
    }

    fn days_ago(days: i64) -> String {
        (Utc::now() - Duration::days(days))
            .format("%Y-%m-%dT00:00:00Z")
            .to_string()
    }

    #[test]
    fn test_is_recent() {
        let today = Utc::now().date_naive().to_string();
        assert!(is_recent(Some(&today), 7));
        assert!(!is_recent(Some("2020-01-01"), 7));
        assert!(!is_recent(Some("not-a-date"), 7));
        assert!(!is_recent(None, 7));
    }

    #[tokio::test]
    async fn test_trending_and_org_passes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/models"))
            .and(query_param("filter", "robotics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                model_json("acme/pi-zero-vla", 900, &days_ago(1)),
                model_json("beta/walker", 40, &days_ago(2)),
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/models"))
            .and(query_param("author", "acme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                // Duplicate of a trending model: first-seen wins
                model_json("acme/pi-zero-vla", 900, &days_ago(1)),
                model_json("acme/fresh-release", 10, &days_ago(3)),
                model_json("acme/old-release", 10, &days_ago(30)),
                model_json("acme/bad-date", 10, "garbage"),
            ])))
            .mount(&server)
            .await;

        let adapter = adapter(server.uri(), vec!["robotics"], vec!["acme"]);
        let items = adapter.scrape().await.unwrap();

        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["hf:acme/pi-zero-vla", "hf:beta/walker", "hf:acme/fresh-release"]
        );

        // Trending scoring: base 5 plus a hit on the default high keyword "vla"
        assert_eq!(items[0].score, Some(TRENDING_BASE_SCORE + 3));
        assert!(items[0].summary.contains("Trending"));
        assert_eq!(items[0].kind, "model");
        assert_eq!(items[0].stars, Some(900));

        // Org release gets the fixed official score
        assert_eq!(items[2].score, Some(ORG_SCORE));
        assert_eq!(items[2].author, "acme");
        assert!(items[2].summary.contains("Official release from acme"));
    }

    #[tokio::test]
    async fn test_listing_failure_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let adapter = adapter(server.uri(), vec!["robotics"], vec![]);
        let items = adapter.scrape().await.unwrap();
        assert!(items.is_empty());
    }
}
