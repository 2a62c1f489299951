//! Scoring oracle: an OpenAI-compatible chat endpoint used to rate items
//! and write the daily summary.
//!
//! The client returns `Result` and never degrades on its own; the
//! orchestrator maps any failure to [`degraded_verdict`] so a broken or
//! unreachable oracle can never fail a run.

use crate::config::{Config, LlmConfig};
use crate::error::{Error, Result};
use crate::models::Item;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Sentinel comment attached when the oracle is unavailable
pub const UNAVAILABLE_COMMENT: &str = "AI review unavailable";

/// Longest summary snippet sent per item
const SNIPPET_CHARS: usize = 800;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// An oracle rating for a single item
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Verdict {
    pub score: i64,
    pub comment: String,
}

/// Fallback verdict when the oracle call fails
pub fn degraded_verdict() -> Verdict {
    Verdict {
        score: 0,
        comment: UNAVAILABLE_COMMENT.to_string(),
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Scoring oracle client
pub struct Oracle {
    client: Client,
    config: LlmConfig,
}

impl Oracle {
    /// Returns None when no API key is configured (oracle disabled)
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        if !config.oracle_enabled() {
            info!("No llm.api_key configured, oracle scoring disabled");
            return Ok(None);
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Oracle(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Some(Self {
            client,
            config: config.llm.clone(),
        }))
    }

    async fn chat(&self, system: &str, user: String) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let request = ChatRequest {
            model: self.config.model_name.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.7,
            max_tokens: 1000,
        };

        debug!(model = %self.config.model_name, "Calling scoring oracle");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Oracle(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Oracle(format!("HTTP {} from oracle", status)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Oracle(format!("Malformed response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Oracle("Empty choices in response".to_string()))
    }

    /// Rate one item on a 0-10 scale with a one-line comment
    pub async fn score_item(&self, title: &str, summary: &str, source: &str) -> Result<Verdict> {
        let snippet: String = summary.chars().take(SNIPPET_CHARS).collect();
        let prompt = format!(
            "Rate the relevance of this research artifact to embodied AI and \
             robot learning on an integer scale of 0-10 and add a one-sentence \
             comment. Respond with a JSON object exactly like \
             {{\"score\": 7, \"comment\": \"...\"}} and nothing else.\n\n\
             Source: {}\nTitle: {}\nAbstract: {}",
            source, title, snippet
        );

        let content = self
            .chat("You are a research assistant for a robotics lab.", prompt)
            .await?;
        parse_verdict(&content)
    }

    /// Multi-paragraph digest of the day's top items
    pub async fn daily_summary(&self, items: &[Item]) -> Result<String> {
        if items.is_empty() {
            return Err(Error::Oracle("No items to summarize".to_string()));
        }

        let mut context = String::new();
        for (i, item) in items.iter().enumerate() {
            let snippet: String = item.summary.chars().take(200).collect();
            context.push_str(&format!(
                "{}. [{}] {}\n   Abstract: {}...\n\n",
                i + 1,
                item.source,
                item.title,
                snippet
            ));
        }

        let prompt = format!(
            "You are an expert researcher in embodied AI and robot learning. \
             Read today's top items and write a daily digest: one sentence on \
             the overall trend, then short comments on the 2-3 most valuable \
             works. Use markdown bold for project names. Keep it under 300 \
             words.\n\n{}",
            context
        );

        self.chat("You are a professional AI research assistant.", prompt)
            .await
    }
}

/// Parse the model's verdict, tolerating markdown code fences around the
/// JSON object. The score is clamped to 0-10.
fn parse_verdict(content: &str) -> Result<Verdict> {
    let trimmed = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let mut verdict: Verdict = serde_json::from_str(trimmed)
        .map_err(|e| Error::Oracle(format!("Unparseable verdict '{}': {}", trimmed, e)))?;
    verdict.score = verdict.score.clamp(0, 10);
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn oracle(base_url: String) -> Oracle {
        let mut config = Config::default();
        config.llm.api_key = "test-key".to_string();
        config.llm.base_url = base_url;
        Oracle::from_config(&config).unwrap().unwrap()
    }

    #[test]
    fn test_from_config_disabled_without_key() {
        let config = Config::default();
        assert!(Oracle::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_parse_verdict() {
        let verdict = parse_verdict(r#"{"score": 8, "comment": "strong"}"#).unwrap();
        assert_eq!(verdict.score, 8);
        assert_eq!(verdict.comment, "strong");

        let fenced = parse_verdict("```json\n{\"score\": 99, \"comment\": \"x\"}\n```").unwrap();
        assert_eq!(fenced.score, 10);

        assert!(parse_verdict("the paper is great").is_err());
    }

    #[tokio::test]
    async fn test_score_item() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant",
                    "content": "{\"score\": 7, \"comment\": \"relevant\"}"}}]
            })))
            .mount(&server)
            .await;

        let oracle = oracle(server.uri());
        let verdict = oracle
            .score_item("Dexterous Grasping", "We grasp things.", "arXiv")
            .await
            .unwrap();
        assert_eq!(verdict.score, 7);
        assert_eq!(verdict.comment, "relevant");
    }

    #[tokio::test]
    async fn test_malformed_response_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "no json here"}}]
            })))
            .mount(&server)
            .await;

        let oracle = oracle(server.uri());
        let err = oracle.score_item("t", "s", "arXiv").await.unwrap_err();
        assert!(matches!(err, Error::Oracle(_)));
    }

    #[tokio::test]
    async fn test_http_error_is_oracle_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let oracle = oracle(server.uri());
        assert!(oracle.score_item("t", "s", "arXiv").await.is_err());
        assert!(oracle.daily_summary(&[]).await.is_err());
    }
}
