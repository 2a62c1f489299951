//! arXiv paper-index adapter (Atom feed)

use crate::config::{Config, InterestScoringConfig};
use crate::error::Result;
use crate::models::{clean_text, Item, ItemKind};
use crate::scrape::{Fetcher, SourceAdapter};
use crate::tag;
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{info, warn};

const SOURCE: &str = "arXiv";

/// Fixed category filter appended to every query
const CATEGORY_FILTER: &str = "(cat:cs.RO OR cat:cs.AI OR cat:cs.CV)";

/// One `<entry>` of the Atom feed, before normalization
#[derive(Debug, Default, Clone)]
struct FeedEntry {
    id: String,
    title: String,
    summary: String,
    published: String,
    authors: Vec<String>,
    pdf_url: String,
}

/// Which text node we are currently inside
#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Id,
    Title,
    Summary,
    Published,
    AuthorName,
}

/// Parse the Atom feed into raw entries. Only fails on malformed XML;
/// incomplete entries are filtered later, per-record.
fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut entry: Option<FeedEntry> = None;
    let mut field: Option<Field> = None;
    let mut in_author = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"entry" => {
                    entry = Some(FeedEntry::default());
                    field = None;
                }
                b"author" if entry.is_some() => {
                    in_author = true;
                    field = None;
                }
                b"name" if in_author => field = Some(Field::AuthorName),
                b"id" if entry.is_some() && !in_author => field = Some(Field::Id),
                b"title" if entry.is_some() => field = Some(Field::Title),
                b"summary" if entry.is_some() => field = Some(Field::Summary),
                b"published" if entry.is_some() => field = Some(Field::Published),
                _ => field = None,
            },
            Event::Text(t) => {
                if let (Some(entry), Some(field)) = (entry.as_mut(), field) {
                    let text = t.unescape().map_err(quick_xml::Error::from)?;
                    match field {
                        Field::Id => entry.id.push_str(&text),
                        Field::Title => entry.title.push_str(&text),
                        Field::Summary => entry.summary.push_str(&text),
                        Field::Published => entry.published.push_str(&text),
                        Field::AuthorName => entry.authors.push(text.to_string()),
                    }
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"entry" => {
                    if let Some(done) = entry.take() {
                        entries.push(done);
                    }
                }
                b"author" => in_author = false,
                _ => field = None,
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}

/// Pull the PDF-typed link hrefs out of the feed, keyed by entry order.
/// Links are self-closing `<link ... title="pdf" href="..."/>` elements,
/// handled in a second pass so the main state machine stays simple.
fn attach_pdf_links(xml: &str, entries: &mut [FeedEntry]) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entry_index: isize = -1;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"entry" => entry_index += 1,
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"link" => {
                if entry_index < 0 || entry_index as usize >= entries.len() {
                    continue;
                }
                let is_pdf = e
                    .try_get_attribute("title")
                    .map_err(quick_xml::Error::from)?
                    .map(|a| a.value.as_ref() == b"pdf")
                    .unwrap_or(false);
                if !is_pdf {
                    continue;
                }
                if let Some(href) = e
                    .try_get_attribute("href")
                    .map_err(quick_xml::Error::from)?
                {
                    let value = href.unescape_value().map_err(quick_xml::Error::from)?;
                    entries[entry_index as usize].pdf_url = value.to_string();
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(())
}

/// Paper-index adapter over the arXiv export API
pub struct ArxivAdapter {
    fetcher: Fetcher,
    base_url: String,
    keywords: Vec<String>,
    max_results: usize,
    scoring: InterestScoringConfig,
}

impl ArxivAdapter {
    pub fn new(config: &Config, fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            base_url: config.endpoints.arxiv.clone(),
            keywords: config.keywords.clone(),
            max_results: config.max_arxiv,
            scoring: config.interest_scoring.clone(),
        }
    }

    /// OR of quoted keyword terms AND the fixed category filter
    fn build_query(&self) -> String {
        let terms: Vec<String> = self
            .keywords
            .iter()
            .map(|k| format!("all:\"{}\"", k))
            .collect();
        format!("{} AND {}", terms.join(" OR "), CATEGORY_FILTER)
    }

    fn entry_to_item(&self, entry: FeedEntry) -> Option<Item> {
        // Entries without an /abs/ id segment or a title are unusable
        let external_id = match entry.id.split_once("/abs/") {
            Some((_, tail)) if !tail.is_empty() => tail.to_string(),
            _ => return None,
        };
        if entry.title.is_empty() {
            return None;
        }

        let mut item = Item::new(format!("arxiv:{}", external_id), ItemKind::Paper, SOURCE);
        item.title = clean_text(&entry.title);
        item.summary = clean_text(&entry.summary);
        item.author = entry
            .authors
            .iter()
            .take(3)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        item.date = entry.published.get(..10).unwrap_or_default().to_string();
        item.url = entry.pdf_url;
        item.score = Some(tag::interest_score(&item.text(), &self.scoring));
        Some(item)
    }
}

#[async_trait]
impl SourceAdapter for ArxivAdapter {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn scrape(&self) -> Result<Vec<Item>> {
        let query = [
            ("search_query", self.build_query()),
            ("start", "0".to_string()),
            ("max_results", self.max_results.to_string()),
            ("sortBy", "submittedDate".to_string()),
            ("sortOrder", "descending".to_string()),
        ];

        let response = match self.fetcher.get_with_backoff(&self.base_url, &query).await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "arXiv fetch failed, returning empty batch");
                return Ok(Vec::new());
            }
        };
        let body = response.text().await.unwrap_or_default();

        let mut entries = match parse_feed(&body) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "arXiv feed unparseable, returning empty batch");
                return Ok(Vec::new());
            }
        };
        if let Err(e) = attach_pdf_links(&body, &mut entries) {
            warn!(error = %e, "Failed to extract PDF links");
        }

        let total = entries.len();
        let items: Vec<Item> = entries
            .into_iter()
            .filter_map(|entry| {
                let id = entry.id.clone();
                let item = self.entry_to_item(entry);
                if item.is_none() {
                    warn!(entry_id = %id, "Skipping malformed arXiv entry");
                }
                item
            })
            .collect();

        info!(collected = items.len(), total, "arXiv scrape complete");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use wiremock::matchers::{method, query_param_contains};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query Results</title>
  <entry>
    <id>http://arxiv.org/abs/2501.01234v1</id>
    <title>Dexterous Grasping
 with Diffusion Policy</title>
    <summary>We present a dexterous
 manipulation method.</summary>
    <published>2026-08-20T12:00:00Z</published>
    <author><name>Ada Lovelace</name></author>
    <author><name>Alan Turing</name></author>
    <link href="http://arxiv.org/abs/2501.01234v1" rel="alternate" type="text/html"/>
    <link href="http://arxiv.org/pdf/2501.01234v1" rel="related" title="pdf" type="application/pdf"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2501.09999v2</id>
    <title>Quadruped Locomotion Survey</title>
    <summary>Walking robots.</summary>
    <published>2026-08-19T08:30:00Z</published>
    <author><name>Grace Hopper</name></author>
  </entry>
  <entry>
    <id>http://example.org/not-a-paper</id>
    <title>Broken Entry</title>
    <summary>Missing the abs id segment.</summary>
    <published>2026-08-18T00:00:00Z</published>
  </entry>
</feed>"#;

    fn adapter(base_url: String) -> ArxivAdapter {
        let mut config = Config::default();
        config.endpoints.arxiv = base_url;
        config.keywords = vec!["grasping".to_string(), "locomotion".to_string()];
        let fetcher = Fetcher::new(&HttpConfig {
            timeout_secs: 5,
            backoff_base_ms: 1,
        })
        .unwrap();
        ArxivAdapter::new(&config, fetcher)
    }

    #[test]
    fn test_build_query() {
        let adapter = adapter("http://unused".to_string());
        assert_eq!(
            adapter.build_query(),
            "all:\"grasping\" OR all:\"locomotion\" AND (cat:cs.RO OR cat:cs.AI OR cat:cs.CV)"
        );
    }

    #[test]
    fn test_parse_feed() {
        let entries = parse_feed(FEED).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].id, "http://arxiv.org/abs/2501.01234v1");
        assert_eq!(entries[0].authors, vec!["Ada Lovelace", "Alan Turing"]);
        assert_eq!(entries[1].published, "2026-08-19T08:30:00Z");
    }

    #[test]
    fn test_attach_pdf_links() {
        let mut entries = parse_feed(FEED).unwrap();
        attach_pdf_links(FEED, &mut entries).unwrap();
        assert_eq!(entries[0].pdf_url, "http://arxiv.org/pdf/2501.01234v1");
        // No pdf link defaults to empty string
        assert_eq!(entries[1].pdf_url, "");
    }

    #[tokio::test]
    async fn test_scrape_normalizes_and_skips_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param_contains("search_query", "grasping"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .mount(&server)
            .await;

        let adapter = adapter(server.uri());
        let items = adapter.scrape().await.unwrap();

        // The entry without an /abs/ id is skipped
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "arxiv:2501.01234v1");
        assert_eq!(items[0].title, "Dexterous Grasping with Diffusion Policy");
        assert_eq!(items[0].summary, "We present a dexterous manipulation method.");
        assert_eq!(items[0].author, "Ada Lovelace, Alan Turing");
        assert_eq!(items[0].date, "2026-08-20");
        assert_eq!(items[0].url, "http://arxiv.org/pdf/2501.01234v1");
        assert!(items[0].tags.is_empty());
        assert!(items[0].score.is_some());
        assert_eq!(items[1].id, "arxiv:2501.09999v2");
        assert_eq!(items[1].url, "");
    }

    #[tokio::test]
    async fn test_scrape_degrades_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let adapter = adapter(server.uri());
        let items = adapter.scrape().await.unwrap();
        assert!(items.is_empty());
    }
}
