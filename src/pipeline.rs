//! Pipeline orchestrator: adapters -> dedup -> tagging -> oracle ->
//! store -> snapshot -> notification.
//!
//! Failure isolation is the whole job here: a dead source or a broken
//! oracle degrades the run, only persistence errors abort it.

use crate::config::Config;
use crate::dedup;
use crate::error::Result;
use crate::models::Item;
use crate::notify::{render_report, Mailer};
use crate::oracle::{degraded_verdict, Oracle};
use crate::scrape::{ArxivAdapter, Fetcher, GithubAdapter, HuggingFaceAdapter, SourceAdapter};
use crate::snapshot::{distinct_tags, Snapshot};
use crate::store::ItemStore;
use crate::tag;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Items included in the daily summary and emailed digest
const REPORT_TOP_N: usize = 5;

/// Outcome of one pipeline run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// (source name, items collected) per adapter, in run order
    pub source_counts: Vec<(String, usize)>,
    /// Sources that returned an error and were isolated
    pub degraded_sources: Vec<String>,
    pub items_ingested: usize,
    pub tags: Vec<String>,
    pub oracle_used: bool,
    pub oracle_failures: usize,
    pub summary_generated: bool,
    pub email_sent: bool,
}

/// Run the full ingestion pipeline once
pub async fn run_pipeline(config: &Config, store: &ItemStore) -> Result<RunReport> {
    let mut report = RunReport::default();

    // 1. Scrape all sources; one failing adapter never aborts the others
    let fetcher = Fetcher::new(&config.http)?;
    let adapters: Vec<Box<dyn SourceAdapter>> = vec![
        Box::new(ArxivAdapter::new(config, fetcher.clone())),
        Box::new(GithubAdapter::new(config, fetcher.clone())),
        Box::new(HuggingFaceAdapter::new(config, fetcher)),
    ];

    let mut collected: Vec<Item> = Vec::new();
    for adapter in &adapters {
        let name = adapter.name().to_string();
        match adapter.scrape().await {
            Ok(batch) => {
                report.source_counts.push((name, batch.len()));
                collected.extend(batch);
            }
            Err(e) => {
                warn!(source = %name, error = %e, "Adapter failed, continuing with empty batch");
                report.source_counts.push((name.clone(), 0));
                report.degraded_sources.push(name);
            }
        }
    }

    // 2. Batch dedup: exact id first (last wins), then near-duplicate titles
    let mut items = dedup::collapse_near_titles(dedup::collapse_by_id(collected));

    // 3. Tagging, source-agnostic
    for item in &mut items {
        item.tags = tag::tags(&item.text());
    }

    // 4. Oracle scoring; failures degrade per item, never the run
    let oracle = Oracle::from_config(config)?;
    report.oracle_used = oracle.is_some();
    if let Some(oracle) = &oracle {
        for item in &mut items {
            let verdict = match oracle
                .score_item(&item.title, &item.summary, &item.source)
                .await
            {
                Ok(verdict) => verdict,
                Err(e) => {
                    warn!(id = %item.id, error = %e, "Oracle scoring failed, using fallback");
                    report.oracle_failures += 1;
                    degraded_verdict()
                }
            };
            item.score = Some(verdict.score);
            item.comment = Some(verdict.comment);
        }
    }

    // 5. Persist. Storage errors are fatal for the run.
    for item in &items {
        store.upsert(item).await?;
    }
    report.items_ingested = items.len();
    report.tags = distinct_tags(&items);

    // 6. Daily summary over the top items, best effort
    let mut top: Vec<Item> = items.clone();
    top.sort_by_key(|item| std::cmp::Reverse(item.score.unwrap_or(i64::MIN)));
    top.truncate(REPORT_TOP_N);

    let summary = match &oracle {
        Some(oracle) if !top.is_empty() => match oracle.daily_summary(&top).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(error = %e, "Daily summary unavailable");
                None
            }
        },
        _ => None,
    };
    report.summary_generated = summary.is_some();

    // 7. Snapshot for the dashboard
    Snapshot::build(items, summary.clone()).write(&config.paths.snapshot_file)?;

    // 8. Optional email digest, log-and-continue on failure
    if let Some(mailer) = Mailer::from_config(&config.notification.email) {
        let rendered = render_report(&top, summary.as_deref());
        match mailer.send(&rendered).await {
            Ok(()) => report.email_sent = true,
            Err(e) => warn!(error = %e, "Digest email failed"),
        }
    }

    info!(
        ingested = report.items_ingested,
        degraded = report.degraded_sources.len(),
        "Pipeline run complete"
    );
    Ok(report)
}
