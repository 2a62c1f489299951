//! paperscout: a research artifact monitor
//!
//! Continuously harvests papers, code repositories and model releases,
//! scores and tags them, deduplicates, and persists everything into a
//! SQLite feed with a JSON snapshot for the dashboard.

pub mod config;
pub mod dedup;
pub mod error;
pub mod models;
pub mod notify;
pub mod oracle;
pub mod pipeline;
pub mod scrape;
pub mod snapshot;
pub mod store;
pub mod tag;
