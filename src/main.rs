//! paperscout CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use paperscout::{
    config::Config,
    error::{Error, Result},
    models::{Item, UserStatePatch},
    pipeline::{run_pipeline, RunReport},
    store::ItemStore,
};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "paperscout")]
#[command(version, about = "Research artifact monitor: papers, repos and model releases", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config and create the item database
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Run the ingestion pipeline once
    Run,

    /// List stored items
    List {
        /// Minimum score
        #[arg(short = 's', long, default_value = "0")]
        min_score: i64,

        /// Maximum number of items
        #[arg(short, long, default_value = "50")]
        limit: i64,
    },

    /// Full-text search over titles, abstracts and comments
    Search {
        /// The search query
        query: String,

        /// Maximum number of items
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Update read/star/notes state of an item
    Mark {
        /// Item id (e.g. arxiv:2501.01234v1)
        id: String,

        /// Mark as read
        #[arg(long, conflicts_with = "unread")]
        read: bool,

        /// Mark as unread
        #[arg(long)]
        unread: bool,

        /// Star the item
        #[arg(long, conflicts_with = "unstar")]
        star: bool,

        /// Unstar the item
        #[arg(long)]
        unstar: bool,

        /// Set personal notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("paperscout=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("paperscout=info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn load_config(path: &Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::load(&Config::default_config_path()),
    }
}

async fn open_store(config: &Config) -> Result<ItemStore> {
    if !config.paths.db_file.exists() {
        return Err(Error::NotInitialized);
    }
    ItemStore::connect(&config.paths.db_file).await
}

fn print_items(items: &[Item], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }

    for item in items {
        let score = item.score.map_or("-".to_string(), |s| s.to_string());
        let star = if item.is_star { "*" } else { " " };
        let read = if item.is_read { "r" } else { " " };
        println!(
            "[{}{}] {:>2}  {}  {}  ({})",
            star, read, score, item.date, item.title, item.id
        );
        if !item.tags.is_empty() {
            println!("       tags: {}", item.tags.join(", "));
        }
        if let Some(comment) = &item.comment {
            println!("       {}", comment);
        }
    }
    println!("\n{} item(s)", items.len());
    Ok(())
}

fn print_run_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("\nPipeline run complete\n");
    for (source, count) in &report.source_counts {
        println!("  {}: {} item(s)", source, count);
    }
    println!("\nIngested: {}", report.items_ingested);
    println!("Tags: {}", report.tags.join(", "));
    if report.oracle_used {
        println!(
            "Oracle: scored {} item(s), {} fallback(s)",
            report.items_ingested, report.oracle_failures
        );
    }
    if !report.degraded_sources.is_empty() {
        println!("Degraded sources: {}", report.degraded_sources.join(", "));
    }
    if report.email_sent {
        println!("Digest email sent");
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { force } => {
            let base_dir = cli
                .config
                .as_ref()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            let config = Config::load_from(base_dir)?;
            if config.paths.config_file.exists() && !force {
                return Err(Error::Config(format!(
                    "Already initialized at {} (use --force to overwrite)",
                    config.paths.config_file.display()
                )));
            }
            config.save()?;
            let store = ItemStore::connect(&config.paths.db_file).await?;
            store.init_schema().await?;
            println!("Initialized at {}", config.paths.base_dir.display());
            Ok(())
        }

        Commands::Run => {
            let config = load_config(&cli.config)?;
            let store = open_store(&config).await?;
            store.init_schema().await?;
            let report = run_pipeline(&config, &store).await?;
            print_run_report(&report, cli.json)
        }

        Commands::List { min_score, limit } => {
            let config = load_config(&cli.config)?;
            let store = open_store(&config).await?;
            let items = store.fetch(min_score, limit).await?;
            print_items(&items, cli.json)
        }

        Commands::Search { query, limit } => {
            let config = load_config(&cli.config)?;
            let store = open_store(&config).await?;
            let items = store.search(&query, limit).await?;
            print_items(&items, cli.json)
        }

        Commands::Mark {
            id,
            read,
            unread,
            star,
            unstar,
            notes,
        } => {
            let config = load_config(&cli.config)?;
            let store = open_store(&config).await?;

            let patch = UserStatePatch {
                is_read: read.then_some(true).or(unread.then_some(false)),
                is_star: star.then_some(true).or(unstar.then_some(false)),
                notes,
            };
            if patch.is_empty() {
                return Err(Error::Config(
                    "Nothing to update: pass --read/--unread, --star/--unstar or --notes"
                        .to_string(),
                ));
            }
            store.update_user_state(&id, &patch).await?;
            println!("Updated {}", id);
            Ok(())
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
