use chrono::Duration;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cw_core::{Error, NewsStore, Result};
use cw_inference::OpenAiModel;
use cw_pipeline::Pipeline;
use cw_scrapers::{sources, SiteScraper};
use cw_storage::{MemoryStore, SqliteStore};
use cw_web::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about = "Cybersecurity news aggregation pipeline", long_about = None)]
struct Cli {
    /// Storage backend: "sqlite" (uses DATABASE_URL) or "memory".
    #[arg(long, default_value = "sqlite")]
    storage: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the ingestion pipeline once.
    Fetch,
    /// Serve the read API, refreshing the pipeline when stale.
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
    },
    /// List stored articles from the last 24 hours.
    Recent,
}

async fn build_store(kind: &str) -> Result<Arc<dyn NewsStore>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        "sqlite" => Ok(Arc::new(SqliteStore::from_env().await?)),
        other => Err(Error::Config(format!("unknown storage backend: {}", other))),
    }
}

fn build_pipeline(store: Arc<dyn NewsStore>) -> Result<Pipeline> {
    let model = Arc::new(OpenAiModel::from_env()?);
    Ok(Pipeline::new(
        Arc::new(SiteScraper::new()),
        model,
        store,
        sources(),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let store = build_store(&cli.storage).await?;

    match cli.command {
        Commands::Fetch => {
            let pipeline = build_pipeline(store)?;
            let summary = pipeline.run().await;
            info!(
                "run complete: {} scraped, {} new",
                summary.scraped, summary.inserted
            );
        }
        Commands::Serve { addr } => {
            let pipeline = build_pipeline(store.clone())?;
            let state = Arc::new(AppState::new(store).with_pipeline(pipeline));

            // Initial fill; later requests re-run the pipeline once the
            // cached batch goes stale.
            state.refresh_if_stale().await;

            let app = cw_web::create_app(state);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("listening on {}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Recent => {
            let articles = store.recent_articles(Duration::hours(24)).await?;
            if articles.is_empty() {
                println!("no articles in the last 24 hours");
            }
            for article in articles {
                println!(
                    "[{}] {} - {} ({} / {})",
                    article.created_at.format("%Y-%m-%d %H:%M"),
                    article.title,
                    article.url,
                    article.category,
                    article.threat_type,
                );
            }
        }
    }

    Ok(())
}
