pub mod clients;
pub mod config;
pub mod models;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use clients::{DocStoreClient, TmdbClient};
pub use config::Config;
use services::{HostedAnalyticsStore, SearchOrchestrator};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Reused by both outbound clients to enable connection pooling.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent("Reelsearch/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Wires the collaborators together from an already-validated config.
#[must_use]
pub fn build_orchestrator(config: &Config, http_client: reqwest::Client) -> SearchOrchestrator {
    let catalog = Arc::new(TmdbClient::new(config.catalog.clone(), http_client.clone()));
    let docstore = Arc::new(DocStoreClient::new(config.analytics.clone(), http_client));
    let analytics = Arc::new(HostedAnalyticsStore::new(
        docstore,
        config.catalog.image_base_url.clone(),
    ));

    SearchOrchestrator::new(
        catalog,
        analytics,
        Duration::from_millis(config.search.debounce_ms),
        config.search.trending_limit,
    )
}

/// Startup sequence: the trending load plus an initial discover-mode
/// fetch, so the display is populated before the first keystroke.
pub async fn initial_load(orchestrator: &SearchOrchestrator) {
    orchestrator.on_startup().await;
    orchestrator.on_query_changed("").await;
    orchestrator.settle().await;
}

pub async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.get(1).is_some_and(|a| a == "init" || a == "--init") {
        if Config::create_default_if_missing()? {
            println!("✓ Config file created. Edit config.toml and run again.");
        } else {
            println!("config.toml already exists, leaving it untouched.");
        }
        return Ok(());
    }

    let config = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    config.validate()?;

    let http_client = build_shared_http_client(config.general.request_timeout_seconds.into())?;
    let orchestrator = build_orchestrator(&config, http_client);

    info!("Loading trending searches and popular movies");
    initial_load(&orchestrator).await;
    print_trending(&orchestrator).await;
    print_results(&orchestrator).await;

    println!("Type a movie title to search (empty line for popular movies, Ctrl-D to quit):");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let query = line.trim();

        orchestrator.on_query_changed(query).await;
        orchestrator.settle().await;

        print_results(&orchestrator).await;
    }

    Ok(())
}

async fn print_trending(orchestrator: &SearchOrchestrator) {
    let state = orchestrator.snapshot().await;

    if state.trending.is_empty() {
        return;
    }

    println!("Trending searches:");
    for (index, record) in state.trending.iter().enumerate() {
        println!(
            "  {}. {} ({} searches)",
            index + 1,
            record.search_term,
            record.count
        );
    }
    println!();
}

async fn print_results(orchestrator: &SearchOrchestrator) {
    let state = orchestrator.snapshot().await;

    if let Some(message) = &state.error_message {
        println!("✗ {message}");
        return;
    }

    if state.results.is_empty() {
        println!("No movies found.");
        return;
    }

    for movie in state.results.iter().take(10) {
        println!("  {} (id {})", movie.title, movie.id);
    }
    println!();
}
