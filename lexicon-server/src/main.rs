//! Lexicon word store
//!
//! Serves a dictionary of words and definitions, either as an HTTP API or
//! as an interactive console menu, over a CSV file or a SQLite database.
//!
//! Usage:
//!   lexicon --backend sqlite serve --port 8080
//!   lexicon --backend csv --data words.csv console

use std::{fs::OpenOptions, path::PathBuf, sync::{Arc, Mutex}};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lexicon_server::{build_router, run_console};
use lexicon_storage::{open_repository, Backend, RepositoryConfig};
use lexicon_store::{CsvMirror, SnapshotSink, WordStore};
use lexicon_types::EntryLimits;
use tokio::io::BufReader;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "lexicon")]
#[command(about = "Word and definition store with an HTTP API and a console menu")]
struct Args {
    /// Storage backend (csv or sqlite)
    #[arg(short, long, env = "LEXICON_BACKEND", default_value = "sqlite")]
    backend: Backend,

    /// Data file; defaults to dictionary.csv or dictionary.db
    #[arg(short, long, env = "LEXICON_DATA")]
    data: Option<PathBuf>,

    /// CSV file mirrored after every change
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Run the HTTP API
    Serve {
        /// HTTP port
        #[arg(short, long, env = "SERVER_PORT", default_value = "8080")]
        port: u16,
    },
    /// Run the interactive menu on stdin/stdout
    Console,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.log_file.as_ref())?;

    let mut config = RepositoryConfig::new(args.backend);
    if let Some(data) = &args.data {
        config = config.with_location(data);
    }
    let repo = open_repository(&config).with_context(|| {
        format!(
            "Failed to open {} repository at {:?}",
            config.backend, config.location
        )
    })?;

    let sink = args.snapshot.as_ref().map(|path| {
        info!("Mirroring snapshots to {:?}", path);
        Arc::new(CsvMirror::new(path)) as Arc<dyn SnapshotSink>
    });
    let store = WordStore::open_with_sink(repo, sink)
        .await
        .context("Failed to load dictionary")?;

    let store = match args.mode.unwrap_or(Mode::Console) {
        Mode::Serve { port } => serve(store, port).await?,
        Mode::Console => {
            let stdin = BufReader::new(tokio::io::stdin());
            run_console(&store, EntryLimits::default(), stdin, tokio::io::stdout())
                .await
                .context("Console I/O failed")?;
            store
        }
    };

    store.shutdown().await.context("Failed to close dictionary")?;
    info!("Lexicon stopped");
    Ok(())
}

/// Serves the API until Ctrl-C, then hands the store back for shutdown.
async fn serve(store: WordStore, port: u16) -> Result<WordStore> {
    let backend = store.backend_name();
    let words = store.len().await;
    let store = Arc::new(store);
    let app = build_router(Arc::clone(&store));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind HTTP port {}", port))?;

    println!("\n========================================");
    println!("  Lexicon API Running");
    println!("========================================");
    println!("  Backend:   {}", backend);
    println!("  Words:     {}", words);
    println!("  HTTP Port: {}", port);
    println!("========================================\n");
    info!("HTTP API listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    Arc::try_unwrap(store).map_err(|_| anyhow::anyhow!("Store still in use after server stopped"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

fn init_logging(verbose: bool, log_file: Option<&PathBuf>) -> Result<()> {
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_target(false)
                .compact()
                .init();
        }
    }
    Ok(())
}
