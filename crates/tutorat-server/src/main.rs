//! tutorat-server binary.
//!
//! Loads configuration, opens and migrates the SQLite store, then serves the
//! questionnaire API and form over HTTP until interrupted.
//!
//! ```text
//! DATABASE_URL=sqlite://questionnaire.db PORT=3000 cargo run -p tutorat-server
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use tokio::{net::TcpListener, signal};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tutorat_server::ServerConfig;
use tutorat_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Tutoring questionnaire server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Path to a dotenv file; process variables take precedence over it.
  #[arg(long, default_value = ".env")]
  env_file: PathBuf,

  /// Migrate the database schema and exit without serving.
  #[arg(long)]
  migrate_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = ServerConfig::load(&cli.config, &cli.env_file)
    .context("failed to load configuration")?;

  // Opening the store migrates it; a failed migration aborts startup.
  let db_path = cfg.database_path().to_owned();
  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open store at {db_path:?}"))?;

  if cli.migrate_only {
    store.close().await.context("failed to close store")?;
    return Ok(());
  }

  if !cfg.static_dir.is_dir() {
    tracing::warn!(static_dir = ?cfg.static_dir, "static directory not found; only the API is served");
  }

  let app = tutorat_server::app(Arc::new(store.clone()), &cfg.static_dir);
  let address = cfg.address();

  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!(%address, "listening");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  store.close().await.context("failed to close store")?;
  tracing::info!("shut down");

  Ok(())
}

/// Resolve on Ctrl-C or, on unix, SIGTERM.
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for Ctrl-C");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
  tracing::info!("shutdown requested");
}
