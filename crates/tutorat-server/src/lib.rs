//! Process-level wiring for the questionnaire service: configuration and
//! the top-level router (API, CORS, static files, request tracing).

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Router,
  http::{Method, header},
};
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;
use tower_http::{
  cors::{Any, CorsLayer},
  services::ServeDir,
  trace::TraceLayer,
};
use tutorat_core::store::ResponseStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Layered as built-in defaults, then the optional TOML file, then the
/// optional `.env` file, then the process environment (`HOST`, `PORT`,
/// `DATABASE_URL`, `STATIC_DIR`). As with dotenv, a variable already set in
/// the process wins over the same key in `.env`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  /// SQLite file path, optionally prefixed with `sqlite://` or `sqlite:`.
  pub database_url: String,
  /// Directory served for every path outside `/api`.
  pub static_dir:   PathBuf,
}

type Builder = config::ConfigBuilder<DefaultState>;

impl ServerConfig {
  /// Load from `file` and `env_file` (each only if it exists) and the
  /// process environment.
  pub fn load(file: &Path, env_file: &Path) -> Result<Self, ConfigError> {
    Self::from_builder(
      Self::defaults()?
        .add_source(File::from(file).required(false))
        .add_source(dotenv_source(env_file)?)
        .add_source(Environment::default().try_parsing(true)),
    )
  }

  fn defaults() -> Result<Builder, ConfigError> {
    Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 3000)?
      .set_default("database_url", "questionnaire.db")?
      .set_default("static_dir", "public")
  }

  fn from_builder(builder: Builder) -> Result<Self, ConfigError> {
    builder.build()?.try_deserialize()
  }

  /// The filesystem path (or `:memory:`) named by `database_url`.
  pub fn database_path(&self) -> &str {
    let url = self.database_url.as_str();
    url
      .strip_prefix("sqlite://")
      .or_else(|| url.strip_prefix("sqlite:"))
      .unwrap_or(url)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// The variables of a dotenv file as a config source, read without touching
/// the process environment. A missing file yields an empty source.
fn dotenv_source(path: &Path) -> Result<Environment, ConfigError> {
  let vars: config::Map<String, String> = match dotenvy::from_path_iter(path) {
    Ok(iter) => iter
      .collect::<Result<_, _>>()
      .map_err(|e| ConfigError::Foreign(Box::new(e)))?,
    Err(e) if e.not_found() => config::Map::new(),
    Err(e) => return Err(ConfigError::Foreign(Box::new(e))),
  };
  Ok(Environment::default().source(Some(vars)).try_parsing(true))
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router: the JSON API under `/api`, static
/// files from `static_dir` for everything else.
pub fn app<S>(store: Arc<S>, static_dir: &Path) -> Router
where
  S: ResponseStore + 'static,
{
  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allow_headers([header::CONTENT_TYPE]);

  Router::new()
    .nest("/api", tutorat_api::api_router(store))
    .fallback_service(ServeDir::new(static_dir))
    .layer(cors)
    .layer(TraceLayer::new_for_http())
}
