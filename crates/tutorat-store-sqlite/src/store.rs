//! [`SqliteStore`] — the SQLite implementation of [`ResponseStore`].

use std::path::Path;

use tutorat_core::{
  response::{ModalityStats, Response, ResponseView},
  store::ResponseStore,
  submission::Submission,
};

use crate::{
  Result,
  encode::{RawResponseView, encode_dt, now},
  schema::{self, MigrationReport},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A response store backed by a single SQLite database.
///
/// Construct it once at startup; construction runs the schema migration, so
/// a handle that exists is a handle to an up-to-date schema. Cloning is
/// cheap — the inner connection is reference-counted. Call
/// [`SqliteStore::close`] at shutdown.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and migrate it.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::from_connection(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::from_connection(conn).await
  }

  /// Wrap an already-open connection and migrate it.
  pub async fn from_connection(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let store = Self { conn };
    store.migrate().await?;
    Ok(store)
  }

  /// Run the idempotent schema migration. Safe to call repeatedly.
  pub async fn migrate(&self) -> Result<MigrationReport> {
    let report = self
      .conn
      .call(|conn| Ok(schema::migrate(conn)?))
      .await?;
    tracing::info!(
      version = report.version,
      applied = report.applied.len(),
      skipped = report.skipped,
      "response schema ready"
    );
    Ok(report)
  }

  /// Close the underlying connection, waiting for queued statements.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }
}

// ─── ResponseStore impl ──────────────────────────────────────────────────────

impl ResponseStore for SqliteStore {
  type Error = crate::Error;

  async fn insert(&self, submission: Submission) -> Result<Response> {
    let submitted_at = now();

    let mut values = submission.clone().into_values();
    values.push(encode_dt(submitted_at));

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(&schema::insert_sql(), rusqlite::params_from_iter(values))?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Response { id, submission, submitted_at, published: false })
  }

  async fn get_unpublished(&self, modality: String) -> Result<Vec<ResponseView>> {
    let raws: Vec<RawResponseView> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&schema::unpublished_sql())?;
        let rows = stmt
          .query_map(rusqlite::params![modality], RawResponseView::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawResponseView::into_view).collect()
  }

  async fn get_stats(&self) -> Result<Vec<ModalityStats>> {
    let stats = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&schema::stats_sql())?;
        let rows = stmt
          .query_map([], |row| {
            Ok(ModalityStats {
              modality:    row.get(0)?,
              total:       row.get::<_, i64>(1)? as u64,
              unpublished: row.get::<_, i64>(2)? as u64,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(stats)
  }

  async fn mark_published(&self, modality: String) -> Result<u64> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(&schema::mark_published_sql(), rusqlite::params![modality])?)
      })
      .await?;

    Ok(changed as u64)
  }
}
