//! SQL schema and startup migration for the response table.
//!
//! SQLite has no `ADD COLUMN IF NOT EXISTS`, so every step is guarded by a
//! check against the live schema instead. The whole sequence runs in one
//! transaction and ends by recording [`SCHEMA_VERSION`] in
//! `PRAGMA user_version`. Running it against an up-to-date database changes
//! nothing.

use std::fmt;

use rusqlite::{Connection, OptionalExtension as _};
use tutorat_core::schema::{
  self, FIELDS, FieldSpec, MODALITY, PUBLISHED, RETIRED_FIELDS, SCHEMA_VERSION,
  SUBMITTED_AT, TABLE,
};

const MODALITY_INDEX: &str = "idx_modalite";
const SUBMITTED_AT_INDEX: &str = "idx_date_soumission";

/// Quote an identifier; several column names carry non-ASCII characters.
pub fn quote(ident: &str) -> String { format!("\"{}\"", ident.replace('"', "\"\"")) }

// ─── DDL / DML builders ──────────────────────────────────────────────────────

fn column_def(spec: &FieldSpec) -> String {
  let not_null = if spec.kind.column_not_null() { " NOT NULL" } else { "" };
  format!("{} {}{not_null}", quote(spec.name), spec.kind.sql_type())
}

pub fn create_table_sql() -> String {
  let mut columns = vec![format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", quote(schema::ID))];
  columns.extend(FIELDS.iter().map(column_def));
  columns.push(format!("{} TEXT NOT NULL", quote(SUBMITTED_AT)));
  columns.push(format!("{} BOOLEAN NOT NULL DEFAULT 0", quote(PUBLISHED)));
  format!("CREATE TABLE {} (\n  {}\n)", quote(TABLE), columns.join(",\n  "))
}

/// `INSERT` covering every schema field plus the timestamp; parameters are
/// positional in [`FIELDS`] order with the timestamp last.
pub fn insert_sql() -> String {
  let mut columns: Vec<String> = FIELDS.iter().map(|f| quote(f.name)).collect();
  columns.push(quote(SUBMITTED_AT));
  let params: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
  format!(
    "INSERT INTO {} ({}) VALUES ({})",
    quote(TABLE),
    columns.join(", "),
    params.join(", ")
  )
}

pub fn unpublished_sql() -> String {
  let mut columns: Vec<String> = schema::exposed_fields().map(|f| quote(f.name)).collect();
  columns.push(quote(SUBMITTED_AT));
  format!(
    "SELECT {} FROM {table}
     WHERE {modality} = ?1 AND {published} = 0
     ORDER BY {submitted} DESC, {id} DESC",
    columns.join(", "),
    table = quote(TABLE),
    modality = quote(MODALITY),
    published = quote(PUBLISHED),
    submitted = quote(SUBMITTED_AT),
    id = quote(schema::ID),
  )
}

pub fn stats_sql() -> String {
  format!(
    "SELECT {modality},
            COUNT(*) AS total,
            SUM(CASE WHEN {published} = 0 THEN 1 ELSE 0 END) AS non_publies
     FROM {table}
     GROUP BY {modality}
     ORDER BY total DESC, {modality} ASC",
    table = quote(TABLE),
    modality = quote(MODALITY),
    published = quote(PUBLISHED),
  )
}

/// One statement, so a concurrent reader sees either none or all of the
/// modality flipped.
pub fn mark_published_sql() -> String {
  format!(
    "UPDATE {table} SET {published} = 1 WHERE {modality} = ?1 AND {published} = 0",
    table = quote(TABLE),
    modality = quote(MODALITY),
    published = quote(PUBLISHED),
  )
}

// ─── Introspection ───────────────────────────────────────────────────────────

pub fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

pub fn index_exists(conn: &Connection, index: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'index' AND name = ?1",
        [index],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

pub fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
  stmt
    .query_map([table], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()
}

/// Explicitly created indexes (not constraint-backed ones) that cover
/// `column` of `table`.
pub fn indexes_on(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<Vec<String>> {
  let mut list = conn.prepare("SELECT name FROM pragma_index_list(?1) WHERE origin = 'c'")?;
  let candidates = list
    .query_map([table], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()?;

  let mut info = conn.prepare("SELECT 1 FROM pragma_index_info(?1) WHERE name = ?2")?;
  let mut covering = Vec::new();
  for index in candidates {
    if info.exists([index.as_str(), column])? {
      covering.push(index);
    }
  }
  Ok(covering)
}

pub fn schema_version(conn: &Connection) -> rusqlite::Result<i64> {
  conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

// ─── Migration steps ─────────────────────────────────────────────────────────

/// A single idempotent data-definition step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
  CreateTable,
  AddColumn(&'static FieldSpec),
  DropColumn(&'static str),
  CreateIndex { name: &'static str, column: &'static str },
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Step::CreateTable => write!(f, "create table {TABLE}"),
      Step::AddColumn(spec) => write!(f, "add column {}", spec.name),
      Step::DropColumn(name) => write!(f, "drop column {name}"),
      Step::CreateIndex { name, column } => write!(f, "create index {name} on {column}"),
    }
  }
}

impl Step {
  /// Whether the live schema already reflects this step.
  fn is_satisfied(&self, conn: &Connection) -> rusqlite::Result<bool> {
    match self {
      Step::CreateTable => table_exists(conn, TABLE),
      Step::AddColumn(spec) => {
        Ok(table_columns(conn, TABLE)?.iter().any(|c| c == spec.name))
      }
      Step::DropColumn(name) => {
        Ok(!table_columns(conn, TABLE)?.iter().any(|c| c == name))
      }
      Step::CreateIndex { name, .. } => index_exists(conn, name),
    }
  }

  fn apply(&self, conn: &Connection) -> rusqlite::Result<()> {
    if let Step::DropColumn(name) = self {
      // SQLite refuses to drop an indexed column; dependent indexes go first.
      for index in indexes_on(conn, TABLE, name)? {
        conn.execute_batch(&format!("DROP INDEX {}", quote(&index)))?;
        tracing::info!(index = %index, column = %name, "dropped index on retired column");
      }
    }

    let sql = match self {
      Step::CreateTable => create_table_sql(),
      Step::AddColumn(spec) => format!(
        "ALTER TABLE {} ADD COLUMN {} {}",
        quote(TABLE),
        quote(spec.name),
        spec.kind.sql_type()
      ),
      Step::DropColumn(name) => {
        format!("ALTER TABLE {} DROP COLUMN {}", quote(TABLE), quote(name))
      }
      Step::CreateIndex { name, column } => format!(
        "CREATE INDEX {} ON {}({})",
        quote(name),
        quote(TABLE),
        quote(column)
      ),
    };
    conn.execute_batch(&sql)
  }
}

/// The ordered migration plan for the current schema version.
pub fn steps() -> Vec<Step> {
  let mut steps = vec![Step::CreateTable];
  steps.extend(schema::answer_fields().map(Step::AddColumn));
  steps.extend(RETIRED_FIELDS.iter().copied().map(Step::DropColumn));
  steps.push(Step::CreateIndex { name: MODALITY_INDEX, column: MODALITY });
  steps.push(Step::CreateIndex { name: SUBMITTED_AT_INDEX, column: SUBMITTED_AT });
  steps
}

/// Outcome of a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
  /// Descriptions of the steps that changed the schema, in order.
  pub applied: Vec<String>,
  /// Steps that were already reflected in the schema.
  pub skipped: usize,
  /// `user_version` after the run.
  pub version: i64,
}

/// Bring the database to [`SCHEMA_VERSION`].
pub fn migrate(conn: &mut Connection) -> rusqlite::Result<MigrationReport> {
  conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;

  let tx = conn.transaction()?;
  let mut report = MigrationReport::default();

  for step in steps() {
    if step.is_satisfied(&tx)? {
      tracing::debug!(step = %step, "migration step already applied");
      report.skipped += 1;
      continue;
    }
    step
      .apply(&tx)
      .inspect_err(|e| tracing::error!(step = %step, error = %e, "migration step failed"))?;
    tracing::info!(step = %step, "applied migration step");
    report.applied.push(step.to_string());
  }

  tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
  tx.commit()?;

  report.version = schema_version(conn)?;
  Ok(report)
}
