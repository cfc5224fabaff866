//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed microsecond
//! width, so lexical column order equals chronological order.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use tutorat_core::{
  response::{Answers, ResponseView},
  schema::{self, ANSWER_COUNT},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from the synthesis projection.
pub struct RawResponseView {
  pub city:           String,
  pub institution:    String,
  pub answers:        [Option<String>; ANSWER_COUNT],
  pub suggestion:     String,
  pub positive_point: String,
  pub submitted_at:   String,
}

impl RawResponseView {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    let mut answers: [Option<String>; ANSWER_COUNT] = Default::default();
    for (slot, spec) in answers.iter_mut().zip(schema::answer_fields()) {
      *slot = row.get(spec.name)?;
    }
    Ok(Self {
      city: row.get(schema::CITY)?,
      institution: row.get(schema::INSTITUTION)?,
      answers,
      suggestion: row.get(schema::SUGGESTION)?,
      positive_point: row.get(schema::POSITIVE_POINT)?,
      submitted_at: row.get(schema::SUBMITTED_AT)?,
    })
  }

  pub fn into_view(self) -> Result<ResponseView> {
    Ok(ResponseView {
      city:           self.city,
      institution:    self.institution,
      answers:        Answers(self.answers),
      suggestion:     self.suggestion,
      positive_point: self.positive_point,
      submitted_at:   decode_dt(&self.submitted_at)?,
    })
  }
}
