//! Persisted responses and the read models built from them.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
  schema::{self, ANSWER_COUNT},
  submission::Submission,
};

// ─── Stored record ───────────────────────────────────────────────────────────

/// A submission as persisted by a store.
///
/// `id` and `submitted_at` are assigned by the store. `published` starts out
/// `false` and only ever moves to `true`, in bulk, per modality.
#[derive(Debug, Clone)]
pub struct Response {
  pub id:           i64,
  pub submission:   Submission,
  pub submitted_at: DateTime<Utc>,
  pub published:    bool,
}

// ─── Synthesis read model ────────────────────────────────────────────────────

/// The nine answer codes, in question order.
///
/// Rows written before the answer columns existed read back as `None`.
/// Serialises as a map keyed by the answer field names so it can be
/// flattened into [`ResponseView`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers(pub [Option<String>; ANSWER_COUNT]);

impl Answers {
  pub fn get(&self, name: &str) -> Option<&str> {
    schema::answer_fields()
      .position(|f| f.name == name)
      .and_then(|i| self.0[i].as_deref())
  }
}

impl Serialize for Answers {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(ANSWER_COUNT))?;
    for (spec, value) in schema::answer_fields().zip(&self.0) {
      map.serialize_entry(spec.name, value)?;
    }
    map.end()
  }
}

/// The public projection of an unpublished response returned by synthesis
/// reads. The identifier and the publication flag are never exposed.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseView {
  #[serde(rename = "ville")]
  pub city:           String,
  #[serde(rename = "etablissement")]
  pub institution:    String,
  #[serde(flatten)]
  pub answers:        Answers,
  pub suggestion:     String,
  #[serde(rename = "point_positif")]
  pub positive_point: String,
  #[serde(rename = "date_soumission")]
  pub submitted_at:   DateTime<Utc>,
}

// ─── Statistics ──────────────────────────────────────────────────────────────

/// Per-modality counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalityStats {
  #[serde(rename = "modalite")]
  pub modality:    String,
  pub total:       u64,
  #[serde(rename = "non_publies")]
  pub unpublished: u64,
}
