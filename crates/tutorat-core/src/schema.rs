//! The declarative questionnaire schema.
//!
//! [`FIELDS`] lists every caller-supplied column of a response, in storage
//! order. The required-field set, the insert column list, the table DDL, the
//! add-column migration steps and the synthesis projection are all derived
//! from it, so they cannot drift apart.

/// Name of the single table holding responses.
pub const TABLE: &str = "questionnaire_reponses";

pub const ID: &str = "id";
pub const CITY: &str = "ville";
pub const INSTITUTION: &str = "etablissement";
pub const MODALITY: &str = "modalite";
pub const SUGGESTION: &str = "suggestion";
pub const POSITIVE_POINT: &str = "point_positif";
/// Store-assigned; never accepted from the caller.
pub const SUBMITTED_AT: &str = "date_soumission";
/// Store-managed; flipped only by the publication marker.
pub const PUBLISHED: &str = "publie_dans_synthese";

/// Columns from earlier schema versions that the migration removes.
pub const RETIRED_FIELDS: &[&str] = &["aspect_moins_clair"];

/// Number of Likert/categorical answer fields in the current schema.
pub const ANSWER_COUNT: usize = 9;

/// Current schema version, recorded in the store after migration.
/// Version 1 was the single free-text "least clear aspect" layout.
pub const SCHEMA_VERSION: i64 = 2;

// ─── Field kinds ─────────────────────────────────────────────────────────────

/// The shape of a field's value; drives column type and length limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  /// Short free text such as a city name.
  ShortText,
  /// Categorical text used as an aggregation key.
  Category,
  /// A short enumerated answer code (`oui`, `non`, `na`, ...).
  Answer,
  /// Unbounded free text.
  FreeText,
}

impl FieldKind {
  /// SQL column type used when creating or adding the column.
  pub fn sql_type(self) -> &'static str {
    match self {
      FieldKind::ShortText => "VARCHAR(255)",
      FieldKind::Category => "VARCHAR(100)",
      FieldKind::Answer => "VARCHAR(10)",
      FieldKind::FreeText => "TEXT",
    }
  }

  /// Maximum length in characters, if bounded.
  pub fn max_len(self) -> Option<usize> {
    match self {
      FieldKind::ShortText => Some(255),
      FieldKind::Category => Some(100),
      FieldKind::Answer => Some(10),
      FieldKind::FreeText => None,
    }
  }

  /// Answer columns were added to tables that already held rows, so they
  /// cannot carry a `NOT NULL` constraint.
  pub fn column_not_null(self) -> bool { !matches!(self, FieldKind::Answer) }
}

// ─── Field list ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
  /// Wire name and column name.
  pub name:     &'static str,
  pub kind:     FieldKind,
  pub required: bool,
  /// Whether the field appears in synthesis reads.
  pub exposed:  bool,
}

const fn field(name: &'static str, kind: FieldKind, exposed: bool) -> FieldSpec {
  FieldSpec { name, kind, required: true, exposed }
}

/// Every caller-supplied field of the current schema, in storage order.
pub const FIELDS: &[FieldSpec] = &[
  field(CITY, FieldKind::ShortText, true),
  field(INSTITUTION, FieldKind::ShortText, true),
  field(MODALITY, FieldKind::Category, false),
  field("q1_accueil", FieldKind::Answer, true),
  field("q2_adaptation_tuteur", FieldKind::Answer, true),
  field("q3_tuteur_attitré", FieldKind::Answer, true),
  field("q4_changement_tuteur", FieldKind::Answer, true),
  field("q5_missions_claires", FieldKind::Answer, true),
  field("q6_communication", FieldKind::Answer, true),
  field("q7_suivi_retours", FieldKind::Answer, true),
  field("q8_reconnaissance", FieldKind::Answer, true),
  field("q9_autre_aspect", FieldKind::Answer, true),
  field(SUGGESTION, FieldKind::FreeText, true),
  field(POSITIVE_POINT, FieldKind::FreeText, true),
];

/// Fields a submission must carry.
pub fn required_fields() -> impl Iterator<Item = &'static FieldSpec> {
  FIELDS.iter().filter(|f| f.required)
}

/// The answer fields, in question order.
pub fn answer_fields() -> impl Iterator<Item = &'static FieldSpec> {
  FIELDS.iter().filter(|f| f.kind == FieldKind::Answer)
}

/// Fields returned by synthesis reads, in storage order.
pub fn exposed_fields() -> impl Iterator<Item = &'static FieldSpec> {
  FIELDS.iter().filter(|f| f.exposed)
}

/// Position of `name` within [`FIELDS`].
pub fn position(name: &str) -> Option<usize> {
  FIELDS.iter().position(|f| f.name == name)
}
