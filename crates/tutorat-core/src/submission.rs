//! Submission validation.
//!
//! A [`Submission`] can only be obtained through [`Submission::from_json`],
//! so holding one proves every required field is present, non-blank and
//! within its length limit. Stores accept nothing else.

use serde_json::{Map, Value};

use crate::{
  Result, ValidationError,
  schema::{self, FIELDS, FieldSpec},
};

/// A validated questionnaire, one trimmed value per entry of [`FIELDS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
  values: Vec<String>,
}

impl Submission {
  /// Validate a JSON request body.
  ///
  /// Unknown keys are ignored. A value counts as present only if it is a
  /// string with non-whitespace content.
  pub fn from_json(body: &Value) -> Result<Self> {
    let object = body.as_object().ok_or(ValidationError::NotAnObject)?;
    Self::from_object(object)
  }

  pub fn from_object(object: &Map<String, Value>) -> Result<Self> {
    let mut values = Vec::with_capacity(FIELDS.len());
    let mut missing = Vec::new();

    for spec in FIELDS {
      match object.get(spec.name).and_then(Value::as_str).map(str::trim) {
        Some(v) if !v.is_empty() => values.push(v.to_owned()),
        _ if spec.required => missing.push(spec.name),
        _ => values.push(String::new()),
      }
    }

    if !missing.is_empty() {
      return Err(ValidationError::MissingFields { missing });
    }

    for (spec, value) in FIELDS.iter().zip(&values) {
      if let Some(max) = spec.kind.max_len()
        && value.chars().count() > max
      {
        return Err(ValidationError::FieldTooLong { field: spec.name, max });
      }
    }

    Ok(Self { values })
  }

  /// Convenience constructor from `(name, value)` pairs.
  pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    let object = pairs
      .into_iter()
      .map(|(k, v)| (k.into(), Value::String(v.into())))
      .collect::<Map<_, _>>();
    Self::from_object(&object)
  }

  /// The value of field `name`, if it is part of the schema.
  pub fn get(&self, name: &str) -> Option<&str> {
    schema::position(name).map(|i| self.values[i].as_str())
  }

  pub fn city(&self) -> &str { self.field(schema::CITY) }

  pub fn institution(&self) -> &str { self.field(schema::INSTITUTION) }

  pub fn modality(&self) -> &str { self.field(schema::MODALITY) }

  /// Every field with its value, in storage order.
  pub fn iter(&self) -> impl Iterator<Item = (&'static FieldSpec, &str)> {
    FIELDS.iter().zip(self.values.iter().map(String::as_str))
  }

  /// Consume into the values in storage order.
  pub fn into_values(self) -> Vec<String> { self.values }

  fn field(&self, name: &str) -> &str { self.get(name).unwrap_or_default() }
}

/// Reject a blank modality given as a request parameter. The parameter is
/// otherwise matched exactly, so nothing is normalised here.
pub fn require_modality(modality: &str) -> Result<()> {
  if modality.trim().is_empty() {
    return Err(ValidationError::MissingFields { missing: vec![schema::MODALITY] });
  }
  Ok(())
}
