//! Error types for `tutorat-core`.

use thiserror::Error;

/// A client-correctable problem with a submission or a request parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  /// One or more required fields were absent, blank, or not a string.
  #[error("all fields are required (missing: {})", .missing.join(", "))]
  MissingFields { missing: Vec<&'static str> },

  #[error("field `{field}` exceeds {max} characters")]
  FieldTooLong { field: &'static str, max: usize },

  #[error("submission body must be a JSON object")]
  NotAnObject,
}

pub type Result<T, E = ValidationError> = std::result::Result<T, E>;
