//! Core types and trait definitions for the tutoring questionnaire service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The field schema declared in [`schema`] is the single source for what a
//! submission must contain and what the store persists.

pub mod error;
pub mod response;
pub mod schema;
pub mod store;
pub mod submission;

pub use error::{Result, ValidationError};
