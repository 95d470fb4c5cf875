//! Error type for `sumwise-store-sqlite`.

use sumwise_core::fact::FactKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] sumwise_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to edit, or record an attempt at, a fact that was not found.
  #[error("fact not found: {0}")]
  FactNotFound(FactKey),

  #[error("response time must be finite and non-negative, got {0}")]
  InvalidResponseTime(f64),

  #[error("stored value out of range: {0}")]
  OutOfRange(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
