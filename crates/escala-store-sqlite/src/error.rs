//! Error type for `escala-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown exchange status: {0}")]
  Status(#[from] strum::ParseError),

  #[error("id {0} does not fit in an INTEGER column")]
  IdOutOfRange(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
