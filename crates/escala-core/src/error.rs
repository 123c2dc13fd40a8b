//! Error types for `escala-core`.
//!
//! Every variant is a rejection of a proposed mutation or lookup. Storage
//! failures belong to the backend crates.

use thiserror::Error;

use crate::dataset::Collection;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("{0} is required")]
  MissingField(&'static str),

  #[error("{collection} {id} does not exist")]
  InvalidReference { collection: Collection, id: u64 },

  #[error("{0}")]
  InvalidArgument(String),

  #[error("{0}")]
  Conflict(String),

  #[error("{collection} {id} not found")]
  NotFound { collection: Collection, id: u64 },
}

impl Error {
  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound { .. }) }

  pub fn not_found(collection: Collection, id: u64) -> Self {
    Self::NotFound { collection, id }
  }

  pub fn invalid_reference(collection: Collection, id: u64) -> Self {
    Self::InvalidReference { collection, id }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
