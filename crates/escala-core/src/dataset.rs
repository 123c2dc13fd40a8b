//! [`Dataset`] — the full set of records a request works against.
//!
//! A handler loads one dataset per request, hands it to exactly one engine
//! operation and, if the operation succeeded, saves it back in a single call.
//! Engine operations validate everything before they mutate, so a rejected
//! operation leaves the dataset untouched.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
  Error, Result, class::Class, exchange::Exchange, subject::Subject,
  teacher::Teacher,
};

/// Names one of the four collections; used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Collection {
  Subject,
  Teacher,
  Class,
  Exchange,
}

// ─── Sequences ───────────────────────────────────────────────────────────────

/// The last id handed out per collection.
///
/// Persisted next to the collections so ids are never reused after a delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequences {
  #[serde(default, rename = "materias")]
  pub subjects:  u64,
  #[serde(default, rename = "professores")]
  pub teachers:  u64,
  #[serde(default, rename = "aulas")]
  pub classes:   u64,
  #[serde(default, rename = "trocas")]
  pub exchanges: u64,
}

/// Advance `counter` past every id in `existing` and return the new id.
///
/// Documents written before counters existed carry a zero counter, in which
/// case this degrades to `max(existing) + 1`.
pub(crate) fn allocate_id(
  counter: &mut u64,
  existing: impl Iterator<Item = u64>,
) -> u64 {
  let id = existing.max().unwrap_or(0).max(*counter) + 1;
  *counter = id;
  id
}

// ─── Dataset ─────────────────────────────────────────────────────────────────

/// The four collections plus their id sequences.
///
/// Collection order is insertion order and is preserved by every backend.
/// Any collection missing from a persisted document decodes as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
  #[serde(default, rename = "materias")]
  pub subjects:  Vec<Subject>,
  #[serde(default, rename = "professores")]
  pub teachers:  Vec<Teacher>,
  #[serde(default, rename = "aulas")]
  pub classes:   Vec<Class>,
  #[serde(default, rename = "trocas")]
  pub exchanges: Vec<Exchange>,
  #[serde(default, rename = "sequencias")]
  pub sequences: Sequences,
}

impl Dataset {
  pub fn subject(&self, id: u64) -> Option<&Subject> {
    self.subjects.iter().find(|s| s.id == id)
  }

  pub fn teacher(&self, id: u64) -> Option<&Teacher> {
    self.teachers.iter().find(|t| t.id == id)
  }

  pub fn class(&self, id: u64) -> Option<&Class> {
    self.classes.iter().find(|c| c.id == id)
  }

  pub fn exchange(&self, id: u64) -> Option<&Exchange> {
    self.exchanges.iter().find(|e| e.id == id)
  }
}

// ─── Input helpers ───────────────────────────────────────────────────────────

/// A required text field: absent, empty and whitespace-only all count as
/// missing. The stored value is trimmed.
pub(crate) fn required_text(
  value: Option<String>,
  field: &'static str,
) -> Result<String> {
  optional_text(value).ok_or(Error::MissingField(field))
}

/// An optional text field where an empty value means "not provided".
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}
