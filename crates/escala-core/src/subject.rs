//! Subjects ("matérias") — the leaves of the reference graph.
//!
//! Teachers reference subjects by id; a subject cannot be deleted while any
//! teacher still lists it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Dataset, Error, Result,
  dataset::{Collection, allocate_id, optional_text, required_text},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
  pub id:         u64,
  #[serde(rename = "nome")]
  pub name:       String,
  #[serde(default)]
  pub created_at: DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
}

/// Input to [`Dataset::create_subject`].
#[derive(Debug, Clone, Default)]
pub struct NewSubject {
  pub name: Option<String>,
}

/// Input to [`Dataset::update_subject`].
///
/// Merge rule: a non-empty `name` overwrites; empty or absent keeps the
/// stored value.
#[derive(Debug, Clone, Default)]
pub struct SubjectPatch {
  pub name: Option<String>,
}

impl SubjectPatch {
  fn apply(self, subject: &mut Subject) {
    if let Some(name) = optional_text(self.name) {
      subject.name = name;
    }
  }
}

impl Dataset {
  pub fn create_subject(
    &mut self,
    input: NewSubject,
    now: DateTime<Utc>,
  ) -> Result<Subject> {
    let name = required_text(input.name, "nome")?;

    let id = allocate_id(
      &mut self.sequences.subjects,
      self.subjects.iter().map(|s| s.id),
    );
    let subject = Subject { id, name, created_at: now, updated_at: None };
    self.subjects.push(subject.clone());
    Ok(subject)
  }

  pub fn update_subject(
    &mut self,
    id: u64,
    patch: SubjectPatch,
    now: DateTime<Utc>,
  ) -> Result<Subject> {
    let subject = self
      .subjects
      .iter_mut()
      .find(|s| s.id == id)
      .ok_or_else(|| Error::not_found(Collection::Subject, id))?;

    patch.apply(subject);
    subject.updated_at = Some(now);
    Ok(subject.clone())
  }

  /// Remove a subject. Fails with [`Error::Conflict`] while any teacher
  /// still lists it.
  pub fn delete_subject(&mut self, id: u64) -> Result<Subject> {
    let index = self
      .subjects
      .iter()
      .position(|s| s.id == id)
      .ok_or_else(|| Error::not_found(Collection::Subject, id))?;

    if let Some(teacher) =
      self.teachers.iter().find(|t| t.subject_ids.contains(&id))
    {
      return Err(Error::Conflict(format!(
        "subject {id} is taught by teacher {}; remove it from the teacher \
         first",
        teacher.id
      )));
    }

    Ok(self.subjects.remove(index))
  }
}
