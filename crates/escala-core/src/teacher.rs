//! Teachers ("professores").
//!
//! A teacher lists the subjects they can teach. Every listed id must resolve
//! when it is written, on create and on update alike.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Dataset, Error, Result,
  dataset::{Collection, allocate_id, optional_text, required_text},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
  pub id:          u64,
  #[serde(rename = "nome")]
  pub name:        String,
  #[serde(default, rename = "materias")]
  pub subject_ids: Vec<u64>,
  #[serde(default)]
  pub created_at:  DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at:  Option<DateTime<Utc>>,
}

/// Input to [`Dataset::create_teacher`].
#[derive(Debug, Clone, Default)]
pub struct NewTeacher {
  pub name:        Option<String>,
  pub subject_ids: Option<Vec<u64>>,
}

/// Input to [`Dataset::update_teacher`].
///
/// Merge rules: a non-empty `name` overwrites; a present `subject_ids`
/// replaces the whole list (an empty list clears it).
#[derive(Debug, Clone, Default)]
pub struct TeacherPatch {
  pub name:        Option<String>,
  pub subject_ids: Option<Vec<u64>>,
}

impl Dataset {
  /// Collapse duplicates (keeping first occurrence) and check every id
  /// resolves to a subject.
  fn checked_subject_ids(&self, ids: Vec<u64>) -> Result<Vec<u64>> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
      if self.subject(id).is_none() {
        return Err(Error::invalid_reference(Collection::Subject, id));
      }
      if !unique.contains(&id) {
        unique.push(id);
      }
    }
    Ok(unique)
  }

  pub fn create_teacher(
    &mut self,
    input: NewTeacher,
    now: DateTime<Utc>,
  ) -> Result<Teacher> {
    let name = required_text(input.name, "nome")?;
    let subject_ids =
      self.checked_subject_ids(input.subject_ids.unwrap_or_default())?;

    let id = allocate_id(
      &mut self.sequences.teachers,
      self.teachers.iter().map(|t| t.id),
    );
    let teacher = Teacher {
      id,
      name,
      subject_ids,
      created_at: now,
      updated_at: None,
    };
    self.teachers.push(teacher.clone());
    Ok(teacher)
  }

  pub fn update_teacher(
    &mut self,
    id: u64,
    patch: TeacherPatch,
    now: DateTime<Utc>,
  ) -> Result<Teacher> {
    if self.teacher(id).is_none() {
      return Err(Error::not_found(Collection::Teacher, id));
    }
    let subject_ids = patch
      .subject_ids
      .map(|ids| self.checked_subject_ids(ids))
      .transpose()?;

    let teacher = self
      .teachers
      .iter_mut()
      .find(|t| t.id == id)
      .ok_or_else(|| Error::not_found(Collection::Teacher, id))?;
    if let Some(name) = optional_text(patch.name) {
      teacher.name = name;
    }
    if let Some(subject_ids) = subject_ids {
      teacher.subject_ids = subject_ids;
    }
    teacher.updated_at = Some(now);
    Ok(teacher.clone())
  }

  /// Remove a teacher. Fails with [`Error::Conflict`] while any class is
  /// assigned to them.
  pub fn delete_teacher(&mut self, id: u64) -> Result<Teacher> {
    let index = self
      .teachers
      .iter()
      .position(|t| t.id == id)
      .ok_or_else(|| Error::not_found(Collection::Teacher, id))?;

    if let Some(class) = self.classes.iter().find(|c| c.teacher_id == id) {
      return Err(Error::Conflict(format!(
        "teacher {id} is assigned to class {}; reassign or delete it first",
        class.id
      )));
    }

    Ok(self.teachers.remove(index))
  }
}
