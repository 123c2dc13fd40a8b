//! Read models — enriched projections returned by listing endpoints.
//!
//! Views are computed from a [`Dataset`] on every read and never stored.
//! Dangling references are tolerated: a subject id that no longer resolves is
//! dropped, a missing teacher or class becomes `null`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
  Dataset, class::Class, exchange::Exchange, subject::Subject,
  teacher::Teacher,
};

/// Minimal `{id, nome}` projection of a teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeacherRef {
  pub id:   u64,
  #[serde(rename = "nome")]
  pub name: String,
}

impl From<&Teacher> for TeacherRef {
  fn from(t: &Teacher) -> Self { Self { id: t.id, name: t.name.clone() } }
}

/// Minimal projection of a class, embedded in exchange listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassRef {
  pub id:      u64,
  #[serde(rename = "data")]
  pub date:    String,
  #[serde(rename = "horario")]
  pub time:    String,
  #[serde(rename = "turma")]
  pub section: String,
}

impl From<&Class> for ClassRef {
  fn from(c: &Class) -> Self {
    Self {
      id:      c.id,
      date:    c.date.clone(),
      time:    c.time.clone(),
      section: c.section.clone(),
    }
  }
}

/// A teacher with subject ids expanded into full subjects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherView {
  pub id:         u64,
  #[serde(rename = "nome")]
  pub name:       String,
  #[serde(rename = "materias")]
  pub subjects:   Vec<Subject>,
  pub created_at: DateTime<Utc>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
}

/// A class with its teacher attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassView {
  #[serde(flatten)]
  pub class:   Class,
  #[serde(rename = "professor")]
  pub teacher: Option<TeacherRef>,
}

/// An exchange with its class and both teachers attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeView {
  #[serde(flatten)]
  pub exchange:           Exchange,
  #[serde(rename = "aula")]
  pub class:              Option<ClassRef>,
  #[serde(rename = "professorOriginal")]
  pub original_teacher:   Option<TeacherRef>,
  #[serde(rename = "professorSubstituto")]
  pub substitute_teacher: Option<TeacherRef>,
}

impl Dataset {
  fn teacher_ref(&self, id: u64) -> Option<TeacherRef> {
    self.teacher(id).map(TeacherRef::from)
  }

  pub fn teacher_view(&self, teacher: &Teacher) -> TeacherView {
    TeacherView {
      id:         teacher.id,
      name:       teacher.name.clone(),
      subjects:   teacher
        .subject_ids
        .iter()
        .filter_map(|id| self.subject(*id).cloned())
        .collect(),
      created_at: teacher.created_at,
      updated_at: teacher.updated_at,
    }
  }

  pub fn class_view(&self, class: &Class) -> ClassView {
    ClassView {
      class:   class.clone(),
      teacher: self.teacher_ref(class.teacher_id),
    }
  }

  pub fn exchange_view(&self, exchange: &Exchange) -> ExchangeView {
    ExchangeView {
      exchange:           exchange.clone(),
      class:              self.class(exchange.class_id).map(ClassRef::from),
      original_teacher:   self.teacher_ref(exchange.original_teacher_id),
      substitute_teacher: self.teacher_ref(exchange.substitute_teacher_id),
    }
  }

  pub fn teacher_views(&self) -> Vec<TeacherView> {
    self.teachers.iter().map(|t| self.teacher_view(t)).collect()
  }

  pub fn class_views(&self) -> Vec<ClassView> {
    self.classes.iter().map(|c| self.class_view(c)).collect()
  }

  pub fn exchange_views(&self) -> Vec<ExchangeView> {
    self.exchanges.iter().map(|e| self.exchange_view(e)).collect()
  }
}
