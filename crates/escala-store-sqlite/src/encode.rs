//! Encoding and decoding helpers between domain records and the plain column
//! values stored in SQLite.
//!
//! Timestamps are stored as RFC 3339 strings, ids as signed 64-bit integers,
//! a teacher's subject list as a compact JSON array.

use chrono::{DateTime, Utc};
use escala_core::{
  Dataset,
  class::Class,
  dataset::Sequences,
  exchange::{Exchange, ExchangeStatus},
  subject::Subject,
  teacher::Teacher,
};

use crate::{Error, Result};

// ─── Ids ──────────────────────────────────────────────────────────────────────

pub fn encode_id(id: u64) -> Result<i64> {
  i64::try_from(id).map_err(|_| Error::IdOutOfRange(id.to_string()))
}

pub fn decode_id(raw: i64) -> Result<u64> {
  u64::try_from(raw).map_err(|_| Error::IdOutOfRange(raw.to_string()))
}

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

pub struct RawSubject {
  pub id:         i64,
  pub nome:       String,
  pub created_at: String,
  pub updated_at: Option<String>,
}

impl RawSubject {
  pub fn encode(s: &Subject) -> Result<Self> {
    Ok(Self {
      id:         encode_id(s.id)?,
      nome:       s.name.clone(),
      created_at: encode_dt(s.created_at),
      updated_at: s.updated_at.map(encode_dt),
    })
  }

  pub fn into_subject(self) -> Result<Subject> {
    Ok(Subject {
      id:         decode_id(self.id)?,
      name:       self.nome,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_opt_dt(self.updated_at)?,
    })
  }
}

pub struct RawTeacher {
  pub id:         i64,
  pub nome:       String,
  pub materias:   String,
  pub created_at: String,
  pub updated_at: Option<String>,
}

impl RawTeacher {
  pub fn encode(t: &Teacher) -> Result<Self> {
    Ok(Self {
      id:         encode_id(t.id)?,
      nome:       t.name.clone(),
      materias:   serde_json::to_string(&t.subject_ids)?,
      created_at: encode_dt(t.created_at),
      updated_at: t.updated_at.map(encode_dt),
    })
  }

  pub fn into_teacher(self) -> Result<Teacher> {
    Ok(Teacher {
      id:          decode_id(self.id)?,
      name:        self.nome,
      subject_ids: serde_json::from_str(&self.materias)?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_opt_dt(self.updated_at)?,
    })
  }
}

pub struct RawClass {
  pub id:           i64,
  pub data:         String,
  pub horario:      String,
  pub professor_id: i64,
  pub turma:        String,
  pub created_at:   String,
  pub updated_at:   Option<String>,
}

impl RawClass {
  pub fn encode(c: &Class) -> Result<Self> {
    Ok(Self {
      id:           encode_id(c.id)?,
      data:         c.date.clone(),
      horario:      c.time.clone(),
      professor_id: encode_id(c.teacher_id)?,
      turma:        c.section.clone(),
      created_at:   encode_dt(c.created_at),
      updated_at:   c.updated_at.map(encode_dt),
    })
  }

  pub fn into_class(self) -> Result<Class> {
    Ok(Class {
      id:         decode_id(self.id)?,
      date:       self.data,
      time:       self.horario,
      teacher_id: decode_id(self.professor_id)?,
      section:    self.turma,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_opt_dt(self.updated_at)?,
    })
  }
}

pub struct RawExchange {
  pub id:                      i64,
  pub aula_id:                 i64,
  pub professor_original_id:   i64,
  pub professor_substituto_id: i64,
  pub motivo:                  String,
  pub status:                  String,
  pub created_at:              String,
  pub updated_at:              Option<String>,
}

impl RawExchange {
  pub fn encode(e: &Exchange) -> Result<Self> {
    Ok(Self {
      id:                      encode_id(e.id)?,
      aula_id:                 encode_id(e.class_id)?,
      professor_original_id:   encode_id(e.original_teacher_id)?,
      professor_substituto_id: encode_id(e.substitute_teacher_id)?,
      motivo:                  e.reason.clone(),
      status:                  e.status.as_ref().to_owned(),
      created_at:              encode_dt(e.created_at),
      updated_at:              e.updated_at.map(encode_dt),
    })
  }

  pub fn into_exchange(self) -> Result<Exchange> {
    Ok(Exchange {
      id:                    decode_id(self.id)?,
      class_id:              decode_id(self.aula_id)?,
      original_teacher_id:   decode_id(self.professor_original_id)?,
      substitute_teacher_id: decode_id(self.professor_substituto_id)?,
      reason:                self.motivo,
      status:                self.status.parse::<ExchangeStatus>()?,
      created_at:            decode_dt(&self.created_at)?,
      updated_at:            decode_opt_dt(self.updated_at)?,
    })
  }
}

// ─── Whole dataset ───────────────────────────────────────────────────────────

/// Sequence keys in the `sequencias` table; same names as the collections.
pub const SEQ_SUBJECTS: &str = "materias";
pub const SEQ_TEACHERS: &str = "professores";
pub const SEQ_CLASSES: &str = "aulas";
pub const SEQ_EXCHANGES: &str = "trocas";

/// Every row of every table, in collection order.
#[derive(Default)]
pub struct RawDataset {
  pub subjects:  Vec<RawSubject>,
  pub teachers:  Vec<RawTeacher>,
  pub classes:   Vec<RawClass>,
  pub exchanges: Vec<RawExchange>,
  pub sequences: Vec<(String, i64)>,
}

impl RawDataset {
  pub fn encode(data: &Dataset) -> Result<Self> {
    let seq = &data.sequences;
    Ok(Self {
      subjects:  data.subjects.iter().map(RawSubject::encode).collect::<Result<_>>()?,
      teachers:  data.teachers.iter().map(RawTeacher::encode).collect::<Result<_>>()?,
      classes:   data.classes.iter().map(RawClass::encode).collect::<Result<_>>()?,
      exchanges: data
        .exchanges
        .iter()
        .map(RawExchange::encode)
        .collect::<Result<_>>()?,
      sequences: vec![
        (SEQ_SUBJECTS.to_owned(), encode_id(seq.subjects)?),
        (SEQ_TEACHERS.to_owned(), encode_id(seq.teachers)?),
        (SEQ_CLASSES.to_owned(), encode_id(seq.classes)?),
        (SEQ_EXCHANGES.to_owned(), encode_id(seq.exchanges)?),
      ],
    })
  }

  pub fn into_dataset(self) -> Result<Dataset> {
    let mut sequences = Sequences::default();
    for (name, last) in self.sequences {
      let last = decode_id(last)?;
      match name.as_str() {
        SEQ_SUBJECTS => sequences.subjects = last,
        SEQ_TEACHERS => sequences.teachers = last,
        SEQ_CLASSES => sequences.classes = last,
        SEQ_EXCHANGES => sequences.exchanges = last,
        other => tracing::warn!(sequence = other, "ignoring unknown sequence"),
      }
    }

    Ok(Dataset {
      subjects: self
        .subjects
        .into_iter()
        .map(RawSubject::into_subject)
        .collect::<Result<_>>()?,
      teachers: self
        .teachers
        .into_iter()
        .map(RawTeacher::into_teacher)
        .collect::<Result<_>>()?,
      classes: self
        .classes
        .into_iter()
        .map(RawClass::into_class)
        .collect::<Result<_>>()?,
      exchanges: self
        .exchanges
        .into_iter()
        .map(RawExchange::into_exchange)
        .collect::<Result<_>>()?,
      sequences,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_round_trips_through_text() {
    for status in [
      ExchangeStatus::Pending,
      ExchangeStatus::Approved,
      ExchangeStatus::Rejected,
    ] {
      assert_eq!(status.as_ref().parse::<ExchangeStatus>().unwrap(), status);
    }
    assert_eq!(ExchangeStatus::Approved.as_ref(), "APPROVED");
  }

  #[test]
  fn ids_beyond_i64_are_rejected() {
    assert!(matches!(encode_id(u64::MAX), Err(Error::IdOutOfRange(_))));
    assert!(matches!(decode_id(-1), Err(Error::IdOutOfRange(_))));
    assert_eq!(decode_id(encode_id(42).unwrap()).unwrap(), 42);
  }
}
