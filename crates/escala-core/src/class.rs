//! Classes ("aulas") — a teacher and a section booked into a time slot.
//!
//! Within one slot (date + time of day) a teacher teaches at most one class
//! and a section attends at most one class. Classes that already took place
//! are kept as history and cannot be deleted.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Dataset, Error, Result,
  dataset::{Collection, allocate_id, optional_text, required_text},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
  pub id:         u64,
  /// Calendar date, `YYYY-MM-DD`.
  #[serde(rename = "data")]
  pub date:       String,
  /// Time of day, `HH:MM` or `HH:MM:SS`.
  #[serde(rename = "horario")]
  pub time:       String,
  #[serde(rename = "professorId")]
  pub teacher_id: u64,
  #[serde(rename = "turma")]
  pub section:    String,
  #[serde(default)]
  pub created_at: DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
}

/// A parsed (date, time) pair. Two classes collide only when their slots are
/// equal, so `"10:00"` and `"10:00:00"` are the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
  pub date: NaiveDate,
  pub time: NaiveTime,
}

impl Slot {
  pub fn parse(date: &str, time: &str) -> Result<Self> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
      Error::InvalidArgument(format!("data {date:?} is not a YYYY-MM-DD date"))
    })?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
      .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
      .map_err(|_| {
        Error::InvalidArgument(format!("horario {time:?} is not a HH:MM time"))
      })?;
    Ok(Self { date, time })
  }

  /// The instant the slot starts, read in the server's local time zone.
  ///
  /// Falls back to UTC for wall-clock times skipped by a DST transition.
  pub fn starts_at(&self) -> DateTime<Utc> {
    let naive = NaiveDateTime::new(self.date, self.time);
    naive
      .and_local_timezone(Local)
      .earliest()
      .map(|dt| dt.with_timezone(&Utc))
      .unwrap_or_else(|| naive.and_utc())
  }
}

impl Class {
  /// `None` for records whose date or time does not parse.
  pub fn slot(&self) -> Option<Slot> { Slot::parse(&self.date, &self.time).ok() }
}

/// Input to [`Dataset::create_class`].
#[derive(Debug, Clone, Default)]
pub struct NewClass {
  pub date:       Option<String>,
  pub time:       Option<String>,
  pub teacher_id: Option<u64>,
  pub section:    Option<String>,
}

/// Input to [`Dataset::update_class`].
///
/// Merge rules: each present, non-empty field overwrites the stored one;
/// absent or empty fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct ClassPatch {
  pub date:       Option<String>,
  pub time:       Option<String>,
  pub teacher_id: Option<u64>,
  pub section:    Option<String>,
}

impl ClassPatch {
  fn apply(self, class: &mut Class) {
    if let Some(date) = optional_text(self.date) {
      class.date = date;
    }
    if let Some(time) = optional_text(self.time) {
      class.time = time;
    }
    if let Some(teacher_id) = self.teacher_id {
      class.teacher_id = teacher_id;
    }
    if let Some(section) = optional_text(self.section) {
      class.section = section;
    }
  }
}

impl Dataset {
  /// Check a proposed class against the format, reference and double-booking
  /// rules. `ignore` skips the record being updated.
  fn check_class(&self, class: &Class, ignore: Option<u64>) -> Result<()> {
    let slot = Slot::parse(&class.date, &class.time)?;

    if self.teacher(class.teacher_id).is_none() {
      return Err(Error::invalid_reference(
        Collection::Teacher,
        class.teacher_id,
      ));
    }

    let clash = self
      .classes
      .iter()
      .filter(|other| Some(other.id) != ignore)
      .filter(|other| other.slot() == Some(slot))
      .find(|other| {
        other.teacher_id == class.teacher_id || other.section == class.section
      });

    match clash {
      Some(other) if other.teacher_id == class.teacher_id => {
        Err(Error::Conflict(format!(
          "teacher {} already teaches class {} at {} {}",
          class.teacher_id, other.id, class.date, class.time
        )))
      }
      Some(other) => Err(Error::Conflict(format!(
        "section {} already attends class {} at {} {}",
        class.section, other.id, class.date, class.time
      ))),
      None => Ok(()),
    }
  }

  pub fn create_class(
    &mut self,
    input: NewClass,
    now: DateTime<Utc>,
  ) -> Result<Class> {
    let date = required_text(input.date, "data")?;
    let time = required_text(input.time, "horario")?;
    let teacher_id = input.teacher_id.ok_or(Error::MissingField("professorId"))?;
    let section = required_text(input.section, "turma")?;

    let mut class = Class {
      id: 0,
      date,
      time,
      teacher_id,
      section,
      created_at: now,
      updated_at: None,
    };
    self.check_class(&class, None)?;

    class.id = allocate_id(
      &mut self.sequences.classes,
      self.classes.iter().map(|c| c.id),
    );
    self.classes.push(class.clone());
    Ok(class)
  }

  pub fn update_class(
    &mut self,
    id: u64,
    patch: ClassPatch,
    now: DateTime<Utc>,
  ) -> Result<Class> {
    let index = self
      .classes
      .iter()
      .position(|c| c.id == id)
      .ok_or_else(|| Error::not_found(Collection::Class, id))?;

    let mut merged = self.classes[index].clone();
    patch.apply(&mut merged);
    self.check_class(&merged, Some(id))?;

    merged.updated_at = Some(now);
    self.classes[index] = merged.clone();
    Ok(merged)
  }

  /// Remove a class that has not started yet.
  ///
  /// A class whose slot lies strictly before `now` fails with
  /// [`Error::Conflict`]. Records with an unparseable slot have no temporal
  /// guard.
  pub fn delete_class(&mut self, id: u64, now: DateTime<Utc>) -> Result<Class> {
    let index = self
      .classes
      .iter()
      .position(|c| c.id == id)
      .ok_or_else(|| Error::not_found(Collection::Class, id))?;

    if let Some(slot) = self.classes[index].slot()
      && slot.starts_at() < now
    {
      return Err(Error::Conflict(format!(
        "class {id} already occurred and cannot be deleted"
      )));
    }

    Ok(self.classes.remove(index))
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::teacher::NewTeacher;

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
  }

  fn with_teachers(n: usize) -> Dataset {
    let mut data = Dataset::default();
    for i in 0..n {
      data
        .create_teacher(
          NewTeacher { name: Some(format!("T{i}")), subject_ids: None },
          now(),
        )
        .unwrap();
    }
    data
  }

  fn class(date: &str, time: &str, teacher_id: u64, section: &str) -> NewClass {
    NewClass {
      date:       Some(date.into()),
      time:       Some(time.into()),
      teacher_id: Some(teacher_id),
      section:    Some(section.into()),
    }
  }

  #[test]
  fn create_assigns_sequential_ids() {
    let mut data = with_teachers(1);
    let a = data.create_class(class("2030-01-01", "10:00", 1, "A"), now());
    let b = data.create_class(class("2030-01-01", "11:00", 1, "A"), now());
    assert_eq!(a.unwrap().id, 1);
    assert_eq!(b.unwrap().id, 2);
  }

  #[test]
  fn create_reports_first_missing_field() {
    let mut data = with_teachers(1);
    let mut input = class("2030-01-01", "10:00", 1, "A");
    input.teacher_id = None;
    assert_eq!(
      data.create_class(input, now()).unwrap_err(),
      Error::MissingField("professorId")
    );

    let mut input = class("2030-01-01", "10:00", 1, "A");
    input.section = Some(" ".into());
    assert_eq!(
      data.create_class(input, now()).unwrap_err(),
      Error::MissingField("turma")
    );
  }

  #[test]
  fn create_rejects_malformed_slot() {
    let mut data = with_teachers(1);
    let err = data
      .create_class(class("01/01/2030", "10:00", 1, "A"), now())
      .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    let err = data
      .create_class(class("2030-01-01", "10h", 1, "A"), now())
      .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
  }

  #[test]
  fn create_with_unknown_teacher_is_invalid_reference() {
    let mut data = with_teachers(1);
    let before = data.clone();
    let err = data
      .create_class(class("2030-01-01", "10:00", 2, "A"), now())
      .unwrap_err();
    assert_eq!(err, Error::invalid_reference(Collection::Teacher, 2));
    assert_eq!(data, before);
  }

  #[test]
  fn same_teacher_same_slot_conflicts() {
    let mut data = with_teachers(1);
    data
      .create_class(class("2030-01-01", "10:00", 1, "A"), now())
      .unwrap();
    let err = data
      .create_class(class("2030-01-01", "10:00:00", 1, "B"), now())
      .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(data.classes.len(), 1);
  }

  #[test]
  fn same_section_same_slot_conflicts() {
    let mut data = with_teachers(2);
    data
      .create_class(class("2030-01-01", "10:00", 1, "A"), now())
      .unwrap();
    let err = data
      .create_class(class("2030-01-01", "10:00", 2, "A"), now())
      .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
  }

  #[test]
  fn different_slot_or_disjoint_booking_is_accepted() {
    let mut data = with_teachers(2);
    data
      .create_class(class("2030-01-01", "10:00", 1, "A"), now())
      .unwrap();
    data
      .create_class(class("2030-01-01", "10:00", 2, "B"), now())
      .unwrap();
    data
      .create_class(class("2030-01-02", "10:00", 1, "A"), now())
      .unwrap();
    assert_eq!(data.classes.len(), 3);
  }

  #[test]
  fn update_merges_and_ignores_itself() {
    let mut data = with_teachers(2);
    data
      .create_class(class("2030-01-01", "10:00", 1, "A"), now())
      .unwrap();

    let updated = data
      .update_class(
        1,
        ClassPatch { teacher_id: Some(2), ..Default::default() },
        now(),
      )
      .unwrap();
    assert_eq!(updated.teacher_id, 2);
    assert_eq!(updated.section, "A");
    assert_eq!(updated.updated_at, Some(now()));
  }

  #[test]
  fn update_into_taken_slot_conflicts() {
    let mut data = with_teachers(2);
    data
      .create_class(class("2030-01-01", "10:00", 1, "A"), now())
      .unwrap();
    data
      .create_class(class("2030-01-01", "11:00", 2, "B"), now())
      .unwrap();
    let before = data.clone();

    let err = data
      .update_class(
        2,
        ClassPatch { time: Some("10:00".into()), ..Default::default() },
        now(),
      )
      .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(data, before);
  }

  #[test]
  fn delete_past_class_conflicts() {
    let mut data = with_teachers(1);
    data
      .create_class(class("2020-01-01", "10:00", 1, "A"), now())
      .unwrap();
    let err = data.delete_class(1, now()).unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(data.classes.len(), 1);
  }

  #[test]
  fn delete_future_class_removes_it() {
    let mut data = with_teachers(1);
    data
      .create_class(class("2030-01-01", "10:00", 1, "A"), now())
      .unwrap();
    assert_eq!(data.delete_class(1, now()).unwrap().id, 1);
    assert!(data.classes.is_empty());
  }

  #[test]
  fn delete_missing_class_is_not_found() {
    let mut data = Dataset::default();
    assert_eq!(
      data.delete_class(4, now()).unwrap_err(),
      Error::not_found(Collection::Class, 4)
    );
  }
}
