//! Exchanges ("trocas") — requests to hand a class to a substitute teacher.
//!
//! An exchange starts out `PENDING` and is resolved exactly once. Approval
//! reassigns the class to the substitute; both changes happen on the same
//! [`Dataset`] and are therefore persisted by the same save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{
  Dataset, Error, Result,
  dataset::{Collection, allocate_id, optional_text, required_text},
};

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ExchangeStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
  pub id:                    u64,
  #[serde(rename = "aulaId")]
  pub class_id:              u64,
  #[serde(rename = "professorOriginalId")]
  pub original_teacher_id:   u64,
  #[serde(rename = "professorSubstitutoId")]
  pub substitute_teacher_id: u64,
  #[serde(rename = "motivo")]
  pub reason:                String,
  #[serde(default)]
  pub status:                ExchangeStatus,
  #[serde(default)]
  pub created_at:            DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at:            Option<DateTime<Utc>>,
}

/// Input to [`Dataset::create_exchange`].
#[derive(Debug, Clone, Default)]
pub struct NewExchange {
  pub class_id:              Option<u64>,
  pub original_teacher_id:   Option<u64>,
  pub substitute_teacher_id: Option<u64>,
  pub reason:                Option<String>,
}

impl Dataset {
  pub fn create_exchange(
    &mut self,
    input: NewExchange,
    now: DateTime<Utc>,
  ) -> Result<Exchange> {
    let class_id = input.class_id.ok_or(Error::MissingField("aulaId"))?;
    let original_teacher_id = input
      .original_teacher_id
      .ok_or(Error::MissingField("professorOriginalId"))?;
    let substitute_teacher_id = input
      .substitute_teacher_id
      .ok_or(Error::MissingField("professorSubstitutoId"))?;
    let reason = required_text(input.reason, "motivo")?;

    let class = self
      .class(class_id)
      .ok_or_else(|| Error::invalid_reference(Collection::Class, class_id))?;
    for teacher_id in [original_teacher_id, substitute_teacher_id] {
      if self.teacher(teacher_id).is_none() {
        return Err(Error::invalid_reference(Collection::Teacher, teacher_id));
      }
    }
    if class.teacher_id != original_teacher_id {
      return Err(Error::Conflict(format!(
        "original teacher {original_teacher_id} is not assigned to class \
         {class_id}"
      )));
    }
    if substitute_teacher_id == original_teacher_id {
      return Err(Error::InvalidArgument(
        "substitute teacher must differ from the original teacher".into(),
      ));
    }

    let id = allocate_id(
      &mut self.sequences.exchanges,
      self.exchanges.iter().map(|e| e.id),
    );
    let exchange = Exchange {
      id,
      class_id,
      original_teacher_id,
      substitute_teacher_id,
      reason,
      status: ExchangeStatus::Pending,
      created_at: now,
      updated_at: None,
    };
    self.exchanges.push(exchange.clone());
    Ok(exchange)
  }

  /// Resolve a pending exchange to `APPROVED` or `REJECTED`.
  ///
  /// Approving hands the referenced class to the substitute teacher. The class
  /// must still belong to the original teacher, and the substitute must still
  /// exist and be free in that slot.
  pub fn set_exchange_status(
    &mut self,
    id: u64,
    status: Option<String>,
    now: DateTime<Utc>,
  ) -> Result<Exchange> {
    let index = self
      .exchanges
      .iter()
      .position(|e| e.id == id)
      .ok_or_else(|| Error::not_found(Collection::Exchange, id))?;

    let requested = optional_text(status).ok_or(Error::MissingField("status"))?;
    let status = match requested.parse::<ExchangeStatus>() {
      Ok(s @ (ExchangeStatus::Approved | ExchangeStatus::Rejected)) => s,
      _ => {
        return Err(Error::InvalidArgument(format!(
          "status must be {} or {}, got {requested:?}",
          ExchangeStatus::Approved,
          ExchangeStatus::Rejected
        )));
      }
    };

    let exchange = &self.exchanges[index];
    if exchange.status != ExchangeStatus::Pending {
      return Err(Error::Conflict(format!(
        "exchange {id} is already {}",
        exchange.status
      )));
    }

    if status == ExchangeStatus::Approved {
      let class_index = self.approval_target(exchange)?;
      let class = &mut self.classes[class_index];
      class.teacher_id = exchange.substitute_teacher_id;
      class.updated_at = Some(now);
    }

    let exchange = &mut self.exchanges[index];
    exchange.status = status;
    exchange.updated_at = Some(now);
    Ok(exchange.clone())
  }

  /// Locate the class an approval will reassign, checking the substitute can
  /// take it.
  fn approval_target(&self, exchange: &Exchange) -> Result<usize> {
    let class_index = self
      .classes
      .iter()
      .position(|c| c.id == exchange.class_id)
      .ok_or_else(|| {
        Error::invalid_reference(Collection::Class, exchange.class_id)
      })?;
    let substitute = exchange.substitute_teacher_id;
    if self.teacher(substitute).is_none() {
      return Err(Error::invalid_reference(Collection::Teacher, substitute));
    }

    let class = &self.classes[class_index];
    if class.teacher_id != exchange.original_teacher_id {
      return Err(Error::Conflict(format!(
        "class {} is no longer taught by teacher {}",
        class.id, exchange.original_teacher_id
      )));
    }
    if let Some(slot) = class.slot()
      && let Some(busy) = self.classes.iter().find(|other| {
        other.id != class.id
          && other.teacher_id == substitute
          && other.slot() == Some(slot)
      })
    {
      return Err(Error::Conflict(format!(
        "substitute teacher {substitute} already teaches class {} at {} {}",
        busy.id, class.date, class.time
      )));
    }
    Ok(class_index)
  }
}
