//! Lenient decoding of a persisted document.
//!
//! A document that was hand-edited, written by an older version or partially
//! corrupted still loads. Each top-level collection is decoded on its own and
//! each record within it too: a record that does not decode is dropped with a
//! warning, and a collection that is missing or not a list comes back empty.

use escala_core::Dataset;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub fn decode_dataset(raw: &str) -> Dataset {
  let doc: Value = match serde_json::from_str(raw) {
    Ok(doc) => doc,
    Err(e) => {
      tracing::warn!(error = %e, "database document is not valid JSON; starting empty");
      return Dataset::default();
    }
  };
  if !doc.is_object() {
    tracing::warn!("database document is not a JSON object; starting empty");
    return Dataset::default();
  }

  Dataset {
    subjects:  collection(&doc, "materias"),
    teachers:  collection(&doc, "professores"),
    classes:   collection(&doc, "aulas"),
    exchanges: collection(&doc, "trocas"),
    sequences: section(&doc, "sequencias"),
  }
}

fn collection<T: DeserializeOwned>(doc: &Value, key: &str) -> Vec<T> {
  let records = match doc.get(key) {
    None | Some(Value::Null) => return Vec::new(),
    Some(Value::Array(records)) => records,
    Some(_) => {
      tracing::warn!(key, "discarding collection that is not a list");
      return Vec::new();
    }
  };

  records
    .iter()
    .enumerate()
    .filter_map(|(index, record)| {
      T::deserialize(record)
        .inspect_err(|e| {
          tracing::warn!(key, index, error = %e, "discarding malformed record");
        })
        .ok()
    })
    .collect()
}

fn section<T: DeserializeOwned + Default>(doc: &Value, key: &str) -> T {
  match doc.get(key) {
    None | Some(Value::Null) => T::default(),
    Some(value) => T::deserialize(value).unwrap_or_else(|e| {
      tracing::warn!(key, error = %e, "discarding malformed section");
      T::default()
    }),
  }
}
