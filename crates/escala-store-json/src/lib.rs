//! Single-document JSON file backend for the Escala record store.
//!
//! The whole [`escala_core::Dataset`] lives in one pretty-printed JSON file
//! with the top-level keys `materias`, `professores`, `aulas`, `trocas` and
//! `sequencias`. Saves go through a sibling temporary file and a rename, so a
//! reader never observes a half-written document.

mod decode;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::JsonFileStore;
