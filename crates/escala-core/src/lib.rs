//! Core types and the integrity engine for the Escala scheduling store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::RecordStore`]; the API layer loads a
//! [`Dataset`], runs one engine operation against it and saves it back.

pub mod class;
pub mod dataset;
pub mod error;
pub mod exchange;
pub mod store;
pub mod subject;
pub mod teacher;
pub mod view;

pub use dataset::Dataset;
pub use error::{Error, Result};
