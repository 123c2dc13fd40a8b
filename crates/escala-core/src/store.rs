//! The `RecordStore` trait.
//!
//! Implemented by storage backends (`escala-store-json`,
//! `escala-store-sqlite`). The API layer depends on this abstraction only.

use std::future::Future;

use crate::Dataset;

/// Abstraction over a persisted [`Dataset`].
///
/// A store is opened once at process start, shared by every request, and
/// closed at shutdown. Requests never hold a dataset across calls: each one
/// performs a single [`load`](Self::load) and, if it mutates, a single
/// [`save`](Self::save). There is no locking between the two, so concurrent
/// writers race and the last save wins.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read every collection. A collection missing from the persisted state
  /// is returned empty.
  fn load(&self) -> impl Future<Output = Result<Dataset, Self::Error>> + Send + '_;

  /// Atomically replace the persisted state with `dataset`.
  fn save<'a>(
    &'a self,
    dataset: &'a Dataset,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Release the underlying resources. Further calls may fail.
  fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
