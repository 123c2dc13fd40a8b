//! [`JsonFileStore`] — the file implementation of [`RecordStore`].

use std::{
  io::{ErrorKind, Write as _},
  path::{Path, PathBuf},
};

use escala_core::{Dataset, store::RecordStore};
use tempfile::NamedTempFile;

use crate::{Error, Result, decode::decode_dataset};

/// A record store backed by a single JSON document on disk.
///
/// Cloning is cheap; clones refer to the same file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
  path: PathBuf,
}

impl JsonFileStore {
  /// Open the document at `path`, writing an empty one if none exists.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let store = Self { path: path.as_ref().to_path_buf() };
    let exists = tokio::fs::try_exists(&store.path)
      .await
      .map_err(Error::io(&store.path))?;
    if !exists {
      tracing::info!(path = ?store.path, "initialising empty database document");
      store.write(&Dataset::default()).await?;
    }
    Ok(store)
  }

  pub fn path(&self) -> &Path { &self.path }

  async fn write(&self, dataset: &Dataset) -> Result<()> {
    let body = serde_json::to_vec_pretty(dataset)?;
    let path = self.path.clone();
    tokio::task::spawn_blocking(move || replace_file(&path, &body)).await?
  }
}

/// Write `body` to a fresh temporary file beside `path`, then rename it over
/// `path`. Concurrent writers each get their own temporary file; the last
/// rename wins.
fn replace_file(path: &Path, body: &[u8]) -> Result<()> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  let mut temp = NamedTempFile::new_in(dir).map_err(Error::io(dir))?;
  temp.write_all(body).map_err(Error::io(path))?;
  temp
    .persist(path)
    .map_err(|e| Error::io(path)(e.error))?;
  Ok(())
}

impl RecordStore for JsonFileStore {
  type Error = Error;

  async fn load(&self) -> Result<Dataset> {
    match tokio::fs::read_to_string(&self.path).await {
      Ok(raw) => Ok(decode_dataset(&raw)),
      // Deleted underneath us: start over, as `open` would.
      Err(e) if e.kind() == ErrorKind::NotFound => {
        let empty = Dataset::default();
        self.write(&empty).await?;
        Ok(empty)
      }
      Err(e) => Err(Error::io(&self.path)(e)),
    }
  }

  async fn save(&self, dataset: &Dataset) -> Result<()> {
    self.write(dataset).await
  }

  async fn close(&self) -> Result<()> {
    tracing::debug!(path = ?self.path, "closing json store");
    Ok(())
  }
}
