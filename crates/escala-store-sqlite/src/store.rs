//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use escala_core::{Dataset, store::RecordStore};

use crate::{
  Result,
  encode::{RawClass, RawDataset, RawExchange, RawSubject, RawTeacher},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Escala record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  async fn load(&self) -> Result<Dataset> {
    let raw: RawDataset = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, nome, created_at, updated_at
           FROM materias ORDER BY position",
        )?;
        let subjects = stmt
          .query_map([], |row| {
            Ok(RawSubject {
              id:         row.get(0)?,
              nome:       row.get(1)?,
              created_at: row.get(2)?,
              updated_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT id, nome, materias, created_at, updated_at
           FROM professores ORDER BY position",
        )?;
        let teachers = stmt
          .query_map([], |row| {
            Ok(RawTeacher {
              id:         row.get(0)?,
              nome:       row.get(1)?,
              materias:   row.get(2)?,
              created_at: row.get(3)?,
              updated_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT id, data, horario, professor_id, turma, created_at, updated_at
           FROM aulas ORDER BY position",
        )?;
        let classes = stmt
          .query_map([], |row| {
            Ok(RawClass {
              id:           row.get(0)?,
              data:         row.get(1)?,
              horario:      row.get(2)?,
              professor_id: row.get(3)?,
              turma:        row.get(4)?,
              created_at:   row.get(5)?,
              updated_at:   row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT id, aula_id, professor_original_id, professor_substituto_id,
                  motivo, status, created_at, updated_at
           FROM trocas ORDER BY position",
        )?;
        let exchanges = stmt
          .query_map([], |row| {
            Ok(RawExchange {
              id:                      row.get(0)?,
              aula_id:                 row.get(1)?,
              professor_original_id:   row.get(2)?,
              professor_substituto_id: row.get(3)?,
              motivo:                  row.get(4)?,
              status:                  row.get(5)?,
              created_at:              row.get(6)?,
              updated_at:              row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare("SELECT colecao, ultimo_id FROM sequencias")?;
        let sequences = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(RawDataset { subjects, teachers, classes, exchanges, sequences })
      })
      .await?;

    raw.into_dataset()
  }

  async fn save(&self, dataset: &Dataset) -> Result<()> {
    let raw = RawDataset::encode(dataset)?;

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(
          "DELETE FROM materias;
           DELETE FROM professores;
           DELETE FROM aulas;
           DELETE FROM trocas;
           DELETE FROM sequencias;",
        )?;

        {
          let mut stmt = tx.prepare(
            "INSERT INTO materias (id, position, nome, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for (position, s) in raw.subjects.iter().enumerate() {
            stmt.execute(rusqlite::params![
              s.id,
              position as i64,
              s.nome,
              s.created_at,
              s.updated_at,
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO professores (id, position, nome, materias, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          )?;
          for (position, t) in raw.teachers.iter().enumerate() {
            stmt.execute(rusqlite::params![
              t.id,
              position as i64,
              t.nome,
              t.materias,
              t.created_at,
              t.updated_at,
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO aulas (
               id, position, data, horario, professor_id, turma,
               created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          )?;
          for (position, c) in raw.classes.iter().enumerate() {
            stmt.execute(rusqlite::params![
              c.id,
              position as i64,
              c.data,
              c.horario,
              c.professor_id,
              c.turma,
              c.created_at,
              c.updated_at,
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO trocas (
               id, position, aula_id, professor_original_id,
               professor_substituto_id, motivo, status, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          )?;
          for (position, e) in raw.exchanges.iter().enumerate() {
            stmt.execute(rusqlite::params![
              e.id,
              position as i64,
              e.aula_id,
              e.professor_original_id,
              e.professor_substituto_id,
              e.motivo,
              e.status,
              e.created_at,
              e.updated_at,
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO sequencias (colecao, ultimo_id) VALUES (?1, ?2)",
          )?;
          for (name, last) in &raw.sequences {
            stmt.execute(rusqlite::params![name, last])?;
          }
        }

        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn close(&self) -> Result<()> {
    tracing::debug!("closing sqlite store");
    self.conn.clone().close().await?;
    Ok(())
  }
}
