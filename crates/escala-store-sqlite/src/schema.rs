//! SQL schema for the Escala SQLite store.
//!
//! Executed once at connection startup. `position` records collection order so
//! that reads return rows in insertion order regardless of id.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS materias (
    id          INTEGER PRIMARY KEY,
    position    INTEGER NOT NULL,
    nome        TEXT NOT NULL,
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC
    updated_at  TEXT
);

CREATE TABLE IF NOT EXISTS professores (
    id          INTEGER PRIMARY KEY,
    position    INTEGER NOT NULL,
    nome        TEXT NOT NULL,
    materias    TEXT NOT NULL DEFAULT '[]',   -- JSON array of materia ids
    created_at  TEXT NOT NULL,
    updated_at  TEXT
);

CREATE TABLE IF NOT EXISTS aulas (
    id            INTEGER PRIMARY KEY,
    position      INTEGER NOT NULL,
    data          TEXT NOT NULL,
    horario       TEXT NOT NULL,
    professor_id  INTEGER NOT NULL,
    turma         TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    updated_at    TEXT
);

CREATE TABLE IF NOT EXISTS trocas (
    id                      INTEGER PRIMARY KEY,
    position                INTEGER NOT NULL,
    aula_id                 INTEGER NOT NULL,
    professor_original_id   INTEGER NOT NULL,
    professor_substituto_id INTEGER NOT NULL,
    motivo                  TEXT NOT NULL,
    status                  TEXT NOT NULL,   -- 'PENDING' | 'APPROVED' | 'REJECTED'
    created_at              TEXT NOT NULL,
    updated_at              TEXT
);

-- Last id handed out per collection; ids are never reused.
CREATE TABLE IF NOT EXISTS sequencias (
    colecao    TEXT PRIMARY KEY,
    ultimo_id  INTEGER NOT NULL
);

PRAGMA user_version = 1;
";
