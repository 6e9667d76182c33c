use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

use crate::error::Result;
use crate::models::{FileSignals, RepositoryRecord, SignalRecord};
use crate::storage::SignalSink;

pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_db()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_db()?;
        Ok(storage)
    }

    fn init_db(&self) -> Result<()> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS repositories (
                id INTEGER PRIMARY KEY,
                repo_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                html_url TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS file_signals (
                id INTEGER PRIMARY KEY,
                repo_id INTEGER NOT NULL,
                file_name TEXT NOT NULL,
                env_json TEXT NOT NULL,
                port_json TEXT NOT NULL,
                frameworks_json TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_repositories_repo_id ON repositories(repo_id);
            CREATE INDEX IF NOT EXISTS idx_file_signals_repo_id ON file_signals(repo_id);
            "#,
        )?;

        Ok(())
    }

    /// Names of repositories where at least one file carried a port
    /// reference. Distinct across the append-only history.
    pub fn repositories_with_port_references(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT r.name
            FROM file_signals f
            JOIN repositories r ON r.repo_id = f.repo_id
            WHERE f.port_json != '[]'
            ORDER BY r.name
            "#,
        )?;

        let names = stmt.query_map([], |row| row.get(0))?;
        names
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Names of repositories where any file matched the given canonical
    /// framework name (e.g. "Flask", "Express.js").
    pub fn repositories_using_framework(&self, framework: &str) -> Result<Vec<String>> {
        let needle = format!("%{}%", serde_json::to_string(framework)?);
        let conn = self.conn.lock().expect("storage mutex poisoned");
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT r.name
            FROM file_signals f
            JOIN repositories r ON r.repo_id = f.repo_id
            WHERE f.frameworks_json LIKE ?1
            ORDER BY r.name
            "#,
        )?;

        let names = stmt.query_map(params![needle], |row| row.get(0))?;
        names
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    pub fn repository_rows(&self, repo_id: u64) -> Result<Vec<RepositoryRecord>> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT repo_id, name, html_url FROM repositories WHERE repo_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![repo_id], |row| {
            Ok(RepositoryRecord {
                repo_id: row.get(0)?,
                name: row.get(1)?,
                html_url: row.get(2)?,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// RFC3339 timestamps stamped on a repository's rows, oldest first.
    pub fn repository_recorded_at(&self, repo_id: u64) -> Result<Vec<String>> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT recorded_at FROM repositories WHERE repo_id = ?1 ORDER BY id",
        )?;

        let stamps = stmt.query_map(params![repo_id], |row| row.get(0))?;
        stamps
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    pub fn file_signals(&self, repo_id: u64) -> Result<Vec<SignalRecord>> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        let mut stmt = conn.prepare(
            r#"
            SELECT repo_id, file_name, env_json, port_json, frameworks_json
            FROM file_signals
            WHERE repo_id = ?1
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map(params![repo_id], |row| {
            Ok((
                row.get::<_, u64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (repo_id, file_name, env_json, port_json, frameworks_json) = row?;
            let signals = FileSignals {
                env_assignments: serde_json::from_str(&env_json)?,
                port_references: serde_json::from_str(&port_json)?,
                frameworks: serde_json::from_str(&frameworks_json)?,
            };
            records.push(SignalRecord {
                repo_id,
                file_name,
                signals,
            });
        }
        Ok(records)
    }
}

impl SignalSink for Storage {
    fn record_repository(&self, record: &RepositoryRecord) -> Result<()> {
        let conn = self.conn.lock().expect("storage mutex poisoned");
        conn.execute(
            r#"
            INSERT INTO repositories (repo_id, name, html_url, recorded_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                record.repo_id,
                record.name,
                record.html_url,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn record_file(&self, record: &SignalRecord) -> Result<()> {
        let env_json = serde_json::to_string(&record.signals.env_assignments)?;
        let port_json = serde_json::to_string(&record.signals.port_references)?;
        let frameworks_json = serde_json::to_string(&record.signals.frameworks)?;

        let conn = self.conn.lock().expect("storage mutex poisoned");
        conn.execute(
            r#"
            INSERT INTO file_signals (repo_id, file_name, env_json, port_json, frameworks_json)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                record.repo_id,
                record.file_name,
                env_json,
                port_json,
                frameworks_json,
            ],
        )?;
        Ok(())
    }
}
