//! SQLite Store
//!
//! rusqlite-backed implementation of the store contract, for a local
//! single-file board. The connection is not Sync, so it sits behind a
//! tokio Mutex and each operation runs its statements under the guard.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, ToSql};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{position, Client, ClientPatch, DomainError, DomainResult, NewClient, Stage};
use super::traits::ClientStore;

/// SQLite implementation of the client store
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (and migrate) a board database at the given path
    pub fn open(path: &Path) -> DomainResult<Self> {
        let conn = Connection::open(path).map_err(|e| DomainError::Store(e.to_string()))?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory database, used in tests
    pub fn in_memory() -> DomainResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| DomainError::Store(e.to_string()))?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

/// Create the clients table if this is a fresh database
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS clients (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            phone TEXT,
            notes TEXT,
            stage TEXT NOT NULL DEFAULT 'new',
            position REAL NOT NULL,
            created_at INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| DomainError::Store(e.to_string()))?;
    Ok(())
}

/// Convert a database row to a Client
fn row_to_client(row: &rusqlite::Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        notes: row.get(3)?,
        stage: Stage::from_str(&row.get::<_, String>(4)?),
        position: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[async_trait]
impl ClientStore for SqliteStore {
    async fn list(&self) -> DomainResult<Vec<Client>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn
            .prepare(
                "SELECT id, name, phone, notes, stage, position, created_at
                 FROM clients ORDER BY position ASC, created_at DESC, id ASC",
            )
            .map_err(|e| DomainError::Store(e.to_string()))?;

        let rows = stmt
            .query_map([], row_to_client)
            .map_err(|e| DomainError::Store(e.to_string()))?;

        let mut clients = Vec::new();
        for row in rows {
            clients.push(row.map_err(|e| DomainError::Store(e.to_string()))?);
        }
        Ok(clients)
    }

    async fn insert(&self, fields: &NewClient) -> DomainResult<Client> {
        fields.validate()?;
        let conn = self.conn.lock().await;

        // NULL when the board is empty
        let max: Option<f64> = conn
            .query_row("SELECT MAX(position) FROM clients", [], |row| row.get(0))
            .map_err(|e| DomainError::Store(e.to_string()))?;

        let client = Client {
            id: Uuid::new_v4().to_string(),
            name: fields.name.clone(),
            phone: fields.phone.clone(),
            notes: fields.notes.clone(),
            stage: fields.stage,
            position: max.map_or_else(position::first_in_stage, position::append_after),
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        conn.execute(
            "INSERT INTO clients (id, name, phone, notes, stage, position, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                client.id,
                client.name,
                client.phone,
                client.notes,
                client.stage.as_str(),
                client.position,
                client.created_at
            ],
        )
        .map_err(|e| DomainError::Store(e.to_string()))?;

        Ok(client)
    }

    async fn update(&self, id: &str, patch: &ClientPatch) -> DomainResult<()> {
        patch.validate()?;
        if patch.is_empty() {
            return Ok(());
        }
        let conn = self.conn.lock().await;

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(name) = &patch.name {
            sets.push("name = ?");
            values.push(Box::new(name.clone()));
        }
        if let Some(phone) = &patch.phone {
            sets.push("phone = ?");
            values.push(Box::new(phone.clone()));
        }
        if let Some(notes) = &patch.notes {
            sets.push("notes = ?");
            values.push(Box::new(notes.clone()));
        }
        if let Some(stage) = patch.stage {
            sets.push("stage = ?");
            values.push(Box::new(stage.as_str()));
        }
        if let Some(pos) = patch.position {
            sets.push("position = ?");
            values.push(Box::new(pos));
        }
        values.push(Box::new(id.to_string()));

        let sql = format!("UPDATE clients SET {} WHERE id = ?", sets.join(", "));
        let changed = conn
            .execute(
                &sql,
                rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
            )
            .map_err(|e| DomainError::Store(e.to_string()))?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("client {}", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM clients WHERE id = ?", params![id])
            .map_err(|e| DomainError::Store(e.to_string()))?;
        Ok(())
    }
}
