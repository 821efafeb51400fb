use super::{PersistenceError, PersistenceResult, RegisterStore};
use crate::record::MaintenanceRecord;
use crate::register::MaintenanceRegister;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;
use tracing::debug;

pub struct SqliteRegisterStore {
    connection: Mutex<Connection>,
}

impl SqliteRegisterStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS register_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                saved_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS maintenance_records (
                id INTEGER PRIMARY KEY,
                next_due TEXT,
                record_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> PersistenceResult<std::sync::MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| PersistenceError::InvalidData("sqlite connection mutex poisoned".into()))
    }

    fn save_records(
        &self,
        tx: &rusqlite::Transaction,
        register: &MaintenanceRegister,
    ) -> PersistenceResult<()> {
        tx.execute("DELETE FROM maintenance_records", [])?;
        let mut stmt = tx.prepare(
            "INSERT INTO maintenance_records (id, next_due, record_json) VALUES (?1, ?2, ?3)",
        )?;
        for record in register.records() {
            let json = serde_json::to_string(record)?;
            let next_due = record.next_due.map(|d| d.to_string());
            stmt.execute(params![record.id, next_due, json])?;
        }
        Ok(())
    }
}

impl RegisterStore for SqliteRegisterStore {
    fn save_register(&self, register: &MaintenanceRegister) -> PersistenceResult<()> {
        super::validate_records(register.records())?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO register_state (id, saved_at) VALUES (1, ?1)",
            params![Utc::now().to_rfc3339()],
        )?;
        self.save_records(&tx, register)?;
        tx.commit()?;
        debug!(records = register.len(), "saved register to sqlite");
        Ok(())
    }

    fn load_register(&self) -> PersistenceResult<Option<MaintenanceRegister>> {
        let conn = self.lock()?;

        let saved_at: Option<String> = conn
            .query_row("SELECT saved_at FROM register_state WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        if saved_at.is_none() {
            return Ok(None);
        }

        let mut stmt = conn.prepare("SELECT record_json FROM maintenance_records ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for json in rows {
            let json = json?;
            let record: MaintenanceRecord = serde_json::from_str(&json)?;
            records.push(record);
        }

        super::validate_records(&records)?;
        Ok(Some(MaintenanceRegister::from_records(records)?))
    }
}
