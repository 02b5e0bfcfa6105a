use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use tcg_shelf_core::{CardRecord, SetRecord, StoredCard};

use crate::error::StoreError;
use crate::schema::{self, SchemaError};
use crate::{operations, queries};

/// The collection database shared by all request handlers.
///
/// Owns a single SQLite connection. Each operation takes the lock for its
/// own duration only; write operations run in their own transaction.
pub struct CollectionStore {
    conn: Mutex<Connection>,
}

impl CollectionStore {
    /// Open (or create) the collection database at `path`.
    pub fn open(path: &Path) -> Result<Self, SchemaError> {
        Ok(Self::from_connection(schema::open_database(path)?))
    }

    /// An empty in-memory collection.
    pub fn open_memory() -> Result<Self, SchemaError> {
        Ok(Self::from_connection(schema::open_memory()?))
    }

    /// Wrap a connection that already has the schema.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    pub fn ensure_set(&self, id: &str, name: &str) -> Result<SetRecord, StoreError> {
        let conn = self.lock()?;
        operations::ensure_set(&conn, id, name)
    }

    pub fn create_card(&self, card: &CardRecord) -> Result<String, StoreError> {
        let mut conn = self.lock()?;
        operations::create_card(&mut conn, card).inspect_err(|e| {
            log::info!("Card '{}' not saved: {e}", card.id);
        })
    }

    pub fn list_cards(&self, name_filter: Option<&str>) -> Result<Vec<StoredCard>, StoreError> {
        let conn = self.lock()?;
        queries::list_cards(&conn, name_filter)
    }

    pub fn get_card(&self, id: &str) -> Result<Option<StoredCard>, StoreError> {
        let conn = self.lock()?;
        queries::get_card(&conn, id)
    }

    pub fn delete_card(&self, id: &str) -> Result<String, StoreError> {
        let mut conn = self.lock()?;
        operations::delete_card(&mut conn, id).inspect_err(|e| {
            log::info!("Card '{id}' not deleted: {e}");
        })
    }

    pub fn list_sets(&self) -> Result<Vec<SetRecord>, StoreError> {
        let conn = self.lock()?;
        queries::list_sets(&conn)
    }
}
