use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags, Transaction, TransactionBehavior};
use tracing::debug;

use crate::Result;
use crate::db::migrations::run_migrations;

/// Pragmas applied to every connection
const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// Extra pragmas for on-disk databases
const FILE_PRAGMAS: &str = r#"
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous = NORMAL;
    PRAGMA cache_size = -20000;
"#;

/// Shared handle to the catalog database. Clones share one connection; calls
/// are serialised by the mutex.
#[derive(Clone)]
pub struct Database {
    location: PathBuf,
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (creating if needed) the database file at `path`, along with any
    /// missing parent directories.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let location = path.as_ref().to_path_buf();

        if let Some(dir) = location.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let conn = Connection::open_with_flags(
            &location,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch(FILE_PRAGMAS)?;

        Self::from_connection(conn, location)
    }

    /// Private database that lives as long as this handle (and its clones)
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, PathBuf::from(":memory:"))
    }

    fn from_connection(conn: Connection, location: PathBuf) -> Result<Self> {
        conn.execute_batch(CONNECTION_PRAGMAS)?;
        debug!(location = %location.display(), "opened catalog database");

        Ok(Self {
            location,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Bring the schema up to date
    pub fn migrate(&self) -> Result<()> {
        self.with_connection(run_migrations)
    }

    /// Runs `f` with exclusive access to the connection. Not reentrant:
    /// `f` must not call back into this handle.
    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.connection.lock();
        f(&mut conn)
    }

    /// Runs `f` in an IMMEDIATE transaction, taking the write lock up front.
    /// Commits on `Ok`; an `Err` drops the transaction, rolling it back.
    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction) -> Result<T>,
    {
        self.with_connection(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })
    }

    /// File path, or `:memory:`
    pub fn location(&self) -> &Path {
        &self.location
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn count_themes(db: &Database) -> i64 {
        db.with_connection(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM themes", [], |row| row.get(0))?)
        })
        .unwrap()
    }

    #[test]
    fn test_file_database_persists_across_handles() {
        let dir = std::env::temp_dir().join(format!("catalog_{}", uuid::Uuid::new_v4()));
        let db_path = dir.join("nested").join("catalog.db");

        let db = Database::new(&db_path).unwrap();
        db.migrate().unwrap();
        db.with_connection(|conn| {
            conn.execute("INSERT INTO themes (theme_id, name) VALUES ('t1', 'Space')", [])?;
            Ok(())
        })
        .unwrap();
        assert_eq!(db.location(), db_path.as_path());
        drop(db);

        let reopened = Database::new(&db_path).unwrap();
        reopened.migrate().unwrap();
        assert_eq!(count_themes(&reopened), 1);

        drop(reopened);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();

        let result: Result<()> = db.transaction(|tx| {
            tx.execute("INSERT INTO themes (theme_id, name) VALUES ('t1', 'Space')", [])?;
            Err(Error::Internal("abort".into()))
        });
        assert!(result.is_err());
        assert_eq!(count_themes(&db), 0);

        db.transaction(|tx| {
            tx.execute("INSERT INTO themes (theme_id, name) VALUES ('t2', 'Ocean')", [])?;
            Ok(())
        })
        .unwrap();
        assert_eq!(count_themes(&db), 1);
    }

    #[test]
    fn test_foreign_keys_enforced_in_memory() {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();

        let result = db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO game_themes (game_id, theme_id) VALUES ('nope', 'nope')",
                [],
            )?;
            Ok(())
        });
        assert!(matches!(result, Err(Error::Database(_))));
    }
}
