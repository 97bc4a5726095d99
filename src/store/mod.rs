//! Index storage using SQLite
//!
//! This module owns the on-disk store: table layout, the schema-version
//! marker, and connection handling for both the writable ingest path and the
//! read-only query path. Opening an existing store always validates its
//! layout against the expected one; a store produced by an incompatible
//! engine version is rejected rather than silently read or written.

mod schema;

pub use schema::*;

use crate::error::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{FromRow, Row};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A query result row: one VRS-identified allele observation
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct VrsLocation {
    pub vrs_id: String,
    pub chr: String,
    pub pos: i64,
}

/// Index database handle
pub struct IndexDb {
    pool: SqlitePool,
    path: PathBuf,
}

impl IndexDb {
    /// Open the store at `path` for writing, creating it (and its parent
    /// directories) if missing. An existing store is validated against the
    /// expected table layout and schema-version marker.
    pub async fn open_or_create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let existed = path.is_file();

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        debug!("Opening index store at {:?}", path);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| classify_store_error(e, path))?;

        let db = Self {
            pool,
            path: path.to_path_buf(),
        };

        if existed {
            let tables = db.table_names().await?;
            if tables.is_empty() {
                db.init_schema().await?;
            } else {
                db.validate_schema().await?;
            }
        } else {
            db.init_schema().await?;
        }

        Ok(db)
    }

    /// Open an existing store read-only, scoped to a single query call.
    /// Validates the layout the same way the writable path does; a store
    /// produced by an incompatible engine version is never silently read.
    pub async fn open_read_only(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);

        debug!("Opening read-only connection to {:?}", path);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| classify_store_error(e, path))?;

        let db = Self {
            pool,
            path: path.to_path_buf(),
        };

        let validated = db.validate_schema().await;
        if let Err(e) = validated {
            db.close().await;
            return Err(e);
        }

        Ok(db)
    }

    /// Lay down tables and stamp the schema-version marker
    async fn init_schema(&self) -> Result<()> {
        info!("Initializing index schema at {:?}", self.path);
        sqlx::query(SCHEMA_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| self.classify(e))?;
        sqlx::query(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Compare the store's actual layout against the expected one
    async fn validate_schema(&self) -> Result<()> {
        let version = self.user_version().await?;
        let mut tables = Vec::new();
        for name in self.table_names().await? {
            let columns = self.table_columns(&name).await?;
            tables.push((name, columns));
        }

        let expected = expected_layout();
        let found = layout_description(version, &tables);
        if found != expected {
            return Err(Error::SchemaMismatch {
                path: self.path.clone(),
                expected,
                found,
            });
        }
        Ok(())
    }

    async fn user_version(&self) -> Result<i64> {
        let (version,): (i64,) = sqlx::query_as("PRAGMA user_version")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| self.classify(e))?;
        Ok(version)
    }

    async fn table_names(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| self.classify(e))?;
        Ok(rows.iter().map(|row| row.get("name")).collect())
    }

    async fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        // PRAGMA arguments cannot be bound; `table` only ever comes from
        // sqlite_master, not caller input.
        let rows = sqlx::query(&format!("PRAGMA table_info({table})"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| self.classify(e))?;
        Ok(rows.iter().map(|row| row.get("name")).collect())
    }

    /// The underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections; queries call this on every exit path
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn classify(&self, e: sqlx::Error) -> Error {
        classify_store_error(e, &self.path)
    }
}

/// Distinguish "this path is not a SQLite database at all" from other store
/// access failures
fn classify_store_error(e: sqlx::Error, path: &Path) -> Error {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.message().contains("file is not a database") {
            return Error::StoreFile(path.to_path_buf());
        }
    }
    Error::Store(e)
}
