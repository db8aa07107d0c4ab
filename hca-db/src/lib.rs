//! Read-only SQLite database layer for Hawaii climate station data.
//!
//! This crate opens the externally provisioned climate SQLite file and
//! exposes typed query methods for the aggregations the HTTP API serves.
//!
//! # Architecture
//!
//! - Connections are pooled via `r2d2` and opened read-only; the dataset is
//!   never written by this process.
//! - The expected schema is declared statically in [`schema`] and checked
//!   against the live file when the database is opened, so a drifted or
//!   truncated file fails at startup rather than mid-request.
//! - Query methods acquire a pooled connection for their own scope; the
//!   connection returns to the pool on every exit path, including errors.
//! - Results are serializable structs from [`models`] for JSON responses.
//!
//! # Usage
//!
//! ```no_run
//! use hca_db::Database;
//!
//! let db = Database::open("resources/hawaii.sqlite").unwrap();
//! let names = db.station_names().unwrap();
//! let recent = db.precipitation_by_date().unwrap();
//! ```
//!
//! # Tables
//!
//! See [`schema::REQUIRED_TABLES`] for the columns checked at startup.
//!
//! - `measurement` - Daily precipitation and temperature observations
//! - `station` - Station metadata (only `name` is served by an endpoint)

pub mod dates;
mod error;
pub mod models;
mod queries;
pub mod schema;

pub use error::DbError;

use std::path::{Path, PathBuf};

use r2d2::{Pool, PooledConnection};
use rusqlite::{Connection, OpenFlags};

/// Opens read-only connections to the climate SQLite file for the pool.
///
/// Implemented in-crate (rather than via `r2d2_sqlite`) so `rusqlite` stays
/// at the workspace-pinned version.
#[derive(Debug)]
pub struct ReadOnlyManager {
    path: PathBuf,
}

impl r2d2::ManageConnection for ReadOnlyManager {
    type Connection = Connection;
    type Error = rusqlite::Error;

    fn connect(&self) -> Result<Connection, rusqlite::Error> {
        open_read_only(&self.path)
    }

    fn is_valid(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.query_row("SELECT 1", [], |_| Ok(()))
    }

    fn has_broken(&self, _conn: &mut Connection) -> bool {
        false
    }
}

fn open_read_only(path: &Path) -> Result<Connection, rusqlite::Error> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
}

/// Pooled handle to the climate SQLite file.
///
/// Cheaply cloneable; clones share the same underlying pool, so one handle
/// can be passed into each HTTP route handler.
#[derive(Clone)]
pub struct Database {
    pool: Pool<ReadOnlyManager>,
}

impl Database {
    /// Open the climate database at `path` and verify its schema.
    ///
    /// The schema check runs on a direct probe connection; the pool only
    /// ever sees a validated file. A missing file, an unreadable file, or a
    /// table missing a required column all error here.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let path = path.as_ref().to_path_buf();
        let probe = open_read_only(&path)?;
        schema::check(&probe)?;
        drop(probe);

        let pool = Pool::new(ReadOnlyManager { path })?;
        Ok(Self { pool })
    }

    pub(crate) fn conn(&self) -> Result<PooledConnection<ReadOnlyManager>, DbError> {
        Ok(self.pool.get()?)
    }
}
