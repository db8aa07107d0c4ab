//! Static schema declaration and startup verification.
//!
//! The climate SQLite file is provisioned out-of-band and opened read-only,
//! so instead of CREATE TABLE statements this module declares the tables
//! and columns the queries depend on and checks them against the live file
//! via `PRAGMA table_info`.

use rusqlite::Connection;

use crate::DbError;

/// Tables and columns the query layer requires.
///
/// `measurement` holds one observation per row: precipitation (`prcp`) and
/// temperature (`tobs`) are both nullable. `station` holds one metadata row
/// per station; only `name` is served by an endpoint, but the full column
/// set is checked so a truncated file is caught up front.
pub const REQUIRED_TABLES: &[(&str, &[&str])] = &[
    ("measurement", &["id", "station", "date", "prcp", "tobs"]),
    (
        "station",
        &["id", "station", "name", "latitude", "longitude", "elevation"],
    ),
];

/// Verify that `conn` exposes every table and column in [`REQUIRED_TABLES`].
///
/// Returns [`DbError::MissingTable`] or [`DbError::SchemaMismatch`] on the
/// first discrepancy found.
pub fn check(conn: &Connection) -> Result<(), DbError> {
    for (table, columns) in REQUIRED_TABLES {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let present: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;

        if present.is_empty() {
            return Err(DbError::MissingTable(table.to_string()));
        }
        for column in *columns {
            if !present.iter().any(|c| c == column) {
                return Err(DbError::SchemaMismatch {
                    table: table.to_string(),
                    column: column.to_string(),
                });
            }
        }
    }
    Ok(())
}
