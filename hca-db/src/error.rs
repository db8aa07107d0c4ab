use thiserror::Error;

/// Errors surfaced by the database layer.
#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("could not acquire a database connection")]
    Pool(#[from] r2d2::Error),

    #[error("schema mismatch: table '{table}' is missing column '{column}'")]
    SchemaMismatch { table: String, column: String },

    #[error("schema mismatch: required table '{0}' does not exist")]
    MissingTable(String),

    #[error("unparseable date '{0}' in measurement table")]
    InvalidStoredDate(String),
}
