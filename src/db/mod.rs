pub mod repository;
pub mod sqlite;

pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with number {number}")]
    NotFound { entity_type: String, number: i64 },

    #[error("Duplicate business key: {entity_type} number {number} already exists")]
    DuplicateKey { entity_type: String, number: i64 },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Corrupt stored document for {entity_type} {number}: {reason}")]
    CorruptDocument {
        entity_type: String,
        number: i64,
        reason: String,
    },
}
