//! Error types for the data layer.

use palisade_types::EnumParseError;

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored string did not decode to a known enum variant.
    #[error("corrupt row: {0}")]
    CorruptRow(#[from] EnumParseError),

    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
