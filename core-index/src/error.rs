use thiserror::Error;

/// Errors from the checksum index.
///
/// Any value of this type is fatal for the sync run: the index is
/// load-bearing, and degrading a failed lookup into "not found" would cause
/// redundant downloads. "Not found" is expressed as `Ok(None)` by the lookup
/// operations, never as an error.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;
