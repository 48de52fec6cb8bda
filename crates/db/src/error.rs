//! Error taxonomy for the storage engine.
//!
//! Every failure reaches the caller as a [`StoreError`]; nothing is retried
//! and nothing is swallowed.

use midnight_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database could not be reached or the pool is unusable.
    #[error("Storage connection error: {0}")]
    StorageConnection(#[source] sqlx::Error),

    /// A statement was rejected by the database (syntax, constraint, ...).
    #[error("Query execution error: {0}")]
    QueryExecution(#[source] sqlx::Error),

    /// A fetched row was missing a column or held a value of the wrong type.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Another post already carries this slug.
    #[error("Slug already in use: {0}")]
    DuplicateSlug(String),

    /// An insert succeeded but no generated id came back.
    #[error("No generated id returned from insert into {table}")]
    InsertIdUnavailable { table: &'static str },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Convenience alias for repository return values.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_duplicate_slug(&self) -> bool {
        matches!(self, StoreError::DuplicateSlug(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if is_decode_error(&err) {
            StoreError::Decode(err.to_string())
        } else if is_connection_error(&err) {
            StoreError::StorageConnection(err)
        } else {
            StoreError::QueryExecution(err)
        }
    }
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => StoreError::Validation(msg),
            invalid @ CoreError::InvalidTimestamp { .. } => StoreError::Decode(invalid.to_string()),
        }
    }
}

fn is_decode_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. }
            | sqlx::Error::Decode(_)
    )
}

fn is_connection_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn pool_failures_are_connection_errors() {
        assert_matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::StorageConnection(_)
        );
        assert_matches!(
            StoreError::from(sqlx::Error::PoolClosed),
            StoreError::StorageConnection(_)
        );
    }

    #[test]
    fn missing_column_is_decode_error() {
        assert_matches!(
            StoreError::from(sqlx::Error::ColumnNotFound("subject".into())),
            StoreError::Decode(msg) if msg.contains("subject")
        );
    }

    #[test]
    fn other_failures_are_query_errors() {
        assert_matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::QueryExecution(_)
        );
    }

    #[test]
    fn core_errors_map_to_store_variants() {
        assert_matches!(
            StoreError::from(CoreError::Validation("Subject must not be empty".into())),
            StoreError::Validation(_)
        );
        assert_matches!(
            StoreError::from(CoreError::InvalidTimestamp {
                value: "x".into(),
                reason: "bad".into(),
            }),
            StoreError::Decode(_)
        );
    }

    #[test]
    fn helper_predicates() {
        let not_found = StoreError::NotFound {
            entity: "post",
            key: "7".into(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_duplicate_slug());
        assert!(StoreError::DuplicateSlug("hello".into()).is_duplicate_slug());
    }
}
