//! Row models and input DTOs.
//!
//! Rows are decoded through hand-written `FromRow` impls so that the stored
//! text dates are parsed at the storage boundary. A row either decodes into
//! a fully populated record or fails with a column decode error.

pub mod post;
pub mod post_revision;

use midnight_core::date::parse_timestamp;
use midnight_core::types::Timestamp;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Read a stored date column.
pub(crate) fn decode_date(row: &SqliteRow, column: &str) -> Result<Timestamp, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    parse_timestamp(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
