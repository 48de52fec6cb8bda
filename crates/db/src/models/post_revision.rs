//! Post revision entity model and DTO.

use midnight_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use super::decode_date;

/// A row from the `post_revisions` table. Never modified after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRevision {
    pub id: DbId,
    pub post_id: DbId,
    pub subject: String,
    pub body: String,
    pub slug: Option<String>,
    pub revision_date: Timestamp,
}

impl<'r> FromRow<'r, SqliteRow> for PostRevision {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("rev_id")?,
            post_id: row.try_get("post_id")?,
            subject: row.try_get("subject")?,
            body: row.try_get("body")?,
            slug: row.try_get("slug")?,
            revision_date: decode_date(row, "rev_date")?,
        })
    }
}

/// DTO for appending a revision to an existing post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostRevision {
    pub subject: String,
    pub body: String,
    pub slug: Option<String>,
}
