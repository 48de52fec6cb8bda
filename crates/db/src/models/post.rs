//! Post entity models and DTO.

use midnight_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use super::decode_date;
use super::post_revision::PostRevision;

/// A bare row from the `posts` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRow {
    pub id: DbId,
    pub creation_date: Timestamp,
    /// Pointer to the live revision.
    pub current_revision_id: DbId,
}

impl<'r> FromRow<'r, SqliteRow> for PostRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("post_id")?,
            creation_date: decode_date(row, "post_date")?,
            current_revision_id: row.try_get("rev_id")?,
        })
    }
}

/// A post together with its current revision.
///
/// This is a snapshot: appending a revision does not update a `Post` value
/// already held by the caller. Reload it to observe the new revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: DbId,
    pub creation_date: Timestamp,
    pub latest_revision: PostRevision,
}

impl Post {
    pub fn current_revision_id(&self) -> DbId {
        self.latest_revision.id
    }

    pub fn subject(&self) -> &str {
        &self.latest_revision.subject
    }

    pub fn body(&self) -> &str {
        &self.latest_revision.body
    }

    pub fn slug(&self) -> Option<&str> {
        self.latest_revision.slug.as_deref()
    }
}

/// Decodes a `posts` row joined to its current revision.
impl<'r> FromRow<'r, SqliteRow> for Post {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("post_id")?,
            creation_date: decode_date(row, "post_date")?,
            latest_revision: PostRevision::from_row(row)?,
        })
    }
}

/// DTO for creating a post with its first revision.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub subject: String,
    pub body: String,
    pub slug: Option<String>,
}
