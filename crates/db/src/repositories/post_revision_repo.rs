//! Repository for the `post_revisions` table.
//!
//! Revisions are immutable: this repository only inserts and reads.

use midnight_core::date::format_timestamp;
use midnight_core::types::{DbId, Timestamp};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqliteConnection};

use crate::error::{StoreError, StoreResult};
use crate::models::post_revision::PostRevision;
use crate::DbPool;

/// Column list shared across revision queries.
const COLUMNS: &str = "rev_id, rev_date, post_id, subject, body, slug";

/// Provides insert and read operations for post revisions.
pub struct PostRevisionRepo;

impl PostRevisionRepo {
    /// Insert a revision row and return its generated id.
    ///
    /// Runs on the caller's connection so it can take part in the caller's
    /// transaction.
    pub async fn insert(
        conn: &mut SqliteConnection,
        post_id: DbId,
        subject: &str,
        body: &str,
        slug: Option<&str>,
        date: &Timestamp,
    ) -> StoreResult<DbId> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "INSERT INTO post_revisions (rev_date, post_id, subject, body, slug)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING rev_id",
        )
        .bind(format_timestamp(date))
        .bind(post_id)
        .bind(subject)
        .bind(body)
        .bind(slug)
        .fetch_optional(&mut *conn)
        .await?;

        let (rev_id,) = row.ok_or(StoreError::InsertIdUnavailable {
            table: "post_revisions",
        })?;
        tracing::debug!(post_id, rev_id, "Revision inserted");
        Ok(rev_id)
    }

    /// Map a fetched row into a [`PostRevision`].
    pub fn decode(row: &SqliteRow) -> StoreResult<PostRevision> {
        Ok(PostRevision::from_row(row)?)
    }

    /// Find a revision by its id.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> StoreResult<Option<PostRevision>> {
        let query = format!("SELECT {COLUMNS} FROM post_revisions WHERE rev_id = $1");
        let row = sqlx::query(&query).bind(id).fetch_optional(pool).await?;
        row.as_ref().map(Self::decode).transpose()
    }

    /// List every revision of a post, newest first.
    pub async fn list_by_post(pool: &DbPool, post_id: DbId) -> StoreResult<Vec<PostRevision>> {
        let query = format!(
            "SELECT {COLUMNS} FROM post_revisions
             WHERE post_id = $1
             ORDER BY rev_id DESC"
        );
        let rows = sqlx::query(&query).bind(post_id).fetch_all(pool).await?;
        rows.iter().map(Self::decode).collect()
    }
}
