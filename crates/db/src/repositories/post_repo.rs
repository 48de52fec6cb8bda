//! Repository for the `posts` table.
//!
//! The only place that maintains the current-revision pointer and slug
//! uniqueness. Every multi-statement write runs in one transaction, so
//! readers never see a post without a valid current revision.
//!
//! Write transactions open with `BEGIN IMMEDIATE`: the write lock is taken
//! before the slug check, so concurrent writers queue on the busy timeout
//! instead of failing with `SQLITE_BUSY` when a read lock upgrades.

use midnight_core::date::{self, format_timestamp};
use midnight_core::pagination::{page_offset, validate_page_size, PostCount, POSTS_PER_PAGE};
use midnight_core::post::{normalize_slug, validate_post_input};
use midnight_core::types::{DbId, Timestamp};
use sqlx::{Sqlite, SqliteConnection, Transaction};

use crate::error::{StoreError, StoreResult};
use crate::models::post::{CreatePost, Post, PostRow};
use crate::models::post_revision::{CreatePostRevision, PostRevision};
use crate::repositories::post_revision_repo::PostRevisionRepo;
use crate::DbPool;

/// Pointer value held by a post row between its insert and the insert of
/// its first revision. Never visible outside the creating transaction.
pub const UNSET_REVISION_ID: DbId = 0;

/// Columns of a post joined to its current revision.
const POST_COLUMNS: &str = "p.post_id, p.post_date, r.rev_id, r.rev_date, r.subject, r.body, r.slug";

/// Provides creation, revisioning and read operations for posts.
pub struct PostRepo;

impl PostRepo {
    // ── Writes ───────────────────────────────────────────────────────

    /// Create a post together with its first revision.
    ///
    /// Fails with [`StoreError::DuplicateSlug`] if any other post has ever
    /// used `input.slug`; nothing is written in that case.
    pub async fn create(pool: &DbPool, input: &CreatePost) -> StoreResult<Post> {
        let slug = normalize_slug(input.slug.as_deref());
        validate_post_input(&input.subject, &input.body, slug)?;
        let now = date::now();

        let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;
        match Self::create_in(&mut *tx, &input.subject, &input.body, slug, &now).await {
            Ok(post) => {
                tx.commit().await?;
                tracing::debug!(
                    post_id = post.id,
                    rev_id = post.latest_revision.id,
                    "Post created"
                );
                Ok(post)
            }
            Err(err) => {
                rollback(tx, &err).await;
                Err(err)
            }
        }
    }

    async fn create_in(
        conn: &mut SqliteConnection,
        subject: &str,
        body: &str,
        slug: Option<&str>,
        now: &Timestamp,
    ) -> StoreResult<Post> {
        if let Some(slug) = slug {
            ensure_slug_free(conn, slug, None).await?;
        }

        let row: Option<(DbId,)> = sqlx::query_as(
            "INSERT INTO posts (post_date, rev_id) VALUES ($1, $2) RETURNING post_id",
        )
        .bind(format_timestamp(now))
        .bind(UNSET_REVISION_ID)
        .fetch_optional(&mut *conn)
        .await?;
        let (post_id,) = row.ok_or(StoreError::InsertIdUnavailable { table: "posts" })?;

        let rev_id = PostRevisionRepo::insert(conn, post_id, subject, body, slug, now).await?;
        set_current_revision(conn, post_id, rev_id).await?;

        Ok(Post {
            id: post_id,
            creation_date: *now,
            latest_revision: PostRevision {
                id: rev_id,
                post_id,
                subject: subject.to_string(),
                body: body.to_string(),
                slug: slug.map(str::to_string),
                revision_date: *now,
            },
        })
    }

    /// Append a revision to `post` and make it current.
    ///
    /// The post may reuse a slug from its own history. `post` itself is not
    /// updated; reload it to see the new revision.
    pub async fn add_revision(
        pool: &DbPool,
        post: &Post,
        input: &CreatePostRevision,
    ) -> StoreResult<PostRevision> {
        let slug = normalize_slug(input.slug.as_deref());
        validate_post_input(&input.subject, &input.body, slug)?;
        let now = date::now();

        let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;
        match Self::add_revision_in(&mut *tx, post.id, &input.subject, &input.body, slug, &now)
            .await
        {
            Ok(revision) => {
                tx.commit().await?;
                tracing::debug!(post_id = post.id, rev_id = revision.id, "Revision added");
                Ok(revision)
            }
            Err(err) => {
                rollback(tx, &err).await;
                Err(err)
            }
        }
    }

    async fn add_revision_in(
        conn: &mut SqliteConnection,
        post_id: DbId,
        subject: &str,
        body: &str,
        slug: Option<&str>,
        now: &Timestamp,
    ) -> StoreResult<PostRevision> {
        ensure_post_exists(conn, post_id).await?;
        if let Some(slug) = slug {
            ensure_slug_free(conn, slug, Some(post_id)).await?;
        }

        let rev_id = PostRevisionRepo::insert(conn, post_id, subject, body, slug, now).await?;
        set_current_revision(conn, post_id, rev_id).await?;

        Ok(PostRevision {
            id: rev_id,
            post_id,
            subject: subject.to_string(),
            body: body.to_string(),
            slug: slug.map(str::to_string),
            revision_date: *now,
        })
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Find a post and its current revision by post id.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> StoreResult<Option<Post>> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts p
             JOIN post_revisions r ON r.rev_id = p.rev_id AND r.post_id = p.post_id
             WHERE p.post_id = $1
             LIMIT 1"
        );
        Ok(sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    /// Load a post by id, failing with [`StoreError::NotFound`] if absent.
    pub async fn load_by_id(pool: &DbPool, id: DbId) -> StoreResult<Post> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                entity: "post",
                key: id.to_string(),
            })
    }

    /// Load the post owning any revision, current or superseded, that
    /// carries `slug`. The post is returned with its current revision.
    pub async fn load_by_slug(pool: &DbPool, slug: &str) -> StoreResult<Post> {
        let slug = slug.trim();
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts p
             JOIN post_revisions r ON r.rev_id = p.rev_id AND r.post_id = p.post_id
             WHERE p.post_id = (
                 SELECT s.post_id FROM post_revisions s
                 WHERE s.slug = $1
                 ORDER BY s.rev_id DESC
                 LIMIT 1
             )
             LIMIT 1"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                entity: "post",
                key: format!("slug '{slug}'"),
            })
    }

    /// Fetch the bare post row, including the raw current-revision pointer.
    pub async fn find_row(pool: &DbPool, id: DbId) -> StoreResult<Option<PostRow>> {
        Ok(sqlx::query_as::<_, PostRow>(
            "SELECT post_id, post_date, rev_id FROM posts WHERE post_id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?)
    }

    /// One page of posts, newest first, at the default page size.
    pub async fn list_newest(pool: &DbPool, page: u32) -> StoreResult<Vec<Post>> {
        Self::list_newest_with_size(pool, page, POSTS_PER_PAGE).await
    }

    /// One page of posts, newest first, ordered by descending post id.
    pub async fn list_newest_with_size(
        pool: &DbPool,
        page: u32,
        page_size: u32,
    ) -> StoreResult<Vec<Post>> {
        validate_page_size(page_size)?;
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts p
             JOIN post_revisions r ON r.rev_id = p.rev_id AND r.post_id = p.post_id
             ORDER BY p.post_id DESC
             LIMIT $1 OFFSET $2"
        );
        Ok(sqlx::query_as::<_, Post>(&query)
            .bind(i64::from(page_size))
            .bind(page_offset(page, page_size)?)
            .fetch_all(pool)
            .await?)
    }

    /// Total posts and pages at the default page size.
    pub async fn count(pool: &DbPool) -> StoreResult<PostCount> {
        Self::count_with_size(pool, POSTS_PER_PAGE).await
    }

    pub async fn count_with_size(pool: &DbPool, page_size: u32) -> StoreResult<PostCount> {
        validate_page_size(page_size)?;
        let (posts,): (i64,) = sqlx::query_as("SELECT COUNT(post_id) FROM posts")
            .fetch_one(pool)
            .await?;
        Ok(PostCount::new(posts, page_size))
    }

    /// Whether `page` is in range at the default page size. Page 0 always
    /// exists so an empty store still has a front page.
    pub async fn page_exists(pool: &DbPool, page: u32) -> StoreResult<bool> {
        let count = Self::count(pool).await?;
        Ok(i64::from(page) <= count.pages)
    }

    /// Whether any revision carries `slug`, ignoring revisions of
    /// `excluding_post_id` when given.
    pub async fn slug_in_use(
        pool: &DbPool,
        slug: &str,
        excluding_post_id: Option<DbId>,
    ) -> StoreResult<bool> {
        let Some(slug) = normalize_slug(Some(slug)) else {
            return Ok(false);
        };
        let mut conn = pool.acquire().await?;
        slug_taken(&mut *conn, slug, excluding_post_id).await
    }
}

async fn slug_taken(
    conn: &mut SqliteConnection,
    slug: &str,
    excluding_post_id: Option<DbId>,
) -> StoreResult<bool> {
    let (taken,): (i64,) = sqlx::query_as(
        "SELECT EXISTS (
             SELECT 1 FROM post_revisions
             WHERE slug = $1 AND ($2 IS NULL OR post_id <> $2)
         )",
    )
    .bind(slug)
    .bind(excluding_post_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(taken != 0)
}

async fn ensure_slug_free(
    conn: &mut SqliteConnection,
    slug: &str,
    excluding_post_id: Option<DbId>,
) -> StoreResult<()> {
    if slug_taken(conn, slug, excluding_post_id).await? {
        tracing::warn!(slug, ?excluding_post_id, "Slug already in use by another post");
        return Err(StoreError::DuplicateSlug(slug.to_string()));
    }
    Ok(())
}

async fn set_current_revision(
    conn: &mut SqliteConnection,
    post_id: DbId,
    rev_id: DbId,
) -> StoreResult<()> {
    sqlx::query("UPDATE posts SET rev_id = $1 WHERE post_id = $2")
        .bind(rev_id)
        .bind(post_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn ensure_post_exists(conn: &mut SqliteConnection, post_id: DbId) -> StoreResult<()> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM posts WHERE post_id = $1")
        .bind(post_id)
        .fetch_optional(&mut *conn)
        .await?;
    if row.is_none() {
        return Err(StoreError::NotFound {
            entity: "post",
            key: post_id.to_string(),
        });
    }
    Ok(())
}

/// Roll back a failed write. Rollback failures are logged; the caller sees
/// the write error.
async fn rollback(tx: Transaction<'_, Sqlite>, err: &StoreError) {
    if let Err(rollback_err) = tx.rollback().await {
        tracing::error!(error = %rollback_err, "Transaction rollback failed");
    }
    tracing::warn!(error = %err, "Transaction rolled back");
}
