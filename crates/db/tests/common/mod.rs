//! Shared helpers for storage integration tests.

#![allow(dead_code)]

use midnight_db::config::DbConfig;
use midnight_db::models::post::CreatePost;
use midnight_db::models::post_revision::CreatePostRevision;
use midnight_db::DbPool;

/// A fresh in-memory database with the schema applied.
pub async fn test_pool() -> DbPool {
    let pool = midnight_db::create_pool(&DbConfig::in_memory())
        .await
        .expect("in-memory pool should open");
    midnight_db::run_migrations(&pool)
        .await
        .expect("migrations should apply");
    pool
}

pub fn new_post(subject: &str, body: &str, slug: Option<&str>) -> CreatePost {
    CreatePost {
        subject: subject.to_string(),
        body: body.to_string(),
        slug: slug.map(str::to_string),
    }
}

pub fn new_revision(subject: &str, body: &str, slug: Option<&str>) -> CreatePostRevision {
    CreatePostRevision {
        subject: subject.to_string(),
        body: body.to_string(),
        slug: slug.map(str::to_string),
    }
}

/// Raw row count of a table, bypassing the repositories.
pub async fn row_count(pool: &DbPool, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| panic!("{table} count failed: {e}"));
    count
}
