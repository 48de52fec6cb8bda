//! Pool creation, health check and migrations against real database files.

mod common;

use common::{new_post, test_pool};
use midnight_db::config::{DbConfig, DbLocation};
use midnight_db::repositories::PostRepo;

#[tokio::test]
async fn test_in_memory_bootstrap() {
    let pool = test_pool().await;
    midnight_db::health_check(&pool).await.unwrap();

    for table in ["posts", "post_revisions"] {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = $1")
                .bind(table)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 1, "{table} should exist");
    }
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let pool = test_pool().await;
    midnight_db::run_migrations(&pool).await.unwrap();
}

#[tokio::test]
async fn test_file_database_persists_across_pools() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("posts.sqlite");
    let config = DbConfig {
        location: DbLocation::File(path.clone()),
        max_connections: 2,
    };

    let pool = midnight_db::create_pool(&config).await.unwrap();
    midnight_db::run_migrations(&pool).await.unwrap();
    let post = PostRepo::create(&pool, &new_post("qux", "baz", Some("hello")))
        .await
        .unwrap();
    pool.close().await;
    assert!(path.exists());

    let pool = midnight_db::create_pool(&config).await.unwrap();
    let loaded = PostRepo::load_by_slug(&pool, "hello").await.unwrap();
    assert_eq!(loaded, post);
}
