//! `midnight-admin` -- operator CLI for the post store.
//!
//! Opens the configured database, applies migrations and runs one store
//! operation. Results are printed as JSON on stdout; logs go to stderr.
//!
//! # Environment variables
//!
//! | Variable             | Default                                 | Description                    |
//! |----------------------|-----------------------------------------|--------------------------------|
//! | `DATABASE_PATH`      | `~/Databases/midnight-post.sqlite`      | Database file, empty = memory  |
//! | `TEST_MODE`          | `false`                                 | Use `TEST_DATABASE_PATH`       |
//! | `TEST_DATABASE_PATH` | `~/Databases/midnight-post-test.sqlite` | Database file in test mode     |
//! | `DB_MAX_CONNECTIONS` | `5`                                     | Pool size                      |
//! | `RUST_LOG`           | `midnight_admin=info,midnight_db=info`  | Log filter                     |

mod commands;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use midnight_db::config::DbConfig;

use commands::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "midnight_admin=info,midnight_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = DbConfig::from_env();
    if let Some(path) = cli.database.as_deref() {
        config = config.with_path(path);
    }
    tracing::info!(location = ?config.location, "Opening database");

    let pool = midnight_db::create_pool(&config).await?;
    midnight_db::health_check(&pool).await?;
    midnight_db::run_migrations(&pool).await?;
    tracing::debug!("Database migrations applied");

    let result = commands::run(&pool, cli.command).await;
    pool.close().await;
    result
}
