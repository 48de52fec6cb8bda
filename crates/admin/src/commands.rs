//! Subcommand definitions and dispatch.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use midnight_core::types::DbId;
use midnight_db::models::post::CreatePost;
use midnight_db::models::post_revision::CreatePostRevision;
use midnight_db::repositories::{PostRepo, PostRevisionRepo};
use midnight_db::DbPool;

#[derive(Parser)]
#[command(name = "midnight-admin", about = "Manage the Midnight Post store")]
pub struct Cli {
    /// Database file, overriding DATABASE_PATH. An empty value uses memory.
    #[arg(long, global = true)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply schema migrations and exit
    Migrate,
    /// Create a post with its first revision
    New {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        slug: Option<String>,
    },
    /// Append a revision to an existing post
    Edit {
        id: DbId,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        slug: Option<String>,
    },
    /// Show a post by id or slug
    Show {
        #[arg(required_unless_present = "slug", conflicts_with = "slug")]
        id: Option<DbId>,
        #[arg(long)]
        slug: Option<String>,
    },
    /// List one page of posts, newest first
    List {
        #[arg(short, long, default_value = "0")]
        page: u32,
    },
    /// Print the total number of posts and pages
    Count,
    /// Show every revision of a post, newest first
    History { id: DbId },
}

/// Execute one command against an open, migrated pool.
pub async fn run(pool: &DbPool, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Migrate => {
            tracing::info!("Schema is up to date");
        }
        Command::New {
            subject,
            body,
            slug,
        } => {
            let post = PostRepo::create(pool, &CreatePost { subject, body, slug }).await?;
            tracing::info!(post_id = post.id, "Post created");
            print_json(&post)?;
        }
        Command::Edit {
            id,
            subject,
            body,
            slug,
        } => {
            let post = PostRepo::load_by_id(pool, id).await?;
            let revision =
                PostRepo::add_revision(pool, &post, &CreatePostRevision { subject, body, slug })
                    .await?;
            tracing::info!(post_id = id, rev_id = revision.id, "Revision added");
            print_json(&revision)?;
        }
        Command::Show { id, slug } => {
            let post = match (id, slug) {
                (Some(id), _) => PostRepo::load_by_id(pool, id).await?,
                (None, Some(slug)) => PostRepo::load_by_slug(pool, &slug).await?,
                (None, None) => anyhow::bail!("either an id or --slug is required"),
            };
            print_json(&post)?;
        }
        Command::List { page } => {
            if !PostRepo::page_exists(pool, page).await? {
                anyhow::bail!("page {page} is out of range");
            }
            let posts = PostRepo::list_newest(pool, page).await?;
            print_json(&posts)?;
        }
        Command::Count => {
            let count = PostRepo::count(pool).await?;
            print_json(&count)?;
        }
        Command::History { id } => {
            // Distinguish a missing post from one without history.
            PostRepo::load_by_id(pool, id).await?;
            let revisions = PostRevisionRepo::list_by_post(pool, id).await?;
            print_json(&revisions)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{out}");
    Ok(())
}
