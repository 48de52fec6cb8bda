//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&DbPool` (or, inside a transaction, `&mut SqliteConnection`) as
//! the first argument.

pub mod post_repo;
pub mod post_revision_repo;

pub use post_repo::PostRepo;
pub use post_revision_repo::PostRevisionRepo;
