//! Offset pagination over posts ordered newest first.

use serde::Serialize;

use crate::error::CoreError;

/// Default number of posts on one page.
pub const POSTS_PER_PAGE: u32 = 10;

/// Total posts and the number of pages they fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PostCount {
    pub posts: i64,
    pub pages: i64,
}

impl PostCount {
    /// Derive the page count for `posts` rows at `page_size` per page.
    ///
    /// An empty store has zero pages, not one empty page.
    pub fn new(posts: i64, page_size: u32) -> Self {
        if posts <= 0 {
            return Self { posts: 0, pages: 0 };
        }
        let size = i64::from(page_size.max(1));
        Self {
            posts,
            pages: (posts + size - 1) / size,
        }
    }
}

/// Reject a zero page size before it reaches a `LIMIT` clause.
pub fn validate_page_size(page_size: u32) -> Result<(), CoreError> {
    if page_size == 0 {
        return Err(CoreError::Validation(
            "Page size must be at least 1".into(),
        ));
    }
    Ok(())
}

/// Row offset of the first post on `page`.
///
/// Fails when the offset does not fit in a signed 64-bit `OFFSET`.
pub fn page_offset(page: u32, page_size: u32) -> Result<i64, CoreError> {
    i64::from(page)
        .checked_mul(i64::from(page_size))
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Page {page} at {page_size} posts per page is out of range"
            ))
        })
}
