//! Domain vocabulary shared by the storage engine and its hosts.
//!
//! This crate has no database dependency: it holds the primary-key and
//! timestamp aliases, the fixed storage date format, pagination arithmetic
//! and input validation for posts.

pub mod date;
pub mod error;
pub mod pagination;
pub mod post;
pub mod types;
