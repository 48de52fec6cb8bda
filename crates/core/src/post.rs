//! Validation of post input before it is written.
//!
//! Callers are expected to hand the store already-parsed strings; these
//! checks guard the invariants the schema itself cannot express.

use crate::error::CoreError;

/// Maximum slug length in characters, matching the `VARCHAR(255)` column.
pub const MAX_SLUG_LEN: usize = 255;

/// Validate a post subject (non-empty after trimming).
pub fn validate_subject(subject: &str) -> Result<(), CoreError> {
    if subject.trim().is_empty() {
        return Err(CoreError::Validation("Subject must not be empty".into()));
    }
    Ok(())
}

/// Validate a post body (non-empty after trimming).
pub fn validate_body(body: &str) -> Result<(), CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::Validation("Body must not be empty".into()));
    }
    Ok(())
}

/// Validate a slug (at most [`MAX_SLUG_LEN`] characters).
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.chars().count() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "Slug must be at most {MAX_SLUG_LEN} characters"
        )));
    }
    Ok(())
}

/// Trim surrounding whitespace from a slug; a blank slug becomes no slug.
pub fn normalize_slug(slug: Option<&str>) -> Option<&str> {
    slug.map(str::trim).filter(|s| !s.is_empty())
}

/// Validate a full subject/body/slug triple.
pub fn validate_post_input(subject: &str, body: &str, slug: Option<&str>) -> Result<(), CoreError> {
    validate_subject(subject)?;
    validate_body(body)?;
    if let Some(slug) = slug {
        validate_slug(slug)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_subject_rejected() {
        assert!(validate_subject("   ").is_err());
        assert!(validate_subject("qux").is_ok());
    }

    #[test]
    fn blank_body_rejected() {
        assert!(validate_body("").is_err());
        assert!(validate_body("baz").is_ok());
    }

    #[test]
    fn slug_length_counts_characters() {
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LEN)).is_ok());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LEN + 1)).is_err());
        // Multi-byte characters count once each.
        assert!(validate_slug(&"é".repeat(MAX_SLUG_LEN)).is_ok());
    }

    #[test]
    fn blank_slug_normalises_to_none() {
        assert_eq!(normalize_slug(Some("")), None);
        assert_eq!(normalize_slug(Some("  ")), None);
        assert_eq!(normalize_slug(Some("hello")), Some("hello"));
        assert_eq!(normalize_slug(None), None);
    }

    #[test]
    fn slug_is_trimmed() {
        assert_eq!(normalize_slug(Some(" hello ")), Some("hello"));
        assert_eq!(normalize_slug(Some("\thello\n")), Some("hello"));
    }

    #[test]
    fn post_input_checks_every_field() {
        assert!(validate_post_input("qux", "baz", None).is_ok());
        assert!(validate_post_input("", "baz", None).is_err());
        assert!(validate_post_input("qux", "", Some("hello")).is_err());
        assert!(validate_post_input("qux", "baz", Some("x".repeat(300).as_str())).is_err());
    }
}
