//! content
//!
//! Slug handling and article path conventions.
//!
//! # Design
//!
//! Article identity is a URL slug. Everything the store layer receives has
//! already been through [`sanitize_slug`], so repository paths built here can
//! never contain separators, parent-directory segments, or anything else a
//! hostile slug could smuggle in. The store layer treats clean paths as a
//! precondition; this module is where that precondition is established.

use thiserror::Error;

/// Hard ceiling on article content, checked before any network call.
pub const MAX_CONTENT_BYTES: usize = 1_000_000;

/// Maximum slug length after sanitization.
pub const MAX_SLUG_LEN: usize = 200;

/// Errors from slug validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    /// Nothing valid left after stripping disallowed characters.
    #[error("invalid slug: no usable characters")]
    Empty,

    /// Slug exceeds [`MAX_SLUG_LEN`].
    #[error("slug too long: {0} characters (max {MAX_SLUG_LEN})")]
    TooLong(usize),
}

/// Sanitize a raw slug into a safe file-name component.
///
/// Strips every character outside `[a-zA-Z0-9-]`, which removes path
/// separators and `..` segments outright rather than trying to detect them.
///
/// # Example
///
/// ```
/// use kalem::content::sanitize_slug;
///
/// assert_eq!(sanitize_slug("izmir-gezi-rehberi").unwrap(), "izmir-gezi-rehberi");
/// assert_eq!(sanitize_slug("../etc/passwd").unwrap(), "etcpasswd");
/// assert!(sanitize_slug("!!!").is_err());
/// ```
pub fn sanitize_slug(raw: &str) -> Result<String, SlugError> {
    let sanitized: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();

    if sanitized.is_empty() {
        return Err(SlugError::Empty);
    }
    if sanitized.len() > MAX_SLUG_LEN {
        return Err(SlugError::TooLong(sanitized.len()));
    }

    Ok(sanitized)
}

/// Check whether a string is already a valid slug.
pub fn is_valid_slug(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_SLUG_LEN
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Build the repository-relative path for an article.
///
/// `slug` must already be sanitized.
pub fn article_path(content_dir: &str, slug: &str) -> String {
    format!("{}/{}.md", content_dir.trim_end_matches('/'), slug)
}

/// Commit message for a newly created article.
pub fn create_message(slug: &str) -> String {
    format!("Yeni makale: {}", slug)
}

/// Commit message for an updated article.
pub fn update_message(slug: &str) -> String {
    format!("Makale güncellendi: {}", slug)
}

/// Commit message for a deleted article.
pub fn delete_message(slug: &str) -> String {
    format!("Makale silindi: {}", slug)
}
