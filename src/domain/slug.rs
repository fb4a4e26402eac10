//! Slug helpers.
//!
//! Slugs are supplied by authors rather than derived from titles; the only
//! normalization applied is treating whitespace-only input as absent.

/// Returns the slug unchanged unless it is empty or whitespace-only.
pub fn non_blank(slug: Option<&str>) -> Option<&str> {
    slug.filter(|value| !value.trim().is_empty())
}

/// Whether the slug carries no usable characters.
pub fn is_blank(slug: &str) -> bool {
    slug.trim().is_empty()
}
