//! Slug generation
//!
//! URL-friendly slugs for categories and posts. Category slugs come
//! straight from the title; post slugs get a short random suffix so two
//! posts may share a title without colliding.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of the random suffix appended to post slugs
const POST_SLUG_SUFFIX_LEN: usize = 2;

/// Generate a URL-friendly slug from arbitrary text.
///
/// Lowercases the input, keeps ASCII alphanumerics, and collapses every
/// run of other characters into a single hyphen. Leading and trailing
/// hyphens are trimmed.
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut prev_hyphen = false;

    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen && !result.is_empty() {
            result.push('-');
            prev_hyphen = true;
        }
    }

    // Trim trailing hyphen
    result.trim_end_matches('-').to_string()
}

/// Generate a random alphanumeric suffix of the given length.
pub fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a slug for a post title: the slugified title plus a short
/// random suffix.
pub fn post_slug(title: &str) -> String {
    format!("{}-{}", slugify(title), random_suffix(POST_SLUG_SUFFIX_LEN))
}
