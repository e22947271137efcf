//! Title-to-slug derivation.

/// Derive a URL-safe slug from a title.
///
/// Lowercases alphanumeric characters and collapses every run of anything
/// else into a single `-`, with no leading or trailing separator. A title
/// with no alphanumeric characters yields an empty slug, which the save
/// path rejects.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_sep = false;

    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            for lc in c.to_lowercase() {
                slug.push(lc);
            }
        } else {
            pending_sep = true;
        }
    }

    slug
}
