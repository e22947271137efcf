//! Save-path rules for the post lifecycle.
//!
//! These are pure functions; the repository applies them inside the same
//! transaction (or lock scope) as the read of the previous version, so the
//! status comparison and the write cannot interleave with a concurrent save.

use chrono::{DateTime, Utc};

use crate::domain::{Post, PostStatus, normalize_tags, slug::slugify};

/// Apply the lifecycle rules to a post about to be persisted.
///
/// `previous` is the stored version for an update, `None` for a first
/// insert. Rules:
///
/// - `created_at` is carried over unchanged on updates and stamped `now`
///   on inserts.
/// - `published_at` advances to `now` only on a Draft to Published
///   transition; every other case keeps the caller-supplied value.
/// - `slug` is recomputed from the title on every save, so editing a title
///   moves the canonical URL.
/// - `updated_at` is refreshed on every save.
pub fn on_save(previous: Option<&Post>, mut post: Post, now: DateTime<Utc>) -> Post {
    match previous {
        Some(prev) => {
            post.created_at = prev.created_at;
            if prev.status == PostStatus::Draft && post.status == PostStatus::Published {
                post.published_at = now;
            }
        }
        None => {
            post.created_at = now;
        }
    }

    post.slug = slugify(&post.title);
    post.tags = normalize_tags(post.tags);
    post.updated_at = now;
    post
}
