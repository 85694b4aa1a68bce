//! Identifier generation for file records.

use uuid::Uuid;

/// Produce a fresh record id.
///
/// UUIDv4 gives uniqueness with overwhelming probability and a hyphenated
/// lowercase form that is safe to embed in a URL path segment unescaped.
/// No ordering or monotonicity is promised, and generation cannot fail.
pub fn new_file_id() -> Uuid {
    Uuid::new_v4()
}
