//! Identifier generation for new polls and attachments

use uuid::Uuid;

/// Generate a process-unique identifier (UUID v4, hyphenated)
#[must_use]
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
