//! Editor module
//!
//! Contains the editor state core:
//! - Document: the `EditorData` schema and its parts
//! - Actions: what can happen to a document
//! - Reducer: pure function (Document, Action) -> Document
//! - View: values derived from a document for rendering
//! - Session: the one owner of the current document
//!
//! Documents are immutable. Every transition produces a new `Arc` or hands
//! back the same one when nothing changed, so "did anything change" is a
//! pointer comparison.

pub mod actions;
pub mod document;
pub mod reducer;
pub mod session;
pub mod view;

// Re-export commonly used types
pub use actions::{
    add_poll_option_action, gif_attachment, init_polls_action, resolve_attachment_action,
    video_attachment, Action,
};
pub use document::{
    AllowedData, Attachment, AttachmentPatch, AttachmentUrl, Category, Density, EditorData,
    FileType, Poll,
};
pub use reducer::{is_unchanged, reduce, MAX_POLL_OPTIONS, MIN_POLL_OPTIONS};
pub use session::{Dispatcher, EditorSession};
pub use view::{summarize, PollToggle, ViewSummary};
