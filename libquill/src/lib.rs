//! Quill - editor state core for composing posts and comments
//!
//! This library holds the document model behind the rich-content editor:
//! the `EditorData` schema, the pure reducer that applies actions to it,
//! and the derived views the surrounding UI reads back.

pub mod config;
pub mod editor;
pub mod error;
pub mod ids;
pub mod links;
pub mod logging;
pub mod upload;

// Re-export commonly used types
pub use config::Config;
pub use editor::{
    reduce, Action, AllowedData, Attachment, AttachmentPatch, AttachmentUrl, Category, Density,
    EditorData, EditorSession, FileType, Poll,
};
pub use error::{QuillError, Result};
