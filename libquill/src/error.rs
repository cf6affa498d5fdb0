//! Error types for Quill
//!
//! The reducer and derived views never fail. These errors cover the
//! fallible edges around them: loading configuration, reading local files
//! for upload, and parsing caller input.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuillError>;

#[derive(Error, Debug)]
pub enum QuillError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuillError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            QuillError::InvalidInput(_) => 3,
            QuillError::Upload(UploadError::TooLarge { .. }) => 4,
            QuillError::Upload(_) => 1,
            QuillError::Config(_) => 1,
            QuillError::Io(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("File too large: {file_name} is {size} bytes, limit is {limit} bytes")]
    TooLarge {
        file_name: String,
        size: u64,
        limit: u64,
    },

    #[error("Failed to read file: {0}")]
    Read(String),

    #[error("Path has no file name: {0}")]
    MissingFileName(String),
}
