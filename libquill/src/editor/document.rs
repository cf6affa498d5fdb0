//! Editor document schema
//!
//! `EditorData` is the single source of truth for one editing session.
//! Every field is optional, and absence is meaningful: `None` says the
//! feature is not part of this document, while `Some(vec![])` says it is
//! enabled but currently empty. All state transitions go through the
//! reducer (see `reducer.rs`).

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Reserved url value marking a permanently failed resolution
pub const FAILED_URL_SENTINEL: &str = "NULL";

/// Full editable content for one editing session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Formatted body; owned by the text engine and treated as opaque here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polls: Option<Vec<Poll>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
}

/// One poll option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    #[serde(rename = "_id")]
    pub id: String,
    pub option: String,
    #[serde(default)]
    pub votes: Vec<String>,
}

impl Poll {
    /// Empty option with a fresh id and no votes
    pub fn fresh() -> Self {
        Self {
            id: crate::ids::new_id(),
            option: String::new(),
            votes: Vec::new(),
        }
    }

    pub fn has_votes(&self) -> bool {
        !self.votes.is_empty()
    }
}

/// A file, GIF or video attached to the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "fileType")]
    pub file_type: FileType,
    pub url: AttachmentUrl,
}

impl Attachment {
    pub fn is_video(&self) -> bool {
        self.file_type == FileType::Video
    }

    /// Still waiting on its url; excluded from layout and most actions
    pub fn is_pending(&self) -> bool {
        self.url.is_pending()
    }
}

/// Kind of attachment
///
/// Uploads, GIFs and videos use the named variants. Anything else is kept
/// verbatim as a MIME-like tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileType {
    Video,
    Gif,
    Attachment,
    Other(String),
}

impl FileType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Video => "video",
            Self::Gif => "gif",
            Self::Attachment => "attachment",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for FileType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "video" => Self::Video,
            "gif" => Self::Gif,
            "attachment" => Self::Attachment,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for FileType {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<FileType> for String {
    fn from(file_type: FileType) -> Self {
        match file_type {
            FileType::Other(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Location of an attachment's payload
///
/// Serialized as the plain url string when resolved, as the `"NULL"`
/// sentinel when resolution failed, and as `{"pending": "<ticket>"}` while
/// the producer is still working.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttachmentUrl {
    Resolved(String),
    /// Ticket identifying the outstanding resolution
    Pending(String),
    Failed,
}

impl AttachmentUrl {
    pub fn resolved(url: impl Into<String>) -> Self {
        Self::Resolved(url.into())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// The usable url, if there is one
    pub fn as_resolved(&self) -> Option<&str> {
        match self {
            Self::Resolved(url) => Some(url),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum UrlRepr {
    Text(String),
    Pending { pending: String },
}

impl Serialize for AttachmentUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match self {
            Self::Resolved(url) => UrlRepr::Text(url.clone()),
            Self::Failed => UrlRepr::Text(FAILED_URL_SENTINEL.to_string()),
            Self::Pending(ticket) => UrlRepr::Pending {
                pending: ticket.clone(),
            },
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AttachmentUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match UrlRepr::deserialize(deserializer)? {
            UrlRepr::Text(url) if url == FAILED_URL_SENTINEL => Self::Failed,
            UrlRepr::Text(url) => Self::Resolved(url),
            UrlRepr::Pending { pending } => Self::Pending(pending),
        })
    }
}

/// Partial attachment used by `SET_ATTACHMENT`; present fields overwrite
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentPatch {
    #[serde(rename = "fileName", default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(rename = "fileType", default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<AttachmentUrl>,
}

impl AttachmentPatch {
    /// Patch that only sets the url
    pub fn url(url: AttachmentUrl) -> Self {
        Self {
            url: Some(url),
            ..Self::default()
        }
    }

    /// Shallow merge onto `attachment`, returning the merged copy
    pub fn apply_to(&self, attachment: &Attachment) -> Attachment {
        Attachment {
            id: attachment.id.clone(),
            file_name: self
                .file_name
                .clone()
                .unwrap_or_else(|| attachment.file_name.clone()),
            file_type: self
                .file_type
                .clone()
                .unwrap_or_else(|| attachment.file_type.clone()),
            url: self.url.clone().unwrap_or_else(|| attachment.url.clone()),
        }
    }
}

/// A selectable category; `name` is its identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub chosen: bool,
}

/// Which document fields an editor exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowedData {
    pub title: bool,
    pub content: bool,
    pub polls: bool,
    pub attachments: bool,
    pub categories: bool,
}

impl Default for AllowedData {
    fn default() -> Self {
        Self {
            title: true,
            content: true,
            polls: true,
            attachments: true,
            categories: true,
        }
    }
}

impl AllowedData {
    /// Drop every field of `data` this editor does not expose
    pub fn restrict(&self, data: EditorData) -> EditorData {
        EditorData {
            title: data.title.filter(|_| self.title),
            content: data.content.filter(|_| self.content),
            polls: data.polls.filter(|_| self.polls),
            attachments: data.attachments.filter(|_| self.attachments),
            categories: data.categories.filter(|_| self.categories),
        }
    }
}

/// Display density presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    #[default]
    Post,
    Comment,
}

impl std::str::FromStr for Density {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "post" => Ok(Density::Post),
            "comment" => Ok(Density::Comment),
            _ => Err(format!(
                "Invalid density: '{}'. Valid options: post, comment",
                s
            )),
        }
    }
}

impl std::fmt::Display for Density {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Density::Post => write!(f, "post"),
            Density::Comment => write!(f, "comment"),
        }
    }
}
