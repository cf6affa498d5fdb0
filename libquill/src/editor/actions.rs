//! Actions for the reducer pattern
//!
//! Every change to an `EditorData` is described by one of these values and
//! applied by the reducer (see `reducer.rs`). On the wire an action is
//! `{"type": "...", "payload": ...}`; an unknown `type` decodes to
//! `Action::Unknown` so newer hosts can talk to older cores.

use serde::{Deserialize, Serialize};

use super::document::{Attachment, AttachmentPatch, AttachmentUrl, FileType, Poll};
use crate::ids::new_id;
use crate::links;

/// Number of empty options a new poll starts with
pub const INITIAL_POLL_OPTIONS: usize = 3;

/// Intents that trigger document transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Action {
    /// Replace the title
    #[serde(rename = "SET_TITLE")]
    SetTitle(String),

    /// Choose a category by name, clearing every other choice
    #[serde(rename = "SET_CATEGORY")]
    SetCategory(String),

    /// Create the poll set; ignored when one already exists
    #[serde(rename = "INIT_POLL")]
    InitPolls(Vec<Poll>),

    /// Append an option to the poll set
    #[serde(rename = "ADD_POLL")]
    AddPollOption(Poll),

    /// Edit the text of one option
    #[serde(rename = "SET_POLL")]
    SetPollOption {
        #[serde(rename = "_id")]
        id: String,
        option: String,
    },

    /// Remove one option by id
    #[serde(rename = "REMOVE_POLL")]
    RemovePollOption(String),

    /// Drop the poll set entirely
    #[serde(rename = "REMOVE_ALL_POLL")]
    RemoveAllPolls,

    /// Append an attachment, creating the list if needed
    #[serde(rename = "ADD_ATTACHMENT")]
    AddAttachment(Attachment),

    /// Remove one attachment by id
    #[serde(rename = "REMOVE_ATTACHMENT")]
    RemoveAttachment(String),

    /// Shallow-merge fields into one attachment
    #[serde(rename = "SET_ATTACHMENT")]
    SetAttachment {
        #[serde(rename = "_id")]
        id: String,
        attachment: AttachmentPatch,
    },

    /// Any action kind this core does not know about
    #[serde(other)]
    Unknown,
}

/// Wire names of every action kind this core applies
pub const KNOWN_KINDS: [&str; 10] = [
    "SET_TITLE",
    "SET_CATEGORY",
    "INIT_POLL",
    "ADD_POLL",
    "SET_POLL",
    "REMOVE_POLL",
    "REMOVE_ALL_POLL",
    "ADD_ATTACHMENT",
    "REMOVE_ATTACHMENT",
    "SET_ATTACHMENT",
];

impl Action {
    /// Decode an action from a JSON value
    ///
    /// An unknown `type` decodes to `Action::Unknown` whatever its payload.
    /// A known `type` with a malformed payload is still an error.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let unknown_kind = match value.get("type").and_then(|t| t.as_str()) {
            Some(kind) => !KNOWN_KINDS.contains(&kind),
            None => false,
        };
        if unknown_kind {
            return Ok(Action::Unknown);
        }
        serde_json::from_value(value)
    }

    /// Wire name of the action kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SetTitle(_) => "SET_TITLE",
            Action::SetCategory(_) => "SET_CATEGORY",
            Action::InitPolls(_) => "INIT_POLL",
            Action::AddPollOption(_) => "ADD_POLL",
            Action::SetPollOption { .. } => "SET_POLL",
            Action::RemovePollOption(_) => "REMOVE_POLL",
            Action::RemoveAllPolls => "REMOVE_ALL_POLL",
            Action::AddAttachment(_) => "ADD_ATTACHMENT",
            Action::RemoveAttachment(_) => "REMOVE_ATTACHMENT",
            Action::SetAttachment { .. } => "SET_ATTACHMENT",
            Action::Unknown => "UNKNOWN",
        }
    }
}

/// Start a poll with three empty options
pub fn init_polls_action() -> Action {
    Action::InitPolls((0..INITIAL_POLL_OPTIONS).map(|_| Poll::fresh()).collect())
}

/// Append one empty option
pub fn add_poll_option_action() -> Action {
    Action::AddPollOption(Poll::fresh())
}

/// Deliver the outcome of an asynchronous url resolution
///
/// `Err` becomes the failure sentinel; the attachment then stays broken
/// and must not be retried.
pub fn resolve_attachment_action<E>(id: impl Into<String>, outcome: Result<String, E>) -> Action {
    let url = match outcome {
        Ok(url) => AttachmentUrl::Resolved(url),
        Err(_) => AttachmentUrl::Failed,
    };
    Action::SetAttachment {
        id: id.into(),
        attachment: AttachmentPatch::url(url),
    }
}

/// Video attachment for a recognized video link
///
/// `title` comes from whatever metadata lookup the host performs. Returns
/// `None` when `link` is not a video link.
pub fn video_attachment(link: &str, title: impl Into<String>) -> Option<Attachment> {
    let id = links::video_id(link)?;
    Some(Attachment {
        id: new_id(),
        file_name: title.into(),
        file_type: FileType::Video,
        url: AttachmentUrl::Resolved(links::video_embed_url(id)),
    })
}

/// GIF attachment picked from a search result
pub fn gif_attachment(title: impl Into<String>, url: impl Into<String>) -> Attachment {
    Attachment {
        id: new_id(),
        file_name: title.into(),
        file_type: FileType::Gif,
        url: AttachmentUrl::Resolved(url.into()),
    }
}
