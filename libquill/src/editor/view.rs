//! Derived views over the current document
//!
//! Everything here is recomputed from a document snapshot on demand and
//! never writes back. Stored attachment order is insertion order. Display
//! order and layout width are projections of it.

use serde::Serialize;

use super::document::{Attachment, Category, Density, EditorData, Poll};
use super::reducer::{MAX_POLL_OPTIONS, MIN_POLL_OPTIONS};

/// Space between two carousel items
pub const ITEM_GUTTER: u32 = 16;

/// Per-density extents used by the attachment carousel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extents {
    /// Fixed extent of the trailing "add" tile
    pub base: u32,
    pub video: u32,
    pub other: u32,
}

impl Density {
    pub fn extents(self) -> Extents {
        match self {
            Density::Post => Extents {
                base: 210,
                video: 370,
                other: 210,
            },
            Density::Comment => Extents {
                base: 100,
                video: 176,
                other: 100,
            },
        }
    }
}

/// Attachments as shown: videos first, then the rest, each group stable
pub fn display_order(attachments: &[Attachment]) -> Vec<&Attachment> {
    let (videos, others): (Vec<&Attachment>, Vec<&Attachment>) =
        attachments.iter().partition(|attachment| attachment.is_video());
    videos.into_iter().chain(others).collect()
}

/// Virtual scroll width of the attachment carousel
///
/// `gutter * count + base + sum(item extent)`. Pending attachments have no
/// layout yet and are left out of both the count and the sum. Input order
/// does not matter.
pub fn total_scroll_width(attachments: &[Attachment], density: Density) -> u32 {
    let extents = density.extents();
    attachments
        .iter()
        .filter(|attachment| !attachment.is_pending())
        .fold(extents.base, |width, attachment| {
            let item = if attachment.is_video() {
                extents.video
            } else {
                extents.other
            };
            width + ITEM_GUTTER + item
        })
}

/// Polls accept edits only while nobody has voted on any option
pub fn polls_editable(polls: &[Poll]) -> bool {
    polls.iter().all(|poll| !poll.has_votes())
}

pub fn can_add_poll_option(polls: &[Poll]) -> bool {
    polls_editable(polls) && polls.len() < MAX_POLL_OPTIONS
}

pub fn can_remove_poll_option(polls: &[Poll]) -> bool {
    polls_editable(polls) && polls.len() > MIN_POLL_OPTIONS
}

/// What the toolbar poll button should do for the current document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollToggle {
    /// No poll yet: start one
    Init,
    /// Every option is still blank: drop the poll without asking
    RemoveAll,
    /// Options have text: ask the user before dropping the poll
    ConfirmRemove,
    /// Votes exist; the poll can no longer be removed
    Locked,
}

pub fn poll_toggle(document: &EditorData) -> PollToggle {
    match &document.polls {
        None => PollToggle::Init,
        Some(polls) if !polls_editable(polls) => PollToggle::Locked,
        Some(polls) if polls.iter().all(|poll| poll.option.is_empty()) => PollToggle::RemoveAll,
        Some(_) => PollToggle::ConfirmRemove,
    }
}

/// Name of the chosen category, if any
pub fn chosen_category(categories: &[Category]) -> Option<&str> {
    categories
        .iter()
        .find(|category| category.chosen)
        .map(|category| category.name.as_str())
}

/// Per-attachment controls the UI may offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttachmentControls {
    pub remove: bool,
    pub full_screen: bool,
}

/// Controls for one attachment
///
/// Removal is the only action a pending attachment accepts; it has nothing
/// to show full screen until its url resolves.
pub fn attachment_controls(attachment: &Attachment, read_only: bool) -> AttachmentControls {
    AttachmentControls {
        remove: !read_only,
        full_screen: !attachment.is_pending(),
    }
}

/// Everything a renderer needs besides the document itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSummary {
    /// Attachment ids in display order
    pub display_order: Vec<String>,
    pub scroll_width: u32,
    pub polls_editable: bool,
    pub poll_toggle: PollToggle,
    pub chosen_category: Option<String>,
    pub pending_attachments: usize,
}

pub fn summarize(document: &EditorData, density: Density) -> ViewSummary {
    let attachments = document.attachments.as_deref().unwrap_or_default();
    ViewSummary {
        display_order: display_order(attachments)
            .into_iter()
            .map(|attachment| attachment.id.clone())
            .collect(),
        scroll_width: total_scroll_width(attachments, density),
        polls_editable: document.polls.as_deref().map_or(true, polls_editable),
        poll_toggle: poll_toggle(document),
        chosen_category: document
            .categories
            .as_deref()
            .and_then(chosen_category)
            .map(str::to_string),
        pending_attachments: attachments.iter().filter(|a| a.is_pending()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::document::{AttachmentUrl, FileType};

    fn attachment(id: &str, file_type: FileType) -> Attachment {
        Attachment {
            id: id.to_string(),
            file_name: id.to_string(),
            file_type,
            url: AttachmentUrl::resolved(format!("https://cdn.example.com/{}", id)),
        }
    }

    fn ids<'a>(attachments: &[&'a Attachment]) -> Vec<&'a str> {
        attachments.iter().map(|a| a.id.as_str()).collect()
    }

    fn poll(option: &str, votes: &[&str]) -> Poll {
        Poll {
            id: crate::ids::new_id(),
            option: option.to_string(),
            votes: votes.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn test_display_order_puts_videos_first() {
        let attachments = vec![
            attachment("file", FileType::Attachment),
            attachment("video_1", FileType::Video),
            attachment("gif", FileType::Gif),
            attachment("video_2", FileType::Video),
        ];

        assert_eq!(
            ids(&display_order(&attachments)),
            vec!["video_1", "video_2", "file", "gif"]
        );
    }

    #[test]
    fn test_display_order_is_idempotent() {
        let attachments = vec![
            attachment("a", FileType::Gif),
            attachment("b", FileType::Video),
            attachment("c", FileType::Other("image/png".to_string())),
            attachment("d", FileType::Video),
        ];
        let once: Vec<Attachment> = display_order(&attachments).into_iter().cloned().collect();
        let twice: Vec<Attachment> = display_order(&once).into_iter().cloned().collect();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_display_order_of_empty_list() {
        assert!(display_order(&[]).is_empty());
    }

    #[test]
    fn test_width_of_empty_list_is_base() {
        assert_eq!(total_scroll_width(&[], Density::Post), 210);
        assert_eq!(total_scroll_width(&[], Density::Comment), 100);
    }

    #[test]
    fn test_width_comment_single_file() {
        let attachments = vec![attachment("a", FileType::Attachment)];
        assert_eq!(total_scroll_width(&attachments, Density::Comment), 216);
    }

    #[test]
    fn test_width_comment_video_adds_item_and_gutter() {
        let attachments = vec![
            attachment("a", FileType::Attachment),
            attachment("v", FileType::Video),
        ];
        assert_eq!(total_scroll_width(&attachments, Density::Comment), 216 + 176 + 16);
    }

    #[test]
    fn test_width_post_mixed() {
        let attachments = vec![
            attachment("v", FileType::Video),
            attachment("g", FileType::Gif),
        ];
        // 2 * 16 + 210 + 370 + 210
        assert_eq!(total_scroll_width(&attachments, Density::Post), 822);
    }

    #[test]
    fn test_width_ignores_order() {
        let attachments = vec![
            attachment("g", FileType::Gif),
            attachment("v", FileType::Video),
        ];
        let sorted: Vec<Attachment> = display_order(&attachments).into_iter().cloned().collect();

        assert_eq!(
            total_scroll_width(&attachments, Density::Post),
            total_scroll_width(&sorted, Density::Post)
        );
    }

    #[test]
    fn test_width_skips_pending_attachments() {
        let mut pending = attachment("p", FileType::Attachment);
        pending.url = AttachmentUrl::Pending("ticket".to_string());
        let attachments = vec![attachment("a", FileType::Attachment), pending];

        assert_eq!(total_scroll_width(&attachments, Density::Comment), 216);
    }

    #[test]
    fn test_failed_attachment_still_takes_space() {
        let mut failed = attachment("f", FileType::Attachment);
        failed.url = AttachmentUrl::Failed;

        assert_eq!(total_scroll_width(&[failed], Density::Comment), 216);
    }

    #[test]
    fn test_polls_editable_until_first_vote() {
        let polls = vec![poll("a", &[]), poll("b", &[])];
        assert!(polls_editable(&polls));

        let voted = vec![poll("a", &[]), poll("b", &["user_1"])];
        assert!(!polls_editable(&voted));
        assert!(!can_add_poll_option(&voted));
        assert!(!can_remove_poll_option(&voted));
    }

    #[test]
    fn test_poll_option_bounds() {
        let two: Vec<Poll> = (0..2).map(|_| poll("", &[])).collect();
        assert!(can_add_poll_option(&two));
        assert!(!can_remove_poll_option(&two));

        let ten: Vec<Poll> = (0..10).map(|_| poll("", &[])).collect();
        assert!(!can_add_poll_option(&ten));
        assert!(can_remove_poll_option(&ten));
    }

    #[test]
    fn test_poll_toggle() {
        assert_eq!(poll_toggle(&EditorData::default()), PollToggle::Init);

        let blank = EditorData {
            polls: Some(vec![poll("", &[]), poll("", &[])]),
            ..EditorData::default()
        };
        assert_eq!(poll_toggle(&blank), PollToggle::RemoveAll);

        let written = EditorData {
            polls: Some(vec![poll("yes", &[]), poll("", &[])]),
            ..EditorData::default()
        };
        assert_eq!(poll_toggle(&written), PollToggle::ConfirmRemove);

        let voted = EditorData {
            polls: Some(vec![poll("yes", &["u"]), poll("no", &[])]),
            ..EditorData::default()
        };
        assert_eq!(poll_toggle(&voted), PollToggle::Locked);
    }

    #[test]
    fn test_chosen_category() {
        let categories = vec![
            Category {
                name: "General Discussion".to_string(),
                description: "Everyone can post".to_string(),
                chosen: false,
            },
            Category {
                name: "Admin Only".to_string(),
                description: "Only Admin can post".to_string(),
                chosen: true,
            },
        ];
        assert_eq!(chosen_category(&categories), Some("Admin Only"));
        assert_eq!(chosen_category(&categories[..1]), None);
    }

    #[test]
    fn test_attachment_controls() {
        let ready = attachment("a", FileType::Gif);
        assert_eq!(
            attachment_controls(&ready, false),
            AttachmentControls {
                remove: true,
                full_screen: true
            }
        );
        assert!(!attachment_controls(&ready, true).remove);

        let mut pending = ready.clone();
        pending.url = AttachmentUrl::Pending("t".to_string());
        let controls = attachment_controls(&pending, false);
        assert!(controls.remove);
        assert!(!controls.full_screen);
    }

    #[test]
    fn test_summarize_document() {
        let mut pending = attachment("p", FileType::Attachment);
        pending.url = AttachmentUrl::Pending("t".to_string());
        let document = EditorData {
            attachments: Some(vec![
                attachment("g", FileType::Gif),
                attachment("v", FileType::Video),
                pending,
            ]),
            categories: Some(vec![Category {
                name: "General".to_string(),
                description: String::new(),
                chosen: true,
            }]),
            ..EditorData::default()
        };

        let summary = summarize(&document, Density::Comment);
        assert_eq!(summary.display_order, vec!["v", "g", "p"]);
        assert_eq!(summary.scroll_width, 100 + 2 * 16 + 176 + 100);
        assert!(summary.polls_editable);
        assert_eq!(summary.poll_toggle, PollToggle::Init);
        assert_eq!(summary.chosen_category.as_deref(), Some("General"));
        assert_eq!(summary.pending_attachments, 1);
    }

    #[test]
    fn test_summarize_empty_document() {
        let summary = summarize(&EditorData::default(), Density::Post);
        assert!(summary.display_order.is_empty());
        assert_eq!(summary.scroll_width, 210);
        assert_eq!(summary.chosen_category, None);
    }
}
