//! Pure reducer function for document transitions
//!
//! `(Arc<EditorData>, Action) -> Arc<EditorData>`
//!
//! The reducer has no side effects and never mutates its input. When an
//! action has no effect it hands back the *same* `Arc` it was given, so
//! callers can detect a no-op with `Arc::ptr_eq` and skip re-deriving their
//! views. Any effective change allocates a new document.
//!
//! `SET_POLL` and `SET_ATTACHMENT` always rebuild their list once the field
//! is present, even if no entry carries the target id. The result is equal
//! to the input but not the same `Arc`. Callers that only compare pointers
//! will see a change there.

use std::sync::Arc;

use super::actions::Action;
use super::document::EditorData;

/// Fewest options a poll may be reduced to
pub const MIN_POLL_OPTIONS: usize = 2;

/// Most options a poll may grow to
pub const MAX_POLL_OPTIONS: usize = 10;

/// Apply one action to a document
///
/// Missing fields and unmet bounds are silent no-ops: the reducer cannot tell
/// a caller bug from a feature that is switched off for this editor.
pub fn reduce(document: &Arc<EditorData>, action: Action) -> Arc<EditorData> {
    match action {
        Action::SetTitle(title) => {
            if document.title.is_none() {
                return Arc::clone(document);
            }
            Arc::new(EditorData {
                title: Some(title),
                ..EditorData::clone(document)
            })
        }

        Action::SetCategory(name) => {
            let Some(categories) = &document.categories else {
                return Arc::clone(document);
            };
            let categories = categories
                .iter()
                .map(|category| {
                    let mut category = category.clone();
                    category.chosen = category.name == name;
                    category
                })
                .collect();
            Arc::new(EditorData {
                categories: Some(categories),
                ..EditorData::clone(document)
            })
        }

        Action::InitPolls(polls) => {
            // An existing set, even an empty one, is never replaced
            if document.polls.is_some() {
                return Arc::clone(document);
            }
            if !(MIN_POLL_OPTIONS..=MAX_POLL_OPTIONS).contains(&polls.len()) {
                return Arc::clone(document);
            }
            Arc::new(EditorData {
                polls: Some(polls),
                ..EditorData::clone(document)
            })
        }

        Action::AddPollOption(poll) => match &document.polls {
            Some(polls) if polls.len() < MAX_POLL_OPTIONS => {
                let mut polls = polls.clone();
                polls.push(poll);
                Arc::new(EditorData {
                    polls: Some(polls),
                    ..EditorData::clone(document)
                })
            }
            _ => Arc::clone(document),
        },

        Action::SetPollOption { id, option } => {
            let Some(polls) = &document.polls else {
                return Arc::clone(document);
            };
            let polls = polls
                .iter()
                .map(|poll| {
                    let mut poll = poll.clone();
                    if poll.id == id {
                        poll.option = option.clone();
                    }
                    poll
                })
                .collect();
            Arc::new(EditorData {
                polls: Some(polls),
                ..EditorData::clone(document)
            })
        }

        Action::RemovePollOption(id) => match &document.polls {
            Some(polls) if polls.len() > MIN_POLL_OPTIONS => {
                let polls = polls.iter().filter(|poll| poll.id != id).cloned().collect();
                Arc::new(EditorData {
                    polls: Some(polls),
                    ..EditorData::clone(document)
                })
            }
            _ => Arc::clone(document),
        },

        Action::RemoveAllPolls => {
            if document.polls.is_none() {
                return Arc::clone(document);
            }
            Arc::new(EditorData {
                polls: None,
                ..EditorData::clone(document)
            })
        }

        Action::AddAttachment(attachment) => {
            let mut attachments = document.attachments.clone().unwrap_or_default();
            attachments.push(attachment);
            Arc::new(EditorData {
                attachments: Some(attachments),
                ..EditorData::clone(document)
            })
        }

        Action::RemoveAttachment(id) => {
            let Some(attachments) = &document.attachments else {
                return Arc::clone(document);
            };
            // The last attachment takes the whole field with it
            let attachments = if attachments.len() > 1 {
                Some(
                    attachments
                        .iter()
                        .filter(|attachment| attachment.id != id)
                        .cloned()
                        .collect(),
                )
            } else {
                None
            };
            Arc::new(EditorData {
                attachments,
                ..EditorData::clone(document)
            })
        }

        Action::SetAttachment { id, attachment: patch } => {
            let Some(attachments) = &document.attachments else {
                return Arc::clone(document);
            };
            let attachments = attachments
                .iter()
                .map(|attachment| {
                    if attachment.id == id {
                        patch.apply_to(attachment)
                    } else {
                        attachment.clone()
                    }
                })
                .collect();
            Arc::new(EditorData {
                attachments: Some(attachments),
                ..EditorData::clone(document)
            })
        }

        Action::Unknown => Arc::clone(document),
    }
}

/// True when `after` is the very document `before` was, i.e. a no-op
pub fn is_unchanged(before: &Arc<EditorData>, after: &Arc<EditorData>) -> bool {
    Arc::ptr_eq(before, after)
}
