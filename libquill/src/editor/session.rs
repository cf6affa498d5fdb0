//! Editor session: the single owner of the current document
//!
//! A session is created per editor instance and passed explicitly to
//! whatever needs it. UI intents go through [`EditorSession::dispatch`];
//! asynchronous producers (uploads, metadata lookups) get a cloned
//! [`Dispatcher`] and their actions are applied on the next
//! [`EditorSession::pump`].
//!
//! # Example
//!
//! ```
//! use libquill::{Action, Config, EditorData, EditorSession};
//!
//! let initial = EditorData {
//!     title: Some(String::new()),
//!     ..EditorData::default()
//! };
//! let mut session = EditorSession::new(initial, &Config::default_config());
//!
//! assert!(session.dispatch(Action::SetTitle("Hello".to_string())));
//! assert_eq!(session.document().title.as_deref(), Some("Hello"));
//! ```

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::actions::{init_polls_action, Action};
use super::document::{AllowedData, EditorData};
use super::reducer::{is_unchanged, reduce};
use super::view::{poll_toggle, polls_editable, summarize, PollToggle, ViewSummary};
use crate::config::{Config, EditorConfig};

/// Cloneable handle for submitting actions from outside the UI thread
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: Sender<Action>,
}

impl Dispatcher {
    /// Queue an action for the owning session
    ///
    /// Returns `false` once the session is gone; the action is dropped.
    pub fn send(&self, action: Action) -> bool {
        let kind = action.kind();
        match self.tx.send(action) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("Session closed, dropping {} action", kind);
                false
            }
        }
    }
}

pub struct EditorSession {
    document: Arc<EditorData>,
    allowed: AllowedData,
    settings: EditorConfig,
    dispatcher: Dispatcher,
    inbox: Receiver<Action>,
}

impl EditorSession {
    /// Start a session from initial data
    ///
    /// Fields the configuration does not allow are stripped from `initial`.
    pub fn new(initial: EditorData, config: &Config) -> Self {
        let (tx, inbox) = unbounded();
        let document = config.allowed.restrict(initial);

        tracing::debug!(
            density = %config.editor.density,
            read_only = config.editor.read_only,
            "Editor session started"
        );

        Self {
            document: Arc::new(document),
            allowed: config.allowed,
            settings: config.editor,
            dispatcher: Dispatcher { tx },
            inbox,
        }
    }

    /// Current document snapshot
    pub fn document(&self) -> Arc<EditorData> {
        Arc::clone(&self.document)
    }

    pub fn settings(&self) -> EditorConfig {
        self.settings
    }

    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    /// Apply one action, returning whether the document changed
    ///
    /// "Changed" means the reducer handed back a new document. Editing a
    /// poll option or an attachment that exists always counts, even when the
    /// new value equals the old one.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let kind = action.kind();
        if !self.admits(&action) {
            tracing::debug!(kind, "Action refused");
            return false;
        }

        let next = reduce(&self.document, action);
        if is_unchanged(&self.document, &next) {
            tracing::trace!(kind, "Action left document unchanged");
            return false;
        }

        tracing::debug!(kind, changed = true, "Action applied");
        self.document = next;
        true
    }

    /// Apply every queued action in arrival order
    ///
    /// Returns how many of them changed the document.
    pub fn pump(&mut self) -> usize {
        let mut changed = 0;
        while let Ok(action) = self.inbox.try_recv() {
            if self.dispatch(action) {
                changed += 1;
            }
        }
        changed
    }

    /// Press the toolbar poll button
    ///
    /// Starts or drops the poll set when that needs no confirmation. For
    /// `ConfirmRemove` the caller asks the user and then dispatches
    /// `Action::RemoveAllPolls` itself.
    pub fn toggle_polls(&mut self) -> PollToggle {
        let toggle = poll_toggle(&self.document);
        match toggle {
            PollToggle::Init => {
                self.dispatch(init_polls_action());
            }
            PollToggle::RemoveAll => {
                self.dispatch(Action::RemoveAllPolls);
            }
            PollToggle::ConfirmRemove | PollToggle::Locked => {}
        }
        toggle
    }

    /// Derived view of the current document
    pub fn summary(&self) -> ViewSummary {
        summarize(&self.document, self.settings.density)
    }

    /// Whether this editor accepts `action` at all
    ///
    /// A read-only editor still takes url resolutions for attachments that
    /// were pending when it opened. Creating a field the editor does not
    /// expose is refused; every other action already no-ops on a stripped
    /// field. Once anyone has voted, the poll set is frozen.
    fn admits(&self, action: &Action) -> bool {
        if self.settings.read_only {
            return matches!(action, Action::SetAttachment { .. });
        }
        match action {
            Action::InitPolls(_) => self.allowed.polls,
            Action::AddAttachment(_) => self.allowed.attachments,
            Action::AddPollOption(_)
            | Action::SetPollOption { .. }
            | Action::RemovePollOption(_)
            | Action::RemoveAllPolls => {
                self.document.polls.as_deref().map_or(true, polls_editable)
            }
            _ => true,
        }
    }
}
