//! Review state for one serving session.
//!
//! Every mutation goes through a [`ReviewSession`] method, which notifies the
//! registered listeners afterwards. File loads carry a generation number so a
//! slow load that finishes after a newer one started is discarded.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

use crate::comments::{Comment, CommentDraft, CommentId, CommentStore};
use crate::feedback::{Feedback, format_folder, format_single};
use crate::matching::{AnnotatedDocument, render_annotated};
use crate::selection::PendingSelection;

/// Fallback context is cut to this many characters of the anchor block's text.
pub const BLOCK_CONTEXT_CHARS: usize = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Comment text is empty")]
    EmptyComment,

    #[error("Nothing is selected")]
    NoSelection,

    #[error("Comment not found: {0}")]
    UnknownComment(CommentId),

    #[error("File is not part of this review: {0}")]
    UnknownFile(String),

    #[error("Load {requested} was superseded by load {current}")]
    Superseded { requested: u64, current: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "label", rename_all = "lowercase")]
pub enum ReviewMode {
    /// One document; the label is its file name.
    Single(String),
    /// A directory tree; the label is the folder name.
    Folder(String),
}

impl ReviewMode {
    pub fn label(&self) -> &str {
        match self {
            Self::Single(label) | Self::Folder(label) => label,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    CommentsChanged,
    ActiveFileChanged(Option<String>),
    PendingSelectionChanged,
    GeneralTextChanged,
}

/// Proof of a started load; only the most recent ticket completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    path: String,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

type Listener = Box<dyn Fn(&SessionEvent) + Send + Sync>;

pub struct ReviewSession {
    mode: ReviewMode,
    store: CommentStore,
    general: String,
    active_file: Option<String>,
    pending: Option<PendingSelection>,
    generation: u64,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for ReviewSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewSession")
            .field("mode", &self.mode)
            .field("comments", &self.store.len())
            .field("active_file", &self.active_file)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl ReviewSession {
    pub fn new(mode: ReviewMode) -> Self {
        let active_file = match &mode {
            ReviewMode::Single(label) => Some(label.clone()),
            ReviewMode::Folder(_) => None,
        };
        Self {
            mode,
            store: CommentStore::new(),
            general: String::new(),
            active_file,
            pending: None,
            generation: 0,
            listeners: vec![],
        }
    }

    pub fn mode(&self) -> &ReviewMode {
        &self.mode
    }

    pub fn subscribe(&mut self, listener: impl Fn(&SessionEvent) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&self, event: SessionEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }

    pub fn store(&self) -> &CommentStore {
        &self.store
    }

    pub fn comments(&self) -> Vec<&Comment> {
        self.store.sorted()
    }

    pub fn add_comment(&mut self, mut draft: CommentDraft) -> Result<CommentId, ReviewError> {
        draft.text = non_empty(&draft.text)?;
        let id = self.store.add(draft);
        self.emit(SessionEvent::CommentsChanged);
        Ok(id)
    }

    pub fn edit_comment(&mut self, id: CommentId, text: &str) -> Result<(), ReviewError> {
        let text = non_empty(text)?;
        if !self.store.edit(id, text) {
            return Err(ReviewError::UnknownComment(id));
        }
        self.emit(SessionEvent::CommentsChanged);
        Ok(())
    }

    pub fn delete_comment(&mut self, id: CommentId) -> Result<(), ReviewError> {
        if !self.store.delete(id) {
            return Err(ReviewError::UnknownComment(id));
        }
        self.emit(SessionEvent::CommentsChanged);
        Ok(())
    }

    pub fn general(&self) -> &str {
        &self.general
    }

    pub fn set_general(&mut self, text: &str) {
        self.general = text.trim().to_string();
        self.emit(SessionEvent::GeneralTextChanged);
    }

    pub fn pending(&self) -> Option<&PendingSelection> {
        self.pending.as_ref()
    }

    pub fn set_pending(&mut self, pending: Option<PendingSelection>) {
        self.pending = pending;
        self.emit(SessionEvent::PendingSelectionChanged);
    }

    pub fn clear_pending(&mut self) {
        if self.pending.is_some() {
            self.set_pending(None);
        }
    }

    /// Turns the pending selection into a comment on the active file.
    ///
    /// The context is the selected text, or the start of the anchor block's
    /// text when nothing usable was selected.
    pub fn save_comment(&mut self, text: &str) -> Result<CommentId, ReviewError> {
        let text = non_empty(text)?;
        let pending = self.pending.as_ref().ok_or(ReviewError::NoSelection)?;
        let filename = self
            .active_file
            .clone()
            .unwrap_or_else(|| self.mode.label().to_string());
        let context = if pending.selected_text.is_empty() {
            pending.anchor_text.chars().take(BLOCK_CONTEXT_CHARS).collect()
        } else {
            pending.selected_text.clone()
        };
        let draft = CommentDraft::new(filename, pending.lines, context, text);

        let id = self.store.add(draft);
        self.pending = None;
        self.emit(SessionEvent::PendingSelectionChanged);
        self.emit(SessionEvent::CommentsChanged);
        Ok(id)
    }

    pub fn active_file(&self) -> Option<&str> {
        self.active_file.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts loading `path`, superseding any load still in flight.
    ///
    /// A single-file session only accepts its own file.
    pub fn begin_load(&mut self, path: &str) -> Result<LoadTicket, ReviewError> {
        if let ReviewMode::Single(label) = &self.mode {
            if label != path {
                return Err(ReviewError::UnknownFile(path.to_string()));
            }
        }
        self.generation += 1;
        self.active_file = Some(path.to_string());
        self.pending = None;
        self.emit(SessionEvent::ActiveFileChanged(self.active_file.clone()));
        Ok(LoadTicket {
            generation: self.generation,
            path: path.to_string(),
        })
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Renders the loaded content, or discards it if a newer load has begun.
    pub fn complete_load(
        &self,
        ticket: &LoadTicket,
        content: &str,
    ) -> Result<AnnotatedDocument, ReviewError> {
        if !self.is_current(ticket) {
            log::debug!(
                "Discarding stale load of {} (generation {} < {})",
                ticket.path,
                ticket.generation,
                self.generation
            );
            return Err(ReviewError::Superseded {
                requested: ticket.generation,
                current: self.generation,
            });
        }
        Ok(render_annotated(content))
    }

    /// Comment count per file, for sidebar badges.
    pub fn comment_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for comment in self.store.all() {
            *counts.entry(comment.filename.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Start lines of blocks in `filename` that have a comment.
    pub fn commented_start_lines(&self, filename: &str) -> BTreeSet<usize> {
        self.store
            .for_file(filename)
            .into_iter()
            .map(|c| c.start_line)
            .collect()
    }

    /// Formats the transcript for the whole session.
    pub fn finish(&self) -> Feedback {
        let comments: Vec<&Comment> = self.store.all().iter().collect();
        match &self.mode {
            ReviewMode::Single(label) => format_single(&comments, &self.general, label),
            ReviewMode::Folder(label) => format_folder(&comments, &self.general, label),
        }
    }
}

fn non_empty(text: &str) -> Result<String, ReviewError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ReviewError::EmptyComment);
    }
    Ok(text.to_string())
}
