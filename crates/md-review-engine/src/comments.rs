//! In-memory comment records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::line_map::LineRange;

/// Opaque, unique comment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(Uuid);

impl CommentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub filename: String,
    pub start_line: usize,
    pub end_line: usize,
    /// Source snippet captured when the comment was made.
    pub context: String,
    pub text: String,
}

impl Comment {
    pub fn lines(&self) -> LineRange {
        LineRange::new(self.start_line, self.end_line)
    }
}

/// Everything needed to create a comment except its id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    pub filename: String,
    pub start_line: usize,
    pub end_line: usize,
    #[serde(default)]
    pub context: String,
    pub text: String,
}

impl CommentDraft {
    pub fn new(
        filename: impl Into<String>,
        lines: LineRange,
        context: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            start_line: lines.start_line,
            end_line: lines.end_line,
            context: context.into(),
            text: text.into(),
        }
    }
}

/// Owns the comment collection. Records keep insertion order; readers that
/// present or export comments use [`CommentStore::sorted`].
#[derive(Debug, Clone, Default)]
pub struct CommentStore {
    comments: Vec<Comment>,
}

impl CommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, draft: CommentDraft) -> CommentId {
        let id = CommentId::new();
        self.comments.push(Comment {
            id,
            filename: draft.filename,
            start_line: draft.start_line,
            end_line: draft.end_line,
            context: draft.context,
            text: draft.text,
        });
        id
    }

    /// Replaces the text of comment `id`. Returns false if there is no such comment.
    pub fn edit(&mut self, id: CommentId, text: impl Into<String>) -> bool {
        match self.comments.iter_mut().find(|c| c.id == id) {
            Some(comment) => {
                comment.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Removes comment `id`. Returns false if there is no such comment.
    pub fn delete(&mut self, id: CommentId) -> bool {
        let before = self.comments.len();
        self.comments.retain(|c| c.id != id);
        self.comments.len() != before
    }

    pub fn get(&self, id: CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    /// Comments in insertion order.
    pub fn all(&self) -> &[Comment] {
        &self.comments
    }

    /// Comments by ascending start line, ties kept in insertion order.
    pub fn sorted(&self) -> Vec<&Comment> {
        let mut sorted: Vec<&Comment> = self.comments.iter().collect();
        sorted.sort_by_key(|c| c.start_line);
        sorted
    }

    pub fn for_file(&self, filename: &str) -> Vec<&Comment> {
        self.sorted()
            .into_iter()
            .filter(|c| c.filename == filename)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}
