//! Request and response bodies for the review API

use md_review_engine::selection::Rect;
use md_review_engine::{PendingSelection, ReviewMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub path: String,
}

/// A loaded document, rendered and annotated.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePayload {
    pub raw_markdown: String,
    pub filename: String,
    pub html: String,
    pub generation: u64,
    /// Start lines of blocks that already carry a comment.
    pub commented_lines: Vec<usize>,
}

/// What the page needs on first load.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    #[serde(flatten)]
    pub mode: ReviewMode,
    /// File to open first in folder mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_file: Option<String>,
    /// The document itself in single-file mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FilePayload>,
}

/// One end of a browser selection.
///
/// `line` is the start line of the annotated block the page found the
/// endpoint in, `path` the element-child indices leading from that block
/// down to the element holding the endpoint, and `offset` the character
/// offset of the endpoint within the block's text.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionEnd {
    pub line: usize,
    #[serde(default)]
    pub path: Vec<usize>,
    #[serde(default)]
    pub offset: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    pub anchor: SelectionEnd,
    pub focus: SelectionEnd,
    pub text: String,
    #[serde(default)]
    pub bounding_rect: Option<Rect>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingPayload {
    pub start_line: usize,
    pub end_line: usize,
    pub selected_text: String,
    pub anchor_text: String,
}

impl From<&PendingSelection> for PendingPayload {
    fn from(pending: &PendingSelection) -> Self {
        Self {
            start_line: pending.start_line(),
            end_line: pending.end_line(),
            selected_text: pending.selected_text.clone(),
            anchor_text: pending.anchor_text.clone(),
        }
    }
}

/// A new comment. Without a line range the pending selection is used.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub text: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub start_line: Option<usize>,
    #[serde(default)]
    pub end_line: Option<usize>,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Deserialize)]
pub struct TextBody {
    pub text: String,
}
