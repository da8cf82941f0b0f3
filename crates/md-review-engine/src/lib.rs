pub mod comments;
pub mod feedback;
pub mod io;
pub mod line_map;
pub mod matching;
pub mod models;
pub mod render;
pub mod selection;
pub mod session;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use comments::{Comment, CommentDraft, CommentId, CommentStore};
pub use feedback::{Feedback, format_folder, format_single};
pub use io::*;
pub use line_map::{BlockType, LineMap, LineMapEntry, LineRange, build_line_map};
pub use matching::{AnnotatedDocument, AnnotationReport, BlockMatcher, annotate, render_annotated};
pub use models::{EntryKind, FolderNode, MarkdownFile};
pub use render::{DiagramError, DiagramRenderer, RenderTree, escape_for_html, inject_diagrams, render_markdown};
pub use selection::{PendingSelection, SelectionPoint, TextSelection, resolve_selection};
pub use session::{LoadTicket, ReviewError, ReviewMode, ReviewSession, SessionEvent};
