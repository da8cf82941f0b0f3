//! Rendered-document model.
//!
//! [`RenderTree`] stands in for the browser DOM: the markdown renderer builds
//! it, the block matcher tags its blocks with line ranges, the selection
//! resolver walks it, and [`RenderTree::to_html`] serialises it for the page.

pub mod diagram;
pub mod html;
pub mod markdown;
pub mod tree;

pub use diagram::{DiagramError, DiagramRenderer, DiagramReport, inject_diagrams};
pub use html::{ANNOTATABLE_CLASS, END_LINE_ATTR, START_LINE_ATTR, escape_for_html};
pub use markdown::render_markdown;
pub use tree::{NodeId, NodeKind, RenderNode, RenderTree};
