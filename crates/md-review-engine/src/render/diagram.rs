use thiserror::Error;

use super::markdown::{
    MERMAID_CONTAINER_CLASS, MERMAID_ID_ATTR, MERMAID_RENDER_CLASS, MERMAID_SOURCE_CLASS,
};
use super::tree::RenderTree;

pub const DIAGRAM_ERROR_CLASS: &str = "diagram-error";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiagramError {
    #[error("{0}")]
    Failed(String),
}

/// Turns diagram source into SVG markup.
pub trait DiagramRenderer {
    fn render(&self, id: &str, source: &str) -> Result<String, DiagramError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagramReport {
    pub rendered: usize,
    pub failed: usize,
}

/// Fills every diagram slot in document order.
///
/// A failing diagram gets an inline `pre.diagram-error` instead of its SVG
/// and the remaining diagrams are still rendered.
pub fn inject_diagrams(tree: &mut RenderTree, renderer: &dyn DiagramRenderer) -> DiagramReport {
    let mut report = DiagramReport::default();
    for container in tree.find_by_class(MERMAID_CONTAINER_CLASS) {
        let (Some(source), Some(slot)) = (
            tree.child_with_class(container, MERMAID_SOURCE_CLASS),
            tree.child_with_class(container, MERMAID_RENDER_CLASS),
        ) else {
            continue;
        };
        let code = tree.text_content(source);
        let id = tree
            .attr(container, MERMAID_ID_ATTR)
            .map_or_else(|| format!("mermaid-{}", container.index()), str::to_string);

        tree.clear_children(slot);
        match renderer.render(&id, &code) {
            Ok(svg) => {
                tree.append_raw(slot, svg);
                report.rendered += 1;
            }
            Err(e) => {
                log::warn!("Diagram {id} failed to render: {e}");
                let pre = tree.append_element(
                    slot,
                    "pre",
                    [("class".to_string(), DIAGRAM_ERROR_CLASS.to_string())],
                );
                tree.append_text(pre, format!("Mermaid error: {e}"));
                report.failed += 1;
            }
        }
    }
    report
}
