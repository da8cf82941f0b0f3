use serde::Serialize;

use super::BlockMatcher;
use crate::line_map::{LineMap, build_line_map};
use crate::render::markdown::MERMAID_CONTAINER_CLASS;
use crate::render::{NodeId, RenderTree, render_markdown};

const CANDIDATE_TAGS: [&str; 13] = [
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "ul", "ol", "blockquote", "pre", "table", "hr",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationReport {
    pub matched: usize,
    pub unmatched: usize,
}

/// Whether a top-level element takes part in annotation.
pub fn is_candidate_block(tree: &RenderTree, id: NodeId) -> bool {
    tree.tag(id).is_some_and(|tag| CANDIDATE_TAGS.contains(&tag))
        || tree.has_class(id, MERMAID_CONTAINER_CLASS)
}

/// Runs one matching pass over the root's block children in document order,
/// recording each match as the element's line range.
pub fn annotate(tree: &mut RenderTree, map: &LineMap) -> AnnotationReport {
    let blocks: Vec<NodeId> = tree
        .children(tree.root())
        .iter()
        .copied()
        .filter(|&id| is_candidate_block(tree, id))
        .collect();

    let mut matcher = BlockMatcher::new(map);
    let mut report = AnnotationReport::default();
    for id in blocks {
        match matcher.match_block(tree, id) {
            Some(entry) => {
                tree.set_lines(id, entry.range());
                report.matched += 1;
            }
            None => report.unmatched += 1,
        }
    }
    log::debug!(
        "Annotated {} blocks, {} left unmatched",
        report.matched,
        report.unmatched
    );
    report
}

/// A rendered document whose blocks carry source line ranges.
#[derive(Debug, Clone)]
pub struct AnnotatedDocument {
    pub line_map: LineMap,
    pub tree: RenderTree,
    pub report: AnnotationReport,
}

impl AnnotatedDocument {
    pub fn html(&self) -> String {
        self.tree.to_html()
    }

    /// Recorded text of the block at `start_line`, used as fallback comment context.
    pub fn block_text(&self, start_line: usize) -> Option<&str> {
        self.line_map
            .entry_at_line(start_line)
            .map(|e| e.text.as_str())
    }
}

/// Renders and annotates `markdown` with a line map built for this call only.
pub fn render_annotated(markdown: &str) -> AnnotatedDocument {
    let line_map = build_line_map(markdown);
    let mut tree = render_markdown(markdown);
    let report = annotate(&mut tree, &line_map);
    AnnotatedDocument {
        line_map,
        tree,
        report,
    }
}
