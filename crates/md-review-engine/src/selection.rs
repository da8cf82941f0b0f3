//! Resolving a live text selection to the source lines it covers.

use serde::{Deserialize, Serialize};

use crate::line_map::LineRange;
use crate::render::{NodeId, RenderTree};

/// One end of a selection: a node and an offset into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPoint {
    pub node: NodeId,
    pub offset: usize,
}

impl SelectionPoint {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// Viewport rectangle reported for a selection; only used for placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSelection {
    pub anchor: SelectionPoint,
    pub focus: SelectionPoint,
    /// Selected text as reported by the browser.
    pub text: String,
    pub bounding_rect: Option<Rect>,
}

impl TextSelection {
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// A candidate comment target, before the comment is written.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSelection {
    pub lines: LineRange,
    /// Whichever endpoint block comes later in the document.
    pub anchor_block: NodeId,
    /// Trimmed text content of the anchor block.
    pub anchor_text: String,
    pub selected_text: String,
    pub bounding_rect: Option<Rect>,
}

impl PendingSelection {
    pub fn start_line(&self) -> usize {
        self.lines.start_line
    }

    pub fn end_line(&self) -> usize {
        self.lines.end_line
    }
}

/// Nearest node at or above `node` carrying a line range, without crossing
/// `content_root`.
pub fn find_annotatable_ancestor(
    tree: &RenderTree,
    content_root: NodeId,
    node: NodeId,
) -> Option<NodeId> {
    tree.ancestors(node)
        .take_while(|&n| n != content_root)
        .find(|&n| tree.lines(n).is_some())
}

/// Computes the pending selection for `selection`, or `None` when it is
/// collapsed, blank, outside `content_root`, or either end has no annotated
/// block above it. None of these are errors.
pub fn resolve_selection(
    tree: &RenderTree,
    content_root: NodeId,
    selection: &TextSelection,
) -> Option<PendingSelection> {
    let selected_text = selection.text.trim();
    if selection.is_collapsed() || selected_text.is_empty() {
        return None;
    }
    let inside = |p: SelectionPoint| tree.is_inclusive_descendant(p.node, content_root);
    if !inside(selection.anchor) || !inside(selection.focus) {
        return None;
    }

    let anchor_block = find_annotatable_ancestor(tree, content_root, selection.anchor.node)?;
    let focus_block = find_annotatable_ancestor(tree, content_root, selection.focus.node)?;
    let lines = tree.lines(anchor_block)?.union(tree.lines(focus_block)?);

    let later = if tree.document_position(anchor_block) > tree.document_position(focus_block) {
        anchor_block
    } else {
        focus_block
    };

    Some(PendingSelection {
        lines,
        anchor_block: later,
        anchor_text: tree.text_content(later).trim().to_string(),
        selected_text: selected_text.to_string(),
        bounding_rect: selection.bounding_rect,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::render_annotated;
    use pretty_assertions::assert_eq;

    /// Text node inside the `index`th top-level block.
    fn text_in(tree: &RenderTree, index: usize) -> NodeId {
        let block = tree.children(tree.root())[index];
        tree.preorder()
            .into_iter()
            .find(|&n| n != block && tree.is_inclusive_descendant(n, block) && tree.tag(n).is_none())
            .unwrap()
    }

    fn select(anchor: NodeId, focus: NodeId, text: &str) -> TextSelection {
        TextSelection {
            anchor: SelectionPoint::new(anchor, 0),
            focus: SelectionPoint::new(focus, 2),
            text: text.to_string(),
            bounding_rect: None,
        }
    }

    const DOC: &str = "Intro line\n\nSecond\n\n# Block A\n\npad\n\n- one\n- two\n- three\n";

    #[test]
    fn spans_blocks_in_either_direction() {
        let doc = render_annotated(DOC);
        let tree = &doc.tree;
        let a = text_in(tree, 2); // heading, line 5
        let b = text_in(tree, 4); // list, lines 9-11

        let forward = resolve_selection(tree, tree.root(), &select(a, b, "Block A ... two")).unwrap();
        let backward = resolve_selection(tree, tree.root(), &select(b, a, "Block A ... two")).unwrap();

        assert_eq!(forward.lines, LineRange::new(5, 11));
        assert_eq!(backward.lines, LineRange::new(5, 11));
        assert_eq!(forward.anchor_block, backward.anchor_block);
        assert_eq!(tree.tag(forward.anchor_block), Some("ul"));
    }

    #[test]
    fn selection_within_one_block() {
        let doc = render_annotated(DOC);
        let tree = &doc.tree;
        let t = text_in(tree, 0);
        let pending = resolve_selection(tree, tree.root(), &select(t, t, "  Intro  ")).unwrap();
        assert_eq!(pending.lines, LineRange::single(1));
        assert_eq!(pending.selected_text, "Intro");
        assert_eq!(pending.anchor_text, "Intro line");
    }

    #[test]
    fn collapsed_or_blank_selection_is_none() {
        let doc = render_annotated(DOC);
        let tree = &doc.tree;
        let t = text_in(tree, 0);
        let collapsed = TextSelection {
            anchor: SelectionPoint::new(t, 3),
            focus: SelectionPoint::new(t, 3),
            text: String::new(),
            bounding_rect: None,
        };
        assert_eq!(resolve_selection(tree, tree.root(), &collapsed), None);
        assert_eq!(resolve_selection(tree, tree.root(), &select(t, t, "   ")), None);
    }

    #[test]
    fn unannotated_endpoint_is_none() {
        let doc = render_annotated("# *Styled* heading\n\npara");
        let tree = &doc.tree;
        let heading = text_in(tree, 0);
        let para = text_in(tree, 1);
        assert_eq!(resolve_selection(tree, tree.root(), &select(heading, para, "x")), None);
    }

    #[test]
    fn outside_content_root_is_none() {
        let doc = render_annotated(DOC);
        let tree = &doc.tree;
        let list = tree.children(tree.root())[4];
        let item = tree.children(list)[0];
        let t = text_in(tree, 0);
        // Treat the list item as the content root; the paragraph lies outside it.
        assert_eq!(resolve_selection(tree, item, &select(t, t, "Intro")), None);
    }

    #[test]
    fn walk_stops_at_content_root() {
        let doc = render_annotated(DOC);
        let tree = &doc.tree;
        let list = tree.children(tree.root())[4];
        let item = tree.children(list)[0];
        let t = tree.children(item)[0];
        assert_eq!(find_annotatable_ancestor(tree, tree.root(), t), Some(list));
        assert_eq!(find_annotatable_ancestor(tree, list, t), None);
    }
}
