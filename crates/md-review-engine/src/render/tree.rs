use crate::line_map::LineRange;

/// Index of a node inside its [`RenderTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    /// Markup passed through unescaped (inline HTML, injected SVG).
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    lines: Option<LineRange>,
}

impl RenderNode {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Source lines this block was matched to, if any.
    pub fn lines(&self) -> Option<LineRange> {
        self.lines
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }
}

/// In-memory rendered document.
///
/// Nodes live in an arena and refer to each other by [`NodeId`]. Node 0 is
/// always the content root, a `div#content-area` that is never annotated.
/// Detached nodes stay in the arena but are unreachable from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTree {
    nodes: Vec<RenderNode>,
}

impl Default for RenderTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderTree {
    pub const CONTENT_ROOT_ID: &'static str = "content-area";

    pub fn new() -> Self {
        let root = RenderNode {
            kind: NodeKind::Element {
                tag: "div".to_string(),
                attrs: vec![("id".to_string(), Self::CONTENT_ROOT_ID.to_string())],
            },
            parent: None,
            children: vec![],
            lines: None,
        };
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> Option<&RenderNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(RenderNode {
            kind,
            parent: Some(parent),
            children: vec![],
            lines: None,
        });
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: impl IntoIterator<Item = (String, String)>,
    ) -> NodeId {
        self.push(
            parent,
            NodeKind::Element {
                tag: tag.to_string(),
                attrs: attrs.into_iter().collect(),
            },
        )
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.push(parent, NodeKind::Text(text.into()))
    }

    pub fn append_raw(&mut self, parent: NodeId, html: impl Into<String>) -> NodeId {
        self.push(parent, NodeKind::Raw(html.into()))
    }

    /// Detaches every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        let children = std::mem::take(&mut node.children);
        for child in children {
            if let Some(c) = self.nodes.get_mut(child.0) {
                c.parent = None;
            }
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(RenderNode::children).unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(RenderNode::parent)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(RenderNode::tag)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.get(id)?.kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let Some(RenderNode {
            kind: NodeKind::Element { attrs, .. },
            ..
        }) = self.nodes.get_mut(id.0)
        else {
            return;
        };
        let value = value.into();
        match attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => attrs.push((name.to_string(), value)),
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let classes = match self.attr(id, "class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr(id, "class", classes);
    }

    pub fn lines(&self, id: NodeId) -> Option<LineRange> {
        self.get(id).and_then(RenderNode::lines)
    }

    pub fn set_lines(&mut self, id: NodeId, range: LineRange) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.lines = Some(range);
        }
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.get(id).map(|_| id), move |&n| self.parent(n))
    }

    /// Whether `id` is `ancestor` or lies below it.
    pub fn is_inclusive_descendant(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Reachable nodes in document (pre-)order, starting at the root.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Position of `id` in document order, `None` if detached.
    pub fn document_position(&self, id: NodeId) -> Option<usize> {
        self.preorder().iter().position(|&n| n == id)
    }

    /// Concatenated text of every text node below `id`, like the DOM's `textContent`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.get(id).map(RenderNode::kind) {
            Some(NodeKind::Text(text)) => out.push_str(text),
            Some(NodeKind::Element { .. }) => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
            _ => {}
        }
    }

    /// Reachable elements carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    /// First direct child of `id` carrying `class`.
    pub fn child_with_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.has_class(c, class))
    }
}
