use crate::line_map::BlockType;
use crate::render::markdown::{MERMAID_CONTAINER_CLASS, MERMAID_SOURCE_CLASS};
use crate::render::{NodeId, RenderTree};

/// How a rendered element is matched, decided from its tag and classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Diagram,
    Code,
    Table,
    Rule,
    Heading,
    BlockQuote,
    List,
    Paragraph,
}

impl ElementKind {
    /// Classifies `id`; checks run in a fixed order, diagram container first.
    pub fn of(tree: &RenderTree, id: NodeId) -> Option<Self> {
        if tree.has_class(id, MERMAID_CONTAINER_CLASS) {
            return Some(Self::Diagram);
        }
        let kind = match tree.tag(id)? {
            "pre" if !tree.has_class(id, MERMAID_SOURCE_CLASS) => Self::Code,
            "table" => Self::Table,
            "hr" => Self::Rule,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Self::Heading,
            "blockquote" => Self::BlockQuote,
            "ul" | "ol" => Self::List,
            "p" => Self::Paragraph,
            _ => return None,
        };
        Some(kind)
    }

    /// The line map entry type this element claims.
    pub fn entry_type(self) -> BlockType {
        match self {
            Self::Diagram => BlockType::Mermaid,
            Self::Code => BlockType::Code,
            Self::Table => BlockType::Table,
            Self::Rule => BlockType::Hr,
            Self::Heading => BlockType::Heading,
            Self::BlockQuote => BlockType::Blockquote,
            Self::List => BlockType::List,
            Self::Paragraph => BlockType::Paragraph,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("pre", None, Some(ElementKind::Code))]
    #[case("pre", Some("mermaid-source"), None)]
    #[case("div", Some("mermaid-container"), Some(ElementKind::Diagram))]
    #[case("h4", None, Some(ElementKind::Heading))]
    #[case("h7", None, None)]
    #[case("ol", None, Some(ElementKind::List))]
    #[case("hr", None, Some(ElementKind::Rule))]
    #[case("span", None, None)]
    fn classification(
        #[case] tag: &str,
        #[case] class: Option<&str>,
        #[case] expected: Option<ElementKind>,
    ) {
        let mut tree = RenderTree::new();
        let root = tree.root();
        let attrs = class.map(|c| ("class".to_string(), c.to_string()));
        let id = tree.append_element(root, tag, attrs);
        assert_eq!(ElementKind::of(&tree, id), expected);
    }
}
