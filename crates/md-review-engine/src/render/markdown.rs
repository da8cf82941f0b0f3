//! Markdown to [`RenderTree`] conversion on top of `pulldown-cmark`.
//!
//! The renderer attaches no source-line information; block identity is
//! recovered later by the matcher.

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::tree::{NodeId, RenderTree};

pub const MERMAID_CONTAINER_CLASS: &str = "mermaid-container";
pub const MERMAID_SOURCE_CLASS: &str = "mermaid-source";
pub const MERMAID_RENDER_CLASS: &str = "mermaid-render";
pub const MERMAID_ID_ATTR: &str = "data-mermaid-id";
pub const TASK_ITEM_CLASS: &str = "task-list-item";

/// Renders markdown into a fresh tree rooted at the content area.
///
/// GFM tables, task lists and strikethrough are enabled. Fenced code becomes
/// `<pre><code class="language-x">`; a `mermaid` fence becomes a diagram
/// container with the escaped source hidden in `pre.mermaid-source` and an
/// empty `div.mermaid-render` slot.
pub fn render_markdown(markdown: &str) -> RenderTree {
    let options = Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS | Options::ENABLE_STRIKETHROUGH;
    let mut renderer = MarkdownRenderer::new();
    for event in Parser::new_ext(markdown, options) {
        renderer.process_event(event);
    }
    renderer.tree
}

/// One entry per open `Start` event so every `End` pops exactly one frame.
enum Frame {
    Element(NodeId),
    /// Text inside an image becomes its `alt` attribute.
    Image(NodeId),
    /// Tags with no element of their own; children attach to the enclosing frame.
    Transparent,
}

struct CodeBuffer {
    language: String,
    content: String,
}

#[derive(Default)]
struct TableState {
    table: Option<NodeId>,
    body: Option<NodeId>,
    alignments: Vec<Alignment>,
    in_head: bool,
    cell: usize,
}

struct MarkdownRenderer {
    tree: RenderTree,
    stack: Vec<Frame>,
    code: Option<CodeBuffer>,
    table: TableState,
    diagrams: usize,
}

impl MarkdownRenderer {
    fn new() -> Self {
        Self {
            tree: RenderTree::new(),
            stack: vec![],
            code: None,
            table: TableState::default(),
            diagrams: 0,
        }
    }

    fn current(&self) -> NodeId {
        self.stack
            .iter()
            .rev()
            .find_map(|frame| match frame {
                Frame::Element(id) | Frame::Image(id) => Some(*id),
                Frame::Transparent => None,
            })
            .unwrap_or_else(|| self.tree.root())
    }

    fn open(&mut self, tag: &str, attrs: Vec<(String, String)>) {
        let parent = self.current();
        let id = self.tree.append_element(parent, tag, attrs);
        self.stack.push(Frame::Element(id));
    }

    fn leaf(&mut self, tag: &str, attrs: Vec<(String, String)>) -> NodeId {
        let parent = self.current();
        self.tree.append_element(parent, tag, attrs)
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = &mut self.code {
            code.content.push_str(text);
            return;
        }
        if let Some(Frame::Image(img)) = self.stack.last() {
            let img = *img;
            let alt = format!("{}{text}", self.tree.attr(img, "alt").unwrap_or_default());
            self.tree.set_attr(img, "alt", alt);
            return;
        }
        let parent = self.current();
        self.tree.append_text(parent, text);
    }

    fn process_event(&mut self, event: Event) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or_default().to_string()
                    }
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some(CodeBuffer {
                    language,
                    content: String::new(),
                });
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(code) = self.code.take() {
                    self.finish_code_block(code);
                }
            }
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                let el = self.leaf("code", vec![]);
                self.tree.append_text(el, code.to_string());
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                if let Some(code) = &mut self.code {
                    code.content.push_str(&html);
                } else {
                    let parent = self.current();
                    self.tree.append_raw(parent, html.to_string());
                }
            }
            Event::SoftBreak => self.text("\n"),
            Event::HardBreak => {
                self.leaf("br", vec![]);
            }
            Event::Rule => {
                self.leaf("hr", vec![]);
            }
            Event::TaskListMarker(checked) => self.task_marker(checked),
            Event::FootnoteReference(name) => self.text(&format!("[^{name}]")),
            Event::InlineMath(math) | Event::DisplayMath(math) => self.text(&math),
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        match tag {
            Tag::Paragraph => self.open("p", vec![]),
            Tag::Heading { level, id, .. } => {
                let attrs = id
                    .map(|id| vec![("id".to_string(), id.to_string())])
                    .unwrap_or_default();
                self.open(heading_tag(level), attrs);
            }
            Tag::BlockQuote(_) => self.open("blockquote", vec![]),
            Tag::List(Some(start)) => {
                let attrs = if start == 1 {
                    vec![]
                } else {
                    vec![("start".to_string(), start.to_string())]
                };
                self.open("ol", attrs);
            }
            Tag::List(None) => self.open("ul", vec![]),
            Tag::Item => self.open("li", vec![]),
            Tag::Table(alignments) => {
                self.open("table", vec![]);
                self.table = TableState {
                    table: Some(self.current()),
                    alignments,
                    ..TableState::default()
                };
            }
            Tag::TableHead => {
                let head = self.leaf("thead", vec![]);
                let row = self.tree.append_element(head, "tr", []);
                self.stack.push(Frame::Element(row));
                self.table.in_head = true;
                self.table.cell = 0;
            }
            Tag::TableRow => {
                let body = match (self.table.body, self.table.table) {
                    (Some(body), _) => body,
                    (None, Some(table)) => {
                        let body = self.tree.append_element(table, "tbody", []);
                        self.table.body = Some(body);
                        body
                    }
                    (None, None) => self.current(),
                };
                let row = self.tree.append_element(body, "tr", []);
                self.stack.push(Frame::Element(row));
                self.table.cell = 0;
            }
            Tag::TableCell => {
                let tag = if self.table.in_head { "th" } else { "td" };
                let attrs = match self.table.alignments.get(self.table.cell) {
                    Some(Alignment::Left) => vec![style_align("left")],
                    Some(Alignment::Center) => vec![style_align("center")],
                    Some(Alignment::Right) => vec![style_align("right")],
                    _ => vec![],
                };
                self.table.cell += 1;
                self.open(tag, attrs);
            }
            Tag::Emphasis => self.open("em", vec![]),
            Tag::Strong => self.open("strong", vec![]),
            Tag::Strikethrough => self.open("del", vec![]),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut attrs = vec![("href".to_string(), dest_url.to_string())];
                if !title.is_empty() {
                    attrs.push(("title".to_string(), title.to_string()));
                }
                self.open("a", attrs);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut attrs = vec![
                    ("src".to_string(), dest_url.to_string()),
                    ("alt".to_string(), String::new()),
                ];
                if !title.is_empty() {
                    attrs.push(("title".to_string(), title.to_string()));
                }
                let img = self.leaf("img", attrs);
                self.stack.push(Frame::Image(img));
            }
            _ => self.stack.push(Frame::Transparent),
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        if tag == TagEnd::TableHead {
            self.table.in_head = false;
        }
        if tag == TagEnd::Table {
            self.table = TableState::default();
        }
        self.stack.pop();
    }

    fn task_marker(&mut self, checked: bool) {
        let item = self
            .tree
            .ancestors(self.current())
            .find(|&id| self.tree.tag(id) == Some("li"));
        if let Some(item) = item {
            self.tree.add_class(item, TASK_ITEM_CLASS);
        }
        let mut attrs = vec![("type".to_string(), "checkbox".to_string())];
        if checked {
            attrs.push(("checked".to_string(), String::new()));
        }
        attrs.push(("disabled".to_string(), String::new()));
        self.leaf("input", attrs);
        self.text(" ");
    }

    fn finish_code_block(&mut self, code: CodeBuffer) {
        let content = code.content.strip_suffix('\n').unwrap_or(&code.content);
        if code.language == "mermaid" {
            let id = format!("mermaid-{}", self.diagrams);
            self.diagrams += 1;
            let container = self.leaf(
                "div",
                vec![
                    ("class".to_string(), MERMAID_CONTAINER_CLASS.to_string()),
                    (MERMAID_ID_ATTR.to_string(), id),
                ],
            );
            let source = self.tree.append_element(
                container,
                "pre",
                [("class".to_string(), MERMAID_SOURCE_CLASS.to_string())],
            );
            self.tree.append_text(source, content);
            self.tree.append_element(
                container,
                "div",
                [("class".to_string(), MERMAID_RENDER_CLASS.to_string())],
            );
            return;
        }
        let pre = self.leaf("pre", vec![]);
        let attrs = if code.language.is_empty() {
            vec![]
        } else {
            vec![("class".to_string(), format!("language-{}", code.language))]
        };
        let el = self.tree.append_element(pre, "code", attrs);
        self.tree.append_text(el, content);
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

fn style_align(align: &str) -> (String, String) {
    ("style".to_string(), format!("text-align: {align}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn top_level_tags(tree: &RenderTree) -> Vec<&str> {
        tree.children(tree.root())
            .iter()
            .filter_map(|&id| tree.tag(id))
            .collect()
    }

    #[test]
    fn blocks_become_direct_children_of_root() {
        let tree = render_markdown("# Title\n\npara\n\n- a\n\n> q\n\n---\n\n1. x");
        assert_eq!(
            top_level_tags(&tree),
            vec!["h1", "p", "ul", "blockquote", "hr", "ol"]
        );
    }

    #[test]
    fn fenced_code_keeps_language_class() {
        let tree = render_markdown("```ts\nconst x = 1;\n```");
        let pre = tree.children(tree.root())[0];
        let code = tree.children(pre)[0];
        assert_eq!(tree.tag(pre), Some("pre"));
        assert_eq!(tree.attr(code, "class"), Some("language-ts"));
        assert_eq!(tree.text_content(code), "const x = 1;");
    }

    #[test]
    fn plain_fence_has_no_class() {
        let tree = render_markdown("```\nplain\n```");
        let code = tree.children(tree.children(tree.root())[0])[0];
        assert_eq!(tree.attr(code, "class"), None);
    }

    #[test]
    fn mermaid_fence_becomes_container() {
        let tree = render_markdown("```mermaid\ngraph LR\n  A --> B\n```");
        let container = tree.children(tree.root())[0];
        assert!(tree.has_class(container, MERMAID_CONTAINER_CLASS));
        assert_eq!(tree.attr(container, MERMAID_ID_ATTR), Some("mermaid-0"));
        let source = tree.child_with_class(container, MERMAID_SOURCE_CLASS);
        let slot = tree.child_with_class(container, MERMAID_RENDER_CLASS);
        assert_eq!(
            source.map(|s| tree.text_content(s)),
            Some("graph LR\n  A --> B".to_string())
        );
        assert_eq!(slot.map(|s| tree.children(s).len()), Some(0));
    }

    #[test]
    fn diagram_ids_are_unique() {
        let tree = render_markdown("```mermaid\na\n```\n\n```mermaid\nb\n```");
        let ids: Vec<_> = tree
            .find_by_class(MERMAID_CONTAINER_CLASS)
            .into_iter()
            .filter_map(|id| tree.attr(id, MERMAID_ID_ATTR))
            .collect();
        assert_eq!(ids, vec!["mermaid-0", "mermaid-1"]);
    }

    #[test]
    fn task_items_get_disabled_checkbox() {
        let tree = render_markdown("- [x] done\n- [ ] todo");
        let items = tree.find_by_class(TASK_ITEM_CLASS);
        assert_eq!(items.len(), 2);
        let checkbox = tree.children(items[0])[0];
        assert_eq!(tree.tag(checkbox), Some("input"));
        assert_eq!(tree.attr(checkbox, "checked"), Some(""));
        assert_eq!(tree.attr(checkbox, "disabled"), Some(""));
        let unchecked = tree.children(items[1])[0];
        assert_eq!(tree.attr(unchecked, "checked"), None);
        assert_eq!(tree.text_content(items[1]).trim(), "todo");
    }

    #[test]
    fn table_has_head_and_body() {
        let tree = render_markdown("| A | B |\n|:--|--:|\n| 1 | 2 |");
        let table = tree.children(tree.root())[0];
        let sections: Vec<_> = tree
            .children(table)
            .iter()
            .filter_map(|&id| tree.tag(id))
            .collect();
        assert_eq!(sections, vec!["thead", "tbody"]);
        let head_row = tree.children(tree.children(table)[0])[0];
        let first_th = tree.children(head_row)[0];
        assert_eq!(tree.tag(first_th), Some("th"));
        assert_eq!(tree.attr(first_th, "style"), Some("text-align: left"));
    }

    #[test]
    fn inline_formatting_nests_inside_list_items() {
        let tree = render_markdown("- **bold** and `code`");
        let li = tree.children(tree.children(tree.root())[0])[0];
        let tags: Vec<_> = tree
            .children(li)
            .iter()
            .filter_map(|&id| tree.tag(id))
            .collect();
        assert_eq!(tags, vec!["strong", "code"]);
        assert_eq!(tree.text_content(li), "bold and code");
    }

    #[test]
    fn image_text_becomes_alt() {
        let tree = render_markdown("![a cat](cat.png)");
        let p = tree.children(tree.root())[0];
        let img = tree.children(p)[0];
        assert_eq!(tree.attr(img, "alt"), Some("a cat"));
        assert_eq!(tree.attr(img, "src"), Some("cat.png"));
    }
}
