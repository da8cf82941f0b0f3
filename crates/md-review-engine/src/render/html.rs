use std::fmt::Write;

use super::tree::{NodeId, NodeKind, RenderTree};

pub const ANNOTATABLE_CLASS: &str = "annotatable";
pub const START_LINE_ATTR: &str = "data-start-line";
pub const END_LINE_ATTR: &str = "data-end-line";

const VOID_TAGS: [&str; 5] = ["br", "hr", "img", "input", "wbr"];

/// Escapes `&`, `<`, `>` and `"` for use in text or a double-quoted attribute.
pub fn escape_for_html(s: &str) -> String {
    html_escape::encode_double_quoted_attribute(s).into_owned()
}

impl RenderTree {
    /// Serialises the content root's children.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for &child in self.children(self.root()) {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Serialises `id` including its own tag.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match node.kind() {
            NodeKind::Text(text) => out.push_str(&html_escape::encode_text(text)),
            NodeKind::Raw(html) => out.push_str(html),
            NodeKind::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                let lines = node.lines();
                let mut wrote_class = false;
                for (name, value) in attrs {
                    if name == "class" && lines.is_some() {
                        wrote_class = true;
                        let merged = if value.is_empty() {
                            ANNOTATABLE_CLASS.to_string()
                        } else {
                            format!("{value} {ANNOTATABLE_CLASS}")
                        };
                        write_attr(out, name, &merged);
                    } else {
                        write_attr(out, name, value);
                    }
                }
                if let Some(range) = lines {
                    if !wrote_class {
                        write_attr(out, "class", ANNOTATABLE_CLASS);
                    }
                    let _ = write!(
                        out,
                        r#" {START_LINE_ATTR}="{}" {END_LINE_ATTR}="{}""#,
                        range.start_line, range.end_line
                    );
                }
                out.push('>');
                if VOID_TAGS.contains(&tag.as_str()) {
                    return;
                }
                for &child in node.children() {
                    self.write_node(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }
}

/// Empty values are written as bare boolean attributes.
fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    if !value.is_empty() {
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value));
        out.push('"');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_map::LineRange;
    use crate::render::render_markdown;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("a & b", "a &amp; b")]
    #[case("<div>", "&lt;div&gt;")]
    #[case("a > b", "a &gt; b")]
    #[case("\"quoted\"", "&quot;quoted&quot;")]
    #[case("hello world", "hello world")]
    #[case("a & <b> \"c\"", "a &amp; &lt;b&gt; &quot;c&quot;")]
    fn escapes_special_characters(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_for_html(input), expected);
    }

    #[test]
    fn code_block_content_is_escaped() {
        let html = render_markdown("```\n<div>hello</div>\n```").to_html();
        assert!(html.contains("&lt;div&gt;"), "{html}");
        assert!(!html.contains("<div>"), "{html}");
    }

    #[test]
    fn code_block_shape() {
        let html = render_markdown("```ts\nconst x = 1;\n```").to_html();
        assert_eq!(html, r#"<pre><code class="language-ts">const x = 1;</code></pre>"#);
    }

    #[test]
    fn mermaid_container_shape() {
        let html = render_markdown("```mermaid\nA-->B\n```").to_html();
        assert_eq!(
            html,
            concat!(
                r#"<div class="mermaid-container" data-mermaid-id="mermaid-0">"#,
                r#"<pre class="mermaid-source">A--&gt;B</pre>"#,
                r#"<div class="mermaid-render"></div></div>"#
            )
        );
    }

    #[rstest]
    #[case("- [x] done", r#"<input type="checkbox" checked disabled>"#)]
    #[case("- [ ] todo", r#"<input type="checkbox" disabled>"#)]
    fn task_checkbox_markup(#[case] markdown: &str, #[case] expected: &str) {
        let html = render_markdown(markdown).to_html();
        assert!(html.contains(expected), "{html}");
        assert!(html.contains(r#"<li class="task-list-item">"#), "{html}");
    }

    #[test]
    fn inline_formatting_in_list_items() {
        let html = render_markdown("- **bold** *italic* `code`").to_html();
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
        assert!(html.contains("<code>code</code>"));
    }

    #[test]
    fn matched_blocks_carry_line_attributes() {
        let mut tree = render_markdown("para");
        let p = tree.children(tree.root())[0];
        tree.set_lines(p, LineRange::new(3, 4));
        assert_eq!(
            tree.to_html(),
            r#"<p class="annotatable" data-start-line="3" data-end-line="4">para</p>"#
        );
    }

    #[test]
    fn annotatable_class_merges_with_existing() {
        let mut tree = render_markdown("```mermaid\nx\n```");
        let container = tree.children(tree.root())[0];
        tree.set_lines(container, LineRange::new(1, 3));
        let html = tree.outer_html(container);
        assert!(
            html.starts_with(r#"<div class="mermaid-container annotatable" data-mermaid-id="mermaid-0" data-start-line="1" data-end-line="3">"#),
            "{html}"
        );
    }
}
