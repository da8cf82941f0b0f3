use super::kinds::{BlockQuote, CodeFence, FenceKind, Heading, ListItem, Table, ThematicBreak};
use super::types::BlockType;

/// What a line opens, judged from the line itself plus one line of lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOpen<'a> {
    Blank,
    Fence {
        kind: FenceKind,
        block_type: BlockType,
    },
    Heading {
        text: &'a str,
    },
    ThematicBreak,
    BlockQuote,
    Table,
    List,
    Paragraph,
}

/// Classifies a single line by the fixed opener precedence:
/// fence, heading, rule, blockquote, table, list, then paragraph.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    pub fn classify<'a>(&self, line: &'a str, next: Option<&str>) -> LineOpen<'a> {
        if line.trim().is_empty() {
            return LineOpen::Blank;
        }
        if let Some(kind) = CodeFence::sig(line) {
            return LineOpen::Fence {
                kind,
                block_type: CodeFence::block_type(CodeFence::language(line)),
            };
        }
        if let Some(text) = Heading::text(line) {
            return LineOpen::Heading { text };
        }
        if ThematicBreak::matches(line) {
            return LineOpen::ThematicBreak;
        }
        if BlockQuote::is_quote_line(line) {
            return LineOpen::BlockQuote;
        }
        if Table::opens(line, next) {
            return LineOpen::Table;
        }
        if ListItem::is_item(line) {
            return LineOpen::List;
        }
        LineOpen::Paragraph
    }
}
