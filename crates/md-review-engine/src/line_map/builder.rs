use super::{
    classify::{LineOpen, MarkdownLineClassifier},
    kinds::{BlockQuote, CodeFence, FenceKind, ListItem, Table, ThematicBreak},
    types::{BlockType, LineMap, LineMapEntry, LineRange},
};

/// Placeholder text for fenced blocks, which are matched by position only.
pub const CODE_BLOCK_TEXT: &str = "(code block)";

/// Cursor-driven scanner that claims each non-blank line for exactly one entry.
pub struct LineMapBuilder<'a> {
    lines: Vec<&'a str>,
    cursor: usize,
    classifier: MarkdownLineClassifier,
    out: Vec<LineMapEntry>,
}

impl<'a> LineMapBuilder<'a> {
    pub fn new(source: &'a str) -> Self {
        let lines = source
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();
        Self {
            lines,
            cursor: 0,
            classifier: MarkdownLineClassifier,
            out: vec![],
        }
    }

    pub fn build(mut self) -> LineMap {
        while self.cursor < self.lines.len() {
            match self.open_at(self.cursor) {
                LineOpen::Blank => self.cursor += 1,
                LineOpen::Fence { kind, block_type } => self.consume_fence(kind, block_type),
                LineOpen::Heading { text } => {
                    let text = text.to_string();
                    self.push_single(BlockType::Heading, text);
                }
                LineOpen::ThematicBreak => {
                    self.push_single(BlockType::Hr, ThematicBreak::TEXT.to_string());
                }
                LineOpen::BlockQuote => self.consume_block_quote(),
                LineOpen::Table => self.consume_table(),
                LineOpen::List => self.consume_list(),
                LineOpen::Paragraph => self.consume_paragraph(),
            }
        }
        LineMap::from_entries(self.out)
    }

    fn line(&self, index: usize) -> Option<&'a str> {
        self.lines.get(index).copied()
    }

    fn open_at(&self, index: usize) -> LineOpen<'a> {
        let line = self.lines[index];
        self.classifier.classify(line, self.line(index + 1))
    }

    /// Advances past consecutive lines satisfying `pred`, returning the last line number consumed.
    fn consume_while(&mut self, pred: impl Fn(&str) -> bool) -> usize {
        while self.line(self.cursor).is_some_and(&pred) {
            self.cursor += 1;
        }
        self.cursor
    }

    fn push(&mut self, block_type: BlockType, start_index: usize, end_line: usize, text: String) {
        self.out.push(LineMapEntry::new(
            block_type,
            LineRange::new(start_index + 1, end_line),
            text,
        ));
    }

    fn push_single(&mut self, block_type: BlockType, text: String) {
        let start = self.cursor;
        self.cursor += 1;
        self.push(block_type, start, start + 1, text);
    }

    fn consume_fence(&mut self, kind: FenceKind, block_type: BlockType) {
        let start = self.cursor;
        self.cursor += 1;
        self.consume_while(|l| !CodeFence::closes(kind, l));
        // Closing fence is inclusive; an unterminated fence stops at the last line.
        let end_line = (self.cursor + 1).min(self.lines.len());
        self.cursor += 1;
        self.push(block_type, start, end_line, CODE_BLOCK_TEXT.to_string());
    }

    fn consume_block_quote(&mut self) {
        let start = self.cursor;
        let end_line = self.consume_while(BlockQuote::is_quote_line);
        let text = BlockQuote::strip_prefix(self.lines[start]).to_string();
        self.push(BlockType::Blockquote, start, end_line, text);
    }

    fn consume_table(&mut self) {
        let start = self.cursor;
        // Header and separator rows.
        self.cursor += 2;
        let end_line = self.consume_while(Table::continues);
        self.push(BlockType::Table, start, end_line, self.lines[start].to_string());
    }

    fn consume_list(&mut self) {
        let start = self.cursor;
        let end_line = self.consume_while(|l| {
            !l.trim().is_empty() && (ListItem::is_item(l) || ListItem::is_continuation(l))
        });
        let text = ListItem::item_text(self.lines[start]).to_string();
        self.push(BlockType::List, start, end_line, text);
    }

    fn consume_paragraph(&mut self) {
        let start = self.cursor;
        let mut parts = vec![self.lines[start]];
        self.cursor += 1;
        while self.cursor < self.lines.len() {
            // Continuation stops on the same openers the main dispatch uses.
            if self.open_at(self.cursor) != LineOpen::Paragraph {
                break;
            }
            parts.push(self.lines[self.cursor]);
            self.cursor += 1;
        }
        let end_line = self.cursor;
        self.push(BlockType::Paragraph, start, end_line, parts.join(" "));
    }
}
