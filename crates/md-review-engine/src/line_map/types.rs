use serde::Serialize;

/// The kind of source block a line map entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Heading,
    Paragraph,
    Code,
    Mermaid,
    List,
    Blockquote,
    Table,
    Hr,
}

/// An inclusive, 1-based range of source lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRange {
    pub start_line: usize,
    pub end_line: usize,
}

impl LineRange {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    pub fn single(line: usize) -> Self {
        Self::new(line, line)
    }

    /// Returns true if the range covers exactly one line.
    #[must_use]
    pub fn is_single_line(self) -> bool {
        self.start_line == self.end_line
    }

    #[must_use]
    pub fn contains(self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    /// Smallest range covering both `self` and `other`.
    #[must_use]
    pub fn union(self, other: LineRange) -> LineRange {
        LineRange::new(
            self.start_line.min(other.start_line),
            self.end_line.max(other.end_line),
        )
    }

    /// Formats the range the way feedback transcripts reference lines: `L3` or `L3-7`.
    pub fn label(self) -> String {
        if self.is_single_line() {
            format!("L{}", self.start_line)
        } else {
            format!("L{}-{}", self.start_line, self.end_line)
        }
    }
}

/// One typed, line-numbered block descriptor derived from raw markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMapEntry {
    pub start_line: usize,
    pub end_line: usize,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// Representative snippet used for text matching.
    pub text: String,
}

impl LineMapEntry {
    pub fn new(block_type: BlockType, range: LineRange, text: impl Into<String>) -> Self {
        Self {
            start_line: range.start_line,
            end_line: range.end_line,
            block_type,
            text: text.into(),
        }
    }

    pub fn range(&self) -> LineRange {
        LineRange::new(self.start_line, self.end_line)
    }
}

/// Ordered, non-overlapping line map entries in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LineMap {
    entries: Vec<LineMapEntry>,
}

impl LineMap {
    pub(crate) fn from_entries(entries: Vec<LineMapEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LineMapEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineMapEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&LineMapEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the entry covering `line`, if any.
    pub fn entry_at_line(&self, line: usize) -> Option<&LineMapEntry> {
        self.entries.iter().find(|e| e.range().contains(line))
    }
}

impl<'a> IntoIterator for &'a LineMap {
    type Item = &'a LineMapEntry;
    type IntoIter = std::slice::Iter<'a, LineMapEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
