use crate::line_map::types::BlockType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";
    pub const MERMAID: &'static str = "mermaid";

    /// Detects a fence marker at the very start of the line.
    pub fn sig(line: &str) -> Option<FenceKind> {
        if line.starts_with(Self::BACKTICKS) {
            Some(FenceKind::Backticks)
        } else if line.starts_with(Self::TILDES) {
            Some(FenceKind::Tildes)
        } else {
            None
        }
    }

    /// The language tag: the run of word characters right after the marker.
    pub fn language(line: &str) -> &str {
        let Some(rest) = line.get(Self::BACKTICKS.len()..) else {
            return "";
        };
        let end = rest
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
            .map_or(rest.len(), |(i, _)| i);
        &rest[..end]
    }

    pub fn closes(kind: FenceKind, line: &str) -> bool {
        Self::sig(line) == Some(kind)
    }

    pub fn block_type(language: &str) -> BlockType {
        if language == Self::MERMAID {
            BlockType::Mermaid
        } else {
            BlockType::Code
        }
    }
}
