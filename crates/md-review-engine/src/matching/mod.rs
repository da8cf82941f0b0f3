//! # Block Matching
//!
//! Ties rendered blocks back to the line map. The renderer keeps no source
//! positions, so each candidate element is matched in document order against
//! entries that have not been claimed yet:
//!
//! - diagrams, code blocks, tables, rules, blockquotes and lists claim the next
//!   unclaimed entry of their type, positionally
//! - headings claim the first unclaimed heading whose text prefix matches the
//!   rendered text
//! - paragraphs try the same prefix test, then fall back to the next unclaimed
//!   paragraph
//!
//! Claims are recorded per entry index, so an entry can back at most one element.
//! The paragraph fallback can mis-associate runs of similar short paragraphs;
//! that trade-off is accepted.

mod annotate;
mod kind;

pub use annotate::{AnnotatedDocument, AnnotationReport, annotate, is_candidate_block, render_annotated};
pub use kind::ElementKind;

use crate::line_map::{BlockType, LineMap, LineMapEntry};
use crate::render::{NodeId, RenderTree};

/// Characters of rendered text compared against an entry's prefix.
pub const RENDERED_PREFIX_CHARS: usize = 40;
/// Characters of an entry's recorded text used as the required prefix.
pub const ENTRY_PREFIX_CHARS: usize = 30;

/// One matching pass over a line map.
///
/// Build a new matcher for every render; a matcher never forgets its claims.
pub struct BlockMatcher<'m> {
    map: &'m LineMap,
    claimed: Vec<bool>,
}

impl<'m> BlockMatcher<'m> {
    pub fn new(map: &'m LineMap) -> Self {
        Self {
            map,
            claimed: vec![false; map.len()],
        }
    }

    pub fn is_claimed(&self, index: usize) -> bool {
        self.claimed.get(index).copied().unwrap_or(false)
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.iter().filter(|&&c| c).count()
    }

    /// Matches one rendered element, claiming the entry it resolves to.
    pub fn match_block(&mut self, tree: &RenderTree, id: NodeId) -> Option<&'m LineMapEntry> {
        let kind = ElementKind::of(tree, id)?;
        match kind {
            ElementKind::Heading => {
                let rendered = rendered_prefix(&tree.text_content(id));
                self.claim_first(BlockType::Heading, |e| {
                    rendered.starts_with(&entry_prefix(&e.text))
                })
            }
            ElementKind::Paragraph => {
                let rendered = rendered_prefix(&tree.text_content(id));
                self.claim_first(BlockType::Paragraph, |e| {
                    let prefix = entry_prefix(&e.text);
                    let prefix = prefix.trim();
                    !rendered.is_empty() && !prefix.is_empty() && rendered.starts_with(prefix)
                })
                .or_else(|| self.claim_first(BlockType::Paragraph, |_| true))
            }
            positional => self.claim_first(positional.entry_type(), |_| true),
        }
    }

    fn claim_first(
        &mut self,
        block_type: BlockType,
        accept: impl Fn(&LineMapEntry) -> bool,
    ) -> Option<&'m LineMapEntry> {
        let map = self.map;
        let (index, entry) = map.iter().enumerate().find(|&(i, e)| {
            !self.claimed[i] && e.block_type == block_type && accept(e)
        })?;
        self.claimed[index] = true;
        Some(entry)
    }
}

fn rendered_prefix(text: &str) -> String {
    text.trim().chars().take(RENDERED_PREFIX_CHARS).collect()
}

fn entry_prefix(text: &str) -> String {
    text.chars().take(ENTRY_PREFIX_CHARS).collect()
}
