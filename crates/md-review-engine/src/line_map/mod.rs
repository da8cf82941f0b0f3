//! # Line Mapping
//!
//! Derives typed source-line ranges from raw markdown without help from the
//! renderer. The rendered document carries no line metadata, so this map is
//! what the block matcher reconciles rendered elements against.
//!
//! ## Phases
//!
//! 1. **Line classification** (`classify`): each line is tested against the
//!    block openers in a fixed precedence (fence, heading, rule, blockquote,
//!    table, list, paragraph). Tables need one line of lookahead.
//! 2. **Scanning** (`builder`): a cursor walks the lines top to bottom and
//!    each opener consumes its continuation lines into one entry.
//!
//! ## Invariants
//!
//! - Entries are in source order and never overlap
//! - Blank lines belong to no entry
//! - Every entry covers at least one line, so the scanner always advances
//! - List nesting is not modelled: a list entry absorbs indented lines flat

pub mod builder;
pub mod classify;
pub mod kinds;
pub mod types;

#[cfg(test)]
mod tests;

pub use builder::LineMapBuilder;
pub use classify::{LineOpen, MarkdownLineClassifier};
pub use types::{BlockType, LineMap, LineMapEntry, LineRange};

/// Splits `source` into 1-based lines and classifies them into a line map.
pub fn build_line_map(source: &str) -> LineMap {
    LineMapBuilder::new(source).build()
}
