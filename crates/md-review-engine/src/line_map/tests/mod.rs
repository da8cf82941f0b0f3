//! Tests for the line mapper.


use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::line_map::{BlockType, LineMapEntry, LineRange, build_line_map};

fn entry(block_type: BlockType, start: usize, end: usize, text: &str) -> LineMapEntry {
    LineMapEntry::new(block_type, LineRange::new(start, end), text)
}

fn types(src: &str) -> Vec<BlockType> {
    build_line_map(src).iter().map(|e| e.block_type).collect()
}

#[test]
fn heading_on_first_line() {
    let map = build_line_map("# Title");
    assert_eq!(map.entries(), &[entry(BlockType::Heading, 1, 1, "Title")]);
}

#[test]
fn all_heading_levels_are_headings() {
    let src = ["# H1", "## H2", "### H3", "#### H4", "##### H5", "###### H6"].join("\n");
    assert_eq!(types(&src), vec![BlockType::Heading; 6]);
}

#[test]
fn heading_between_paragraph_lines() {
    let map = build_line_map("line one\n## Heading\nline three");
    assert_eq!(
        map.entries(),
        &[
            entry(BlockType::Paragraph, 1, 1, "line one"),
            entry(BlockType::Heading, 2, 2, "Heading"),
            entry(BlockType::Paragraph, 3, 3, "line three"),
        ]
    );
}

#[test]
fn multi_line_paragraph_joins_with_spaces() {
    let map = build_line_map("line one\nline two\nline three");
    assert_eq!(
        map.entries(),
        &[entry(BlockType::Paragraph, 1, 3, "line one line two line three")]
    );
}

#[test]
fn paragraphs_split_on_blank_lines() {
    assert_eq!(
        types("first\n\nsecond"),
        vec![BlockType::Paragraph, BlockType::Paragraph]
    );
}

#[rstest]
#[case("```\nx\n```", BlockType::Code, 3)]
#[case("```ts\nconst x = 1;\n```", BlockType::Code, 3)]
#[case("```mermaid\ngraph LR\n A-->B\n```", BlockType::Mermaid, 4)]
#[case("~~~\nx\n~~~", BlockType::Code, 3)]
#[case("```\nline a\nline b\n```", BlockType::Code, 4)]
fn fenced_blocks_cover_both_fences(
    #[case] src: &str,
    #[case] expected: BlockType,
    #[case] end_line: usize,
) {
    let map = build_line_map(src);
    assert_eq!(map.len(), 1);
    assert_eq!(map.entries()[0].block_type, expected);
    assert_eq!(map.entries()[0].range(), LineRange::new(1, end_line));
}

#[test]
fn fenced_block_text_is_placeholder() {
    let map = build_line_map("```\n# not a heading\n```");
    assert_eq!(map.entries()[0].text, "(code block)");
}

#[test]
fn unterminated_fence_runs_to_end_of_input() {
    let map = build_line_map("intro\n\n```\ncode\nmore code");
    assert_eq!(
        map.entries()[1],
        entry(BlockType::Code, 3, 5, "(code block)")
    );
}

#[test]
fn tilde_fence_is_not_closed_by_backticks() {
    let map = build_line_map("~~~\n```\ninner\n```\n~~~\nafter");
    assert_eq!(
        map.entries(),
        &[
            entry(BlockType::Code, 1, 5, "(code block)"),
            entry(BlockType::Paragraph, 6, 6, "after"),
        ]
    );
}

#[rstest]
#[case("- item one\n- item two")]
#[case("* alpha\n* beta")]
#[case("+ one\n+ two")]
#[case("1. first\n2. second")]
fn list_markers_produce_one_list(#[case] src: &str) {
    let map = build_line_map(src);
    assert_eq!(map.len(), 1);
    assert_eq!(map.entries()[0].block_type, BlockType::List);
    assert_eq!(map.entries()[0].range(), LineRange::new(1, 2));
}

#[test]
fn list_spans_all_items() {
    let map = build_line_map("- a\n- b\n- c");
    assert_eq!(map.entries(), &[entry(BlockType::List, 1, 3, "a")]);
}

#[test]
fn indented_continuation_stays_in_list() {
    let map = build_line_map("- item one\n  continuation\n- item two");
    assert_eq!(map.entries(), &[entry(BlockType::List, 1, 3, "item one")]);
}

#[test]
fn nested_list_is_absorbed_flat() {
    let map = build_line_map("- parent\n  - child\n    - grandchild\n- sibling");
    assert_eq!(map.len(), 1);
    assert_eq!(map.entries()[0].range(), LineRange::new(1, 4));
}

#[test]
fn list_ends_at_blank_line() {
    assert_eq!(
        types("- item\n\nparagraph"),
        vec![BlockType::List, BlockType::Paragraph]
    );
}

#[test]
fn list_ends_at_unindented_text() {
    let map = build_line_map("- item\nlazy text");
    assert_eq!(
        map.entries(),
        &[
            entry(BlockType::List, 1, 1, "item"),
            entry(BlockType::Paragraph, 2, 2, "lazy text"),
        ]
    );
}

#[rstest]
#[case("---")]
#[case("___")]
#[case("***")]
fn rules_are_single_line(#[case] src: &str) {
    let map = build_line_map(src);
    assert_eq!(map.entries(), &[entry(BlockType::Hr, 1, 1, "---")]);
}

#[test]
fn rule_interrupts_paragraph() {
    let map = build_line_map("para\n---\nafter");
    assert_eq!(map.entries()[1], entry(BlockType::Hr, 2, 2, "---"));
}

#[test]
fn consecutive_quote_lines_merge() {
    let map = build_line_map("> line one\n>\n> line three");
    assert_eq!(
        map.entries(),
        &[entry(BlockType::Blockquote, 1, 3, "line one")]
    );
}

#[test]
fn quote_text_strips_prefix() {
    let map = build_line_map("> hello there");
    assert_eq!(map.entries()[0].text, "hello there");
}

#[test]
fn table_with_separator() {
    let map = build_line_map("| A |\n|---|\n| 1 |");
    assert_eq!(map.entries(), &[entry(BlockType::Table, 1, 3, "| A |")]);
}

#[test]
fn table_covers_all_rows() {
    let map = build_line_map("| H |\n|---|\n| r1 |\n| r2 |\n\nafter");
    assert_eq!(map.entries()[0].range(), LineRange::new(1, 4));
    assert_eq!(map.entries()[1].block_type, BlockType::Paragraph);
}

#[test]
fn pipe_text_without_separator_is_paragraph() {
    assert_eq!(types("a | b\nc | d"), vec![BlockType::Paragraph]);
}

#[test]
fn table_interrupts_paragraph() {
    let map = build_line_map("intro\n| A |\n|---|");
    assert_eq!(
        map.entries(),
        &[
            entry(BlockType::Paragraph, 1, 1, "intro"),
            entry(BlockType::Table, 2, 3, "| A |"),
        ]
    );
}

#[test]
fn blank_only_input_has_no_entries() {
    assert!(build_line_map("\n\n\n").is_empty());
    assert!(build_line_map("").is_empty());
}

#[test]
fn blank_lines_between_blocks_add_nothing() {
    assert_eq!(build_line_map("# H\n\nparagraph\n\n- list").len(), 3);
}

#[test]
fn hash_without_content_is_paragraph_and_terminates() {
    let map = build_line_map("#   \nnext");
    assert_eq!(map.entries(), &[entry(BlockType::Paragraph, 1, 2, "#    next")]);
}

#[test]
fn crlf_line_endings() {
    let map = build_line_map("# Title\r\n\r\n```mermaid\r\ngraph\r\n```\r\n");
    assert_eq!(
        map.entries(),
        &[
            entry(BlockType::Heading, 1, 1, "Title"),
            entry(BlockType::Mermaid, 3, 5, "(code block)"),
        ]
    );
}

#[test]
fn realistic_document_in_source_order() {
    let src = [
        "# Introduction",       // 1
        "",                     // 2
        "Some paragraph text.", // 3
        "",                     // 4
        "- item a",             // 5
        "- item b",             // 6
        "",                     // 7
        "```js",                // 8
        "const x = 1;",         // 9
        "```",                  // 10
        "",                     // 11
        "> a quote",            // 12
        "",                     // 13
        "---",                  // 14
    ]
    .join("\n");

    let map = build_line_map(&src);
    let summary: Vec<_> = map
        .iter()
        .map(|e| (e.block_type, e.start_line, e.end_line))
        .collect();
    assert_eq!(
        summary,
        vec![
            (BlockType::Heading, 1, 1),
            (BlockType::Paragraph, 3, 3),
            (BlockType::List, 5, 6),
            (BlockType::Code, 8, 10),
            (BlockType::Blockquote, 12, 12),
            (BlockType::Hr, 14, 14),
        ]
    );
    invariants::check(&src, &map);
}

#[rstest]
#[case("")]
#[case("# a\n## b\ntext\n- x\n  y\n> q\n| a |\n|--|\n```\nunterminated")]
#[case("```\n```\n```\n")]
#[case("| a |\n|---|\n\n| b |\n| c |")]
#[case("para\n#\n# \n#  x\n>\n>x\n1.\n1. \n-\n- ")]
#[case("***\n* * *\n- - -\n___\n____")]
#[case("text\r\n> quote\r\n>\r\nmore")]
fn invariants_hold(#[case] src: &str) {
    let map = build_line_map(src);
    invariants::check(src, &map);
}
