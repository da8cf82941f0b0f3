/// Blockquote block type with owned delimiter constant.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: char = '>';

    /// A quote line is `> text` or a bare `>`.
    pub fn is_quote_line(line: &str) -> bool {
        line.starts_with("> ") || line == ">"
    }

    /// Strips the `>` prefix and at most one following whitespace character.
    pub fn strip_prefix(line: &str) -> &str {
        let Some(rest) = line.strip_prefix(Self::PREFIX) else {
            return line;
        };
        match rest.chars().next() {
            Some(c) if c.is_whitespace() => &rest[c.len_utf8()..],
            _ => rest,
        }
    }
}
