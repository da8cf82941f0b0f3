/// GFM pipe table, recognised by a header row followed by a separator row.
pub struct Table;

impl Table {
    pub const PIPE: char = '|';

    pub fn is_row(line: &str) -> bool {
        line.contains(Self::PIPE)
    }

    /// A separator row holds only pipes, colons, dashes and whitespace, with at least one dash.
    pub fn is_separator(line: &str) -> bool {
        !line.is_empty()
            && line.contains('-')
            && line
                .chars()
                .all(|c| c == Self::PIPE || c == ':' || c == '-' || c.is_whitespace())
    }

    pub fn opens(line: &str, next: Option<&str>) -> bool {
        Self::is_row(line) && next.is_some_and(Self::is_separator)
    }

    /// Body rows continue while they are non-blank and contain a pipe.
    pub fn continues(line: &str) -> bool {
        Self::is_row(line) && !line.trim().is_empty()
    }
}
