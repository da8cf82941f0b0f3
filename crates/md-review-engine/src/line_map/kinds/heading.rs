/// ATX heading (`#` through `######`).
pub struct Heading;

impl Heading {
    pub const MARKER: char = '#';
    pub const MAX_LEVEL: usize = 6;

    /// Returns the heading text when the line is a heading with content.
    ///
    /// The marker run must be followed by whitespace and then at least one
    /// non-whitespace character.
    pub fn text(line: &str) -> Option<&str> {
        let level = line.chars().take_while(|&c| c == Self::MARKER).count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        let rest = &line[level..];
        let content = rest.trim_start();
        if content.len() == rest.len() || content.is_empty() {
            return None;
        }
        Some(content)
    }
}
