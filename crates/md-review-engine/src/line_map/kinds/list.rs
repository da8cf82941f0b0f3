/// Bullet (`-`, `*`, `+`) or ordered (`1.`) list item lines.
pub struct ListItem;

impl ListItem {
    pub const BULLETS: [char; 3] = ['-', '*', '+'];
    /// Leading whitespace needed for a line to continue the previous item.
    pub const CONTINUATION_INDENT: usize = 2;

    /// Byte offset where the item's content starts, if the line is a list item.
    ///
    /// Leading indentation is allowed; the marker must be followed by whitespace.
    pub fn content_start(line: &str) -> Option<usize> {
        let rest = line.trim_start();
        let indent = line.len() - rest.len();
        let marker_len = match rest.chars().next() {
            Some(c) if Self::BULLETS.contains(&c) => 1,
            Some(c) if c.is_ascii_digit() => {
                let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
                if !rest[digits..].starts_with('.') {
                    return None;
                }
                digits + 1
            }
            _ => return None,
        };
        let after = &rest[marker_len..];
        let content = after.trim_start();
        if content.len() == after.len() {
            return None;
        }
        Some(indent + marker_len + (after.len() - content.len()))
    }

    pub fn is_item(line: &str) -> bool {
        Self::content_start(line).is_some()
    }

    /// Indented lines stay inside the current list entry.
    pub fn is_continuation(line: &str) -> bool {
        let mut chars = line.chars();
        (0..Self::CONTINUATION_INDENT).all(|_| chars.next().is_some_and(char::is_whitespace))
    }

    /// The item's content with its marker stripped.
    pub fn item_text(line: &str) -> &str {
        Self::content_start(line).map_or(line, |start| &line[start..])
    }
}
