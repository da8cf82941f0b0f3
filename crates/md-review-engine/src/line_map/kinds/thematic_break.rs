/// Horizontal rule: three or more of the same marker on a line of its own.
pub struct ThematicBreak;

impl ThematicBreak {
    pub const MARKERS: [char; 3] = ['-', '_', '*'];
    pub const MIN_LEN: usize = 3;
    pub const TEXT: &'static str = "---";

    pub fn matches(line: &str) -> bool {
        let t = line.trim();
        match t.chars().next() {
            Some(first) if Self::MARKERS.contains(&first) => {
                t.len() >= Self::MIN_LEN && t.chars().all(|c| c == first)
            }
            _ => false,
        }
    }
}
