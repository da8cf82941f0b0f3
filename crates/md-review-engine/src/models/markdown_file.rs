use relative_path::{RelativePath, RelativePathBuf};

/// A markdown document read from disk, addressed relative to the served root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownFile {
    relative_path: RelativePathBuf,
    content: String,
}

impl MarkdownFile {
    pub fn new(relative_path: RelativePathBuf, content: String) -> Self {
        Self {
            relative_path,
            content,
        }
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// The file name shown in headers and used to tag comments in single-file mode.
    pub fn file_name(&self) -> &str {
        self.relative_path.file_name().unwrap_or("Untitled")
    }
}
