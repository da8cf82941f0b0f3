use relative_path::{RelativePath, RelativePathBuf};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    File,
}

/// A directory or markdown file in folder mode, relative to the served root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    pub name: String,
    pub relative_path: RelativePathBuf,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    pub fn file(relative_path: RelativePathBuf) -> Self {
        Self {
            name: relative_path.file_name().unwrap_or_default().to_string(),
            relative_path,
            kind: EntryKind::File,
            children: vec![],
        }
    }

    /// A directory node; children are sorted directories first, then files,
    /// each by case-insensitive name.
    pub fn dir(
        name: impl Into<String>,
        relative_path: RelativePathBuf,
        mut children: Vec<FolderNode>,
    ) -> Self {
        children.sort_by(|a, b| {
            let rank = |n: &FolderNode| n.kind == EntryKind::File;
            rank(a)
                .cmp(&rank(b))
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Self {
            name: name.into(),
            relative_path,
            kind: EntryKind::Dir,
            children,
        }
    }

    /// Every markdown file below this node, in display order.
    pub fn files(&self) -> Vec<&RelativePath> {
        let mut out = vec![];
        self.collect_files(&mut out);
        out
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a RelativePath>) {
        match self.kind {
            EntryKind::File => out.push(&self.relative_path),
            EntryKind::Dir => {
                for child in &self.children {
                    child.collect_files(out);
                }
            }
        }
    }

    pub fn contains_file(&self, path: &RelativePath) -> bool {
        self.files().contains(&path)
    }

    /// First file in display order, opened when a folder review starts.
    pub fn first_file(&self) -> Option<&RelativePath> {
        self.files().into_iter().next()
    }
}
