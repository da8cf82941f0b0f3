use crate::models::{FolderNode, MarkdownFile};
use glob::Pattern;
use relative_path::RelativePathBuf;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const MARKDOWN_EXTENSION: &str = "md";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid review root: {0}")]
    InvalidRoot(String),
    #[error("Path escapes the review root: {0}")]
    OutsideRoot(String),
    #[error("Not a markdown file: {0}")]
    NotMarkdown(String),
}

/// What the command line asked to review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewTarget {
    File { path: PathBuf, label: String },
    Folder { root: PathBuf, label: String },
}

impl ReviewTarget {
    pub fn label(&self) -> &str {
        match self {
            Self::File { label, .. } | Self::Folder { label, .. } => label,
        }
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == MARKDOWN_EXTENSION)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Decide whether `path` is a single document or a folder to review.
pub fn validate_review_path(path: &Path) -> Result<ReviewTarget, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let canonical = path.canonicalize()?;
    if canonical.is_dir() {
        return Ok(ReviewTarget::Folder {
            label: display_name(&canonical),
            root: canonical,
        });
    }
    if !canonical.is_file() {
        return Err(IoError::InvalidRoot(path.display().to_string()));
    }
    if !is_markdown(&canonical) {
        return Err(IoError::NotMarkdown(path.display().to_string()));
    }
    Ok(ReviewTarget::File {
        label: display_name(&canonical),
        path: canonical,
    })
}

/// Map a client-supplied relative path onto a markdown file under `root`.
///
/// Absolute paths and `..` components that climb above the root are refused
/// before touching the filesystem; symlinks that resolve outside the root are
/// refused after canonicalisation.
pub fn resolve_markdown_path(root: &Path, requested: &str) -> Result<PathBuf, IoError> {
    let relative = Path::new(requested);
    let mut depth = 0usize;
    for component in relative.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir if depth > 0 => depth -= 1,
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(IoError::OutsideRoot(requested.to_string()));
            }
        }
    }
    if !is_markdown(relative) {
        return Err(IoError::NotMarkdown(requested.to_string()));
    }

    let joined = root.join(relative);
    if !joined.exists() {
        return Err(IoError::NotFound(joined));
    }
    let canonical_root = root.canonicalize()?;
    let canonical = joined.canonicalize()?;
    if !canonical.starts_with(&canonical_root) {
        return Err(IoError::OutsideRoot(requested.to_string()));
    }
    Ok(canonical)
}

/// Read a markdown file below `root`
pub fn read_markdown(root: &Path, requested: &str) -> Result<MarkdownFile, IoError> {
    let path = resolve_markdown_path(root, requested)?;
    let content = fs::read_to_string(&path)?;
    let relative = RelativePathBuf::from(requested).normalize();
    Ok(MarkdownFile::new(relative, content))
}

/// Read the single document under review
pub fn read_single(path: &Path) -> Result<MarkdownFile, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    Ok(MarkdownFile::new(
        RelativePathBuf::from(display_name(path)),
        content,
    ))
}

/// Build the sidebar tree of markdown files below `root`.
///
/// Hidden entries and entries matching any `ignore` pattern (by name or by
/// relative path) are skipped. Directories without markdown descendants are
/// left out.
pub fn build_folder_tree(root: &Path, ignore: &[Pattern]) -> Result<FolderNode, IoError> {
    if !root.is_dir() {
        return Err(IoError::InvalidRoot(format!(
            "{} is not a directory",
            root.display()
        )));
    }
    let children = scan_directory_recursive(root, &RelativePathBuf::new(), ignore)?;
    Ok(FolderNode::dir(
        display_name(&root.canonicalize()?),
        RelativePathBuf::new(),
        children,
    ))
}

fn is_ignored(name: &str, relative: &RelativePathBuf, ignore: &[Pattern]) -> bool {
    name.starts_with('.')
        || ignore
            .iter()
            .any(|p| p.matches(name) || p.matches(relative.as_str()))
}

fn scan_directory_recursive(
    dir: &Path,
    relative: &RelativePathBuf,
    ignore: &[Pattern],
) -> Result<Vec<FolderNode>, IoError> {
    let mut nodes = vec![];
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let child_relative = relative.join(&name);
        if is_ignored(&name, &child_relative, ignore) {
            continue;
        }

        let path = entry.path();
        if path.is_dir() {
            let children = scan_directory_recursive(&path, &child_relative, ignore)?;
            if !children.is_empty() {
                nodes.push(FolderNode::dir(name, child_relative, children));
            }
        } else if path.is_file() && is_markdown(&path) {
            nodes.push(FolderNode::file(child_relative));
        }
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_file, create_test_root};
    use pretty_assertions::assert_eq;

    fn patterns(globs: &[&str]) -> Vec<Pattern> {
        globs.iter().map(|g| Pattern::new(g).unwrap()).collect()
    }

    #[test]
    fn test_build_tree_keeps_only_markdown() {
        // Given a root with mixed file types
        let root = create_test_root();
        create_test_file(&root, "document.md", "# Markdown");
        create_test_file(&root, "image.png", "fake image data");
        create_test_file(&root, "config.json", "{}");

        // When building the tree
        let tree = build_folder_tree(root.path(), &[]).unwrap();

        // Then only the markdown file is listed
        let files: Vec<_> = tree.files().iter().map(|p| p.as_str()).collect();
        assert_eq!(files, vec!["document.md"]);
    }

    #[test]
    fn test_build_tree_skips_hidden_ignored_and_empty_dirs() {
        let root = create_test_root();
        create_test_file(&root, "guide/intro.md", "# Intro");
        create_test_file(&root, ".git/notes.md", "hidden");
        create_test_file(&root, "node_modules/pkg/README.md", "ignored");
        create_test_file(&root, "assets/logo.svg", "<svg/>");
        create_test_file(&root, "drafts/wip.md", "ignored by path");
        create_test_file(&root, "README.md", "# Root");

        let tree = build_folder_tree(root.path(), &patterns(&["node_modules", "drafts/*"])).unwrap();

        let files: Vec<_> = tree.files().iter().map(|p| p.as_str()).collect();
        assert_eq!(files, vec!["guide/intro.md", "README.md"]);
        assert!(tree.children.iter().all(|c| c.name != "assets" && c.name != "drafts"));
    }

    #[test]
    fn test_build_tree_rejects_missing_root() {
        let result = build_folder_tree(Path::new("/this/path/does/not/exist"), &[]);
        assert!(matches!(result, Err(IoError::InvalidRoot(_))));
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let root = create_test_root();
        create_test_file(&root, "a.md", "a");
        for requested in ["../x.md", "sub/../../x.md", "/etc/passwd.md"] {
            let result = resolve_markdown_path(root.path(), requested);
            assert!(
                matches!(result, Err(IoError::OutsideRoot(_))),
                "{requested}: {result:?}"
            );
        }
    }

    #[test]
    fn test_resolve_rejects_non_markdown() {
        let root = create_test_root();
        create_test_file(&root, "a.txt", "text");
        let result = resolve_markdown_path(root.path(), "a.txt");
        assert!(matches!(result, Err(IoError::NotMarkdown(_))));
    }

    #[test]
    fn test_resolve_allows_inner_parent_dirs() {
        let root = create_test_root();
        create_test_file(&root, "guide/intro.md", "# Intro");
        let resolved = resolve_markdown_path(root.path(), "guide/../guide/./intro.md").unwrap();
        assert!(resolved.ends_with("guide/intro.md"));
    }

    #[test]
    fn test_resolve_missing_file() {
        let root = create_test_root();
        let result = resolve_markdown_path(root.path(), "missing.md");
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_rejects_symlink_out_of_root() {
        let outside = create_test_root();
        let target = create_test_file(&outside, "secret.md", "secret");
        let root = create_test_root();
        std::os::unix::fs::symlink(&target, root.path().join("link.md")).unwrap();

        let result = resolve_markdown_path(root.path(), "link.md");
        assert!(matches!(result, Err(IoError::OutsideRoot(_))));
    }

    #[test]
    fn test_read_markdown_success() {
        let root = create_test_root();
        create_test_file(&root, "guide/intro.md", "# Test Content\n\nParagraph");

        let file = read_markdown(root.path(), "guide/intro.md").unwrap();
        assert_eq!(file.content(), "# Test Content\n\nParagraph");
        assert_eq!(file.relative_path().as_str(), "guide/intro.md");
    }

    #[test]
    fn test_validate_review_path_kinds() {
        let root = create_test_root();
        let doc = create_test_file(&root, "doc.md", "# Doc");
        let txt = create_test_file(&root, "notes.txt", "x");

        assert!(matches!(
            validate_review_path(&doc),
            Ok(ReviewTarget::File { ref label, .. }) if label == "doc.md"
        ));
        assert!(matches!(
            validate_review_path(root.path()),
            Ok(ReviewTarget::Folder { .. })
        ));
        assert!(matches!(
            validate_review_path(&txt),
            Err(IoError::NotMarkdown(_))
        ));
        assert!(matches!(
            validate_review_path(Path::new("/nonexistent/path.md")),
            Err(IoError::NotFound(_))
        ));
    }

    #[test]
    fn test_read_single_uses_file_name() {
        let root = create_test_root();
        let doc = create_test_file(&root, "sub/doc.md", "body");
        let file = read_single(&doc).unwrap();
        assert_eq!(file.file_name(), "doc.md");
        assert_eq!(file.content(), "body");
    }
}
