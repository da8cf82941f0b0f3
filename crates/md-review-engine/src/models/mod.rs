pub mod folder_tree;
pub mod markdown_file;

pub use folder_tree::{EntryKind, FolderNode};
pub use markdown_file::MarkdownFile;
