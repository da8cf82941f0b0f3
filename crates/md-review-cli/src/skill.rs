//! Usage notes for coding assistants, installed by `md-review install-skill`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SKILL: &str = include_str!("../assets/skill.md");
pub const SKILL_FILE_NAME: &str = "md-review.md";

pub fn default_skills_dir() -> PathBuf {
    PathBuf::from(shellexpand::tilde("~/.claude/skills").as_ref())
}

/// Writes the skill into `dir`, creating it if needed. Returns the written path.
pub fn install_skill(dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let dest = dir.join(SKILL_FILE_NAME);
    fs::write(&dest, SKILL)?;
    log::debug!("Wrote {} bytes to {}", SKILL.len(), dest.display());
    Ok(dest)
}
