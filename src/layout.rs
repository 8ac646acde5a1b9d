use crate::error::ForgeError;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Subtrees copied verbatim next to every generated document.
pub const AUX_SUBTREES: [&str; 2] = ["scripts", "references"];

/// Complexity tier of a skill, derived from its directory layout.
///
/// 1. a single document
/// 2. document plus `scripts/` or `references/`
/// 3. sibling sub-skills under `../skills/<name>-*/`
/// 4. sub-skills plus delegated agents under `../agents/<name>-*.md`
pub fn detect_tier(skill_dir: &Path) -> u8 {
    let has_aux = AUX_SUBTREES.iter().any(|d| skill_dir.join(d).is_dir());

    let name = skill_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix = format!("{name}-");
    let parent = skill_dir.parent().unwrap_or_else(|| Path::new("."));

    let has_sub_skills = has_sibling(&parent.join("skills"), |path, file_name| {
        path.is_dir() && file_name.starts_with(&prefix)
    });
    let has_agents = has_sibling(&parent.join("agents"), |path, file_name| {
        path.is_file() && file_name.starts_with(&prefix) && file_name.ends_with(".md")
    });

    match (has_sub_skills, has_agents, has_aux) {
        (true, true, _) => 4,
        (true, false, _) => 3,
        (false, _, true) => 2,
        _ => 1,
    }
}

fn has_sibling(dir: &Path, accept: impl Fn(&Path, &str) -> bool) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    entries.flatten().any(|entry| {
        let file_name = entry.file_name();
        accept(&entry.path(), &file_name.to_string_lossy())
    })
}

/// Recursively copies `src` into `dst`, overwriting existing files.
/// Symlinks are followed and their targets copied as regular entries.
/// Returns the copied files' paths under `dst`, in file-name order.
pub fn copy_subtree(src: &Path, dst: &Path) -> Result<Vec<PathBuf>, ForgeError> {
    let mut copied = Vec::new();
    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            ForgeError::io(path, e.into())
        })?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let to = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&to).map_err(|e| ForgeError::io(&to, e))?;
        } else {
            fs::copy(entry.path(), &to).map_err(|e| ForgeError::io(&to, e))?;
            debug!("copied {}", to.display());
            copied.push(to);
        }
    }
    Ok(copied)
}
