use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{CorpusError, Res, list_pddl_files};

/// Returns true if the directory name passes the user-provided filters:
/// no filter at all, or any filter is a case-insensitive substring of the name.
pub fn matches_filters(dir_name: &str, filters: &[String]) -> bool {
    let name = dir_name.to_lowercase();
    filters.is_empty() || filters.iter().any(|f| name.contains(&f.to_lowercase()))
}

/// Determines the domain directories of a benchmark tree.
///
/// If `root` directly contains PDDL files, it is a domain directory on its own and the filters are
/// ignored. Otherwise, all non-hidden sub-directories whose name passes `filters` are returned,
/// sorted by name.
pub fn discover_domain_dirs(root: &Path, filters: &[String]) -> Res<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(CorpusError::NotADirectory(root.to_path_buf()));
    }
    if !list_pddl_files(root)?.is_empty() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut dirs = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                let path = e.path().unwrap_or(root).to_path_buf();
                return Err(CorpusError::io(path, e.into()));
            }
            Err(e) => {
                // e.g. a dangling symbolic link
                tracing::warn!("Skipping {}: {e}", e.path().unwrap_or(root).display());
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().to_string();
        if !entry.file_type().is_dir() || name.starts_with('.') {
            continue;
        }
        if matches_filters(&name, filters) {
            dirs.push(entry.into_path());
        } else {
            tracing::trace!("Skipping directory {name}");
        }
    }
    Ok(dirs)
}
