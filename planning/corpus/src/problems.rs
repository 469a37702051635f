use std::cmp::Ordering;
use std::io::Read;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

use crate::{CorpusError, Res, is_pddl};

/// Number of leading bytes inspected when deciding whether a file is a problem.
pub const PROBLEM_SNIFF_BYTES: u64 = 2000;

static DOMAIN_DECL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(:domain\s+([^)]+)\)").unwrap());
static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Extracts the domain name that a PDDL problem declares with `(:domain NAME)`.
pub fn read_domain_name(text: &str) -> Option<String> {
    DOMAIN_DECL
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Same as [`read_domain_name`] on the content of a file. Unreadable files have no domain name.
pub fn read_domain_name_from_file(path: &Path) -> Option<String> {
    let text = std::fs::read_to_string(path).ok()?;
    read_domain_name(&text)
}

/// Returns true if the file looks like a PDDL problem: its first bytes contain a `(define`,
/// a `(:goal` and the `problem` keyword.
pub fn is_problem_file(path: &Path) -> bool {
    let Ok(file) = std::fs::File::open(path) else {
        return false;
    };
    let mut prefix = Vec::with_capacity(PROBLEM_SNIFF_BYTES as usize);
    if file.take(PROBLEM_SNIFF_BYTES).read_to_end(&mut prefix).is_err() {
        return false;
    }
    let prefix = String::from_utf8_lossy(&prefix);
    prefix.contains("(:goal") && prefix.contains("(define") && prefix.contains("problem")
}

/// Lists the `.pddl` files directly inside `dir`, sorted by file name.
pub fn list_pddl_files(dir: &Path) -> Res<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            CorpusError::io(path, e.into())
        })?;
        if entry.file_type().is_file() && is_pddl(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Finds all problem files of a domain directory, in [`problem_order`].
pub fn find_problem_files(dir: &Path) -> Res<Vec<PathBuf>> {
    let problems = list_pddl_files(dir)?
        .into_iter()
        .filter(|f| is_problem_file(f))
        .sorted_by(|a, b| problem_order(a, b))
        .collect_vec();
    tracing::debug!("{} problem files in {}", problems.len(), dir.display());
    Ok(problems)
}

fn first_number(path: &Path) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    FIRST_NUMBER.find(name).and_then(|m| m.as_str().parse().ok())
}

/// Orders problem files by the first number appearing in their file name (`pb2` before `pb10`).
/// Files without any number come last, ordered by name.
pub fn problem_order(a: &Path, b: &Path) -> Ordering {
    let by_name = || a.file_name().cmp(&b.file_name());
    match (first_number(a), first_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(by_name),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => by_name(),
    }
}
