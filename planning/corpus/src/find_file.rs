//! This module provides utility functions to find the domain file of a problem based on the domain
//! name it declares and on common naming conventions.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{CorpusError, Res, list_pddl_files, read_domain_name_from_file};

/// Pairs of domain names that denote the same domain in the wild.
const DOMAIN_ALIASES: &[(&str, &str)] = &[("blocksworld", "blockworld")];

static PB_DOM: Lazy<Regex> = Lazy::new(|| Regex::new("^(.+)\\.pb\\.pddl$").unwrap());
static ANY_PDDL: Lazy<Regex> = Lazy::new(|| Regex::new("^(.+)\\.pddl$").unwrap());
static INSTANCE: Lazy<Regex> = Lazy::new(|| Regex::new("^instance-([1-9][0-9]*)\\.pddl$").unwrap());

/// A file name to look for in a directory.
enum Candidate {
    Named(String),
    Matching(&'static str, fn(&str) -> bool),
}

impl Candidate {
    fn named(name: impl Into<String>) -> Self {
        Candidate::Named(name.into())
    }

    fn describe(&self) -> String {
        match self {
            Candidate::Named(name) => name.clone(),
            Candidate::Matching(pattern, _) => pattern.to_string(),
        }
    }

    /// Returns the first file of `dir` matching this candidate, other than `exclude`.
    fn lookup(&self, dir: &Path, exclude: &Path) -> Option<PathBuf> {
        match self {
            Candidate::Named(name) => {
                let path = dir.join(name);
                (path.is_file() && path != exclude).then_some(path)
            }
            Candidate::Matching(_, matches) => list_pddl_files(dir)
                .ok()?
                .into_iter()
                .filter(|f| f != exclude)
                .find(|f| f.file_name().and_then(|n| n.to_str()).is_some_and(|n| matches(n))),
        }
    }
}

/// Returns the domain name and its known aliases.
pub fn domain_name_variants(name: &str) -> Vec<String> {
    let mut variants = vec![name.to_string()];
    for &(a, b) in DOMAIN_ALIASES {
        if name == a {
            variants.push(b.to_string());
        } else if name == b {
            variants.push(a.to_string());
        }
    }
    variants
}

/// Exact domain file names: `domain.pddl`, the stated domain name and the directory name.
fn exact_candidates(stated: Option<&str>, dir: &Path) -> Vec<Candidate> {
    let mut candidates = vec![Candidate::named("domain.pddl")];
    if let Some(name) = stated {
        candidates.push(Candidate::named(format!("{name}.pddl")));
    }
    if let Some(dir_name) = dir.file_name().and_then(|n| n.to_str()) {
        candidates.push(Candidate::named(format!("{dir_name}.pddl")));
    }
    candidates
}

/// Patterns matching any file that is named like a domain.
fn wildcard_candidates() -> Vec<Candidate> {
    vec![
        Candidate::Matching("*domain*.pddl", |f| f.contains("domain") && f.ends_with(".pddl")),
        Candidate::Matching("*.domain.pddl", |f| f.ends_with(".domain.pddl")),
    ]
}

/// Exact names first, then wildcard patterns.
fn standard_candidates(stated: Option<&str>, dir: &Path) -> Vec<Candidate> {
    let mut candidates = exact_candidates(stated, dir);
    candidates.extend(wildcard_candidates());
    candidates
}

/// Domain file names derived from the problem file name.
fn conventional_candidates(problem_filename: &str) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    // XXXXX.pb.pddl -> XXXXX.dom.pddl
    if let Some(m) = PB_DOM.captures(problem_filename) {
        candidates.push(Candidate::named(format!("{}.dom.pddl", &m[1])));
    }
    // XXXXX.pddl -> XXXXX-domain.pddl, domain-XXXXX.pddl
    if let Some(m) = ANY_PDDL.captures(problem_filename) {
        candidates.push(Candidate::named(format!("{}-domain.pddl", &m[1])));
        candidates.push(Candidate::named(format!("domain-{}.pddl", &m[1])));
    }
    // instance-NN.pddl -> domain-NN.pddl
    if let Some(m) = INSTANCE.captures(problem_filename) {
        candidates.push(Candidate::named(format!("domain-{}.pddl", &m[1])));
    }
    candidates
}

/// Returns true if the file defines actions and has no goal, i.e. it is most likely a domain.
pub fn looks_like_domain(path: &Path) -> bool {
    match std::fs::read_to_string(path) {
        Ok(content) => content.contains(":action") && !content.contains("(:goal"),
        Err(_) => false,
    }
}

/// Attempts to find the domain file for the given PDDL problem.
///
/// The lookup first relies on the domain name declared in the problem (and its aliases), then on
/// exact file names (`domain.pddl`, file named after the directory), then on naming conventions
/// relating problem and domain names, and only then on wildcard patterns (`*domain*.pddl`, ...).
/// As a fallback, any other file of the directory that defines actions but no goal is selected.
/// Finally, standard names are looked up in the parent directory and conventions in a sibling
/// `domains` directory.
pub fn find_domain_for_problem(problem_file: &Path) -> Res<PathBuf> {
    let problem_dir = problem_file.parent().unwrap_or(Path::new("."));
    let stated = read_domain_name_from_file(problem_file);
    let problem_filename = problem_file.file_name().and_then(|n| n.to_str()).unwrap_or_default();

    let mut tried = Vec::new();
    let mut search = |dir: &Path, candidates: Vec<Candidate>| {
        for candidate in candidates {
            tried.push(candidate.describe());
            if let Some(found) = candidate.lookup(dir, problem_file) {
                return Some(found);
            }
        }
        None
    };

    let variants = stated.as_deref().map(domain_name_variants).unwrap_or_default();
    let named = variants.iter().map(|v| Candidate::named(format!("{v}.pddl"))).collect();
    if let Some(found) = search(problem_dir, named) {
        return Ok(found);
    }
    if let Some(found) = search(problem_dir, exact_candidates(stated.as_deref(), problem_dir)) {
        return Ok(found);
    }
    if let Some(found) = search(problem_dir, conventional_candidates(problem_filename)) {
        return Ok(found);
    }
    if let Some(found) = search(problem_dir, wildcard_candidates()) {
        return Ok(found);
    }

    if let Ok(files) = list_pddl_files(problem_dir) {
        let domain = files
            .into_iter()
            .filter(|f| f != problem_file)
            .find(|f| looks_like_domain(f));
        if let Some(found) = domain {
            return Ok(found);
        }
    }

    if let Some(parent) = problem_dir.parent() {
        if let Some(found) = search(parent, standard_candidates(stated.as_deref(), parent)) {
            return Ok(found);
        }
        let domains = parent.join("domains");
        if let Some(found) = search(&domains, conventional_candidates(problem_filename)) {
            return Ok(found);
        }
    }

    tried.dedup();
    Err(CorpusError::NoDomainFile {
        problem: problem_file.to_path_buf(),
        candidates: tried,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn aliases() {
        assert_eq!(domain_name_variants("blocksworld"), vec!["blocksworld", "blockworld"]);
        assert_eq!(domain_name_variants("blockworld"), vec!["blockworld", "blocksworld"]);
        assert_eq!(domain_name_variants("gripper"), vec!["gripper"]);
    }

    #[test]
    fn stated_domain_name_first() {
        let dir = tempfile::tempdir().unwrap();
        let pb = write(dir.path(), "pb1.pddl", &problem_text("gripper"));
        write(dir.path(), "domain.pddl", &domain_text("other"));
        let dom = write(dir.path(), "gripper.pddl", &domain_text("gripper"));
        assert_eq!(find_domain_for_problem(&pb).unwrap(), dom);
    }

    #[test]
    fn alias_of_stated_domain() {
        let dir = tempfile::tempdir().unwrap();
        let pb = write(dir.path(), "pb2.pddl", &problem_text("blocksworld"));
        let dom = write(dir.path(), "blockworld.pddl", &domain_text("blockworld"));
        assert_eq!(find_domain_for_problem(&pb).unwrap(), dom);
    }

    #[test]
    fn standard_names() {
        let dir = tempfile::tempdir().unwrap();
        let pb = write(dir.path(), "p01.pddl", &problem_text("unknown"));
        let dom = write(dir.path(), "logistics-domain.pddl", &domain_text("logistics"));
        assert_eq!(find_domain_for_problem(&pb).unwrap(), dom);

        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("rovers");
        std::fs::create_dir(&sub).unwrap();
        let pb = write(&sub, "p01.pddl", &problem_text("unknown"));
        let dom = write(&sub, "rovers.pddl", &domain_text("rovers"));
        assert_eq!(find_domain_for_problem(&pb).unwrap(), dom);
    }

    #[test]
    fn naming_conventions() {
        let dir = tempfile::tempdir().unwrap();
        let pb = write(dir.path(), "gripper.pb.pddl", &problem_text("unknown"));
        let dom = write(dir.path(), "gripper.dom.pddl", &domain_text("gripper"));
        assert_eq!(find_domain_for_problem(&pb).unwrap(), dom);

        let dir = tempfile::tempdir().unwrap();
        let pb = write(dir.path(), "instance-3.pddl", &problem_text("unknown"));
        write(dir.path(), "aa.pddl", &domain_text("other"));
        let dom = write(dir.path(), "domain-3.pddl", &domain_text("x"));
        assert_eq!(find_domain_for_problem(&pb).unwrap(), dom);
    }

    #[test]
    fn conventions_among_several_domains() {
        let dir = tempfile::tempdir().unwrap();
        for n in 1..=3 {
            write(dir.path(), &format!("domain-{n}.pddl"), &domain_text("d"));
        }
        let pb = write(dir.path(), "instance-3.pddl", &problem_text("unknown"));
        assert_eq!(find_domain_for_problem(&pb).unwrap(), dir.path().join("domain-3.pddl"));

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a-domain.pddl", &domain_text("a"));
        let dom = write(dir.path(), "b-domain.pddl", &domain_text("b"));
        let pb = write(dir.path(), "b.pddl", &problem_text("unknown"));
        assert_eq!(find_domain_for_problem(&pb).unwrap(), dom);

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "domain-a.pddl", &domain_text("a"));
        let dom = write(dir.path(), "domain-b.pddl", &domain_text("b"));
        let pb = write(dir.path(), "b.pddl", &problem_text("unknown"));
        assert_eq!(find_domain_for_problem(&pb).unwrap(), dom);
    }

    #[test]
    fn exact_names_before_conventions() {
        let dir = tempfile::tempdir().unwrap();
        let dom = write(dir.path(), "domain.pddl", &domain_text("d"));
        write(dir.path(), "p1-domain.pddl", &domain_text("other"));
        let pb = write(dir.path(), "p1.pddl", &problem_text("unknown"));
        assert_eq!(find_domain_for_problem(&pb).unwrap(), dom);
    }

    #[test]
    fn any_file_with_actions() {
        let dir = tempfile::tempdir().unwrap();
        let pb = write(dir.path(), "task.pddl", &problem_text("unknown"));
        write(dir.path(), "other-task.pddl", &problem_text("unknown"));
        let dom = write(dir.path(), "ops.pddl", &domain_text("ops"));
        assert_eq!(find_domain_for_problem(&pb).unwrap(), dom);
    }

    #[test]
    fn parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("instances");
        std::fs::create_dir(&sub).unwrap();
        let pb = write(&sub, "p1.pddl", &problem_text("unknown"));
        let dom = write(dir.path(), "domain.pddl", &domain_text("d"));
        assert_eq!(find_domain_for_problem(&pb).unwrap(), dom);
    }

    #[test]
    fn missing_domain() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("lonely");
        std::fs::create_dir(&sub).unwrap();
        let pb = write(&sub, "p1.pddl", &problem_text("elevators"));
        match find_domain_for_problem(&pb) {
            Err(CorpusError::NoDomainFile { problem, candidates }) => {
                assert_eq!(problem, pb);
                assert!(candidates.contains(&"elevators.pddl".to_string()));
                assert!(candidates.contains(&"domain.pddl".to_string()));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
