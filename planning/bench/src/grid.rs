use std::path::PathBuf;

use crate::planner::Invocation;

/// Search algorithms benchmarked when none are given.
pub const DEFAULT_SEARCHES: &[&str] = &["astar", "gbf"];

/// Heuristics benchmarked when none are given.
pub const DEFAULT_HEURISTICS: &[&str] = &["hmax", "hadd", "hff", "blind"];

/// Returns false for search/heuristic pairs that are not worth running:
/// the blind heuristic gives no guidance to greedy searches.
pub fn is_valid_combination(search: &str, heuristic: &str) -> bool {
    heuristic != "blind" || search == "astar"
}

/// A problem and the domain file it is solved with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance {
    pub domain_file: PathBuf,
    pub problem_file: PathBuf,
}

impl Instance {
    /// Name of the domain in results: the stem of the domain file, or the name of its directory
    /// when the file has the generic `domain.pddl` name.
    pub fn domain_label(&self) -> String {
        let stem = planbench_corpus::file_stem(&self.domain_file);
        if stem != "domain" {
            return stem;
        }
        self.domain_file
            .parent()
            .and_then(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or(stem)
    }

    pub fn problem_label(&self) -> String {
        planbench_corpus::file_stem(&self.problem_file)
    }
}

/// A single planner run to perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    pub instance: Instance,
    pub invocation: Invocation,
}

/// Builds the runs for all problems, search algorithms and heuristics (in this nesting order).
/// Invalid combinations are skipped unless `test_invalid` is set.
pub fn plan_runs(instances: &[Instance], searches: &[String], heuristics: &[String], test_invalid: bool) -> Vec<Job> {
    let mut jobs = Vec::with_capacity(instances.len() * searches.len() * heuristics.len());
    for instance in instances {
        for search in searches {
            for heuristic in heuristics {
                if !test_invalid && !is_valid_combination(search, heuristic) {
                    continue;
                }
                jobs.push(Job {
                    instance: instance.clone(),
                    invocation: Invocation::new(search, heuristic),
                });
            }
        }
    }
    jobs
}
