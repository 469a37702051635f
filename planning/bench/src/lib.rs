//! Benchmarking of an external classical planner over a corpus of PDDL problems.
//!
//! A campaign runs every problem of a benchmark tree with a grid of search algorithms and
//! heuristics, stores one [`record::RunRecord`] per run in a CSV file and summarizes the results.
//! Results files can later be turned into a markdown report and charts.

pub mod analysis;
pub mod bench;
pub mod charts;
pub mod grid;
pub mod params;
pub mod planner;
pub mod record;
pub mod report;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_utils {
    use crate::planner::{Outcome, PlannerOutput};
    use crate::record::RunRecord;

    pub fn finished(success: bool, expanded_nodes: u64, plan_length: u64) -> Outcome {
        Outcome::Finished(PlannerOutput {
            success,
            expanded_nodes,
            plan_length,
        })
    }

    /// A run on the first gripper problem.
    pub fn record(search: &str, heuristic: &str, outcome: &Outcome, runtime: f64) -> RunRecord {
        RunRecord::new("gripper", "pb1", search, heuristic, outcome, runtime)
    }

    /// A run of one second on the given problem.
    pub fn record_in(domain: &str, problem: &str, search: &str, heuristic: &str, outcome: &Outcome) -> RunRecord {
        RunRecord::new(domain, problem, search, heuristic, outcome, 1.0)
    }
}
