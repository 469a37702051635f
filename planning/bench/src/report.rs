//! Markdown report of a benchmark campaign.

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::{Analysis, Config, Stats};

/// File name of the report in the output directory.
pub const REPORT_FILE: &str = "benchmark_report.md";

/// Two search algorithms compared head to head with the same heuristic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub baseline: String,
    pub contender: String,
    pub heuristic: String,
}

impl Default for Comparison {
    fn default() -> Self {
        Comparison {
            baseline: "astar".to_string(),
            contender: "gbf".to_string(),
            heuristic: "hmax".to_string(),
        }
    }
}

impl Comparison {
    pub fn baseline_config(&self) -> Config {
        Config::new(&self.baseline, &self.heuristic)
    }

    pub fn contender_config(&self) -> Config {
        Config::new(&self.contender, &self.heuristic)
    }
}

/// Human readable name of a search algorithm.
pub fn search_name(search: &str) -> String {
    match search {
        "astar" => "A*".to_string(),
        "gbf" => "GBFS".to_string(),
        "wastar" => "Weighted A*".to_string(),
        "bfs" => "BFS".to_string(),
        "ids" => "IDS".to_string(),
        other => other.to_string(),
    }
}

/// Human readable name of a heuristic: `hmax` is written `h_max`.
pub fn heuristic_name(heuristic: &str) -> String {
    match heuristic {
        "hmax" | "hadd" | "hff" | "hsa" => format!("h_{}", &heuristic[1..]),
        other => other.to_string(),
    }
}

/// Formats a number with the given precision, `nan` if it is not defined.
fn num(x: f64, precision: usize) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else {
        format!("{x:.precision$}")
    }
}

/// A metric where lower is better, with the phrasing used to compare two configurations on it.
struct Claim<'a> {
    win: &'a str,
    unit: &'a str,
    precision: usize,
    tie: String,
}

impl Claim<'_> {
    /// Sentence stating which side is better, `None` when either side is undefined.
    fn state(&self, (a_name, a): (&str, f64), (b_name, b): (&str, f64)) -> Option<String> {
        if a.is_nan() || b.is_nan() {
            return None;
        }
        let (win, unit, precision) = (self.win, self.unit, self.precision);
        let gap = (a - b).abs();
        Some(if a < b {
            format!("{a_name} {win} {b_name} by {gap:.precision$} {unit} on average.")
        } else if b < a {
            format!("{b_name} {win} {a_name} by {gap:.precision$} {unit} on average.")
        } else {
            self.tie.clone()
        })
    }
}

/// Renders the markdown report.
pub fn render_report(analysis: &Analysis, comparison: &Comparison) -> String {
    let mut r = String::new();
    // writing to a string cannot fail
    let _ = write_report(&mut r, analysis, comparison);
    r
}

fn write_report(r: &mut String, analysis: &Analysis, comparison: &Comparison) -> std::fmt::Result {
    writeln!(r, "# Benchmark Results Analysis\n")?;

    writeln!(r, "## Overall Statistics\n")?;
    writeln!(r, "Total problems tested: {}", analysis.num_problems())?;
    writeln!(r, "Total domains tested: {}", analysis.domains().len())?;
    writeln!(r, "Algorithms tested: {}", analysis.searches().join(", "))?;
    writeln!(r, "Heuristics tested: {}\n", analysis.heuristics().join(", "))?;

    writeln!(r, "## Success Rates\n")?;
    writeln!(r, "Success rate by algorithm and heuristic:\n")?;
    writeln!(r, "| Search | Heuristic | Runs | Success rate |")?;
    writeln!(r, "|--------|-----------|-----:|-------------:|")?;
    for (config, stats) in analysis.by_config() {
        writeln!(
            r,
            "| {} | {} | {} | {}% |",
            config.search,
            config.heuristic,
            stats.runs,
            num(stats.success_percent(), 1)
        )?;
    }
    writeln!(r)?;

    let h = heuristic_name(&comparison.heuristic);
    let a_short = search_name(&comparison.baseline);
    let b_short = search_name(&comparison.contender);
    let a_name = format!("{a_short}+{h}");
    let b_name = format!("{b_short}+{h}");
    let a: Stats = analysis.config(&comparison.baseline_config());
    let b: Stats = analysis.config(&comparison.contender_config());

    writeln!(r, "## {a_short} vs {b_short} with {h} (Key Comparison)\n")?;
    writeln!(
        r,
        "Success Rate: {a_name}: {}%, {b_name}: {}%",
        num(a.success_percent(), 1),
        num(b.success_percent(), 1)
    )?;
    writeln!(
        r,
        "Average Runtime: {a_name}: {}s, {b_name}: {}s",
        num(a.runtime, 3),
        num(b.runtime, 3)
    )?;
    writeln!(
        r,
        "Average Plan Length: {a_name}: {}, {b_name}: {}",
        num(a.plan_length, 1),
        num(b.plan_length, 1)
    )?;
    writeln!(
        r,
        "Average Expanded Nodes: {a_name}: {}, {b_name}: {}\n",
        num(a.expanded_nodes, 1),
        num(b.expanded_nodes, 1)
    )?;

    writeln!(r, "## Analysis\n")?;
    let a_with = format!("{a_short} with {h}");
    let b_with = format!("{b_short} with {h}");
    let (sa, sb) = (a.success_percent(), b.success_percent());
    if sa > sb {
        writeln!(
            r,
            "{a_with} has a higher success rate than {b_with} by {:.1} percentage points.",
            sa - sb
        )?;
    } else if sb > sa {
        writeln!(
            r,
            "{b_with} has a higher success rate than {a_with} by {:.1} percentage points.",
            sb - sa
        )?;
    } else {
        writeln!(r, "{a_short} and {b_short} with {h} have the same success rate.")?;
    }

    let claims = [
        (
            a.runtime,
            b.runtime,
            Claim {
                win: "is faster than",
                unit: "seconds",
                precision: 3,
                tie: format!("{a_short} and {b_short} with {h} have the same average runtime."),
            },
        ),
        (
            a.plan_length,
            b.plan_length,
            Claim {
                win: "produces shorter plans than",
                unit: "steps",
                precision: 1,
                tie: format!("{a_short} and {b_short} with {h} produce plans of the same average length."),
            },
        ),
        (
            a.expanded_nodes,
            b.expanded_nodes,
            Claim {
                win: "expands fewer nodes than",
                unit: "nodes",
                precision: 1,
                tie: format!("{a_short} and {b_short} with {h} expand the same number of nodes on average."),
            },
        ),
    ];
    let sentences = claims
        .iter()
        .map(|(x, y, claim)| claim.state((a_with.as_str(), *x), (b_with.as_str(), *y)));
    for sentence in sentences.flatten() {
        writeln!(r, "{sentence}")?;
    }
    Ok(())
}

/// Writes the report in `output_dir` and returns its path.
pub fn save_report(output_dir: &Path, analysis: &Analysis, comparison: &Comparison) -> Result<std::path::PathBuf> {
    let path = output_dir.join(REPORT_FILE);
    std::fs::write(&path, render_report(analysis, comparison))
        .with_context(|| format!("Could not write report to {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Outcome;
    use crate::record::RunRecord;
    use crate::test_utils::{finished, record_in};

    fn analysis() -> Analysis {
        Analysis::new(vec![
            record_in("gripper", "pb1", "astar", "hmax", &finished(true, 100, 6)),
            record_in("gripper", "pb1", "gbf", "hmax", &finished(true, 40, 9)),
            record_in("gripper", "pb2", "astar", "hmax", &Outcome::TimedOut),
            record_in("gripper", "pb2", "gbf", "hmax", &finished(true, 60, 11)),
            record_in("gripper", "pb1", "astar", "blind", &finished(true, 900, 6)),
        ])
    }

    #[test]
    fn names() {
        assert_eq!(search_name("astar"), "A*");
        assert_eq!(search_name("gbf"), "GBFS");
        assert_eq!(search_name("custom"), "custom");
        assert_eq!(heuristic_name("hmax"), "h_max");
        assert_eq!(heuristic_name("lmcut"), "lmcut");
    }

    #[test]
    fn report_sections() {
        let report = render_report(&analysis(), &Comparison::default());
        assert!(report.starts_with("# Benchmark Results Analysis\n"));
        assert!(report.contains("Total problems tested: 2\n"));
        assert!(report.contains("Total domains tested: 1\n"));
        assert!(report.contains("Algorithms tested: astar, gbf\n"));
        assert!(report.contains("Heuristics tested: hmax, blind\n"));
        assert!(report.contains("| astar | hmax | 2 | 50.0% |"));
        assert!(report.contains("| gbf | hmax | 2 | 100.0% |"));
        assert!(report.contains("## A* vs GBFS with h_max (Key Comparison)"));
        assert!(report.contains("Success Rate: A*+h_max: 50.0%, GBFS+h_max: 100.0%"));
        assert!(report.contains("Average Plan Length: A*+h_max: 6.0, GBFS+h_max: 10.0"));
        assert!(report.contains("Average Expanded Nodes: A*+h_max: 100.0, GBFS+h_max: 50.0"));
        assert!(report.contains(
            "GBFS with h_max has a higher success rate than A* with h_max by 50.0 percentage points."
        ));
        assert!(report.contains("A* with h_max produces shorter plans than GBFS with h_max by 4.0 steps on average."));
        assert!(report.contains("GBFS with h_max expands fewer nodes than A* with h_max by 50.0 nodes on average."));
        // all successful runs last one second
        assert!(report.contains("Average Runtime: A*+h_max: 1.000s, GBFS+h_max: 1.000s"));
        assert!(report.contains("A* and GBFS with h_max have the same average runtime."));
        assert!(!report.contains("faster than"));
    }

    #[test]
    fn runtime_comparison() {
        let run = |problem: &str, search: &str, runtime: f64| {
            RunRecord::new("gripper", problem, search, "hmax", &finished(true, 10, 5), runtime)
        };
        let analysis = Analysis::new(vec![
            run("pb1", "astar", 0.25),
            run("pb2", "astar", 0.75),
            run("pb1", "gbf", 2.0),
            run("pb2", "gbf", 1.0),
        ]);
        let report = render_report(&analysis, &Comparison::default());
        assert!(report.contains("Average Runtime: A*+h_max: 0.500s, GBFS+h_max: 1.500s"));
        assert!(report.contains("A* with h_max is faster than GBFS with h_max by 1.000 seconds on average."));
        assert!(report.contains("A* and GBFS with h_max produce plans of the same average length."));
        assert!(report.contains("A* and GBFS with h_max expand the same number of nodes on average."));
        assert!(report.contains("A* and GBFS with h_max have the same success rate."));
    }

    #[test]
    fn missing_configuration() {
        let comparison = Comparison {
            baseline: "astar".to_string(),
            contender: "gbf".to_string(),
            heuristic: "lmcut".to_string(),
        };
        let report = render_report(&analysis(), &comparison);
        assert!(report.contains("Success Rate: A*+lmcut: nan%, GBFS+lmcut: nan%"));
        assert!(report.contains("A* and GBFS with lmcut have the same success rate."));
        assert!(!report.contains("faster than"));
        assert!(!report.contains("shorter plans"));
    }

    #[test]
    fn saved_in_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_report(dir.path(), &analysis(), &Comparison::default()).unwrap();
        assert_eq!(path, dir.path().join("benchmark_report.md"));
        assert!(std::fs::read_to_string(path).unwrap().contains("## Analysis"));
    }
}
