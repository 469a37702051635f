//! Console summary printed at the end of a benchmark campaign.

use std::fmt::{Display, Formatter};

use crate::analysis::{group_by, mean};
use crate::record::RunRecord;

#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRow {
    pub search: String,
    pub heuristic: String,
    pub runs: usize,
    /// Fraction of successful runs, in `[0, 1]`.
    pub success_rate: f64,
    /// Average runtime of successful runs. Infinite if no run succeeded.
    pub avg_runtime: f64,
    /// Average plan length of successful runs, if any reported one.
    pub avg_plan_length: Option<f64>,
}

/// Aggregates the records per search/heuristic pair, in order of first appearance.
pub fn summarize(records: &[RunRecord]) -> Vec<SummaryRow> {
    group_by(records, |r| (r.search.clone(), r.heuristic.clone()))
        .into_iter()
        .map(|((search, heuristic), runs)| {
            let successful: Vec<&RunRecord> = runs.iter().copied().filter(|r| r.success).collect();
            let success_rate = successful.len() as f64 / runs.len() as f64;
            let avg_runtime = mean(successful.iter().map(|r| r.runtime)).unwrap_or(f64::INFINITY);
            let avg_plan_length = mean(successful.iter().filter_map(|r| r.plan_length.value()));
            SummaryRow {
                search,
                heuristic,
                runs: runs.len(),
                success_rate,
                avg_runtime,
                avg_plan_length,
            }
        })
        .collect()
}

/// Fixed-width table of summary rows.
pub struct SummaryTable<'a>(pub &'a [SummaryRow]);

impl Display for SummaryTable<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:<15} {:<10} {:<15} {:<15} {:<15}",
            "Search", "Heuristic", "Success Rate", "Avg Runtime", "Avg Plan Length"
        )?;
        for row in self.0 {
            let rate = format!("{:.1}%", row.success_rate * 100.0);
            let length = match row.avg_plan_length {
                Some(l) => format!("{l:.2}"),
                None => "N/A".to_string(),
            };
            writeln!(
                f,
                "{:<15} {:<10} {:<15} {:<15.3} {}",
                row.search, row.heuristic, rate, row.avg_runtime, length
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Outcome;
    use crate::test_utils::{finished, record};

    #[test]
    fn aggregates_per_configuration() {
        let records = vec![
            record("gbf", "hff", &finished(true, 10, 4), 1.0),
            record("astar", "hmax", &finished(true, 100, 6), 2.0),
            record("astar", "hmax", &Outcome::TimedOut, 5.0),
            record("gbf", "hff", &finished(true, 30, 8), 3.0),
            record("astar", "hmax", &finished(true, 50, 7), 1.0),
            record("astar", "blind", &finished(false, 12, 0), 0.3),
        ];
        let rows = summarize(&records);
        assert_eq!(rows.len(), 3);

        assert_eq!((rows[0].search.as_str(), rows[0].heuristic.as_str()), ("gbf", "hff"));
        assert_eq!(rows[0].success_rate, 1.0);
        assert_eq!(rows[0].avg_runtime, 2.0);
        assert_eq!(rows[0].avg_plan_length, Some(6.0));

        assert_eq!(rows[1].runs, 3);
        assert!((rows[1].success_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(rows[1].avg_runtime, 1.5);
        assert_eq!(rows[1].avg_plan_length, Some(6.5));

        assert_eq!(rows[2].success_rate, 0.0);
        assert!(rows[2].avg_runtime.is_infinite());
        assert_eq!(rows[2].avg_plan_length, None);
    }

    #[test]
    fn table() {
        let records = vec![
            record("astar", "hmax", &finished(true, 100, 6), 0.5),
            record("gbf", "blind", &Outcome::TimedOut, 5.0),
        ];
        let table = SummaryTable(&summarize(&records)).to_string();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Search          Heuristic  Success Rate"));
        assert!(lines[1].starts_with("astar           hmax       100.0%          0.500"));
        assert!(lines[1].ends_with("6.00"));
        assert!(lines[2].contains("0.0%"));
        assert!(lines[2].contains("inf"));
        assert!(lines[2].ends_with("N/A"));
    }
}
