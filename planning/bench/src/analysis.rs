//! Aggregation of benchmark results.
//!
//! Averages of runtime, plan length and expanded nodes only consider successful runs. Metrics that
//! are not available (timeouts, errors) are ignored. An average over no value is NaN, which the
//! report and the charts treat as missing.

use std::hash::Hash;
use std::path::Path;

use itertools::Itertools;

use crate::record::{RecordError, RunRecord, read_csv};

/// Groups the records by key, keeping groups (and records inside them) in order of first appearance.
pub fn group_by<'a, K>(records: &'a [RunRecord], key: impl Fn(&RunRecord) -> K) -> Vec<(K, Vec<&'a RunRecord>)>
where
    K: Hash + Eq + Clone,
{
    let mut groups = records.iter().into_group_map_by(|r| key(*r));
    records
        .iter()
        .map(|r| key(r))
        .unique()
        .filter_map(|k| groups.remove(&k).map(|members| (k, members)))
        .collect()
}

/// Arithmetic mean, `None` for an empty sequence.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.into_iter().fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Aggregated performance of a set of runs.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub runs: usize,
    pub successes: usize,
    /// Fraction of successful runs, NaN if there are no runs.
    pub success_rate: f64,
    pub runtime: f64,
    pub plan_length: f64,
    pub expanded_nodes: f64,
}

impl Stats {
    pub fn of(records: &[&RunRecord]) -> Stats {
        let successful = records.iter().filter(|r| r.success).collect_vec();
        let nan = f64::NAN;
        Stats {
            runs: records.len(),
            successes: successful.len(),
            success_rate: if records.is_empty() {
                nan
            } else {
                successful.len() as f64 / records.len() as f64
            },
            runtime: mean(successful.iter().map(|r| r.runtime)).unwrap_or(nan),
            plan_length: mean(successful.iter().filter_map(|r| r.plan_length.value())).unwrap_or(nan),
            expanded_nodes: mean(successful.iter().filter_map(|r| r.expanded_nodes.value())).unwrap_or(nan),
        }
    }

    pub fn success_percent(&self) -> f64 {
        self.success_rate * 100.0
    }
}

/// A search algorithm and heuristic pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Config {
    pub search: String,
    pub heuristic: String,
}

impl Config {
    pub fn new(search: impl Into<String>, heuristic: impl Into<String>) -> Self {
        Config {
            search: search.into(),
            heuristic: heuristic.into(),
        }
    }

    /// Label combining both, e.g. `astar_hmax`.
    pub fn label(&self) -> String {
        format!("{}_{}", self.search, self.heuristic)
    }

    fn of(record: &RunRecord) -> Config {
        Config::new(&record.search, &record.heuristic)
    }
}

/// Results of a benchmark campaign, loaded for analysis.
pub struct Analysis {
    records: Vec<RunRecord>,
}

impl Analysis {
    pub fn new(records: Vec<RunRecord>) -> Self {
        Analysis { records }
    }

    pub fn load(csv_file: &Path) -> Result<Self, RecordError> {
        let records = read_csv(csv_file)?;
        tracing::info!("Loaded {} results from {}", records.len(), csv_file.display());
        Ok(Analysis::new(records))
    }

    /// Number of distinct problems, a problem being identified by its domain and name.
    pub fn num_problems(&self) -> usize {
        self.records.iter().map(|r| (&r.domain, &r.problem)).unique().count()
    }

    pub fn domains(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.domain.as_str()).unique().collect()
    }

    pub fn searches(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.search.as_str()).unique().collect()
    }

    pub fn heuristics(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.heuristic.as_str()).unique().collect()
    }

    /// Statistics for each search/heuristic pair, in order of first appearance.
    pub fn by_config(&self) -> Vec<(Config, Stats)> {
        group_by(&self.records, Config::of)
            .into_iter()
            .map(|(config, runs)| (config, Stats::of(&runs)))
            .collect()
    }

    /// Statistics for each domain and search/heuristic pair, in order of first appearance.
    pub fn by_domain_and_config(&self) -> Vec<((String, Config), Stats)> {
        group_by(&self.records, |r| (r.domain.clone(), Config::of(r)))
            .into_iter()
            .map(|(key, runs)| (key, Stats::of(&runs)))
            .collect()
    }

    /// Statistics of a single search/heuristic pair. Runs with no such configuration yield empty stats.
    pub fn config(&self, config: &Config) -> Stats {
        let runs = self
            .records
            .iter()
            .filter(|r| r.search == config.search && r.heuristic == config.heuristic)
            .collect_vec();
        Stats::of(&runs)
    }
}
