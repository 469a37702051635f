//! Results of individual planner runs and their storage as CSV.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::planner::Outcome;

/// A counter reported by the planner, or the reason why it is not available.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Metric {
    Count(u64),
    Timeout,
    Error(String),
}

impl Metric {
    /// Numeric view of the metric. Timeouts and errors have no value.
    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Count(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Count(n) => write!(f, "{n}"),
            Metric::Timeout => write!(f, "timeout"),
            Metric::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

impl FromStr for Metric {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u64>() {
            return Ok(Metric::Count(n));
        }
        // counters written by tools that store all numbers as floats
        if let Ok(x) = s.parse::<f64>() {
            if x.is_finite() && x >= 0.0 && x.fract() == 0.0 {
                return Ok(Metric::Count(x as u64));
            }
        }
        Ok(match s {
            "timeout" => Metric::Timeout,
            _ => Metric::Error(s.strip_prefix("error:").unwrap_or(s).trim_start().to_string()),
        })
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Metric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let Ok(metric) = Metric::from_str(&s);
        Ok(metric)
    }
}

/// Booleans as written by Python (`True`/`False`), the format of historical result files.
mod python_bool {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "True" } else { "False" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.trim() {
            "True" | "true" | "TRUE" | "1" => Ok(true),
            "False" | "false" | "FALSE" | "0" => Ok(false),
            other => Err(D::Error::custom(format!("invalid boolean: {other}"))),
        }
    }
}

/// One line of the results file: a planner run on a problem with a given configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub domain: String,
    pub problem: String,
    pub search: String,
    pub heuristic: String,
    #[serde(with = "python_bool")]
    pub success: bool,
    /// Wall-clock time of the run, in seconds.
    pub runtime: f64,
    pub expanded_nodes: Metric,
    pub plan_length: Metric,
}

impl RunRecord {
    pub fn new(
        domain: impl Into<String>,
        problem: impl Into<String>,
        search: impl Into<String>,
        heuristic: impl Into<String>,
        outcome: &Outcome,
        runtime: f64,
    ) -> Self {
        let (success, expanded_nodes, plan_length) = match outcome {
            Outcome::Finished(out) => (
                out.success,
                Metric::Count(out.expanded_nodes),
                Metric::Count(out.plan_length),
            ),
            Outcome::TimedOut => (false, Metric::Timeout, Metric::Timeout),
            Outcome::Failed(msg) => (false, Metric::Error(msg.clone()), Metric::Error(msg.clone())),
        };
        RunRecord {
            domain: domain.into(),
            problem: problem.into(),
            search: search.into(),
            heuristic: heuristic.into(),
            success,
            runtime,
            expanded_nodes,
            plan_length,
        }
    }

    /// Label of the search/heuristic pair, e.g. `astar_hmax`.
    pub fn algorithm_heuristic(&self) -> String {
        format!("{}_{}", self.search, self.heuristic)
    }

    /// A one-line summary of the run for console output.
    pub fn status_line(&self) -> String {
        let status = if self.success { "✓" } else { "✗" };
        format!(
            "{status} Runtime: {:.3}s, Expanded: {}, Plan length: {}",
            self.runtime, self.expanded_nodes, self.plan_length
        )
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid results file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Writes the records to a CSV file with a header line.
pub fn write_csv(path: &Path, records: &[RunRecord]) -> Result<(), RecordError> {
    let csv_err = |source| RecordError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for record in records {
        writer.serialize(record).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads all records of a CSV results file.
pub fn read_csv(path: &Path) -> Result<Vec<RunRecord>, RecordError> {
    let csv_err = |source| RecordError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record.map_err(csv_err)?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::finished;

    #[test]
    fn metrics() {
        assert_eq!("12".parse::<Metric>().unwrap(), Metric::Count(12));
        assert_eq!("12.0".parse::<Metric>().unwrap(), Metric::Count(12));
        assert_eq!("timeout".parse::<Metric>().unwrap(), Metric::Timeout);
        assert_eq!(
            "error: No such file".parse::<Metric>().unwrap(),
            Metric::Error("No such file".to_string())
        );
        assert_eq!(Metric::Error("boom".to_string()).to_string(), "error: boom");
        assert_eq!(Metric::Timeout.value(), None);
        assert_eq!(Metric::Count(3).value(), Some(3.0));
    }

    #[test]
    fn records_from_outcomes() {
        let rec = RunRecord::new("gripper", "pb1", "astar", "hmax", &finished(true, 40, 7), 0.25);
        assert!(rec.success);
        assert_eq!(rec.expanded_nodes, Metric::Count(40));
        assert_eq!(rec.algorithm_heuristic(), "astar_hmax");
        assert_eq!(rec.status_line(), "✓ Runtime: 0.250s, Expanded: 40, Plan length: 7");

        let rec = RunRecord::new("gripper", "pb1", "gbf", "hff", &Outcome::TimedOut, 5.01);
        assert!(!rec.success);
        assert_eq!(rec.plan_length, Metric::Timeout);
        assert_eq!(rec.status_line(), "✗ Runtime: 5.010s, Expanded: timeout, Plan length: timeout");

        let rec = RunRecord::new("d", "p", "astar", "blind", &Outcome::Failed("no python".into()), 0.0);
        assert_eq!(rec.expanded_nodes, Metric::Error("no python".to_string()));
    }

    #[test]
    fn csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let records = vec![
            RunRecord::new("gripper", "pb1", "astar", "hmax", &finished(true, 40, 7), 0.5),
            RunRecord::new("gripper", "pb2", "gbf", "hmax", &Outcome::TimedOut, 5.0),
            RunRecord::new("gripper", "pb3", "gbf", "hff", &Outcome::Failed("exit, signal".into()), 0.1),
        ];
        write_csv(&path, &records).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("domain,problem,search,heuristic,success,runtime,expanded_nodes,plan_length")
        );
        assert_eq!(lines.next(), Some("gripper,pb1,astar,hmax,True,0.5,40,7"));
        assert_eq!(lines.next(), Some("gripper,pb2,gbf,hmax,False,5.0,timeout,timeout"));

        assert_eq!(read_csv(&path).unwrap(), records);
    }

    #[test]
    fn reads_historical_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.csv");
        std::fs::write(
            &path,
            "domain,problem,search,heuristic,success,runtime,expanded_nodes,plan_length\n\
             blockworld,pb2,astar,hmax,True,0.4113,21,6\n\
             blockworld,pb3,gbf,hadd,false,5.002,timeout,timeout\n",
        )
        .unwrap();
        let records = read_csv(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].success);
        assert_eq!(records[0].plan_length, Metric::Count(6));
        assert!(!records[1].success);
        assert_eq!(records[1].expanded_nodes, Metric::Timeout);
    }
}
