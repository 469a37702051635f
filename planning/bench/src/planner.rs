//! Invocation of the external planner.
//!
//! The planner is an opaque process: it receives a search algorithm, a heuristic, a domain and a
//! problem on its command line and reports its statistics on the standard output.

use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tokio::process::Command;

use crate::params::{PLANNER_MODULE, PYTHON};

/// Label of the search algorithm when none is given to the planner.
pub const DEFAULT_SEARCH_LABEL: &str = "breadth_first_search";
/// Label of the heuristic when none is given to the planner.
pub const NO_HEURISTIC_LABEL: &str = "None";

/// Printed on the standard output when the planner found a plan.
const GOAL_REACHED: &str = "Goal reached";
/// Printed on the standard error when the planner does not know a heuristic.
const UNKNOWN_HEURISTIC: &str = "error: argument --heuristic";

static EXPANDED_NODES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+) Nodes expanded").unwrap());
static PLAN_LENGTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"Plan length: (\d+)").unwrap());

/// A search algorithm and heuristic to pass to the planner. Absent values are left to the
/// planner's defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Invocation {
    pub search: Option<String>,
    pub heuristic: Option<String>,
}

impl Invocation {
    pub fn new(search: impl Into<String>, heuristic: impl Into<String>) -> Self {
        Invocation {
            search: Some(search.into()),
            heuristic: Some(heuristic.into()),
        }
    }

    pub fn search_label(&self) -> &str {
        self.search.as_deref().unwrap_or(DEFAULT_SEARCH_LABEL)
    }

    pub fn heuristic_label(&self) -> &str {
        self.heuristic.as_deref().unwrap_or(NO_HEURISTIC_LABEL)
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} with {}", self.search_label(), self.heuristic_label())
    }
}

/// Statistics reported by a planner process that terminated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlannerOutput {
    pub success: bool,
    pub expanded_nodes: u64,
    pub plan_length: u64,
}

/// Extracts the run statistics from the standard output of the planner.
/// Missing counters are reported as 0.
pub fn parse_output(stdout: &str) -> PlannerOutput {
    let count = |re: &Regex| {
        re.captures(stdout)
            .and_then(|c| c[1].parse::<u64>().ok())
            .unwrap_or(0)
    };
    PlannerOutput {
        success: stdout.contains(GOAL_REACHED),
        expanded_nodes: count(&EXPANDED_NODES),
        plan_length: count(&PLAN_LENGTH),
    }
}

/// Result of a single planner run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Finished(PlannerOutput),
    TimedOut,
    Failed(String),
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("error while waiting for the planner: {0}")]
    Wait(#[source] std::io::Error),
    #[error("no termination after {0:?}")]
    Timeout(Duration),
}

/// Runs the command to completion with captured outputs. The process is killed if it does not
/// terminate before `timeout`.
pub async fn run_command(mut command: Command, timeout: Duration) -> Result<Output, RunError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    let child = command.spawn().map_err(|source| RunError::Spawn {
        program: command.as_std().get_program().to_string_lossy().to_string(),
        source,
    })?;
    // on timeout, the child is dropped with the future and thus killed
    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => output.map_err(RunError::Wait),
        Err(_) => Err(RunError::Timeout(timeout)),
    }
}

/// An external planner that can be run on a domain and problem.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn solve(&self, domain: &Path, problem: &Path, invocation: &Invocation, timeout: Duration) -> Outcome;
}

/// The program and leading arguments used to start the planner, e.g. `python -m pyperplan`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PlannerCommand {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        PlannerCommand {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Arguments to run the planner on a given problem, after the leading ones.
    pub fn solve_args(domain: &Path, problem: &Path, invocation: &Invocation) -> Vec<String> {
        let mut args = Vec::with_capacity(6);
        if let Some(search) = &invocation.search {
            args.push("--search".to_string());
            args.push(search.clone());
        }
        if let Some(heuristic) = &invocation.heuristic {
            args.push("--heuristic".to_string());
            args.push(heuristic.clone());
        }
        args.push(domain.display().to_string());
        args.push(problem.display().to_string());
        args
    }

    pub fn command<S: AsRef<std::ffi::OsStr>>(&self, extra: impl IntoIterator<Item = S>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).args(extra);
        cmd
    }
}

impl Default for PlannerCommand {
    fn default() -> Self {
        PlannerCommand::new(PYTHON.get(), ["-m".to_string(), PLANNER_MODULE.get()])
    }
}

impl std::fmt::Display for PlannerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// The pyperplan planner, run as a sub-process.
#[derive(Clone, Debug, Default)]
pub struct Pyperplan {
    pub command: PlannerCommand,
}

impl Pyperplan {
    pub fn new(command: PlannerCommand) -> Self {
        Pyperplan { command }
    }

    /// Runs the planner and returns its raw output.
    pub async fn execute(
        &self,
        domain: &Path,
        problem: &Path,
        invocation: &Invocation,
        timeout: Duration,
    ) -> Result<Output, RunError> {
        let args = PlannerCommand::solve_args(domain, problem, invocation);
        tracing::debug!("Running: {} {}", self.command, args.join(" "));
        run_command(self.command.command(&args), timeout).await
    }

    /// Asks the planner whether it supports the heuristic, by requesting its help with this
    /// heuristic selected.
    pub async fn heuristic_available(&self, heuristic: &str, timeout: Duration) -> Result<bool, RunError> {
        let output = run_command(self.command.command(["--heuristic", heuristic, "--help"]), timeout).await?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(!stderr.contains(UNKNOWN_HEURISTIC))
    }
}

#[async_trait]
impl Planner for Pyperplan {
    async fn solve(&self, domain: &Path, problem: &Path, invocation: &Invocation, timeout: Duration) -> Outcome {
        match self.execute(domain, problem, invocation, timeout).await {
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stderr.trim().is_empty() {
                    tracing::debug!("Planner stderr: {}", stderr.trim_end());
                }
                Outcome::Finished(parse_output(&String::from_utf8_lossy(&output.stdout)))
            }
            Err(RunError::Timeout(_)) => Outcome::TimedOut,
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }
}
