//! Benchmark driver: runs the planner over every problem of a benchmark tree.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::StreamExt;
use planbench_corpus::{discover_domain_dirs, find_domain_for_problem, find_problem_files, read_domain_name_from_file};

use crate::grid::{DEFAULT_HEURISTICS, DEFAULT_SEARCHES, Instance, Job, plan_runs};
use crate::planner::Planner;
use crate::record::{RunRecord, write_csv};
use crate::summary::{SummaryTable, summarize};

/// Output file of a benchmark campaign when none is given.
pub const DEFAULT_OUTPUT: &str = "benchmark_results.csv";

#[derive(Clone, Debug)]
pub struct BenchConfig {
    /// Root of the benchmark tree: a domain directory or a directory of domain directories.
    pub root: PathBuf,
    pub searches: Vec<String>,
    pub heuristics: Vec<String>,
    /// Only domain directories whose name contains one of these (ignoring case) are run. All if empty.
    pub domains: Vec<String>,
    /// Maximum duration of a single planner run.
    pub timeout: Duration,
    pub output: PathBuf,
    /// Maximum number of problems run in each domain directory.
    pub max_problems: usize,
    /// Also run search/heuristic combinations that are normally skipped.
    pub test_invalid: bool,
    /// Number of planner processes running at the same time.
    pub jobs: usize,
}

impl BenchConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        BenchConfig {
            root: root.into(),
            searches: DEFAULT_SEARCHES.iter().map(|s| s.to_string()).collect(),
            heuristics: DEFAULT_HEURISTICS.iter().map(|s| s.to_string()).collect(),
            domains: Vec::new(),
            timeout: Duration::from_secs(5),
            output: PathBuf::from(DEFAULT_OUTPUT),
            max_problems: 10,
            test_invalid: false,
            jobs: 1,
        }
    }
}

/// Instances of a domain directory: its first `max_problems` problems, each with its domain file.
/// Problems whose domain file cannot be found are skipped.
fn collect_instances(dir: &Path, max_problems: usize) -> Result<Vec<Instance>> {
    let mut problems = find_problem_files(dir)?;
    if problems.is_empty() {
        tracing::info!("No problem files found in {}", dir.display());
        return Ok(Vec::new());
    }
    problems.truncate(max_problems);

    let mut instances = Vec::with_capacity(problems.len());
    for problem_file in problems {
        let stated = read_domain_name_from_file(&problem_file);
        tracing::debug!(
            "{} requires domain {}",
            problem_file.display(),
            stated.as_deref().unwrap_or("<undeclared>")
        );
        match find_domain_for_problem(&problem_file) {
            Ok(domain_file) => instances.push(Instance {
                domain_file,
                problem_file,
            }),
            Err(e) => {
                tracing::warn!(
                    "Skipping {}: no domain file for domain {} ({e})",
                    problem_file.display(),
                    stated.as_deref().unwrap_or("<undeclared>")
                );
            }
        }
    }
    Ok(instances)
}

async fn run_job(planner: &dyn Planner, job: &Job, timeout: Duration) -> RunRecord {
    let instance = &job.instance;
    let start = Instant::now();
    let outcome = planner
        .solve(&instance.domain_file, &instance.problem_file, &job.invocation, timeout)
        .await;
    let runtime = start.elapsed().as_secs_f64();
    RunRecord::new(
        instance.domain_label(),
        instance.problem_label(),
        job.invocation.search_label(),
        job.invocation.heuristic_label(),
        &outcome,
        runtime,
    )
}

/// Returns true if the job at `index` is the first one on its problem.
fn starts_problem(jobs: &[Job], index: usize) -> bool {
    index == 0 || jobs[index - 1].instance != jobs[index].instance
}

/// Console line of a finished run. With concurrent jobs, runs finish out of order and the line
/// names the problem and configuration it reports on.
fn result_line(record: &RunRecord, concurrent: bool) -> String {
    if concurrent {
        format!(
            "      {} ({} with {}): {}",
            record.problem,
            record.search,
            record.heuristic,
            record.status_line()
        )
    } else {
        format!("      {}", record.status_line())
    }
}

/// Runs all configured searches and heuristics on the problems of the benchmark tree.
/// Records are returned in the order of the grid, whatever the number of concurrent jobs.
/// Domain directories that cannot be read are skipped with a warning.
pub async fn run_benchmark(config: &BenchConfig, planner: &dyn Planner) -> Result<Vec<RunRecord>> {
    let dirs = discover_domain_dirs(&config.root, &config.domains)
        .with_context(|| format!("Invalid benchmark directory {}", config.root.display()))?;
    tracing::info!("Found {} domain directories in {}", dirs.len(), config.root.display());

    let concurrent = config.jobs > 1;
    let mut records = Vec::new();
    for dir in dirs {
        let name = planbench_corpus::file_stem(&dir);
        println!("\nBenchmarking domain: {name}");
        let instances = match collect_instances(&dir, config.max_problems) {
            Ok(instances) => instances,
            Err(e) => {
                tracing::warn!("Skipping domain directory {}: {e:#}", dir.display());
                continue;
            }
        };
        let jobs = plan_runs(&instances, &config.searches, &config.heuristics, config.test_invalid);
        let jobs = jobs.as_slice();

        // progress is printed when a run starts, results when it ends
        let mut results = futures::stream::iter(jobs.iter().enumerate())
            .map(|(index, job)| async move {
                if starts_problem(jobs, index) {
                    println!("  Problem: {}", job.instance.problem_label());
                }
                println!("    Running {}...", job.invocation);
                run_job(planner, job, config.timeout).await
            })
            .buffered(config.jobs.max(1));
        while let Some(record) = results.next().await {
            println!("{}", result_line(&record, concurrent));
            records.push(record);
        }
    }
    Ok(records)
}

/// Saves the records and prints their summary. Nothing is written when there are no records.
pub fn finish(records: &[RunRecord], output: &Path) -> Result<()> {
    if records.is_empty() {
        println!("No results collected.");
        return Ok(());
    }
    write_csv(output, records)?;
    println!("\nResults saved to {}", output.display());
    println!("\nSummary:");
    print!("{}", SummaryTable(&summarize(records)));
    Ok(())
}
