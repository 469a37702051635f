use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use planbench::analysis::Analysis;
use planbench::bench::{BenchConfig, DEFAULT_OUTPUT, finish, run_benchmark};
use planbench::charts::render_charts;
use planbench::grid::{DEFAULT_HEURISTICS, DEFAULT_SEARCHES};
use planbench::planner::{Invocation, PlannerCommand, Pyperplan};
use planbench::report::{Comparison, save_report};
use planbench_corpus::find_domain_for_problem;

/// Benchmarks pyperplan on a corpus of PDDL problems and reports on the results.
#[derive(Parser, Debug)]
#[clap(name = "planbench")]
struct App {
    /// Logging level to use: one of "error", "warn", "info", "debug", "trace"
    #[clap(short, long, global = true, default_value = "info")]
    log_level: tracing::Level,

    /// Shorthand for `--log-level debug`
    #[clap(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Runs the planner on every problem of a benchmark directory and saves the results as CSV.
    Run(RunArgs),
    /// Draws charts and writes a markdown report from a results file.
    Report(ReportArgs),
    /// Checks which heuristics the installed planner supports.
    CheckHeuristics(CheckArgs),
    /// Runs the planner once on a problem and shows its raw output.
    Probe(ProbeArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Directory containing the benchmark domains
    benchmark_dir: PathBuf,
    /// Search algorithms to benchmark
    #[clap(long, num_args = 1.., default_values = DEFAULT_SEARCHES.iter().copied())]
    searches: Vec<String>,
    /// Heuristics to benchmark
    #[clap(long, num_args = 1.., default_values = DEFAULT_HEURISTICS.iter().copied())]
    heuristics: Vec<String>,
    /// Only run the domains whose directory name contains one of these
    #[clap(long, num_args = 1..)]
    domains: Vec<String>,
    /// Timeout of a single run, in seconds
    #[clap(long, default_value_t = 5)]
    timeout: u64,
    /// CSV file where results are saved
    #[clap(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
    /// Maximum number of problems per domain
    #[clap(long, default_value_t = 10)]
    max_problems: usize,
    /// Also run combinations that are normally skipped (e.g. gbf with blind)
    #[clap(long)]
    test_invalid: bool,
    /// Number of planner processes to run concurrently
    #[clap(short, long, default_value_t = 1)]
    jobs: usize,
}

#[derive(Debug, Args)]
struct ReportArgs {
    /// CSV file with benchmark results
    csv_file: PathBuf,
    /// Directory for output files
    #[clap(long, default_value = "benchmark_analysis")]
    output_dir: PathBuf,
    /// Search algorithm of the baseline in the key comparison
    #[clap(long, default_value = "astar")]
    baseline: String,
    /// Search algorithm compared to the baseline
    #[clap(long, default_value = "gbf")]
    contender: String,
    /// Heuristic used by both sides of the key comparison
    #[clap(long, default_value = "hmax")]
    heuristic: String,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Heuristics to check
    #[clap(default_values = ["blind", "goalcount", "hmax", "hadd", "hff", "hsa", "lmcut", "landmark"])]
    heuristics: Vec<String>,
    /// Timeout of each check, in seconds
    #[clap(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Debug, Args)]
struct ProbeArgs {
    /// Problem file to solve
    problem: PathBuf,
    /// Domain file. If absent, it is inferred from the problem and naming conventions.
    #[clap(long, short)]
    domain: Option<PathBuf>,
    /// Search algorithm, the planner's default if absent
    #[clap(long)]
    search: Option<String>,
    /// Heuristic, the planner's default if absent
    #[clap(long)]
    heuristic: Option<String>,
    /// Timeout of the run, in seconds
    #[clap(long, default_value_t = 60)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();
    let level = if app.debug { tracing::Level::DEBUG } else { app.log_level };

    // set up logger
    let subscriber = tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::Uptime::from(std::time::Instant::now()))
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match app.command {
        Command::Run(args) => run(args).await,
        Command::Report(args) => report(args),
        Command::CheckHeuristics(args) => check_heuristics(args).await,
        Command::Probe(args) => probe(args).await,
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let config = BenchConfig {
        searches: args.searches,
        heuristics: args.heuristics,
        domains: args.domains,
        timeout: Duration::from_secs(args.timeout),
        output: args.output,
        max_problems: args.max_problems,
        test_invalid: args.test_invalid,
        jobs: args.jobs,
        ..BenchConfig::new(args.benchmark_dir)
    };
    let planner = Pyperplan::default();
    tracing::info!("Planner: {}", planner.command);
    let records = run_benchmark(&config, &planner).await?;
    finish(&records, &config.output)
}

fn report(args: ReportArgs) -> Result<()> {
    let analysis = Analysis::load(&args.csv_file)?;
    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Could not create {}", args.output_dir.display()))?;
    render_charts(&analysis, &args.output_dir)?;
    let comparison = Comparison {
        baseline: args.baseline,
        contender: args.contender,
        heuristic: args.heuristic,
    };
    let report = save_report(&args.output_dir, &analysis, &comparison)?;
    println!("Analysis complete. Results saved to {}", args.output_dir.display());
    println!("Summary report: {}", report.display());
    Ok(())
}

async fn check_heuristics(args: CheckArgs) -> Result<()> {
    let planner = Pyperplan::default();
    let timeout = Duration::from_secs(args.timeout);
    println!("Checking available heuristics in {}:", planner.command);
    for heuristic in &args.heuristics {
        let available = planner
            .heuristic_available(heuristic, timeout)
            .await
            .with_context(|| format!("Could not check heuristic {heuristic}"))?;
        println!("{} {heuristic}", if available { "✓" } else { "✗" });
    }
    Ok(())
}

async fn probe(args: ProbeArgs) -> Result<()> {
    anyhow::ensure!(
        args.problem.exists(),
        "Problem file {} does not exist",
        args.problem.display()
    );
    let domain = match args.domain {
        Some(domain) => domain,
        None => find_domain_for_problem(&args.problem)?,
    };
    let invocation = Invocation {
        search: args.search,
        heuristic: args.heuristic,
    };
    let planner = Pyperplan::default();
    println!(
        "Running: {} {}",
        planner.command,
        PlannerCommand::solve_args(&domain, &args.problem, &invocation).join(" ")
    );
    let output = planner
        .execute(&domain, &args.problem, &invocation, Duration::from_secs(args.timeout))
        .await?;
    match output.status.code() {
        Some(code) => println!("Return code: {code}"),
        None => println!("Return code: none (terminated by a signal)"),
    }
    println!("STDOUT: {}", String::from_utf8_lossy(&output.stdout));
    println!("STDERR: {}", String::from_utf8_lossy(&output.stderr));
    Ok(())
}
