use std::path::{Path, PathBuf};

use thiserror::Error;

use super::*;
use crate::analysis::{Analysis, Config, Stats};

/// Configurations compared domain by domain.
pub const KEY_CONFIGS: &[(&str, &str)] = &[
    ("astar", "hmax"),
    ("gbf", "hmax"),
    ("astar", "blind"),
    ("astar", "landmark"),
    ("gbf", "landmark"),
];

#[derive(Debug, Error)]
#[error("could not draw {}: {message}", path.display())]
pub struct ChartError {
    pub path: PathBuf,
    pub message: String,
}

fn defined(x: f64) -> Option<f64> {
    (!x.is_nan()).then_some(x)
}

/// One bar per search algorithm for each heuristic.
fn per_heuristic(
    analysis: &Analysis,
    metric: fn(&Stats) -> f64,
    title: &str,
    y_desc: &str,
    log_scale: bool,
    label: fn(f64) -> String,
) -> BarChart {
    let stats = analysis.by_config();
    let heuristics = analysis.heuristics();
    let series = analysis
        .searches()
        .into_iter()
        .enumerate()
        .map(|(i, search)| Series {
            name: search.to_string(),
            color: search_color(search, i),
            values: heuristics
                .iter()
                .map(|&h| {
                    stats
                        .iter()
                        .find(|(c, _)| c.search == search && c.heuristic == h)
                        .and_then(|(_, s)| defined(metric(s)))
                })
                .collect(),
        })
        .collect();
    BarChart {
        title: title.to_string(),
        x_desc: "Heuristic".to_string(),
        y_desc: y_desc.to_string(),
        categories: heuristics.iter().map(|h| h.to_string()).collect(),
        series,
        log_scale,
        label,
    }
}

pub fn success_rates_chart(analysis: &Analysis) -> BarChart {
    per_heuristic(
        analysis,
        Stats::success_percent,
        "Success Rate by Algorithm and Heuristic",
        "Success Rate (%)",
        false,
        |v| format!("{v:.1}%"),
    )
}

pub fn runtime_chart(analysis: &Analysis) -> BarChart {
    per_heuristic(
        analysis,
        |s| s.runtime,
        "Average Runtime by Algorithm and Heuristic (Successful Runs)",
        "Runtime (seconds)",
        false,
        |v| format!("{v:.3}"),
    )
}

pub fn plan_length_chart(analysis: &Analysis) -> BarChart {
    per_heuristic(
        analysis,
        |s| s.plan_length,
        "Average Plan Length by Algorithm and Heuristic",
        "Plan Length (steps)",
        false,
        |v| format!("{v:.1}"),
    )
}

pub fn expanded_nodes_chart(analysis: &Analysis) -> BarChart {
    per_heuristic(
        analysis,
        |s| s.expanded_nodes,
        "Average Expanded Nodes by Algorithm and Heuristic",
        "Expanded Nodes (log scale)",
        true,
        |v| format!("{}", v as u64),
    )
}

/// One bar per configuration for each domain.
fn per_domain(
    analysis: &Analysis,
    configs: Vec<(Config, RGBColor)>,
    metric: fn(&Stats) -> f64,
    title: &str,
    y_desc: &str,
    label: fn(f64) -> String,
) -> BarChart {
    let stats = analysis.by_domain_and_config();
    let domains = analysis.domains();
    let series = configs
        .into_iter()
        .map(|(config, color)| Series {
            name: config.label(),
            color,
            values: domains
                .iter()
                .map(|&d| {
                    stats
                        .iter()
                        .find(|((domain, c), _)| domain == d && c == &config)
                        .and_then(|(_, s)| defined(metric(s)))
                })
                .collect(),
        })
        .collect();
    BarChart {
        title: title.to_string(),
        x_desc: "Domain".to_string(),
        y_desc: y_desc.to_string(),
        categories: domains.iter().map(|d| d.to_string()).collect(),
        series,
        log_scale: false,
        label,
    }
}

/// Success rate per domain of the key configurations present in the results.
pub fn domain_comparison_chart(analysis: &Analysis) -> BarChart {
    let present = analysis.by_config();
    let configs = KEY_CONFIGS
        .iter()
        .map(|&(s, h)| Config::new(s, h))
        .filter(|c| present.iter().any(|(p, _)| p == c))
        .enumerate()
        .map(|(i, c)| {
            let color = key_config_color(&c.label(), i);
            (c, color)
        })
        .collect();
    per_domain(
        analysis,
        configs,
        |s| s.success_rate,
        "Success Rate by Domain for Different Algorithms",
        "Success Rate",
        |v| format!("{v:.2}"),
    )
}

/// Runtime per domain of all configurations that solved at least one problem.
pub fn runtime_by_domain_chart(analysis: &Analysis) -> BarChart {
    let configs = analysis
        .by_config()
        .into_iter()
        .filter(|(_, s)| s.successes > 0)
        .enumerate()
        .map(|(i, (c, _))| {
            let color = config_color(&c.search, &c.heuristic, i);
            (c, color)
        })
        .collect();
    per_domain(
        analysis,
        configs,
        |s| s.runtime,
        "Average Runtime by Domain and Algorithm-Heuristic Combination",
        "Runtime (seconds)",
        |v| format!("{v:.3}"),
    )
}

/// Renders all charts in the output directory and returns the files written.
pub fn render_charts(analysis: &Analysis, output_dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
    let charts = [
        ("success_rates.svg", success_rates_chart(analysis), (1200, 600)),
        ("runtime_comparison.svg", runtime_chart(analysis), (1200, 600)),
        ("plan_length_comparison.svg", plan_length_chart(analysis), (1200, 600)),
        ("expanded_nodes_comparison.svg", expanded_nodes_chart(analysis), (1200, 600)),
        ("domain_comparison.svg", domain_comparison_chart(analysis), (1400, 800)),
        ("runtime_by_domain.svg", runtime_by_domain_chart(analysis), (1600, 1000)),
    ];
    let mut written = Vec::with_capacity(charts.len());
    for (file, chart, size) in charts {
        let path = output_dir.join(file);
        save_svg(&chart, &path, size).map_err(|e| ChartError {
            path: path.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
