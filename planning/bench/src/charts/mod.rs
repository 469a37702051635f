//! Grouped bar charts of benchmark results, rendered as SVG.

mod benchmark;
mod colors;

pub use self::benchmark::*;
pub use self::colors::*;

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Type alias for the result of a drawing function.
pub type DrawResult<T> = Result<T, Box<dyn std::error::Error>>;

/// A named sequence of values, one per category of the chart. Missing values are not drawn.
#[derive(Clone, Debug)]
pub struct Series {
    pub name: String,
    pub color: RGBColor,
    pub values: Vec<Option<f64>>,
}

/// Bars grouped by category: each category has one bar per series.
#[derive(Clone, Debug)]
pub struct BarChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    /// If set, bar heights are on a logarithmic scale (values below 1 are drawn as 1).
    pub log_scale: bool,
    /// Formats the label written on top of each bar.
    pub label: fn(f64) -> String,
}

impl BarChart {
    fn height(&self, value: f64) -> f64 {
        if self.log_scale { value.max(1.0).log10() } else { value.max(0.0) }
    }

    fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.series.iter().flat_map(|s| s.values.iter().flatten().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.values().next().is_none()
    }

    fn tick(&self, y: f64) -> String {
        if self.log_scale {
            format!("{:.0}", 10f64.powf(y))
        } else if y.fract() == 0.0 {
            format!("{y:.0}")
        } else {
            format!("{y:.2}")
        }
    }
}

/// Draws the bar chart on the given area.
pub fn draw_bars<B>(area: &DrawingArea<B, Shift>, chart: &BarChart) -> DrawResult<()>
where
    B: DrawingBackend,
    B::ErrorType: 'static,
{
    area.fill(&WHITE)?;
    if chart.categories.is_empty() || chart.is_empty() {
        area.titled(&format!("{} (no data)", chart.title), ("sans-serif", 22))?;
        return Ok(());
    }

    let per_group = chart.series.len();
    // each group of bars is followed by an empty slot
    let slot_width = per_group + 1;
    let slots = chart.categories.len() * slot_width;
    let top = chart.values().map(|v| chart.height(v)).fold(0.0, f64::max);
    let top = if top > 0.0 { top * 1.15 } else { 1.0 };

    let mut ctx = ChartBuilder::on(area)
        .caption(&chart.title, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d((0..slots).into_segmented(), 0.0..top)?;

    let center = (per_group - 1) / 2;
    let x_label = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(slot) if slot % slot_width == center => chart
            .categories
            .get(slot / slot_width)
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    };
    let y_label = |y: &f64| chart.tick(*y);
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(slots)
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .x_desc(chart.x_desc.as_str())
        .y_desc(chart.y_desc.as_str())
        .draw()?;

    let label_style = TextStyle::from(("sans-serif", 11).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));
    for (j, series) in chart.series.iter().enumerate() {
        let color = series.color;
        let bars = series
            .values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i * slot_width + j, v)))
            .collect::<Vec<_>>();

        ctx.draw_series(bars.iter().map(|&(slot, v)| {
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(slot), 0.0),
                    (SegmentValue::Exact(slot + 1), chart.height(v)),
                ],
                color.filled(),
            );
            bar.set_margin(0, 0, 2, 2);
            bar
        }))?
        .label(series.name.clone())
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

        ctx.draw_series(bars.iter().map(|&(slot, v)| {
            Text::new(
                (chart.label)(v),
                (SegmentValue::CenterOf(slot), chart.height(v)),
                label_style.clone(),
            )
        }))?;
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Renders the chart into an SVG file.
pub fn save_svg(chart: &BarChart, path: &Path, size: (u32, u32)) -> DrawResult<()> {
    let area = SVGBackend::new(path, size).into_drawing_area();
    draw_bars(&area, chart)?;
    area.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(log_scale: bool) -> BarChart {
        BarChart {
            title: "Success Rate by Algorithm and Heuristic".to_string(),
            x_desc: "Heuristic".to_string(),
            y_desc: "Success Rate (%)".to_string(),
            categories: vec!["hmax".to_string(), "hff".to_string()],
            series: vec![
                Series {
                    name: "astar".to_string(),
                    color: ASTAR_RED,
                    values: vec![Some(50.0), Some(100.0)],
                },
                Series {
                    name: "gbf".to_string(),
                    color: GBFS_TEAL,
                    values: vec![Some(75.0), None],
                },
            ],
            log_scale,
            label: |v| format!("{v:.1}%"),
        }
    }

    fn render(chart: &BarChart) -> String {
        let mut svg = String::new();
        {
            let area = SVGBackend::with_string(&mut svg, (800, 400)).into_drawing_area();
            draw_bars(&area, chart).unwrap();
            area.present().unwrap();
        }
        svg
    }

    #[test]
    fn heights() {
        let linear = chart(false);
        assert_eq!(linear.height(50.0), 50.0);
        assert_eq!(linear.tick(20.0), "20");
        let log = chart(true);
        assert_eq!(log.height(1000.0), 3.0);
        assert_eq!(log.height(0.0), 0.0);
        assert_eq!(log.tick(2.0), "100");
    }

    #[test]
    fn renders_svg() {
        let svg = render(&chart(false));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Success Rate by Algorithm and Heuristic"));
        assert!(svg.contains("hmax"));
        assert!(svg.contains("75.0%"));
        assert!(svg.contains("<rect"));
    }

    #[test]
    fn empty_chart() {
        let mut empty = chart(true);
        empty.series.iter_mut().for_each(|s| s.values = vec![None, None]);
        assert!(empty.is_empty());
        let svg = render(&empty);
        assert!(svg.contains("(no data)"));
    }
}
