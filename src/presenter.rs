//! Rendering of fetched entries as text or as a terminal line chart.

use crate::api::MetricEntry;
use crate::format::{Formattable, FormattingError, OutputFormat};
use crate::query::Metric;
use color_print::{ceprintln, cprintln};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Widget};
use tracing::debug;

pub const CHART_WIDTH: u16 = 90;
pub const CHART_HEIGHT: u16 = 15;

/// What the presenter is about to print
#[derive(Debug, Clone, PartialEq)]
pub struct Rendering {
    pub title: String,
    pub body: String,
    pub warnings: Vec<String>,
    /// Whether `body` holds a chart rather than formatted entries
    pub charted: bool,
}

pub struct Presenter {
    format: OutputFormat,
}

impl Presenter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print `entries` under `title`, charting them when asked and possible.
    pub fn render(
        &self,
        metric: Metric,
        entries: &[MetricEntry],
        title: &str,
        as_chart: bool,
    ) -> Result<(), FormattingError> {
        let rendering = self.prepare(metric, entries, title, as_chart)?;

        cprintln!("<bold><cyan>{}</cyan></bold>", rendering.title);
        for warning in &rendering.warnings {
            ceprintln!("<red>Note: {}</>", warning);
        }
        if rendering.charted {
            cprintln!("<red>{}</>", rendering.body);
        } else {
            println!("{}", rendering.body);
        }

        Ok(())
    }

    /// Decide what to print without printing it.
    ///
    /// A chart is refused for the composite `all` metric, and when no entry
    /// carries a numeric value for the metric; in both cases the entries are
    /// formatted as text instead.
    pub fn prepare(
        &self,
        metric: Metric,
        entries: &[MetricEntry],
        title: &str,
        as_chart: bool,
    ) -> Result<Rendering, FormattingError> {
        let mut warnings = Vec::new();

        if as_chart {
            if metric.is_composite() {
                warnings.push(format!(
                    "Charts not possible when fetching `{}` metrics",
                    metric
                ));
            } else {
                let points = chart_points(metric, entries);
                let skipped = entries.len() - points.len();
                if skipped > 0 {
                    warnings.push(format!(
                        "{} of {} entries have no `{}` value and were left out of the chart",
                        skipped,
                        entries.len(),
                        metric
                    ));
                }

                if points.is_empty() {
                    warnings.push("Nothing to chart".to_string());
                } else {
                    return Ok(Rendering {
                        title: title.to_string(),
                        body: line_chart(metric.as_ref(), &points, CHART_WIDTH, CHART_HEIGHT),
                        warnings,
                        charted: true,
                    });
                }
            }
            debug!("Falling back to text output");
        }

        Ok(Rendering {
            title: title.to_string(),
            body: entries.format(&self.format)?,
            warnings,
            charted: false,
        })
    }
}

/// `(position, value)` pairs, positions 1-based in entry order. Entries
/// without a numeric value for `metric` are skipped but keep their position.
pub fn chart_points(metric: Metric, entries: &[MetricEntry]) -> Vec<(f64, f64)> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| entry.value(metric).map(|value| ((index + 1) as f64, value)))
        .collect()
}

fn axis_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Draw a line plot into an off-screen buffer and return it as plain text,
/// one line per terminal row.
pub fn line_chart(name: &str, points: &[(f64, f64)], width: u16, height: u16) -> String {
    let (mut min_y, mut max_y) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });
    if !min_y.is_finite() || !max_y.is_finite() {
        (min_y, max_y) = (0.0, 1.0);
    } else if max_y - min_y < f64::EPSILON {
        min_y -= 1.0;
        max_y += 1.0;
    }
    let max_x = points
        .iter()
        .map(|&(x, _)| x)
        .fold(2.0, f64::max);

    let dataset = Dataset::default()
        .name(name.to_string())
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Red))
        .data(points);

    let chart = Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .bounds([1.0, max_x])
                .labels(vec![Span::raw("1"), Span::raw(axis_label(max_x))]),
        )
        .y_axis(
            Axis::default()
                .bounds([min_y, max_y])
                .labels(vec![Span::raw(axis_label(min_y)), Span::raw(axis_label(max_y))]),
        );

    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    chart.render(area, &mut buffer);

    buffer
        .content
        .chunks(area.width as usize)
        .map(|row| {
            row.iter()
                .map(|cell| cell.symbol())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
