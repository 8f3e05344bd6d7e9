//! HTML chart adapter implementing ChartSink.
//!
//! Writes a single HTML page from an Askama template with one inline SVG
//! panel per chart group, all panels sharing the time-index axis.

use std::fs;
use std::path::Path;

use askama::Template;

use crate::domain::error::SimError;
use crate::domain::step::{column_values, ChartGroup, Column, StepRecord};
use crate::ports::chart_port::ChartSink;

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 220.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 30.0;

struct SeriesStyle {
    color: &'static str,
    dash: Option<&'static str>,
    markers: bool,
}

fn series_style(column: Column) -> SeriesStyle {
    let (color, dash, markers) = match column {
        Column::Price => ("#2563eb", None, false),
        Column::CostAverage => ("#f59e0b", None, false),
        Column::Trade => ("#6b7280", None, false),
        Column::Holdings => ("#10b981", None, false),
        Column::HoldingsValue => ("#ef4444", Some("6 4"), false),
        Column::AccountBalance => ("#ef4444", None, false),
        Column::TotalEquity => ("#2563eb", Some("6 4"), false),
        Column::Profit => ("#2563eb", None, true),
        Column::CostTotal => ("#7c3aed", None, false),
    };
    SeriesStyle {
        color,
        dash,
        markers,
    }
}

fn fmt_value(value: f64) -> String {
    format!("{:.2}", value)
}

/// Render one chart group as a standalone SVG. Empty input renders nothing.
pub fn generate_panel_svg(steps: &[StepRecord], group: ChartGroup) -> String {
    if steps.is_empty() {
        return String::new();
    }

    let series: Vec<(Column, Vec<f64>)> = group
        .columns()
        .iter()
        .map(|&c| (c, column_values(steps, c)))
        .collect();

    let mut min_value = series
        .iter()
        .flat_map(|(_, v)| v.iter().copied())
        .fold(f64::INFINITY, f64::min);
    let mut max_value = series
        .iter()
        .flat_map(|(_, v)| v.iter().copied())
        .fold(f64::NEG_INFINITY, f64::max);
    if group.is_bar() {
        min_value = min_value.min(0.0);
        max_value = max_value.max(0.0);
    }
    let range = if max_value > min_value {
        max_value - min_value
    } else {
        1.0
    };

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let n = steps.len();

    let x_scale =
        |i: usize| -> f64 { MARGIN_LEFT + (i as f64 / (n - 1).max(1) as f64) * plot_width };
    let y_scale =
        |v: f64| -> f64 { MARGIN_TOP + plot_height - ((v - min_value) / range) * plot_height };

    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"##,
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"15\" font-size=\"12\" fill=\"#666\">{} ({})</text>\n",
        MARGIN_LEFT,
        group.title(),
        group.unit().label()
    ));

    // Axes
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        MARGIN_TOP,
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM,
        CHART_WIDTH - MARGIN_RIGHT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    if min_value < 0.0 && max_value > 0.0 {
        let y0 = y_scale(0.0);
        svg.push_str(&format!(
            "  <line x1=\"{}\" y1=\"{:.1}\" x2=\"{}\" y2=\"{:.1}\" stroke=\"#999\" stroke-width=\"1\" stroke-dasharray=\"2 2\"/>\n",
            MARGIN_LEFT,
            y0,
            CHART_WIDTH - MARGIN_RIGHT,
            y0
        ));
    }

    for (label_value, y) in [
        (max_value, MARGIN_TOP + 5.0),
        ((max_value + min_value) / 2.0, MARGIN_TOP + plot_height / 2.0),
        (min_value, CHART_HEIGHT - MARGIN_BOTTOM - 5.0),
    ] {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            MARGIN_LEFT - 5.0,
            y,
            fmt_value(label_value)
        ));
    }
    for i in [0, n / 2, n - 1] {
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{}\" text-anchor=\"middle\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            x_scale(i),
            CHART_HEIGHT - 10.0,
            steps[i].index
        ));
    }

    for (k, (column, values)) in series.iter().enumerate() {
        let style = series_style(*column);
        if group.is_bar() {
            let bar_width = (plot_width / n as f64 * 0.8).max(1.0);
            let y0 = y_scale(0.0);
            for (i, &v) in values.iter().enumerate() {
                let y = y_scale(v);
                svg.push_str(&format!(
                    "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>\n",
                    x_scale(i) - bar_width / 2.0,
                    y.min(y0),
                    bar_width,
                    (y - y0).abs(),
                    style.color
                ));
            }
        } else if style.markers {
            for (i, &v) in values.iter().enumerate() {
                svg.push_str(&format!(
                    "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"2\" fill=\"{}\"/>\n",
                    x_scale(i),
                    y_scale(v),
                    style.color
                ));
            }
        } else {
            let mut path_data = String::new();
            for (i, &v) in values.iter().enumerate() {
                let cmd = if i == 0 { "M" } else { " L" };
                path_data.push_str(&format!("{} {:.1} {:.1}", cmd, x_scale(i), y_scale(v)));
            }
            let dash = style
                .dash
                .map(|d| format!(" stroke-dasharray=\"{}\"", d))
                .unwrap_or_default();
            svg.push_str(&format!(
                "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"{}/>\n",
                path_data, style.color, dash
            ));
        }

        // Legend, top right
        let ly = MARGIN_TOP + 12.0 * k as f64;
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"10\" height=\"3\" fill=\"{}\"/>\n",
            CHART_WIDTH - MARGIN_RIGHT - 120.0,
            ly - 3.0,
            style.color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#333\">{}</text>\n",
            CHART_WIDTH - MARGIN_RIGHT - 105.0,
            ly,
            column.name()
        ));
    }

    svg.push_str("</svg>");
    svg
}

struct ChartPanel {
    title: &'static str,
    svg: String,
}

#[derive(Template)]
#[template(path = "chart.html")]
struct ChartTemplate<'a> {
    title: &'a str,
    steps_len: usize,
    first_index: usize,
    last_index: usize,
    panels: Vec<ChartPanel>,
}

/// Render the full chart page. Panels are omitted for an empty run.
pub fn render_html(steps: &[StepRecord], title: &str) -> Result<String, SimError> {
    let panels = if steps.is_empty() {
        Vec::new()
    } else {
        ChartGroup::ALL
            .iter()
            .map(|&group| ChartPanel {
                title: group.title(),
                svg: generate_panel_svg(steps, group),
            })
            .collect()
    };

    let template = ChartTemplate {
        title,
        steps_len: steps.len(),
        first_index: steps.first().map_or(0, |s| s.index),
        last_index: steps.last().map_or(0, |s| s.index),
        panels,
    };

    template
        .render()
        .map_err(|e| SimError::Io(std::io::Error::other(e.to_string())))
}

pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SvgChartAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartSink for SvgChartAdapter {
    fn render(
        &self,
        steps: &[StepRecord],
        title: &str,
        output_path: &str,
    ) -> Result<(), SimError> {
        let html = render_html(steps, title)?;
        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)?;
        Ok(())
    }
}
