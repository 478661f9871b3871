//! SVG figures for the experiments.
//!
//! Figures are drawn with the [`plotters`] SVG backend, which needs no system
//! fonts and works in headless environments. Every figure is 1200x800 (or
//! 1200 wide per panel for multi-panel figures).

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use crate::histogram::Histogram;
use crate::tail::TailComparison;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

const FIGURE_HEIGHT: u32 = 800;
const PANEL_WIDTH: u32 = 1200;

/// A labelled polyline.
#[derive(Clone, Debug)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(label: impl Into<String>, xs: &[f64], ys: &[f64]) -> Self {
        Self {
            label: label.into(),
            points: xs.iter().copied().zip(ys.iter().copied()).collect(),
        }
    }
}

/// One chart of a (possibly multi-panel) line figure.
#[derive(Clone, Debug)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

/// Density histogram with optional reference curve and vertical marker.
#[derive(Clone, Debug)]
pub struct HistogramFigure<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub histogram: &'a Histogram,
    pub overlay: Option<Series>,
    pub marker: Option<f64>,
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Padded (min, max) over finite values; `None` when there are none.
fn value_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return None;
    }
    if lo == hi {
        let pad = if lo == 0.0 { 1.0 } else { 0.1 * lo.abs() };
        return Some((lo - pad, hi + pad));
    }
    let pad = 0.05 * (hi - lo);
    Some((lo - pad, hi + pad))
}

/// Empirical tail curve against its bound, on a logarithmic probability axis.
///
/// Points with zero empirical probability cannot be shown on a log axis and
/// are dropped from the empirical line.
pub fn plot_tail_comparison(comparison: &TailComparison, output_path: &Path) -> Result<()> {
    if comparison.grid.is_empty() {
        return Err(PlotError::InvalidData("tail comparison has no points".to_string()));
    }

    let empirical: Vec<(f64, f64)> = comparison
        .grid
        .iter()
        .copied()
        .zip(comparison.empirical.probabilities.iter().copied())
        .filter(|&(_, p)| p > 0.0)
        .collect();
    let bound: Vec<(f64, f64)> = comparison
        .grid
        .iter()
        .copied()
        .zip(comparison.bound.iter().copied())
        .filter(|&(_, b)| b > 0.0 && b.is_finite())
        .collect();

    let positive = empirical.iter().chain(bound.iter()).map(|&(_, y)| y);
    let y_min = positive.clone().fold(f64::INFINITY, f64::min);
    let y_max = positive.fold(f64::NEG_INFINITY, f64::max);
    if !(y_min.is_finite() && y_max.is_finite()) {
        return Err(PlotError::InvalidData(
            "no positive probabilities to draw on a log axis".to_string(),
        ));
    }
    let (x_min, x_max) = value_range(comparison.grid.iter().copied())
        .ok_or_else(|| PlotError::InvalidData("grid has no finite values".to_string()))?;

    ensure_parent(output_path)?;
    let root = SVGBackend::new(output_path, (PANEL_WIDTH, FIGURE_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&comparison.title, ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(100)
        .build_cartesian_2d(x_min..x_max, (y_min * 0.5..y_max * 2.0).log_scale())
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(comparison.x_label.as_str())
        .y_desc(comparison.y_label.as_str())
        .y_label_formatter(&|y| format!("{:.1e}", y))
        .label_style(("sans-serif", 20))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(empirical, BLUE.stroke_width(3)))
        .map_err(|e| PlotError::Drawing(e.to_string()))?
        .label("Empirical")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(3)));

    chart
        .draw_series(LineSeries::new(bound, RED.stroke_width(2)))
        .map_err(|e| PlotError::Drawing(e.to_string()))?
        .label(comparison.bound_label.as_str())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

/// Density histogram, optionally overlaid with a reference curve and a vertical marker.
pub fn plot_histogram(figure: &HistogramFigure, output_path: &Path) -> Result<()> {
    let hist = figure.histogram;
    if hist.total_visits == 0 {
        return Err(PlotError::InvalidData("histogram is empty".to_string()));
    }
    let density = hist.density();

    let overlay_max = figure
        .overlay
        .iter()
        .flat_map(|s| s.points.iter().map(|&(_, y)| y))
        .fold(0.0, f64::max);
    let y_max = density.iter().copied().fold(overlay_max, f64::max) * 1.1;

    ensure_parent(output_path)?;
    let root = SVGBackend::new(output_path, (PANEL_WIDTH, FIGURE_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(figure.title, ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(hist.min..hist.max, 0.0..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(figure.x_label)
        .y_desc("Density")
        .label_style(("sans-serif", 20))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(density.iter().enumerate().map(|(bin, &d)| {
            let (left, right) = hist.bin_edges(bin);
            Rectangle::new([(left, 0.0), (right, d)], BLUE.mix(0.6).filled())
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    if let Some(overlay) = &figure.overlay {
        chart
            .draw_series(LineSeries::new(overlay.points.iter().copied(), RED.stroke_width(3)))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(overlay.label.as_str())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(3)));
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    if let Some(x) = figure.marker {
        chart
            .draw_series(LineSeries::new(vec![(x, 0.0), (x, y_max)], BLACK.stroke_width(2)))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

fn draw_panel(area: &DrawingArea<SVGBackend, Shift>, panel: &Panel) -> Result<()> {
    let xs = panel.series.iter().flat_map(|s| s.points.iter().map(|&(x, _)| x));
    let ys = panel.series.iter().flat_map(|s| s.points.iter().map(|&(_, y)| y));
    let (x_min, x_max) = value_range(xs)
        .ok_or_else(|| PlotError::InvalidData(format!("panel '{}' has no data", panel.title)))?;
    let (y_min, y_max) = value_range(ys)
        .ok_or_else(|| PlotError::InvalidData(format!("panel '{}' has no data", panel.title)))?;

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .label_style(("sans-serif", 20))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for (i, series) in panel.series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(LineSeries::new(series.points.iter().copied(), color.stroke_width(2)))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

/// Line charts laid out side by side in a single figure.
pub fn plot_panels(panels: &[Panel], output_path: &Path) -> Result<()> {
    if panels.is_empty() {
        return Err(PlotError::InvalidData("no panels to draw".to_string()));
    }

    ensure_parent(output_path)?;
    let width = PANEL_WIDTH * panels.len() as u32;
    let root = SVGBackend::new(output_path, (width, FIGURE_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let areas = root.split_evenly((1, panels.len()));
    for (area, panel) in areas.iter().zip(panels.iter()) {
        draw_panel(area, panel)?;
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}
