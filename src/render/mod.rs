//! Render module - SVG output for tail comparisons, histograms and trajectories.

mod plots;

pub use plots::{plot_histogram, plot_panels, plot_tail_comparison, HistogramFigure, Panel, PlotError, Series};
