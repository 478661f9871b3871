//! Tail module - empirical tail probabilities and their comparison with bounds.

mod comparator;
mod comparison;

pub use comparator::{compute_tail_curve, compute_upper_tail_curve, Sample, TailCurve, ThresholdGrid};
pub use comparison::TailComparison;
