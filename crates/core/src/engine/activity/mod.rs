mod metric;
mod options;
mod student_t;
mod tracker;

pub use metric::ActivityMetric;
pub use options::ActivityEngineOptions;
pub(crate) use tracker::ActivityTracker;
pub(crate) use tracker::VariableView;
