use crate::engine::ActivityMetric;

/// The options of the [`ActivityBasedEngine`](crate::engine::ActivityBasedEngine).
#[derive(Debug, Clone, Copy)]
pub struct ActivityEngineOptions {
    /// The per-probe observation which feeds the activity of a variable.
    pub metric: ActivityMetric,
    /// Whether the engine starts in the sampling phase, estimating the mean activity of every
    /// variable before using it.
    pub sampling: bool,
    /// Whether the activity of variables which were not affected during a probe decays.
    pub aging: bool,
    /// The factor by which unaffected activities decay after a probe.
    pub aging_factor: f64,
    /// The sampling phase ends once, for every unassigned variable, the half width of the 95%
    /// confidence interval of its mean activity is below this fraction of the mean.
    pub interval_precision: f64,
    /// The seed of the generator used to randomise activities during sampling.
    pub seed: u64,
}

impl Default for ActivityEngineOptions {
    fn default() -> Self {
        Self {
            metric: ActivityMetric::default(),
            sampling: true,
            aging: true,
            aging_factor: 0.999,
            interval_precision: 0.2,
            seed: 42,
        }
    }
}
