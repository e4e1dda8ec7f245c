use std::fmt::Display;

/// The per-probe activity which is observed for a variable.
///
/// Each metric combines the counters of a variable gathered during a single probe: the number of
/// times it caused another variable to be scheduled (its impact) and the number of times it was
/// scheduled itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ActivityMetric {
    /// The impact count.
    #[default]
    AbsoluteImpact,
    /// Whether the variable had any impact (1) or not (0).
    RelativeImpact,
    /// The number of times the variable was scheduled divided by one more than its impact.
    ScheduleOverImpact,
    /// The impact count divided by the current domain size of the variable.
    ImpactOverDomain,
}

impl ActivityMetric {
    pub fn observe(self, impact: f64, schedules: f64, domain_size: usize) -> f64 {
        match self {
            ActivityMetric::AbsoluteImpact => impact,
            ActivityMetric::RelativeImpact => {
                if impact > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ActivityMetric::ScheduleOverImpact => schedules / (impact + 1.0),
            // An empty domain only occurs in a failed probe.
            ActivityMetric::ImpactOverDomain => impact / domain_size.max(1) as f64,
        }
    }
}

impl Display for ActivityMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityMetric::AbsoluteImpact => write!(f, "absolute-impact"),
            ActivityMetric::RelativeImpact => write!(f, "relative-impact"),
            ActivityMetric::ScheduleOverImpact => write!(f, "schedule-over-impact"),
            ActivityMetric::ImpactOverDomain => write!(f, "impact-over-domain"),
        }
    }
}
