use log::debug;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::student_t::t_value;
use crate::basic_types::Random;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::engine::ActivityEngineOptions;
use crate::engine::ActivityMetric;
use crate::engine::VariableIndex;

/// The facts about a variable which the tracker needs at the end of a probe.
pub(crate) trait VariableView {
    fn is_instantiated(&self, variable: VariableIndex) -> bool;

    fn domain_size(&self, variable: VariableIndex) -> usize;
}

/// Maintains the activity of every variable.
///
/// During a probe the engine reports two kinds of events: a variable being scheduled and a
/// variable having impact (some propagation on it caused another variable to be scheduled). At
/// the end of a probe the counters are turned into an observation using the configured
/// [`ActivityMetric`].
///
/// While sampling, observations are fed into a running mean and variance and the activities
/// themselves are random. Once the mean of every unassigned variable is known precisely enough,
/// the means become the activities and from then on the observations are accumulated directly,
/// possibly with aging.
#[derive(Debug)]
pub(crate) struct ActivityTracker {
    activities: KeyedVec<VariableIndex, f64>,
    means: KeyedVec<VariableIndex, f64>,
    /// The sum of squared deviations from the running mean.
    squared_deviations: KeyedVec<VariableIndex, f64>,
    impacts: KeyedVec<VariableIndex, f64>,
    schedules: KeyedVec<VariableIndex, f64>,
    affected: AffectedVariables,
    num_probes: u32,
    is_sampling: bool,
    metric: ActivityMetric,
    aging: bool,
    aging_factor: f64,
    interval_precision: f64,
    random: Box<dyn Random>,
}

impl ActivityTracker {
    pub(crate) fn new(num_variables: usize, options: ActivityEngineOptions) -> Self {
        let random = Box::new(SmallRng::seed_from_u64(options.seed));
        Self::with_random(num_variables, options, random)
    }

    pub(crate) fn with_random(
        num_variables: usize,
        options: ActivityEngineOptions,
        random: Box<dyn Random>,
    ) -> Self {
        ActivityTracker {
            activities: KeyedVec::with_len(num_variables, 0.0),
            means: KeyedVec::with_len(num_variables, 0.0),
            squared_deviations: KeyedVec::with_len(num_variables, 0.0),
            impacts: KeyedVec::with_len(num_variables, 0.0),
            schedules: KeyedVec::with_len(num_variables, 0.0),
            affected: AffectedVariables::new(num_variables),
            num_probes: 0,
            is_sampling: options.sampling,
            metric: options.metric,
            aging: options.aging,
            aging_factor: options.aging_factor,
            interval_precision: options.interval_precision,
            random,
        }
    }

    pub(crate) fn activity(&self, variable: VariableIndex) -> f64 {
        self.activities[variable]
    }

    pub(crate) fn is_sampling(&self) -> bool {
        self.is_sampling
    }

    pub(crate) fn num_probes(&self) -> u32 {
        self.num_probes
    }

    pub(crate) fn start_probe(&mut self) {
        self.num_probes += 1;
    }

    pub(crate) fn record_schedule(&mut self, variable: VariableIndex) {
        self.schedules[variable] += 1.0;
    }

    pub(crate) fn record_impact(&mut self, variable: VariableIndex) {
        self.affected.insert(variable);
        self.impacts[variable] += 1.0;
    }

    /// Turns the counters of the finished probe into activities.
    pub(crate) fn end_probe(&mut self, variables: &impl VariableView) {
        if self.is_sampling {
            self.sample(variables);
        } else if self.aging {
            for index in 0..self.activities.len() {
                let variable = VariableIndex::create_from_index(index);
                if self.affected.contains(variable) {
                    let observation = self.observe(variable, variables);
                    self.activities[variable] += observation;
                    self.reset_counters(variable);
                } else {
                    self.activities[variable] *= self.aging_factor;
                }
            }
        } else {
            for &variable in self.affected.iter() {
                let observation = self.observe(variable, variables);
                self.activities[variable] += observation;
                self.impacts[variable] = 0.0;
                self.schedules[variable] = 0.0;
            }
        }

        self.affected.clear();
    }

    fn sample(&mut self, variables: &impl VariableView) {
        let num_probes = self.num_probes as f64;
        for &variable in self.affected.iter() {
            let observation = self.observe(variable, variables);
            let deviation = observation - self.means[variable];
            self.means[variable] += deviation / num_probes;
            self.squared_deviations[variable] += deviation * (observation - self.means[variable]);
            self.impacts[variable] = 0.0;
            self.schedules[variable] = 0.0;
        }

        if self
            .activities
            .keys()
            .all(|variable| self.is_estimate_precise(variable, variables))
        {
            debug!("Activity sampling ended after {} probes", self.num_probes);
            self.is_sampling = false;
            self.activities = self.means.clone();
        } else {
            for activity in self.activities.iter_mut() {
                *activity = self.random.generate_f64();
            }
        }
    }

    /// Whether the 95% confidence interval of the mean activity of `variable` is tight enough.
    /// Assigned variables are never considered.
    fn is_estimate_precise(&self, variable: VariableIndex, variables: &impl VariableView) -> bool {
        if variables.is_instantiated(variable) {
            return true;
        }
        if self.num_probes < 2 {
            return false;
        }

        let num_probes = self.num_probes as f64;
        let standard_deviation = (self.squared_deviations[variable] / (num_probes - 1.0)).sqrt();
        let half_width = t_value(self.num_probes) * standard_deviation / num_probes.sqrt();

        half_width / self.means[variable] < self.interval_precision
    }

    fn observe(&self, variable: VariableIndex, variables: &impl VariableView) -> f64 {
        self.metric.observe(
            self.impacts[variable],
            self.schedules[variable],
            variables.domain_size(variable),
        )
    }

    fn reset_counters(&mut self, variable: VariableIndex) {
        self.impacts[variable] = 0.0;
        self.schedules[variable] = 0.0;
    }
}

/// The variables which had impact during the current probe.
#[derive(Debug)]
struct AffectedVariables {
    is_affected: KeyedVec<VariableIndex, bool>,
    variables: Vec<VariableIndex>,
}

impl AffectedVariables {
    fn new(num_variables: usize) -> Self {
        AffectedVariables {
            is_affected: KeyedVec::with_len(num_variables, false),
            variables: Vec::new(),
        }
    }

    fn insert(&mut self, variable: VariableIndex) {
        if !self.is_affected[variable] {
            self.is_affected[variable] = true;
            self.variables.push(variable);
        }
    }

    fn contains(&self, variable: VariableIndex) -> bool {
        self.is_affected[variable]
    }

    fn iter(&self) -> std::slice::Iter<'_, VariableIndex> {
        self.variables.iter()
    }

    fn clear(&mut self) {
        for &variable in &self.variables {
            self.is_affected[variable] = false;
        }
        self.variables.clear();
    }
}
