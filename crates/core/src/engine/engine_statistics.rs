use crate::create_statistics_struct;

create_statistics_struct!(
    /// Statistics of the [`ActivityBasedEngine`](crate::engine::ActivityBasedEngine).
    EngineStatistics {
        /// The number of fixpoint computations.
        num_probes: u64,
        /// The number of fixpoint computations during the sampling phase of the activities.
        num_sampling_probes: u64,
        /// The number of executions of a propagator for a single variable.
        num_fine_propagations: u64,
        /// The number of executions of a propagator as a whole.
        num_coarse_propagations: u64,
        /// The number of fixpoint computations which ended in a contradiction.
        num_contradictions: u64,
        /// The number of times the pending scheduling state was discarded.
        num_flushes: u64,
    }
);
