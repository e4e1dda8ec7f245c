use log::debug;
use log::trace;
use log::warn;

use crate::basic_types::Cause;
use crate::basic_types::Contradiction;
use crate::basic_types::PropagationStatus;
use crate::containers::DenseIdMap;
use crate::containers::KeyedVec;
use crate::engine::activity::ActivityTracker;
use crate::engine::activity::VariableView;
use crate::engine::propagation::PropagatorIndex;
use crate::engine::propagation::PropagatorStore;
use crate::engine::propagator_queue::PropagatorQueue;
use crate::engine::variable_queue::VariableQueue;
use crate::engine::ActivityEngineOptions;
use crate::engine::EngineError;
use crate::engine::EngineStatistics;
use crate::engine::EventBuffer;
use crate::engine::EventMask;
use crate::engine::EventType;
use crate::engine::PropagationContext;
use crate::engine::Propagator;
use crate::engine::PropagatorId;
use crate::engine::VariableId;
use crate::engine::VariableIndex;
use crate::engine::VariableStore;
use crate::engine::VariableUpdateListener;
use crate::engine::WatchSlot;
use crate::propel_assert_advanced;
use crate::propel_assert_moderate;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// A propagation engine which orders variables by their activity.
///
/// Whenever the domain of a variable changes, every interested propagator watching it receives a
/// pending event for that variable, and the variable enters the ready set. The fixpoint loop
/// repeatedly takes the most active ready variable and runs the propagators with pending events
/// on it (fine executions); only when no variable is ready, the next propagator from a FIFO queue
/// is executed as a whole (coarse execution).
///
/// Every fixpoint computation is a probe for the [`ActivityTracker`]: a variable has impact
/// when running the propagators on it leads to another variable being scheduled. See
/// [`ActivityEngineOptions`] for how these observations become activities.
pub struct ActivityBasedEngine<Domains> {
    propagators: PropagatorStore<Domains>,
    variable_ids: KeyedVec<VariableIndex, VariableId>,
    variable_indices: DenseIdMap<VariableIndex>,
    propagator_indices: DenseIdMap<PropagatorIndex>,
    /// For every variable its watchers, as the propagator and the position of the variable among
    /// the watched variables of that propagator.
    watchers: KeyedVec<VariableIndex, Vec<(PropagatorIndex, usize)>>,
    /// For every propagator the (variable, slot) pairs of its non-constant watched variables.
    watch_slots: KeyedVec<PropagatorIndex, Vec<(VariableIndex, usize)>>,
    /// The pending events of every watch, indexed like `watchers`.
    fine_masks: KeyedVec<VariableIndex, Vec<EventMask>>,
    coarse_masks: KeyedVec<PropagatorIndex, EventMask>,
    /// The number of watches of a propagator with a non-empty fine mask.
    pending_events: KeyedVec<PropagatorIndex, u32>,
    variable_queue: VariableQueue,
    propagator_queue: PropagatorQueue,
    last_variable: Option<VariableIndex>,
    last_propagator: Option<PropagatorIndex>,
    /// The variable whose fine executions are currently running; it is credited with the impact
    /// of the events they raise.
    source_variable: Option<VariableIndex>,
    activities: ActivityTracker,
    events: EventBuffer,
    statistics: EngineStatistics,
}

impl<Domains> std::fmt::Debug for ActivityBasedEngine<Domains> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityBasedEngine")
            .field("propagators", &self.propagators)
            .field("num_variables", &self.variable_ids.len())
            .field("variable_queue", &self.variable_queue)
            .field("propagator_queue", &self.propagator_queue)
            .field("activities", &self.activities)
            .field("statistics", &self.statistics)
            .finish_non_exhaustive()
    }
}

impl<Domains: VariableStore> ActivityBasedEngine<Domains> {
    /// Creates the engine for the variables of `domains` and the provided propagators.
    ///
    /// The watcher lists of the domains and the watched variables of the propagators have to
    /// agree; an error is returned when either side refers to an unknown identifier.
    pub fn new(
        domains: &Domains,
        propagators: Vec<Box<dyn Propagator<Domains>>>,
        options: ActivityEngineOptions,
    ) -> Result<Self, EngineError> {
        let variable_ids: KeyedVec<VariableIndex, VariableId> = {
            let mut ids = KeyedVec::default();
            for id in domains.variable_ids() {
                let _ = ids.push(id);
            }
            ids
        };
        let variable_indices: DenseIdMap<VariableIndex> =
            DenseIdMap::new(variable_ids.iter().map(|id| id.0));

        let mut store = PropagatorStore::default();
        for propagator in propagators {
            let _ = store.push(propagator);
        }
        let propagator_indices: DenseIdMap<PropagatorIndex> =
            DenseIdMap::new(store.iter().map(|propagator| propagator.id().0));

        let mut watchers: KeyedVec<VariableIndex, Vec<(PropagatorIndex, usize)>> =
            KeyedVec::default();
        for &variable in variable_ids.iter() {
            let variable_watchers = domains
                .watchers(variable)
                .iter()
                .map(|watcher| {
                    propagator_indices
                        .get(watcher.propagator.0)
                        .map(|propagator| (propagator, watcher.watch_index))
                        .ok_or(EngineError::UnknownPropagator(watcher.propagator))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let _ = watchers.push(variable_watchers);
        }

        let mut watch_slots: KeyedVec<PropagatorIndex, Vec<(VariableIndex, usize)>> =
            KeyedVec::default();
        for propagator in store.keys() {
            let mut slots = Vec::new();
            for (watch_index, watch_slot) in store[propagator].watched_variables().iter().enumerate()
            {
                let WatchSlot::Variable { variable, slot } = *watch_slot else {
                    continue;
                };
                let variable_index = variable_indices
                    .get(variable.0)
                    .ok_or(EngineError::UnknownVariable(variable))?;

                propel_assert_moderate!(
                    watchers[variable_index].get(slot) == Some(&(propagator, watch_index)),
                    "{} and the watchers of {variable} disagree on slot {slot}",
                    store[propagator].name(),
                );

                slots.push((variable_index, slot));
            }
            let _ = watch_slots.push(slots);
        }

        let mut fine_masks: KeyedVec<VariableIndex, Vec<EventMask>> = KeyedVec::default();
        for variable_watchers in watchers.iter() {
            let _ = fine_masks.push(vec![EventMask::empty(); variable_watchers.len()]);
        }

        if variable_ids.is_empty() {
            warn!("The activity-based engine is created without variables");
        }
        debug!(
            "Created activity-based engine with {} variables and {} propagators (metric {})",
            variable_ids.len(),
            store.len(),
            options.metric
        );

        Ok(ActivityBasedEngine {
            coarse_masks: propagator_indices.new_keyed_vec(EventMask::empty()),
            pending_events: propagator_indices.new_keyed_vec(0),
            variable_queue: VariableQueue::new(variable_ids.len()),
            propagator_queue: PropagatorQueue::new(store.len()),
            activities: ActivityTracker::new(variable_ids.len(), options),
            propagators: store,
            variable_indices,
            propagator_indices,
            variable_ids,
            watchers,
            watch_slots,
            fine_masks,
            last_variable: None,
            last_propagator: None,
            source_variable: None,
            events: EventBuffer::default(),
            statistics: EngineStatistics::default(),
        })
    }

    /// Runs the propagators until no events are pending, or until one of them reports a
    /// contradiction.
    ///
    /// Regardless of the outcome, the activities are updated with the observations of this
    /// probe. After a contradiction the pending state is left as it was at the failure; call
    /// [`ActivityBasedEngine::flush`] before propagating again.
    pub fn propagate_to_fixpoint(&mut self, domains: &mut Domains) -> PropagationStatus {
        self.statistics.num_probes += 1;
        if self.activities.is_sampling() {
            self.statistics.num_sampling_probes += 1;
        }
        self.activities.start_probe();

        let result = self.propagate_until_fixpoint(domains);

        self.source_variable = None;
        self.activities.end_probe(&IndexedDomains {
            domains: &*domains,
            variable_ids: &self.variable_ids,
        });

        match &result {
            Ok(()) => propel_assert_advanced!(self.check_masks_cleared()),
            Err(contradiction) => {
                self.statistics.num_contradictions += 1;
                trace!("Probe {} failed: {contradiction}", self.activities.num_probes());
            }
        }

        result
    }
}

impl<Domains> ActivityBasedEngine<Domains> {
    /// Schedules every propagator for a coarse execution from scratch.
    pub fn init(&mut self) {
        for propagator in self.propagators.keys().collect::<Vec<_>>() {
            self.enqueue_propagator(propagator, EventType::FullPropagation);
        }
    }

    /// Adds `mask` to the pending events of every active watcher of `variable` and places the
    /// variable in the ready set.
    ///
    /// This is a forced schedule: unlike a reported domain change, it does not consult
    /// [`Propagator::advise`] and is not observed by the activity tracker.
    pub fn schedule_variable(
        &mut self,
        variable: VariableId,
        mask: EventMask,
    ) -> Result<(), EngineError> {
        let variable = self.variable_index(variable)?;
        if mask.is_empty() {
            return Ok(());
        }

        let mut has_pending_events = false;
        for slot in 0..self.watchers[variable].len() {
            let (propagator, _) = self.watchers[variable][slot];
            if !self.propagators[propagator].is_active() {
                continue;
            }
            self.add_fine_events(variable, slot, mask);
            has_pending_events = true;
        }

        if has_pending_events {
            let _ = self
                .variable_queue
                .schedule(variable, self.activities.activity(variable));
        }
        Ok(())
    }

    /// Adds `event` to the pending events of `propagator` and places it at the end of the
    /// propagator queue if it is not yet enqueued.
    pub fn schedule_propagator(
        &mut self,
        propagator: PropagatorId,
        event: EventType,
    ) -> Result<(), EngineError> {
        let propagator = self
            .propagator_indices
            .get(propagator.0)
            .ok_or(EngineError::UnknownPropagator(propagator))?;
        self.enqueue_propagator(propagator, event);
        Ok(())
    }

    /// Reports a change to the domain of `variable` made with the provided `cause`.
    ///
    /// Changes made by a propagator during its execution are reported through its
    /// [`PropagationContext`] instead; this is meant for changes made outside propagation, such
    /// as decisions.
    pub fn notify_variable_update(
        &mut self,
        variable: VariableId,
        event: EventType,
        cause: Cause,
    ) -> Result<(), EngineError> {
        let variable = self.variable_index(variable)?;
        self.notify(variable, event, cause);
        Ok(())
    }

    /// Creates the contradiction to return when `cause` detects a failure outside a propagator.
    pub fn fails(
        &self,
        cause: Cause,
        variable: Option<VariableId>,
        message: impl Into<String>,
    ) -> Contradiction {
        Contradiction::new(cause, variable, message)
    }

    /// Discards all pending events, leaving both ready sets empty.
    pub fn flush(&mut self) {
        self.statistics.num_flushes += 1;

        if let Some(variable) = self.last_variable.take() {
            self.clear_fine_masks(variable);
        }
        while let Some(variable) = self.variable_queue.pop() {
            self.clear_fine_masks(variable);
        }
        if let Some(propagator) = self.last_propagator.take() {
            self.coarse_masks[propagator] = EventMask::empty();
        }
        while let Some(propagator) = self.propagator_queue.pop() {
            self.coarse_masks[propagator] = EventMask::empty();
        }

        self.events.clear();
        self.source_variable = None;

        propel_assert_moderate!(self.pending_events.iter().all(|&pending| pending == 0));
        propel_assert_advanced!(self.check_masks_cleared());
    }

    /// Whether no watch has a pending event.
    pub fn check_masks_cleared(&self) -> bool {
        self.fine_masks
            .iter()
            .all(|masks| masks.iter().all(|mask| mask.is_empty()))
    }

    /// The activity of `variable`, if it is known to the engine.
    pub fn activity(&self, variable: VariableId) -> Option<f64> {
        self.variable_indices
            .get(variable.0)
            .map(|variable| self.activities.activity(variable))
    }

    /// Whether the activities are still being sampled.
    pub fn is_sampling(&self) -> bool {
        self.activities.is_sampling()
    }

    pub fn is_variable_scheduled(&self, variable: VariableId) -> bool {
        self.variable_indices
            .get(variable.0)
            .is_some_and(|variable| self.variable_queue.is_scheduled(variable))
    }

    pub fn is_propagator_scheduled(&self, propagator: PropagatorId) -> bool {
        self.propagator_indices
            .get(propagator.0)
            .is_some_and(|propagator| self.propagator_queue.is_propagator_enqueued(propagator))
    }

    /// The number of variables in the ready set.
    pub fn num_scheduled_variables(&self) -> usize {
        self.variable_queue.len()
    }

    /// The number of propagators awaiting a coarse execution.
    pub fn num_scheduled_propagators(&self) -> usize {
        self.propagator_queue.len()
    }

    /// The number of watches of `propagator` with pending events.
    pub fn num_pending_events(&self, propagator: PropagatorId) -> Option<u32> {
        self.propagator_indices
            .get(propagator.0)
            .map(|propagator| self.pending_events[propagator])
    }

    pub fn statistics(&self) -> &EngineStatistics {
        &self.statistics
    }

    pub fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }

    fn variable_index(&self, variable: VariableId) -> Result<VariableIndex, EngineError> {
        self.variable_indices
            .get(variable.0)
            .ok_or(EngineError::UnknownVariable(variable))
    }

    fn propagate_until_fixpoint(&mut self, domains: &mut Domains) -> PropagationStatus {
        loop {
            while let Some(variable) = self.variable_queue.pop() {
                self.last_variable = Some(variable);
                self.source_variable = Some(variable);
                self.propagate_variable(domains, variable)?;
            }
            // Coarse executions are not attributed to a variable.
            self.source_variable = None;

            let Some(propagator) = self.propagator_queue.pop() else {
                break;
            };
            self.propagate_coarse(domains, propagator)?;
        }

        propel_assert_moderate!(self.variable_queue.is_empty() && self.propagator_queue.is_empty());
        Ok(())
    }

    fn propagate_variable(
        &mut self,
        domains: &mut Domains,
        variable: VariableIndex,
    ) -> PropagationStatus {
        for slot in 0..self.watchers[variable].len() {
            let mask = self.fine_masks[variable][slot];
            if mask.is_empty() {
                continue;
            }

            let (propagator, watch_index) = self.watchers[variable][slot];
            self.fine_masks[variable][slot] = EventMask::empty();
            propel_assert_moderate!(self.pending_events[propagator] > 0);
            self.pending_events[propagator] -= 1;
            self.last_propagator = Some(propagator);
            self.statistics.num_fine_propagations += 1;

            let propagator_id = self.propagators[propagator].id();
            trace!(
                "Fine execution of {} on {} with {mask:?}",
                self.propagators[propagator].name(),
                self.variable_ids[variable]
            );

            let context = PropagationContext::new(domains, &mut self.events, propagator_id);
            let status = self.propagators[propagator].propagate_on(context, watch_index, mask);
            self.process_events();
            status?;
        }

        Ok(())
    }

    fn propagate_coarse(
        &mut self,
        domains: &mut Domains,
        propagator: PropagatorIndex,
    ) -> PropagationStatus {
        self.last_propagator = Some(propagator);
        let mask = std::mem::take(&mut self.coarse_masks[propagator]);
        if self.propagators[propagator].is_stateless() {
            self.propagators[propagator].set_active();
        }
        self.statistics.num_coarse_propagations += 1;

        let propagator_id = self.propagators[propagator].id();
        trace!(
            "Coarse execution of {} with {mask:?}",
            self.propagators[propagator].name()
        );

        let context = PropagationContext::new(domains, &mut self.events, propagator_id);
        let status = self.propagators[propagator].propagate(context, mask);
        self.process_events();
        status?;

        self.deactivate(propagator);
        Ok(())
    }

    /// Processes the events raised by the last executed propagator.
    fn process_events(&mut self) {
        if self.events.is_empty() {
            return;
        }

        let events = self.events.take();
        for &(variable, event, cause) in &events {
            match self.variable_indices.get(variable.0) {
                Some(variable) => self.notify(variable, event, cause),
                None => panic!("{}", EngineError::UnknownVariable(variable)),
            }
        }
        self.events.restore(events);
    }

    fn notify(&mut self, variable: VariableIndex, event: EventType, cause: Cause) {
        trace!("{} {event} by {cause}", self.variable_ids[variable]);

        let mut has_pending_events = false;
        for slot in 0..self.watchers[variable].len() {
            let (propagator, watch_index) = self.watchers[variable][slot];
            let watcher = &mut self.propagators[propagator];
            if cause == Cause::Propagator(watcher.id()) || !watcher.is_active() {
                continue;
            }

            if watcher.advise(watch_index, event.mask()) {
                self.add_fine_events(variable, slot, event.strengthened_mask());
                has_pending_events = true;
            }
        }

        if has_pending_events {
            self.activities.record_schedule(variable);
            if let Some(source) = self.source_variable {
                self.activities.record_impact(source);
            }
            let _ = self
                .variable_queue
                .schedule(variable, self.activities.activity(variable));
        }
    }

    fn add_fine_events(&mut self, variable: VariableIndex, slot: usize, mask: EventMask) {
        let (propagator, _) = self.watchers[variable][slot];
        let pending = &mut self.fine_masks[variable][slot];
        if pending.is_empty() {
            self.pending_events[propagator] += 1;
        }
        *pending |= mask;
    }

    fn clear_fine_masks(&mut self, variable: VariableIndex) {
        for slot in 0..self.watchers[variable].len() {
            if !self.fine_masks[variable][slot].is_empty() {
                let (propagator, _) = self.watchers[variable][slot];
                self.fine_masks[variable][slot] = EventMask::empty();
                self.pending_events[propagator] -= 1;
            }
        }
    }

    fn enqueue_propagator(&mut self, propagator: PropagatorIndex, event: EventType) {
        if self.propagator_queue.enqueue_propagator(propagator) {
            trace!("Scheduled {} with {event}", self.propagators[propagator].name());
        }
        self.coarse_masks[propagator] |= event.strengthened_mask();
    }

    /// Drops all pending events of a propagator after its coarse execution.
    fn deactivate(&mut self, propagator: PropagatorIndex) {
        for &(variable, slot) in &self.watch_slots[propagator] {
            let mask = &mut self.fine_masks[variable][slot];
            if !mask.is_empty() {
                *mask = EventMask::empty();
                self.pending_events[propagator] -= 1;
            }
        }
        propel_assert_moderate!(self.pending_events[propagator] == 0);

        if self.propagator_queue.remove(propagator) {
            self.coarse_masks[propagator] = EventMask::empty();
        }
    }
}

impl<Domains> VariableUpdateListener for ActivityBasedEngine<Domains> {
    fn on_variable_update(&mut self, variable: VariableId, event: EventType, cause: Cause) {
        if let Err(error) = self.notify_variable_update(variable, event, cause) {
            panic!("{error}");
        }
    }
}

/// Looks up the facts of variables by their engine index.
struct IndexedDomains<'a, Domains> {
    domains: &'a Domains,
    variable_ids: &'a KeyedVec<VariableIndex, VariableId>,
}

impl<Domains: VariableStore> VariableView for IndexedDomains<'_, Domains> {
    fn is_instantiated(&self, variable: VariableIndex) -> bool {
        self.domains.is_instantiated(self.variable_ids[variable])
    }

    fn domain_size(&self, variable: VariableIndex) -> usize {
        self.domains.domain_size(self.variable_ids[variable])
    }
}
