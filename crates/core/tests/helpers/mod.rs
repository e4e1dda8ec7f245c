//! A small finite-domain model and search loop to exercise the engine and the backjump
//! strategies together.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::collections::BTreeSet;

use propel_core::engine::ActivityBasedEngine;
use propel_core::engine::ActivityEngineOptions;
use propel_core::engine::EventMask;
use propel_core::engine::EventType;
use propel_core::engine::PropagationContext;
use propel_core::engine::Propagator;
use propel_core::engine::PropagatorId;
use propel_core::engine::VariableId;
use propel_core::engine::VariableStore;
use propel_core::engine::VariableUpdateListener;
use propel_core::engine::WatchSlot;
use propel_core::engine::Watcher;
use propel_core::explanations::BackjumpContext;
use propel_core::explanations::BackjumpError;
use propel_core::explanations::BackjumpOutcome;
use propel_core::explanations::BackjumpStrategy;
use propel_core::explanations::BacktrackStore;
use propel_core::explanations::Decision;
use propel_core::explanations::DecisionChain;
use propel_core::explanations::Deduction;
use propel_core::explanations::Explanation;
use propel_core::explanations::ExplanationRecorder;
use propel_core::explanations::ForcedDecisionPath;
use propel_core::explanations::SearchDriver;
use propel_core::Cause;
use propel_core::Contradiction;
use propel_core::PropagationStatus;

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Domain {
    Int(BTreeSet<i32>),
    Set {
        kernel: BTreeSet<i32>,
        envelope: BTreeSet<i32>,
    },
}

/// Integer variables with enumerated domains and set variables given by a kernel and an
/// envelope. Every decision level stores a copy of all domains.
#[derive(Clone, Debug, Default)]
pub(crate) struct Model {
    domains: Vec<Domain>,
    watchers: Vec<Vec<Watcher>>,
    trail: Vec<Vec<Domain>>,
}

impl Model {
    fn new_variable(&mut self, domain: Domain) -> VariableId {
        let id = VariableId(self.domains.len() as u32);
        self.domains.push(domain);
        self.watchers.push(Vec::new());
        id
    }

    pub(crate) fn new_int(&mut self, lower_bound: i32, upper_bound: i32) -> VariableId {
        self.new_variable(Domain::Int((lower_bound..=upper_bound).collect()))
    }

    pub(crate) fn new_enumerated_int(&mut self, values: &[i32]) -> VariableId {
        self.new_variable(Domain::Int(values.iter().copied().collect()))
    }

    pub(crate) fn new_fixed_int(&mut self, value: i32) -> VariableId {
        self.new_int(value, value)
    }

    /// A set variable which may contain any value in `[lower_bound, upper_bound]`.
    pub(crate) fn new_set(&mut self, lower_bound: i32, upper_bound: i32) -> VariableId {
        self.new_variable(Domain::Set {
            kernel: BTreeSet::new(),
            envelope: (lower_bound..=upper_bound).collect(),
        })
    }

    pub(crate) fn new_fixed_set(&mut self, values: &[i32]) -> VariableId {
        let values = values.iter().copied().collect::<BTreeSet<_>>();
        self.new_variable(Domain::Set {
            kernel: values.clone(),
            envelope: values,
        })
    }

    /// Registers `propagator` on the given variables; instantiated variables are treated as
    /// constants.
    pub(crate) fn watch(
        &mut self,
        propagator: PropagatorId,
        variables: &[VariableId],
    ) -> Vec<WatchSlot> {
        let mut watch_slots = Vec::with_capacity(variables.len());
        for (watch_index, &variable) in variables.iter().enumerate() {
            if self.is_instantiated(variable) {
                watch_slots.push(WatchSlot::Constant);
                continue;
            }
            let watchers = &mut self.watchers[variable.0 as usize];
            watchers.push(Watcher {
                propagator,
                watch_index,
            });
            watch_slots.push(WatchSlot::Variable {
                variable,
                slot: watchers.len() - 1,
            });
        }
        watch_slots
    }

    pub(crate) fn values(&self, variable: VariableId) -> &BTreeSet<i32> {
        match &self.domains[variable.0 as usize] {
            Domain::Int(values) => values,
            Domain::Set { .. } => panic!("{variable} is a set variable"),
        }
    }

    pub(crate) fn value(&self, variable: VariableId) -> Option<i32> {
        let values = self.values(variable);
        if values.len() == 1 {
            values.first().copied()
        } else {
            None
        }
    }

    pub(crate) fn kernel(&self, variable: VariableId) -> &BTreeSet<i32> {
        match &self.domains[variable.0 as usize] {
            Domain::Set { kernel, .. } => kernel,
            Domain::Int(_) => panic!("{variable} is an integer variable"),
        }
    }

    pub(crate) fn envelope(&self, variable: VariableId) -> &BTreeSet<i32> {
        match &self.domains[variable.0 as usize] {
            Domain::Set { envelope, .. } => envelope,
            Domain::Int(_) => panic!("{variable} is an integer variable"),
        }
    }

    pub(crate) fn is_solution(&self) -> bool {
        self.variable_ids()
            .all(|variable| self.is_instantiated(variable))
    }

    /// The first integer variable which is not instantiated, with its smallest value.
    pub(crate) fn first_unfixed_int(&self) -> Option<(VariableId, i32)> {
        self.domains
            .iter()
            .enumerate()
            .find_map(|(index, domain)| match domain {
                Domain::Int(values) if values.len() > 1 => values
                    .first()
                    .map(|&value| (VariableId(index as u32), value)),
                _ => None,
            })
    }

    pub(crate) fn push_level(&mut self) {
        self.trail.push(self.domains.clone());
    }

    pub(crate) fn remove_value(
        &mut self,
        variable: VariableId,
        value: i32,
        cause: Cause,
        listener: &mut impl VariableUpdateListener,
    ) -> PropagationStatus {
        let Domain::Int(values) = &mut self.domains[variable.0 as usize] else {
            panic!("{variable} is a set variable");
        };
        if !values.contains(&value) {
            return Ok(());
        }
        if values.len() == 1 {
            return Err(Contradiction::new(
                cause,
                Some(variable),
                format!("removing the last value {value}"),
            ));
        }

        let is_lower_bound = values.first() == Some(&value);
        let is_upper_bound = values.last() == Some(&value);
        let _ = values.remove(&value);

        let event = if values.len() == 1 {
            EventType::Assign
        } else if is_lower_bound {
            EventType::LowerBound
        } else if is_upper_bound {
            EventType::UpperBound
        } else {
            EventType::Removal
        };
        listener.on_variable_update(variable, event, cause);
        Ok(())
    }

    pub(crate) fn assign(
        &mut self,
        variable: VariableId,
        value: i32,
        cause: Cause,
        listener: &mut impl VariableUpdateListener,
    ) -> PropagationStatus {
        let Domain::Int(values) = &mut self.domains[variable.0 as usize] else {
            panic!("{variable} is a set variable");
        };
        if !values.contains(&value) {
            return Err(Contradiction::new(
                cause,
                Some(variable),
                format!("{value} is not in the domain"),
            ));
        }
        if values.len() == 1 {
            return Ok(());
        }

        *values = BTreeSet::from([value]);
        listener.on_variable_update(variable, EventType::Assign, cause);
        Ok(())
    }

    pub(crate) fn add_to_kernel(
        &mut self,
        variable: VariableId,
        value: i32,
        cause: Cause,
        listener: &mut impl VariableUpdateListener,
    ) -> PropagationStatus {
        let Domain::Set { kernel, envelope } = &mut self.domains[variable.0 as usize] else {
            panic!("{variable} is an integer variable");
        };
        if !envelope.contains(&value) {
            return Err(Contradiction::new(
                cause,
                Some(variable),
                format!("{value} is not in the envelope"),
            ));
        }
        if !kernel.insert(value) {
            return Ok(());
        }

        let event = if kernel.len() == envelope.len() {
            EventType::Assign
        } else {
            EventType::LowerBound
        };
        listener.on_variable_update(variable, event, cause);
        Ok(())
    }

    pub(crate) fn remove_from_envelope(
        &mut self,
        variable: VariableId,
        value: i32,
        cause: Cause,
        listener: &mut impl VariableUpdateListener,
    ) -> PropagationStatus {
        let Domain::Set { kernel, envelope } = &mut self.domains[variable.0 as usize] else {
            panic!("{variable} is an integer variable");
        };
        if kernel.contains(&value) {
            return Err(Contradiction::new(
                cause,
                Some(variable),
                format!("{value} is in the kernel"),
            ));
        }
        if !envelope.remove(&value) {
            return Ok(());
        }

        let event = if kernel.len() == envelope.len() {
            EventType::Assign
        } else {
            EventType::UpperBound
        };
        listener.on_variable_update(variable, event, cause);
        Ok(())
    }
}

impl VariableStore for Model {
    fn variable_ids(&self) -> impl Iterator<Item = VariableId> + '_ {
        (0..self.domains.len() as u32).map(VariableId)
    }

    fn domain_size(&self, variable: VariableId) -> usize {
        match &self.domains[variable.0 as usize] {
            Domain::Int(values) => values.len(),
            Domain::Set { kernel, envelope } => envelope.len() - kernel.len() + 1,
        }
    }

    fn is_instantiated(&self, variable: VariableId) -> bool {
        self.domain_size(variable) == 1
    }

    fn watchers(&self, variable: VariableId) -> &[Watcher] {
        &self.watchers[variable.0 as usize]
    }
}

impl BacktrackStore for Model {
    fn current_depth(&self) -> usize {
        self.trail.len()
    }

    fn unwind_to_depth(&mut self, depth: usize) {
        if depth < self.trail.len() {
            self.domains = self.trail[depth].clone();
            self.trail.truncate(depth);
        }
    }
}

/// The set variable is the union of the values of the integer variables.
#[derive(Debug)]
pub(crate) struct IntValuesUnion {
    id: PropagatorId,
    ints: Vec<VariableId>,
    set: VariableId,
    watch_slots: Vec<WatchSlot>,
}

impl IntValuesUnion {
    pub(crate) fn post(
        model: &mut Model,
        id: PropagatorId,
        ints: Vec<VariableId>,
        set: VariableId,
    ) -> Box<dyn Propagator<Model>> {
        let watched = ints
            .iter()
            .copied()
            .chain(std::iter::once(set))
            .collect::<Vec<_>>();
        let watch_slots = model.watch(id, &watched);
        Box::new(IntValuesUnion {
            id,
            ints,
            set,
            watch_slots,
        })
    }

    fn filter(&self, mut context: PropagationContext<'_, Model>) -> PropagationStatus {
        let cause = context.cause();
        let (model, events) = context.split();

        loop {
            let mut has_changed = false;

            for &int in &self.ints {
                let outside = model
                    .values(int)
                    .iter()
                    .filter(|&value| !model.envelope(self.set).contains(value))
                    .copied()
                    .collect::<Vec<_>>();
                for value in outside {
                    model.remove_value(int, value, cause, events)?;
                    has_changed = true;
                }

                if let Some(value) = model.value(int) {
                    if !model.kernel(self.set).contains(&value) {
                        model.add_to_kernel(self.set, value, cause, events)?;
                        has_changed = true;
                    }
                }
            }

            let unsupported = model
                .envelope(self.set)
                .iter()
                .filter(|value| {
                    !self
                        .ints
                        .iter()
                        .any(|&int| model.values(int).contains(*value))
                })
                .copied()
                .collect::<Vec<_>>();
            for value in unsupported {
                model.remove_from_envelope(self.set, value, cause, events)?;
                has_changed = true;
            }

            if !has_changed {
                return Ok(());
            }
        }
    }
}

impl Propagator<Model> for IntValuesUnion {
    fn id(&self) -> PropagatorId {
        self.id
    }

    fn name(&self) -> &str {
        "IntValuesUnion"
    }

    fn watched_variables(&self) -> &[WatchSlot] {
        &self.watch_slots
    }

    fn is_active(&self) -> bool {
        true
    }

    fn is_stateless(&self) -> bool {
        true
    }

    fn set_active(&mut self) {}

    fn propagate(
        &mut self,
        context: PropagationContext<'_, Model>,
        _mask: EventMask,
    ) -> PropagationStatus {
        self.filter(context)
    }

    fn propagate_on(
        &mut self,
        context: PropagationContext<'_, Model>,
        _watch_index: usize,
        _mask: EventMask,
    ) -> PropagationStatus {
        self.filter(context)
    }
}

/// The decision `variable = value`, refuted by `variable != value`. Once reversed, the left
/// branch is `variable != value` instead.
#[derive(Clone, Debug)]
pub(crate) struct AssignDecision {
    depth: usize,
    variable: VariableId,
    value: i32,
    assigns_on_left_branch: bool,
    on_right_branch: bool,
}

impl AssignDecision {
    fn current_deduction(&self) -> Deduction {
        if self.on_right_branch {
            self.negative_deduction()
        } else {
            self.positive_deduction()
        }
    }

    fn apply(
        &self,
        model: &mut Model,
        engine: &mut ActivityBasedEngine<Model>,
    ) -> PropagationStatus {
        if self.assigns_on_left_branch != self.on_right_branch {
            model.assign(self.variable, self.value, Cause::Decision, engine)
        } else {
            model.remove_value(self.variable, self.value, Cause::Decision, engine)
        }
    }
}

impl Decision for AssignDecision {
    fn has_next(&self) -> bool {
        !self.on_right_branch
    }

    fn reverse(&mut self) {
        self.assigns_on_left_branch = !self.assigns_on_left_branch;
        self.on_right_branch = !self.on_right_branch;
    }

    fn rewind(&mut self) {
        self.on_right_branch = false;
    }

    fn positive_deduction(&self) -> Deduction {
        Deduction::left_branch(self.depth, self.variable, self.value)
    }

    fn negative_deduction(&self) -> Deduction {
        Deduction::right_branch(self.depth, self.variable, self.value)
    }
}

#[derive(Debug, Default)]
pub(crate) struct Search {
    chain: DecisionChain<AssignDecision>,
    installed: Option<ForcedDecisionPath<AssignDecision>>,
}

impl SearchDriver for Search {
    type Decision = AssignDecision;

    fn decision_chain(&mut self) -> &mut DecisionChain<AssignDecision> {
        &mut self.chain
    }

    fn install_decision_path(&mut self, path: ForcedDecisionPath<AssignDecision>) {
        self.installed = Some(path);
    }
}

/// Enumerates all solutions of a model, backtracking through a [`BackjumpStrategy`].
///
/// The explanation of every failure (and of every solution, to move on to the next one) is the
/// set of branches on the current path.
#[derive(Debug)]
pub(crate) struct Solver {
    pub(crate) model: Model,
    pub(crate) engine: ActivityBasedEngine<Model>,
    pub(crate) solutions: Vec<Vec<i32>>,
    pub(crate) repairs: Vec<BackjumpOutcome>,
    search: Search,
    recorder: ExplanationRecorder,
}

impl Solver {
    pub(crate) fn new(model: Model, propagators: Vec<Box<dyn Propagator<Model>>>) -> Solver {
        let engine = ActivityBasedEngine::new(&model, propagators, ActivityEngineOptions::default())
            .expect("watchers agree with the propagators");
        Solver {
            model,
            engine,
            solutions: Vec::new(),
            repairs: Vec::new(),
            search: Search::default(),
            recorder: ExplanationRecorder::new(false),
        }
    }

    pub(crate) fn enumerate(
        &mut self,
        strategy: &mut impl BackjumpStrategy,
    ) -> Result<usize, BackjumpError> {
        self.engine.init();
        let mut status = Ok(());

        loop {
            let outcome = status.and_then(|()| self.engine.propagate_to_fixpoint(&mut self.model));
            let cause = match outcome {
                Ok(()) if !self.model.is_solution() => {
                    status = self.decide();
                    continue;
                }
                Ok(()) => {
                    self.record_solution();
                    Cause::Null
                }
                Err(contradiction) => {
                    self.engine.flush();
                    contradiction.cause
                }
            };

            let explanation = self
                .search
                .chain
                .iter()
                .map(AssignDecision::current_deduction)
                .collect::<Explanation>();
            let context =
                BackjumpContext::new(&mut self.model, &mut self.recorder, &mut self.search);
            match strategy.on_contradiction(&explanation, cause, context)? {
                BackjumpOutcome::Exhausted => return Ok(self.solutions.len()),
                outcome @ BackjumpOutcome::Repaired { .. } => {
                    self.repairs.push(outcome);
                    status = self.apply_installed_path();
                }
            }
        }
    }

    fn record_solution(&mut self) {
        let solution = self
            .model
            .variable_ids()
            .filter_map(|variable| match self.model.domains[variable.0 as usize] {
                Domain::Int(_) => self.model.value(variable),
                Domain::Set { .. } => None,
            })
            .collect();
        self.solutions.push(solution);
    }

    fn decide(&mut self) -> PropagationStatus {
        let (variable, value) = self
            .model
            .first_unfixed_int()
            .expect("only integer variables are left open");
        let decision = AssignDecision {
            depth: self.search.chain.depth() + 1,
            variable,
            value,
            assigns_on_left_branch: true,
            on_right_branch: false,
        };
        self.recorder
            .record_left_decision(decision.positive_deduction());
        self.push(decision)
    }

    fn apply_installed_path(&mut self) -> PropagationStatus {
        let path = self
            .search
            .installed
            .take()
            .expect("a repaired search installs a path");
        let (mut refuted, forced) = path.into_parts();
        refuted.on_right_branch = true;
        self.push(refuted)?;
        // Once a forced decision fails, the rest of the path is left to regular branching.
        for decision in forced {
            self.push(decision)?;
        }
        Ok(())
    }

    fn push(&mut self, decision: AssignDecision) -> PropagationStatus {
        self.model.push_level();
        let status = decision.apply(&mut self.model, &mut self.engine);
        self.search.chain.push(decision);
        status
    }
}

/// All assignments of `ints` (each ranging over `[lower_bound, upper_bound]`) whose values
/// make up exactly `set`.
pub(crate) fn count_unions(
    num_ints: usize,
    lower_bound: i32,
    upper_bound: i32,
    set: &BTreeSet<i32>,
) -> usize {
    let width = (upper_bound - lower_bound + 1) as usize;
    (0..width.pow(num_ints as u32))
        .filter(|&code| {
            let mut code = code;
            let mut values = BTreeSet::new();
            for _ in 0..num_ints {
                let _ = values.insert(lower_bound + (code % width) as i32);
                code /= width;
            }
            &values == set
        })
        .count()
}
