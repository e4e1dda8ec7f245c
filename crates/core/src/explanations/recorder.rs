use crate::containers::HashMap;
use crate::containers::HashSet;
use crate::engine::VariableId;
use crate::explanations::Deduction;
use crate::explanations::Explanation;
use crate::explanations::ExplanationStore;

/// An in-memory [`ExplanationStore`].
///
/// Besides the explanations of deductions, the recorder keeps the left branches which are active
/// per variable; the search registers them with [`ExplanationRecorder::record_left_decision`]
/// when applying a decision.
#[derive(Debug, Default)]
pub struct ExplanationRecorder {
    explanations: HashMap<Deduction, Explanation>,
    left_decisions: HashMap<VariableId, Vec<Deduction>>,
    is_tracing_enabled: bool,
}

impl ExplanationRecorder {
    pub fn new(is_tracing_enabled: bool) -> Self {
        ExplanationRecorder {
            is_tracing_enabled,
            ..Default::default()
        }
    }

    /// The explanation recorded for `deduction`.
    pub fn explanation_of(&self, deduction: &Deduction) -> Option<&Explanation> {
        self.explanations.get(deduction)
    }

    pub fn record_left_decision(&mut self, decision: Deduction) {
        self.left_decisions
            .entry(decision.variable())
            .or_default()
            .push(decision);
    }

    /// The left branches which are taken on `variable`, in the order they were recorded.
    pub fn left_decisions(&self, variable: VariableId) -> &[Deduction] {
        self.left_decisions
            .get(&variable)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn num_recorded_explanations(&self) -> usize {
        self.explanations.len()
    }
}

impl ExplanationStore for ExplanationRecorder {
    fn flatten(&self, explanation: &Explanation) -> Explanation {
        let mut flattened = Explanation::new();
        let mut visited: HashSet<Deduction> = HashSet::default();
        let mut to_process = explanation.iter().copied().collect::<Vec<_>>();

        while let Some(deduction) = to_process.pop() {
            if !visited.insert(deduction) {
                continue;
            }

            match self.explanations.get(&deduction) {
                Some(recorded) => to_process.extend(recorded.iter().copied()),
                None => {
                    let _ = flattened.add(deduction);
                }
            }
        }

        flattened
    }

    fn store(&mut self, deduction: Deduction, explanation: Explanation) {
        let _ = self.explanations.insert(deduction, explanation);
    }

    fn remove_left_decision_for(&mut self, variable: VariableId, decision: &Deduction) {
        if let Some(decisions) = self.left_decisions.get_mut(&variable) {
            decisions.retain(|recorded| recorded != decision);
            if decisions.is_empty() {
                let _ = self.left_decisions.remove(&variable);
            }
        }
    }

    fn is_tracing_enabled(&self) -> bool {
        self.is_tracing_enabled
    }
}
