//! Collaborators of the backjump strategies for testing.
use crate::engine::VariableId;
use crate::explanations::BacktrackStore;
use crate::explanations::Decision;
use crate::explanations::DecisionChain;
use crate::explanations::Deduction;
use crate::explanations::ForcedDecisionPath;
use crate::explanations::SearchDriver;

/// A decision `x_depth = 0` which records how it was manipulated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TestDecision {
    pub(crate) depth: usize,
    pub(crate) on_right_branch: bool,
    pub(crate) is_reversed: bool,
    pub(crate) num_rewinds: usize,
}

impl TestDecision {
    pub(crate) fn variable(&self) -> VariableId {
        VariableId(self.depth as u32)
    }
}

impl Decision for TestDecision {
    fn has_next(&self) -> bool {
        !self.on_right_branch
    }

    fn reverse(&mut self) {
        self.is_reversed = !self.is_reversed;
    }

    fn rewind(&mut self) {
        self.on_right_branch = false;
        self.num_rewinds += 1;
    }

    fn positive_deduction(&self) -> Deduction {
        Deduction::left_branch(self.depth, self.variable(), 0)
    }

    fn negative_deduction(&self) -> Deduction {
        Deduction::right_branch(self.depth, self.variable(), 0)
    }
}

#[derive(Debug, Default)]
pub(crate) struct TestStore {
    pub(crate) depth: usize,
    pub(crate) unwound_to: Vec<usize>,
}

impl BacktrackStore for TestStore {
    fn current_depth(&self) -> usize {
        self.depth
    }

    fn unwind_to_depth(&mut self, depth: usize) {
        self.depth = depth;
        self.unwound_to.push(depth);
    }
}

#[derive(Debug, Default)]
pub(crate) struct TestDriver {
    pub(crate) chain: DecisionChain<TestDecision>,
    pub(crate) installed: Option<ForcedDecisionPath<TestDecision>>,
}

impl SearchDriver for TestDriver {
    type Decision = TestDecision;

    fn decision_chain(&mut self) -> &mut DecisionChain<TestDecision> {
        &mut self.chain
    }

    fn install_decision_path(&mut self, path: ForcedDecisionPath<TestDecision>) {
        self.installed = Some(path);
    }
}

/// A search at the depth of `branches`, where the decision at depth `d` is on its right branch
/// if `branches[d - 1]` is true.
pub(crate) fn search_state(branches: &[bool]) -> (TestStore, TestDriver) {
    let chain = branches
        .iter()
        .enumerate()
        .map(|(index, &on_right_branch)| TestDecision {
            depth: index + 1,
            on_right_branch,
            is_reversed: false,
            num_rewinds: 0,
        })
        .collect();

    let store = TestStore {
        depth: branches.len(),
        unwound_to: vec![],
    };
    let driver = TestDriver {
        chain,
        installed: None,
    };
    (store, driver)
}

pub(crate) fn left(depth: usize) -> Deduction {
    Deduction::left_branch(depth, VariableId(depth as u32), 0)
}

pub(crate) fn right(depth: usize) -> Deduction {
    Deduction::right_branch(depth, VariableId(depth as u32), 0)
}
