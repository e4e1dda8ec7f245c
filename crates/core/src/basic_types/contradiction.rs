use std::fmt::Display;

use thiserror::Error;

use crate::engine::PropagatorId;
use crate::engine::VariableId;

/// The agent responsible for a domain change or a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cause {
    /// A branching decision taken by the search.
    Decision,
    /// A propagator of the constraint layer.
    Propagator(PropagatorId),
    /// The manager which maintains the bound on the objective during optimisation.
    ObjectiveManager,
    /// No specific agent, e.g. a change made while setting up the problem.
    Null,
}

impl Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cause::Decision => write!(f, "decision"),
            Cause::Propagator(propagator) => write!(f, "{propagator}"),
            Cause::ObjectiveManager => write!(f, "objective manager"),
            Cause::Null => write!(f, "null"),
        }
    }
}

/// A failure detected while filtering: a domain became empty or a propagator found the current
/// state to be inconsistent.
///
/// A contradiction is expected during search; it unwinds the fixpoint loop of the
/// [`ActivityBasedEngine`](crate::engine::ActivityBasedEngine) and is handed to the search, which
/// decides how to backtrack.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("contradiction raised by {cause}{}: {message}", on_variable(.variable))]
pub struct Contradiction {
    /// The agent which raised the contradiction.
    pub cause: Cause,
    /// The variable whose domain became inconsistent, if any.
    pub variable: Option<VariableId>,
    /// A diagnostic message.
    pub message: String,
}

impl Contradiction {
    pub fn new(cause: Cause, variable: Option<VariableId>, message: impl Into<String>) -> Self {
        Contradiction {
            cause,
            variable,
            message: message.into(),
        }
    }
}

fn on_variable(variable: &Option<VariableId>) -> String {
    variable
        .map(|variable| format!(" on {variable}"))
        .unwrap_or_default()
}

/// The result of invoking a propagator or of running propagation to a fixpoint.
pub type PropagationStatus = Result<(), Contradiction>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contradiction_message_names_cause_and_variable() {
        let contradiction = Contradiction::new(
            Cause::Propagator(PropagatorId(3)),
            Some(VariableId(7)),
            "empty domain",
        );

        assert_eq!(
            "contradiction raised by PropagatorId(3) on VariableId(7): empty domain",
            contradiction.to_string()
        );
    }

    #[test]
    fn contradiction_without_variable() {
        let contradiction = Contradiction::new(Cause::Decision, None, "refuted");

        assert_eq!(
            "contradiction raised by decision: refuted",
            contradiction.to_string()
        );
    }
}
