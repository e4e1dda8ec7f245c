use thiserror::Error;

use crate::engine::PropagatorId;
use crate::engine::VariableId;

/// Errors reported by the engine when it is addressed with identifiers it does not know.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{0} is not a variable of the engine")]
    UnknownVariable(VariableId),
    #[error("{0} is not a propagator of the engine")]
    UnknownPropagator(PropagatorId),
}
