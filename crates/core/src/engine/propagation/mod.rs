mod propagation_context;
mod propagator;
mod propagator_id;
mod propagator_store;

pub use propagation_context::*;
pub use propagator::*;
pub use propagator_id::PropagatorId;
pub(crate) use propagator_id::PropagatorIndex;
pub(crate) use propagator_store::PropagatorStore;
