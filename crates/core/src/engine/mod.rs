//! The activity-based propagation engine and the interfaces it expects from the domain layer and
//! from propagators.
mod activity;
mod activity_based_engine;
mod engine_statistics;
mod errors;
mod events;
mod propagation;
mod propagator_queue;
mod variable_queue;
mod variables;

pub use activity::ActivityEngineOptions;
pub use activity::ActivityMetric;
pub use activity_based_engine::ActivityBasedEngine;
pub use engine_statistics::EngineStatistics;
pub use errors::EngineError;
pub use events::EventMask;
pub use events::EventType;
pub use propagation::*;
pub(crate) use variables::VariableIndex;
pub use variables::VariableId;
pub use variables::VariableStore;
pub use variables::VariableUpdateListener;
pub use variables::Watcher;
