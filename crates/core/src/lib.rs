//! # Propel
//! The core of a constraint propagation engine whose scheduling is driven by the activity of
//! variables, together with explanation-based backjumping strategies for the search on top of
//! it.
//!
//! The crate does not define variables, domains, constraints or a search loop. These are provided
//! by the user through the interfaces in [`engine`] (domains and propagators) and
//! [`explanations`] (decisions, the backtrack store and the search driver).
//!
//! # Propagation
//! The [`engine::ActivityBasedEngine`] runs propagators until a fixpoint is reached or a
//! [`Contradiction`] is found. Variables whose domains changed are served in order of their
//! activity, which reflects how often the propagation on a variable caused other variables to be
//! scheduled.
//!
//! # Backjumping
//! After a contradiction, a [`explanations::BackjumpStrategy`] uses the explanation of the
//! failure to decide which decision to refute. [`explanations::ConflictBasedBackjumping`]
//! discards the decisions made after it, whereas [`explanations::PathRepair`] keeps them as a
//! path of decisions to replay after the refutation.
#[doc(hidden)]
pub mod asserts;
pub(crate) mod basic_types;
pub mod containers;
pub mod engine;
pub mod explanations;
pub mod statistics;

pub use convert_case;
pub use rand;

pub use crate::basic_types::Cause;
pub use crate::basic_types::Contradiction;
pub use crate::basic_types::PropagationStatus;
pub use crate::basic_types::Random;
