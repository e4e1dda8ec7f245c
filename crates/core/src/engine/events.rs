use std::fmt::Display;

use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

/// The kinds of events which can be scheduled on a variable or a propagator.
#[derive(Debug, EnumSetType, Hash)]
pub enum EventType {
    /// Event where an (integer) variable domain collapses to a single value.
    Assign,
    /// Event where an (integer) variable domain tightens the lower bound.
    LowerBound,
    /// Event where an (integer) variable domain tightens the upper bound.
    UpperBound,
    /// Event where an (integer) variable domain removes an inner value within the domain.
    Removal,
    /// Request to run the coarse filtering of a propagator from scratch.
    FullPropagation,
    /// Request to run the coarse filtering of a propagator for a propagator-specific reason.
    CustomPropagation,
}

/// A set of [`EventType`]s; the pending events of a watch or of a propagator.
pub type EventMask = EnumSet<EventType>;

impl EventType {
    /// The mask which only contains this event.
    pub fn mask(self) -> EventMask {
        EnumSet::only(self)
    }

    /// The mask of all events which are implied by this event; an assignment is also a tightening
    /// of both bounds, and a bound tightening also removes values.
    ///
    /// The pending masks of the engine accumulate the strengthened masks of the events they
    /// receive.
    pub fn strengthened_mask(self) -> EventMask {
        match self {
            EventType::Assign => enum_set!(
                EventType::Assign
                    | EventType::LowerBound
                    | EventType::UpperBound
                    | EventType::Removal
            ),
            EventType::LowerBound => enum_set!(EventType::LowerBound | EventType::Removal),
            EventType::UpperBound => enum_set!(EventType::UpperBound | EventType::Removal),
            EventType::Removal => enum_set!(EventType::Removal),
            EventType::FullPropagation => enum_set!(EventType::FullPropagation),
            EventType::CustomPropagation => enum_set!(EventType::CustomPropagation),
        }
    }
}

impl Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Assign => write!(f, "[Event:Assign]"),
            EventType::LowerBound => write!(f, "[Event:LB]"),
            EventType::UpperBound => write!(f, "[Event:UB]"),
            EventType::Removal => write!(f, "[Event:Remove]"),
            EventType::FullPropagation => write!(f, "[Event:Full]"),
            EventType::CustomPropagation => write!(f, "[Event:Custom]"),
        }
    }
}
