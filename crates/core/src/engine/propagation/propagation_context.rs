use crate::basic_types::Cause;
use crate::basic_types::Contradiction;
use crate::engine::EventType;
use crate::engine::PropagatorId;
use crate::engine::VariableId;
use crate::engine::VariableUpdateListener;

/// Collects the domain events raised during a single propagator execution; the engine processes
/// them once the propagator returns.
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: Vec<(VariableId, EventType, Cause)>,
}

impl EventBuffer {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Moves the buffered events out, leaving the buffer empty.
    pub(crate) fn take(&mut self) -> Vec<(VariableId, EventType, Cause)> {
        std::mem::take(&mut self.events)
    }

    /// Gives a drained allocation back to the buffer.
    pub(crate) fn restore(&mut self, mut events: Vec<(VariableId, EventType, Cause)>) {
        events.clear();
        if self.events.is_empty() {
            self.events = events;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }
}

impl VariableUpdateListener for EventBuffer {
    fn on_variable_update(&mut self, variable: VariableId, event: EventType, cause: Cause) {
        self.events.push((variable, event, cause));
    }
}

/// The view of a propagator on the domains during one of its executions.
#[derive(Debug)]
pub struct PropagationContext<'a, Domains> {
    domains: &'a mut Domains,
    events: &'a mut EventBuffer,
    propagator: PropagatorId,
}

impl<'a, Domains> PropagationContext<'a, Domains> {
    pub(crate) fn new(
        domains: &'a mut Domains,
        events: &'a mut EventBuffer,
        propagator: PropagatorId,
    ) -> Self {
        PropagationContext {
            domains,
            events,
            propagator,
        }
    }

    pub fn domains(&self) -> &Domains {
        self.domains
    }

    /// The domains together with the listener which has to be told about every change.
    pub fn split(&mut self) -> (&mut Domains, &mut EventBuffer) {
        (self.domains, self.events)
    }

    /// The cause to attach to changes made by the executing propagator.
    pub fn cause(&self) -> Cause {
        Cause::Propagator(self.propagator)
    }

    /// Creates the contradiction to return when the propagator detects a failure.
    pub fn fails(&self, variable: Option<VariableId>, message: impl Into<String>) -> Contradiction {
        Contradiction::new(self.cause(), variable, message)
    }
}
