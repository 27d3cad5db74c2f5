use super::types::{EventType, MasterStateTable, StateKey, Transition};
use crate::state::SessionState;

/// Incrementally assembles a [`MasterStateTable`]
#[derive(Default)]
pub struct StateTableBuilder {
    table: MasterStateTable,
}

impl StateTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transition for one state
    pub fn add_transition(&mut self, state: SessionState, event: EventType, transition: Transition) -> &mut Self {
        self.table.insert(StateKey { state, event }, transition);
        self
    }

    /// Add the same transition for several states
    pub fn add_transitions(
        &mut self,
        states: &[SessionState],
        event: EventType,
        transition: Transition,
    ) -> &mut Self {
        for state in states {
            self.add_transition(*state, event, transition.clone());
        }
        self
    }

    /// Add a transition used by every state without an exact entry
    pub fn add_wildcard(&mut self, event: EventType, transition: Transition) -> &mut Self {
        self.table.insert_wildcard(event, transition);
        self
    }

    pub fn build(self) -> MasterStateTable {
        self.table
    }
}
