//! The participant state table
//!
//! Every legal `(state, event)` pair maps to a [`Transition`]: guards to
//! check, actions to run in order, and an optional next state. Pairs with
//! no exact entry fall back to a wildcard for the event (teardown, busy
//! rejection, ICE, hints). Anything else is not allowed from that state.

pub mod builder;
pub mod tables;
pub mod types;

pub use builder::StateTableBuilder;
pub use types::*;

use lazy_static::lazy_static;
use std::sync::Arc;

lazy_static! {
    /// The master state table - single source of truth for all transitions
    pub static ref MASTER_TABLE: Arc<MasterStateTable> = Arc::new(load_master_table());
}

fn load_master_table() -> MasterStateTable {
    let table = tables::build_master_table();
    if let Err(errors) = table.validate() {
        tracing::error!("Master state table validation failed: {:?}", errors);
    } else {
        tracing::debug!(transitions = table.transition_count(), "Master state table loaded");
    }
    table
}
