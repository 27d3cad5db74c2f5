//! Transition definitions, grouped by concern

mod call;
mod common;
mod game;
mod playback;

use super::{MasterStateTable, StateTableBuilder};

/// Build the complete participant state table
pub fn build_master_table() -> MasterStateTable {
    let mut builder = StateTableBuilder::new();
    call::add_call_transitions(&mut builder);
    game::add_game_transitions(&mut builder);
    playback::add_playback_transitions(&mut builder);
    common::add_common_transitions(&mut builder);
    builder.build()
}
