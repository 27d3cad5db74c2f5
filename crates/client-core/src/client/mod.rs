//! Participant client: builder, handle and session task

mod actor;
pub mod builder;
pub mod manager;
pub mod types;

pub use builder::ClientBuilder;
pub use manager::ClientManager;
pub use types::SessionSnapshot;
