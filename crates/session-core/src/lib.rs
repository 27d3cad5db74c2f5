//! State table driven participant sessions
//!
//! A participant registers with the coordination point, calls or is called
//! by a peer, and is then walked through a scripted interrogation game:
//! video confirmation, role assignment, image review, two questioning
//! rounds with a decision after each, and a post-game survey. Recorded
//! sessions can be played back.
//!
//! # Architecture
//!
//! ```text
//!   user action / coordinator message
//!                 │
//!                 ▼
//!   ┌───────────────────────────┐      ┌──────────────┐
//!   │ Session (one per user)    │─────▶│ MASTER_TABLE │  (state, event) -> Transition
//!   │  state, role, peer, media │      └──────────────┘
//!   └───────────────────────────┘
//!        │ actions            │ after the transition
//!        ▼                    ▼
//!   MediaEngine/Handle    policy::directive(state, role)
//!        │
//!        ▼
//!   Outcome { messages, notifications, anomalies }
//! ```
//!
//! - [`state_table`] holds the transitions; it knows nothing about roles
//!   beyond the decision guard.
//! - [`policy`] maps `(state, role)` to what the user should do.
//! - [`stop`] picks the stop message from the current state.
//! - [`media`] is the contract for the external media stack.
//!
//! Sessions perform no I/O; `bluffline-client-core` drives them from a
//! task and moves messages over a transport.

pub mod error;
pub mod media;
pub mod outcome;
pub mod policy;
pub mod session;
pub mod state;
pub mod state_table;
pub mod stop;

pub use error::{MediaError, MediaResult, SessionError, SessionResult};
pub use media::{MediaEngine, MediaEvent, MediaHandle, MediaMode, MockMediaEngine};
pub use outcome::{Anomaly, AnomalyKind, Notification, Outcome};
pub use policy::{DecisionRound, PhaseDirective, RequiredAction};
pub use session::{Session, Trigger};
pub use state::{Role, SessionId, SessionState};
pub use stop::{StopKind, StopMapping};

/// Re-export of common types
pub mod prelude {
    pub use crate::error::*;
    pub use crate::media::*;
    pub use crate::outcome::*;
    pub use crate::policy::{DecisionRound, PhaseDirective, RequiredAction};
    pub use crate::session::*;
    pub use crate::state::*;
    pub use crate::stop::*;
}
