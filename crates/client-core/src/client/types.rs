use bluffline_session_core::{PhaseDirective, Role, SessionId, SessionState, Trigger};
use tokio::sync::oneshot;

use crate::error::ClientResult;

/// Point-in-time view of a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub state: SessionState,
    pub role: Role,
    pub name: Option<String>,
    pub peer: Option<String>,
    pub has_media: bool,
    pub directive: PhaseDirective,
}

/// Request from a [`ClientManager`](super::ClientManager) to its session task
#[derive(Debug)]
pub(crate) enum Command {
    Apply {
        trigger: Trigger,
        reply: oneshot::Sender<ClientResult<SessionState>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}
