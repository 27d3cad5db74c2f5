//! Media negotiation adapter contract
//!
//! The session never touches codecs or transports. It asks a
//! [`MediaEngine`] for a [`MediaHandle`], gets an SDP offer from it, applies
//! the remote answer and candidates, and disposes it on every teardown path.
//! A session holds at most one live handle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bluffline_protocol_core::IceCandidate;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Direction of the media a handle negotiates
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum MediaMode {
    /// Live two-way call
    SendRecv,
    /// Playback of a recorded session
    RecvOnly,
}

/// Factory for media handles
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Acquire a fresh handle for one offer/answer exchange
    async fn acquire(&self, mode: MediaMode) -> MediaResult<Box<dyn MediaHandle>>;
}

/// One negotiation with the coordinator's media server
#[async_trait]
pub trait MediaHandle: Send + Sync {
    /// The mode this handle was acquired with
    fn mode(&self) -> MediaMode;

    /// Generate the local SDP offer
    async fn create_offer(&mut self) -> MediaResult<String>;

    /// Apply the remote SDP answer
    async fn apply_answer(&mut self, answer: &str) -> MediaResult<()>;

    /// Add a candidate trickled by the remote side
    async fn add_remote_candidate(&mut self, candidate: &IceCandidate) -> MediaResult<()>;

    /// Release all resources; calling it again is a no-op
    async fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

/// Something a [`MockMediaEngine`] was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    Acquired { handle: u64, mode: MediaMode },
    OfferCreated { handle: u64 },
    AnswerApplied { handle: u64, answer: String },
    CandidateAdded { handle: u64, candidate: String },
    Disposed { handle: u64 },
}

#[derive(Default)]
struct MockShared {
    next_handle: AtomicU64,
    events: Mutex<Vec<MediaEvent>>,
}

/// In-memory media engine that records every call
///
/// Offers are deterministic (`mock-offer-<n>`), so two engines driven the
/// same way produce identical sessions.
#[derive(Clone, Default)]
pub struct MockMediaEngine {
    shared: Arc<MockShared>,
    fail_acquire: bool,
    fail_offer: bool,
    fail_answer: bool,
}

impl MockMediaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `acquire` fails
    pub fn with_acquire_failure(mut self) -> Self {
        self.fail_acquire = true;
        self
    }

    /// Every `create_offer` fails
    pub fn with_offer_failure(mut self) -> Self {
        self.fail_offer = true;
        self
    }

    /// Every `apply_answer` fails
    pub fn with_answer_failure(mut self) -> Self {
        self.fail_answer = true;
        self
    }

    /// Everything recorded so far
    pub async fn events(&self) -> Vec<MediaEvent> {
        self.shared.events.lock().await.clone()
    }

    /// Handles acquired and not yet disposed
    pub async fn live_handles(&self) -> usize {
        let events = self.shared.events.lock().await;
        let acquired = events.iter().filter(|e| matches!(e, MediaEvent::Acquired { .. })).count();
        let disposed = events.iter().filter(|e| matches!(e, MediaEvent::Disposed { .. })).count();
        acquired - disposed
    }

    /// Number of handles disposed so far
    pub async fn disposed_count(&self) -> usize {
        self.shared
            .events
            .lock()
            .await
            .iter()
            .filter(|e| matches!(e, MediaEvent::Disposed { .. }))
            .count()
    }
}

#[async_trait]
impl MediaEngine for MockMediaEngine {
    async fn acquire(&self, mode: MediaMode) -> MediaResult<Box<dyn MediaHandle>> {
        if self.fail_acquire {
            return Err(MediaError::AcquireFailed("mock acquire failure".to_string()));
        }
        let id = self.shared.next_handle.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared
            .events
            .lock()
            .await
            .push(MediaEvent::Acquired { handle: id, mode });
        debug!(handle = id, ?mode, "Mock media handle acquired");
        Ok(Box::new(MockMediaHandle {
            id,
            mode,
            disposed: false,
            fail_offer: self.fail_offer,
            fail_answer: self.fail_answer,
            shared: self.shared.clone(),
        }))
    }
}

struct MockMediaHandle {
    id: u64,
    mode: MediaMode,
    disposed: bool,
    fail_offer: bool,
    fail_answer: bool,
    shared: Arc<MockShared>,
}

impl MockMediaHandle {
    async fn record(&self, event: MediaEvent) {
        self.shared.events.lock().await.push(event);
    }
}

#[async_trait]
impl MediaHandle for MockMediaHandle {
    fn mode(&self) -> MediaMode {
        self.mode
    }

    async fn create_offer(&mut self) -> MediaResult<String> {
        if self.disposed {
            return Err(MediaError::Disposed);
        }
        if self.fail_offer {
            return Err(MediaError::OfferFailed("mock offer failure".to_string()));
        }
        self.record(MediaEvent::OfferCreated { handle: self.id }).await;
        Ok(format!("mock-offer-{}", self.id))
    }

    async fn apply_answer(&mut self, answer: &str) -> MediaResult<()> {
        if self.disposed {
            return Err(MediaError::Disposed);
        }
        if self.fail_answer {
            return Err(MediaError::AnswerFailed("mock answer failure".to_string()));
        }
        self.record(MediaEvent::AnswerApplied {
            handle: self.id,
            answer: answer.to_string(),
        })
        .await;
        Ok(())
    }

    async fn add_remote_candidate(&mut self, candidate: &IceCandidate) -> MediaResult<()> {
        if self.disposed {
            return Err(MediaError::Disposed);
        }
        self.record(MediaEvent::CandidateAdded {
            handle: self.id,
            candidate: candidate.candidate.clone(),
        })
        .await;
        Ok(())
    }

    async fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.record(MediaEvent::Disposed { handle: self.id }).await;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}
