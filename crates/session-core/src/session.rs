//! The participant session
//!
//! A [`Session`] owns one participant's state, role, peer and media handle.
//! Every operation looks up a transition in the state table, checks its
//! guards, runs its actions in order and then moves to the next state.
//! Nothing here waits on the network: outbound messages are returned in the
//! [`Outcome`] for the caller to send.
//!
//! # Example
//!
//! ```
//! # use std::sync::Arc;
//! # use bluffline_session_core::prelude::*;
//! # use bluffline_protocol_core::{ResponseStatus, ServerMessage};
//! # tokio_test::block_on(async {
//! let mut session = Session::new(Arc::new(MockMediaEngine::new()));
//!
//! let outcome = session.register("alice").await.unwrap();
//! assert!(outcome.sent("register"));
//! assert_eq!(session.state(), SessionState::Registering);
//!
//! session
//!     .handle_message(ServerMessage::RegisterResponse {
//!         response: ResponseStatus::Accepted,
//!         message: None,
//!     }.into())
//!     .await
//!     .unwrap();
//! assert_eq!(session.state(), SessionState::Registered);
//! # });
//! ```

use std::fmt;
use std::sync::Arc;

use bluffline_protocol_core::{
    CallResponse, ClientMessage, Decision, IceCandidate, InboundMessage, ServerMessage,
};
use tracing::{debug, error, info, warn};

use crate::error::{MediaError, MediaResult, SessionError, SessionResult};
use crate::media::{MediaEngine, MediaHandle};
use crate::outcome::{Anomaly, AnomalyKind, Notification, Outcome};
use crate::policy::{self, DecisionRound, PhaseDirective};
use crate::state::{Role, SessionId, SessionState};
use crate::state_table::{Action, EventType, Guard, MasterStateTable, MASTER_TABLE};
use crate::stop::StopKind;

const DEFAULT_REGISTER_REJECTION: &str = "Unknown reason for register rejection.";
const DECLINE_MESSAGE: &str = "user declined";

/// Input to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Register { name: String },
    Call { peer: String },
    Play { target: String },
    AcceptCall,
    DeclineCall,
    ConfirmVideo,
    StartGame,
    SubmitDecision(Decision),
    Stop,
    /// Candidate gathered by the local media stack
    LocalCandidate(IceCandidate),
    /// Message from the coordinator
    Message(ServerMessage),
}

impl Trigger {
    /// State table event for this input
    pub fn event_type(&self) -> EventType {
        match self {
            Trigger::Register { .. } => EventType::Register,
            Trigger::Call { .. } => EventType::Call,
            Trigger::Play { .. } => EventType::Play,
            Trigger::AcceptCall => EventType::AcceptCall,
            Trigger::DeclineCall => EventType::DeclineCall,
            Trigger::ConfirmVideo => EventType::ConfirmVideo,
            Trigger::StartGame => EventType::StartGame,
            Trigger::SubmitDecision(_) => EventType::SubmitDecision,
            Trigger::Stop => EventType::UserStop,
            Trigger::LocalCandidate(_) => EventType::LocalIceCandidate,
            Trigger::Message(message) => message_event(message),
        }
    }

    fn label(&self) -> String {
        match self {
            Trigger::Message(message) => message.id().to_string(),
            other => other.event_type().to_string(),
        }
    }
}

fn message_event(message: &ServerMessage) -> EventType {
    match message {
        ServerMessage::RegisterResponse { response, .. } if response.is_accepted() => {
            EventType::RegisterAccepted
        }
        ServerMessage::RegisterResponse { .. } => EventType::RegisterRejected,
        ServerMessage::CallResponse { response, .. } if response.is_accepted() => EventType::CallAccepted,
        ServerMessage::CallResponse { .. } => EventType::CallRejected,
        ServerMessage::IncomingCall { .. } => EventType::IncomingCall,
        ServerMessage::StartCommunication { .. } => EventType::StartCommunication,
        ServerMessage::StopCommunication => EventType::StopCommunication,
        ServerMessage::PlayResponse { response, .. } if response.is_accepted() => EventType::PlayAccepted,
        ServerMessage::PlayResponse { .. } => EventType::PlayRejected,
        ServerMessage::PlayEnd => EventType::PlayEnd,
        ServerMessage::RoleAssignment { .. } => EventType::RoleAssignment,
        ServerMessage::StartReviewingImage { .. } => EventType::StartReviewingImage,
        ServerMessage::StartFirstInterrogation => EventType::StartFirstInterrogation,
        ServerMessage::GetFirstDecision => EventType::GetFirstDecision,
        ServerMessage::Hint { .. } => EventType::Hint,
        ServerMessage::StartSecondInterrogation => EventType::StartSecondInterrogation,
        ServerMessage::GetSecondDecision => EventType::GetSecondDecision,
        ServerMessage::StartPostGame => EventType::StartPostGame,
        ServerMessage::IceCandidate { .. } => EventType::RemoteIceCandidate,
    }
}

/// One participant's session with the coordinator
pub struct Session {
    id: SessionId,
    state: SessionState,
    role: Role,
    name: Option<String>,
    peer: Option<String>,
    media: Option<Box<dyn MediaHandle>>,
    engine: Arc<dyn MediaEngine>,
    table: Arc<MasterStateTable>,
    /// Idle state to fall back to when negotiation fails
    idle_state: SessionState,
    /// The interrogator already answered the current decision prompt
    decision_sent: bool,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("role", &self.role)
            .field("name", &self.name)
            .field("peer", &self.peer)
            .field("has_media", &self.has_media())
            .finish()
    }
}

impl Session {
    /// Create an unregistered session using the master state table
    pub fn new(engine: Arc<dyn MediaEngine>) -> Self {
        Self::with_table(engine, MASTER_TABLE.clone())
    }

    /// Create a session driven by a custom state table
    pub fn with_table(engine: Arc<dyn MediaEngine>, table: Arc<MasterStateTable>) -> Self {
        Self {
            id: SessionId::new(),
            state: SessionState::NotRegistered,
            role: Role::None,
            name: None,
            peer: None,
            media: None,
            engine,
            table,
            idle_state: SessionState::Registered,
            decision_sent: false,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Name this participant registered with
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Counterparty of the current call or playback
    pub fn peer(&self) -> Option<&str> {
        self.peer.as_deref()
    }

    /// Whether a live media handle is held
    pub fn has_media(&self) -> bool {
        self.media.as_ref().map(|m| !m.is_disposed()).unwrap_or(false)
    }

    /// What the user should be doing in the current state
    pub fn directive(&self) -> PhaseDirective {
        policy::directive(self.state, self.role)
    }

    pub async fn register(&mut self, name: impl Into<String>) -> SessionResult<Outcome> {
        self.process(Trigger::Register { name: name.into() }).await
    }

    pub async fn call(&mut self, peer: impl Into<String>) -> SessionResult<Outcome> {
        self.process(Trigger::Call { peer: peer.into() }).await
    }

    /// Request playback of a recorded session
    pub async fn play(&mut self, target: impl Into<String>) -> SessionResult<Outcome> {
        self.process(Trigger::Play { target: target.into() }).await
    }

    pub async fn accept_call(&mut self) -> SessionResult<Outcome> {
        self.process(Trigger::AcceptCall).await
    }

    pub async fn decline_call(&mut self) -> SessionResult<Outcome> {
        self.process(Trigger::DeclineCall).await
    }

    pub async fn confirm_video(&mut self) -> SessionResult<Outcome> {
        self.process(Trigger::ConfirmVideo).await
    }

    pub async fn start_game(&mut self) -> SessionResult<Outcome> {
        self.process(Trigger::StartGame).await
    }

    pub async fn submit_decision(&mut self, decision: Decision) -> SessionResult<Outcome> {
        self.process(Trigger::SubmitDecision(decision)).await
    }

    /// End whatever is active; the media handle is disposed before this returns
    pub async fn stop(&mut self) -> SessionResult<Outcome> {
        self.process(Trigger::Stop).await
    }

    pub async fn local_candidate(&mut self, candidate: IceCandidate) -> SessionResult<Outcome> {
        self.process(Trigger::LocalCandidate(candidate)).await
    }

    /// Apply a decoded coordinator message
    ///
    /// Unrecognized ids and messages with no transition from the current
    /// state are reported as anomalies and leave the session untouched.
    pub async fn handle_message(&mut self, message: InboundMessage) -> SessionResult<Outcome> {
        match message {
            InboundMessage::Known(message) => self.process(Trigger::Message(message)).await,
            InboundMessage::Unrecognized { id, .. } => {
                let mut outcome = Outcome::new(self.state);
                self.report(&mut outcome, AnomalyKind::UnrecognizedMessage, format!("unknown message id '{}'", id));
                Ok(outcome)
            }
        }
    }

    /// Run one trigger through the state table
    pub async fn process(&mut self, trigger: Trigger) -> SessionResult<Outcome> {
        let event = trigger.event_type();
        let table = Arc::clone(&self.table);
        let mut outcome = Outcome::new(self.state);

        debug!(session = %self.id, state = %self.state, event = ?event, "Processing event");

        let Some(transition) = table.get(self.state, event) else {
            if event.is_user_action() {
                debug!(state = %self.state, event = ?event, "No transition for user action");
                return Err(SessionError::InvalidState {
                    operation: event.operation(),
                    state: self.state,
                });
            }
            let detail = format!("'{}' has no transition", trigger.label());
            self.report(&mut outcome, AnomalyKind::UnexpectedMessage, detail);
            return Ok(outcome);
        };

        for guard in &transition.guards {
            self.check_guard(*guard, &trigger)?;
        }

        let mut offer = None;
        for action in &transition.actions {
            if let Err(err) = self.execute_action(*action, &trigger, &mut offer, &mut outcome).await {
                // Past the answer stage the coordinator holds the call open
                let committed = matches!(action, Action::ApplyRemoteAnswer);
                return Err(self.abandon_negotiation(err, committed).await);
            }
        }

        if let Some(next) = transition.next_state {
            self.state = next;
            outcome.state = next;
            if next.is_idle() {
                self.idle_state = next;
            }
            if outcome.state_changed() {
                info!(session = %self.id, from = %outcome.previous, to = %next, "State changed");
                outcome
                    .notifications
                    .push(Notification::Directive(policy::directive(next, self.role)));
            }
        }

        Ok(outcome)
    }

    fn check_guard(&self, guard: Guard, trigger: &Trigger) -> SessionResult<()> {
        let passed = match (guard, trigger) {
            (Guard::NameNotEmpty, Trigger::Register { name }) => !name.trim().is_empty(),
            (Guard::PeerNotEmpty, Trigger::Call { peer }) => !peer.trim().is_empty(),
            (Guard::PeerNotEmpty, Trigger::Play { target }) => !target.trim().is_empty(),
            (Guard::IsInterrogator, _) => policy::may_decide(self.role),
            (Guard::DecisionPending, _) => !self.decision_sent,
            _ => true,
        };
        if passed {
            return Ok(());
        }

        debug!(guard = ?guard, state = %self.state, "Guard rejected input");
        Err(match guard {
            Guard::NameNotEmpty => SessionError::EmptyName,
            Guard::PeerNotEmpty => SessionError::EmptyPeer,
            Guard::IsInterrogator => SessionError::NotInterrogator,
            Guard::DecisionPending => SessionError::InvalidState {
                operation: trigger.event_type().operation(),
                state: self.state,
            },
        })
    }

    async fn execute_action(
        &mut self,
        action: Action,
        trigger: &Trigger,
        offer: &mut Option<String>,
        outcome: &mut Outcome,
    ) -> MediaResult<()> {
        debug!("Executing action: {:?}", action);

        match action {
            Action::RememberName => {
                if let Trigger::Register { name } = trigger {
                    self.name = Some(name.trim().to_string());
                }
            }
            Action::RememberPeer => {
                let peer = match trigger {
                    Trigger::Call { peer } => Some(peer),
                    Trigger::Play { target } => Some(target),
                    Trigger::Message(ServerMessage::IncomingCall { from }) => Some(from),
                    _ => None,
                };
                if let Some(peer) = peer {
                    self.peer = Some(peer.trim().to_string());
                }
            }
            Action::StartNegotiation(mode) => {
                self.dispose_media().await;
                let mut handle = self.engine.acquire(mode).await?;
                match handle.create_offer().await {
                    Ok(sdp) => {
                        debug!(?mode, bytes = sdp.len(), "Created local offer");
                        *offer = Some(sdp);
                        self.media = Some(handle);
                    }
                    Err(err) => {
                        handle.dispose().await;
                        return Err(err);
                    }
                }
            }
            Action::ApplyRemoteAnswer => {
                let answer = match trigger {
                    Trigger::Message(ServerMessage::CallResponse { sdp_answer, .. })
                    | Trigger::Message(ServerMessage::PlayResponse { sdp_answer, .. }) => sdp_answer.clone(),
                    Trigger::Message(ServerMessage::StartCommunication { sdp_answer }) => Some(sdp_answer.clone()),
                    _ => None,
                };
                let answer = answer.ok_or_else(|| MediaError::AnswerFailed("missing sdpAnswer".to_string()))?;
                let handle = self
                    .media
                    .as_mut()
                    .ok_or_else(|| MediaError::AnswerFailed("no media handle".to_string()))?;
                handle.apply_answer(&answer).await?;
            }
            Action::AddRemoteCandidate => {
                if let Trigger::Message(ServerMessage::IceCandidate { candidate }) = trigger {
                    match self.media.as_mut() {
                        Some(handle) if !handle.is_disposed() => {
                            if let Err(err) = handle.add_remote_candidate(candidate).await {
                                warn!("Failed to add remote candidate: {}", err);
                            }
                        }
                        _ => debug!("Dropping remote candidate, no live media handle"),
                    }
                }
            }
            Action::DisposeMedia => self.dispose_media().await,

            Action::SendRegister => {
                outcome.messages.push(ClientMessage::Register {
                    name: self.name.clone().unwrap_or_default(),
                });
            }
            Action::SendCall => {
                outcome.messages.push(ClientMessage::Call {
                    from: self.name.clone().unwrap_or_default(),
                    to: self.peer.clone().unwrap_or_default(),
                    sdp_offer: offer.take().unwrap_or_default(),
                });
            }
            Action::SendPlay => {
                outcome.messages.push(ClientMessage::Play {
                    user: self.peer.clone().unwrap_or_default(),
                    sdp_offer: offer.take().unwrap_or_default(),
                });
            }
            Action::SendAccept => {
                outcome.messages.push(ClientMessage::IncomingCallResponse {
                    from: self.peer.clone().unwrap_or_default(),
                    call_response: CallResponse::Accept,
                    message: None,
                    sdp_offer: offer.take(),
                });
            }
            Action::SendDecline => {
                outcome.messages.push(ClientMessage::IncomingCallResponse {
                    from: self.peer.clone().unwrap_or_default(),
                    call_response: CallResponse::Reject,
                    message: Some(DECLINE_MESSAGE.to_string()),
                    sdp_offer: None,
                });
            }
            Action::SendBusyReject => {
                if let Trigger::Message(ServerMessage::IncomingCall { from }) = trigger {
                    info!(state = %self.state, caller = %from, "Rejecting incoming call: busy");
                    outcome.messages.push(ClientMessage::busy(from.clone()));
                }
            }
            Action::SendConfirmVideo => outcome.messages.push(ClientMessage::ConfirmVideo),
            Action::SendStartGame => outcome.messages.push(ClientMessage::StartGame),
            Action::SendDecision => {
                if let Trigger::SubmitDecision(decision) = trigger {
                    let decision = *decision;
                    match policy::decision_round(self.state) {
                        Some(DecisionRound::First) => outcome.messages.push(ClientMessage::FirstDecision { decision }),
                        Some(DecisionRound::Second) => outcome.messages.push(ClientMessage::SecondDecision { decision }),
                        None => warn!(state = %self.state, "No decision round in this state"),
                    }
                    self.decision_sent = true;
                }
            }
            Action::SendLocalCandidate => {
                if let Trigger::LocalCandidate(candidate) = trigger {
                    if self.has_media() {
                        outcome.messages.push(ClientMessage::OnIceCandidate {
                            candidate: candidate.clone(),
                        });
                    } else {
                        debug!("Dropping local candidate, no live media handle");
                    }
                }
            }
            Action::SendStop => {
                if self.state.is_idle() && !self.has_media() {
                    debug!(state = %self.state, "Nothing active to stop");
                } else {
                    let mapping = StopKind::for_state(self.state);
                    if mapping.unexpected {
                        error!(state = %self.state, "Stop requested from a state with no stop message");
                        self.report(outcome, AnomalyKind::UnexpectedStop, format!("falling back to {:?}", mapping.kind));
                    }
                    outcome.messages.push(mapping.kind.message());
                }
            }

            Action::AssignRole => {
                if let Trigger::Message(ServerMessage::RoleAssignment { role }) = trigger {
                    self.role = Role::from(*role);
                    info!(session = %self.id, role = %self.role, "Role assigned");
                    outcome.notifications.push(Notification::RoleAssigned { role: self.role });
                }
            }
            Action::ClearCall => {
                self.role = Role::None;
                self.peer = None;
                self.decision_sent = false;
            }

            Action::SurfaceRegistrationRejected => {
                if let Trigger::Message(ServerMessage::RegisterResponse { message, .. }) = trigger {
                    let reason = message.clone().unwrap_or_else(|| DEFAULT_REGISTER_REJECTION.to_string());
                    info!("Registration rejected: {}", reason);
                    outcome.notifications.push(Notification::RegistrationRejected { reason });
                }
            }
            Action::SurfaceIncomingCall => {
                if let Trigger::Message(ServerMessage::IncomingCall { from }) = trigger {
                    outcome.notifications.push(Notification::IncomingCall { from: from.clone() });
                }
            }
            Action::SurfaceCallRejected => {
                if let Trigger::Message(ServerMessage::CallResponse { message, .. }) = trigger {
                    info!("Call not accepted by peer: {:?}", message);
                    outcome.notifications.push(Notification::CallRejected { reason: message.clone() });
                }
            }
            Action::SurfacePlaybackRejected => {
                if let Trigger::Message(ServerMessage::PlayResponse { error, .. }) = trigger {
                    info!("Playback rejected: {:?}", error);
                    outcome.notifications.push(Notification::PlaybackRejected { error: error.clone() });
                }
            }
            Action::SurfaceImage => {
                if let Trigger::Message(ServerMessage::StartReviewingImage { src }) = trigger {
                    match src {
                        Some(src) if policy::shows_image(self.role) => {
                            outcome.notifications.push(Notification::ImageToMemorize { src: src.clone() });
                        }
                        None if policy::shows_image(self.role) => warn!("Describer received no image source"),
                        _ => {}
                    }
                }
            }
            Action::SurfaceDecisionPrompt => {
                let round = match trigger.event_type() {
                    EventType::GetFirstDecision => DecisionRound::First,
                    _ => DecisionRound::Second,
                };
                self.decision_sent = false;
                if policy::may_decide(self.role) {
                    outcome.notifications.push(Notification::DecisionRequested { round });
                }
            }
            Action::SurfaceHint => {
                if let Trigger::Message(ServerMessage::Hint { hint }) = trigger {
                    if policy::shows_hint(self.role) {
                        outcome.notifications.push(Notification::Hint { text: hint.clone() });
                    } else if self.role == Role::Describer {
                        self.report(outcome, AnomalyKind::HintForDescriber, "hint ignored".to_string());
                    } else {
                        self.report(outcome, AnomalyKind::UnexpectedMessage, "hint without a role".to_string());
                    }
                }
            }
            Action::SurfaceCallEnded => {
                if !outcome.previous.is_idle() {
                    let remote = trigger.event_type() == EventType::StopCommunication;
                    outcome.notifications.push(Notification::CallEnded { remote });
                }
            }
            Action::SurfacePlaybackEnded => outcome.notifications.push(Notification::PlaybackEnded),

            Action::ReportAnomaly(kind) => {
                let detail = format!("'{}' received", trigger.label());
                self.report(outcome, kind, detail);
            }
        }

        Ok(())
    }

    fn report(&self, outcome: &mut Outcome, kind: AnomalyKind, detail: String) {
        let anomaly = Anomaly {
            kind,
            state: self.state,
            detail,
        };
        match kind {
            AnomalyKind::UnexpectedStop => error!(session = %self.id, "Protocol anomaly: {}", anomaly),
            _ => warn!(session = %self.id, "Protocol anomaly: {}", anomaly),
        }
        outcome.anomalies.push(anomaly);
    }

    async fn dispose_media(&mut self) {
        if let Some(mut handle) = self.media.take() {
            handle.dispose().await;
            debug!(session = %self.id, "Media handle disposed");
        }
    }

    /// Drop the half-built call and fall back to the idle state it started from
    ///
    /// When the coordinator had already answered, the returned error carries
    /// the stop message that releases its side of the call.
    async fn abandon_negotiation(&mut self, err: MediaError, committed: bool) -> SessionError {
        error!(session = %self.id, state = %self.state, "Media negotiation failed: {}", err);
        let stop = committed.then(|| StopKind::after_failed_answer(self.state).message());
        self.dispose_media().await;
        self.role = Role::None;
        self.peer = None;
        self.decision_sent = false;
        self.state = self.idle_state;
        SessionError::MediaNegotiationFailed {
            reason: err.to_string(),
            stop,
        }
    }
}
