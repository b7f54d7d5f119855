//! Client-side game session: an explicit state value with pure transitions,
//! plus an async controller that pairs those transitions with [`GameApi`] calls.
//!
//! Every network operation is split into `begin_*` (validate, mark loading,
//! build the request) and `apply_*` / [`SessionState::fail_pending`] (settle).
//! The GUI drives the two halves from different threads; [`GameSession`]
//! drives them back to back.

use std::fmt;

use shared::{
    domain::SceneId,
    protocol::{
        ActionRequest, ActionResponse, HistoricalFact, PlayerState, Scene, SceneResponse, Scoring,
    },
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::GameApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    Loading,
    SceneReady,
    AwaitingContinue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Scene,
    Action,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scene => f.write_str("scene"),
            Self::Action => f.write_str("action"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterReply {
    pub speaker: String,
    pub text: String,
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PendingRequest {
    Scene {
        scene_id: SceneId,
        /// Phase to fall back to if the fetch fails.
        resume: SessionPhase,
        /// Reply taken by `begin_continue`, handed back on failure.
        restore_reply: Option<CharacterReply>,
    },
    Action {
        request: ActionRequest,
    },
}

impl PendingRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Scene { .. } => RequestKind::Scene,
            Self::Action { .. } => RequestKind::Action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFailure {
    pub kind: RequestKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("the session has already started")]
    AlreadyStarted,
    #[error("scene id must not be empty")]
    EmptySceneId,
    #[error("a {0} request is already in flight")]
    RequestInFlight(RequestKind),
    #[error("no scene is loaded")]
    NoScene,
    #[error("choice {index} is out of range ({available} options)")]
    ChoiceOutOfRange { index: usize, available: usize },
    #[error("the companion's reply must be continued past before choosing again")]
    ReplyPending,
    #[error("there is no companion reply to continue from")]
    NothingToContinue,
    #[error("no {0} request is pending")]
    NoPendingRequest(RequestKind),
    #[error("{kind} request failed: {message}")]
    Request { kind: RequestKind, message: String },
}

#[derive(Debug, Clone)]
pub struct SessionState {
    companion_name: String,
    phase: SessionPhase,
    scene: Option<Scene>,
    choices: Vec<String>,
    scene_image: Option<String>,
    facts: Vec<HistoricalFact>,
    player: Option<PlayerState>,
    reply: Option<CharacterReply>,
    scoring: Option<Scoring>,
    next_scene: Option<SceneId>,
    pending: Option<PendingRequest>,
    last_error: Option<SessionFailure>,
}

impl SessionState {
    pub fn new(companion_name: impl Into<String>) -> Self {
        Self {
            companion_name: companion_name.into(),
            phase: SessionPhase::NotStarted,
            scene: None,
            choices: Vec::new(),
            scene_image: None,
            facts: Vec::new(),
            player: None,
            reply: None,
            scoring: None,
            next_scene: None,
            pending: None,
            last_error: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn has_started(&self) -> bool {
        self.phase != SessionPhase::NotStarted
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn companion_name(&self) -> &str {
        &self.companion_name
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Choices the player may act on right now; empty while a reply is shown.
    pub fn actionable_choices(&self) -> &[String] {
        if self.phase == SessionPhase::SceneReady && self.reply.is_none() {
            &self.choices
        } else {
            &[]
        }
    }

    pub fn scene_image(&self) -> Option<&str> {
        self.scene_image.as_deref()
    }

    pub fn facts(&self) -> &[HistoricalFact] {
        &self.facts
    }

    pub fn player(&self) -> Option<&PlayerState> {
        self.player.as_ref()
    }

    pub fn reply(&self) -> Option<&CharacterReply> {
        self.reply.as_ref()
    }

    pub fn scoring(&self) -> Option<&Scoring> {
        self.scoring.as_ref()
    }

    pub fn next_scene(&self) -> Option<&SceneId> {
        self.next_scene.as_ref()
    }

    pub fn pending(&self) -> Option<&PendingRequest> {
        self.pending.as_ref()
    }

    pub fn shows_continue(&self) -> bool {
        self.phase == SessionPhase::AwaitingContinue && self.reply.is_some()
    }

    pub fn last_error(&self) -> Option<&SessionFailure> {
        self.last_error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        match &self.pending {
            Some(pending) => Err(SessionError::RequestInFlight(pending.kind())),
            None => Ok(()),
        }
    }

    pub fn begin_start(&mut self, entry_scene: &SceneId) -> Result<SceneId, SessionError> {
        if self.has_started() {
            return Err(SessionError::AlreadyStarted);
        }
        self.begin_scene_fetch(entry_scene)
    }

    pub fn begin_scene_fetch(&mut self, scene_id: &SceneId) -> Result<SceneId, SessionError> {
        if scene_id.is_blank() {
            return Err(SessionError::EmptySceneId);
        }
        self.ensure_idle()?;
        self.pending = Some(PendingRequest::Scene {
            scene_id: scene_id.clone(),
            resume: self.phase,
            restore_reply: None,
        });
        self.phase = SessionPhase::Loading;
        debug!(scene_id = %scene_id, "scene fetch started");
        Ok(scene_id.clone())
    }

    pub fn apply_scene(&mut self, response: SceneResponse) -> Result<(), SessionError> {
        match self.pending.take() {
            Some(PendingRequest::Scene { .. }) => {}
            other => {
                self.pending = other;
                return Err(SessionError::NoPendingRequest(RequestKind::Scene));
            }
        }

        let SceneResponse {
            scene,
            choices,
            image_url,
            historical_context,
            player_state,
        } = response;

        info!(
            scene_id = %scene.scene_id,
            choices = choices.len(),
            "scene loaded"
        );
        self.scene = Some(scene);
        self.choices = choices;
        self.scene_image = non_empty(image_url);
        self.facts = historical_context.unwrap_or_default();
        if let Some(player) = player_state {
            self.player = Some(player);
        }
        self.reply = None;
        self.scoring = None;
        self.next_scene = None;
        self.last_error = None;
        self.phase = SessionPhase::SceneReady;
        Ok(())
    }

    pub fn begin_choice(&mut self, choice_index: usize) -> Result<ActionRequest, SessionError> {
        self.ensure_idle()?;
        if self.reply.is_some() {
            return Err(SessionError::ReplyPending);
        }
        let scene = self.scene.as_ref().ok_or(SessionError::NoScene)?;
        if choice_index >= self.choices.len() {
            return Err(SessionError::ChoiceOutOfRange {
                index: choice_index,
                available: self.choices.len(),
            });
        }

        let request = ActionRequest {
            scene_id: scene.scene_id.clone(),
            choice_index,
        };
        self.pending = Some(PendingRequest::Action {
            request: request.clone(),
        });
        self.phase = SessionPhase::Loading;
        debug!(
            scene_id = %request.scene_id,
            choice_index,
            "choice submitted"
        );
        Ok(request)
    }

    pub fn apply_action(&mut self, response: ActionResponse) -> Result<(), SessionError> {
        match self.pending.take() {
            Some(PendingRequest::Action { .. }) => {}
            other => {
                self.pending = other;
                return Err(SessionError::NoPendingRequest(RequestKind::Action));
            }
        }

        let ActionResponse {
            agent_response,
            audio_url,
            historical_context,
            next_scene_id,
            player_state,
            scoring,
        } = response;

        self.reply = Some(CharacterReply {
            speaker: self.companion_name.clone(),
            text: agent_response,
            audio_url: non_empty(audio_url),
        });
        if let Some(facts) = historical_context {
            self.facts = facts;
        }
        if let Some(player) = player_state {
            self.player = Some(player);
        }
        if let (Some(player), Some(feedback)) = (
            self.player.as_mut(),
            scoring.as_ref().and_then(|s| s.feedback.clone()),
        ) {
            player.feedback = Some(feedback);
        }
        self.scoring = scoring;
        info!(next_scene_id = %next_scene_id, "companion replied");
        self.next_scene = Some(next_scene_id);
        self.last_error = None;
        self.phase = SessionPhase::AwaitingContinue;
        Ok(())
    }

    pub fn begin_continue(&mut self) -> Result<SceneId, SessionError> {
        self.ensure_idle()?;
        if self.reply.is_none() {
            return Err(SessionError::NothingToContinue);
        }
        let next_scene = self
            .next_scene
            .clone()
            .ok_or(SessionError::NothingToContinue)?;
        if next_scene.is_blank() {
            return Err(SessionError::EmptySceneId);
        }

        let reply = self.reply.take();
        self.pending = Some(PendingRequest::Scene {
            scene_id: next_scene.clone(),
            resume: self.phase,
            restore_reply: reply,
        });
        self.phase = SessionPhase::Loading;
        debug!(scene_id = %next_scene, "continuing to next scene");
        Ok(next_scene)
    }

    /// Settles the in-flight request as failed and returns to the phase held
    /// before it. Scene data is left untouched.
    pub fn fail_pending(&mut self, message: impl Into<String>) -> Option<SessionFailure> {
        let message = message.into();
        let Some(pending) = self.pending.take() else {
            warn!(%message, "request failure reported with nothing pending");
            return None;
        };

        let kind = pending.kind();
        match pending {
            PendingRequest::Scene {
                scene_id,
                resume,
                restore_reply,
            } => {
                warn!(scene_id = %scene_id, error = %message, "error fetching scene");
                self.phase = resume;
                if restore_reply.is_some() {
                    self.reply = restore_reply;
                }
            }
            PendingRequest::Action { request } => {
                warn!(
                    scene_id = %request.scene_id,
                    choice_index = request.choice_index,
                    error = %message,
                    "error making choice"
                );
                self.phase = SessionPhase::SceneReady;
            }
        }

        let failure = SessionFailure { kind, message };
        self.last_error = Some(failure.clone());
        Some(failure)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Drives a [`SessionState`] against a [`GameApi`], one request at a time.
pub struct GameSession<A: GameApi> {
    api: A,
    state: SessionState,
    entry_scene: SceneId,
}

impl<A: GameApi> GameSession<A> {
    pub fn new(api: A, entry_scene: SceneId, companion_name: impl Into<String>) -> Self {
        Self {
            api,
            state: SessionState::new(companion_name),
            entry_scene,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn entry_scene(&self) -> &SceneId {
        &self.entry_scene
    }

    pub async fn start(&mut self) -> Result<(), SessionError> {
        let scene_id = self.state.begin_start(&self.entry_scene)?;
        self.load_scene(scene_id).await
    }

    pub async fn fetch_scene(&mut self, scene_id: &SceneId) -> Result<(), SessionError> {
        let scene_id = self.state.begin_scene_fetch(scene_id)?;
        self.load_scene(scene_id).await
    }

    pub async fn submit_choice(&mut self, choice_index: usize) -> Result<(), SessionError> {
        let request = self.state.begin_choice(choice_index)?;
        match self.api.submit_action(&request).await {
            Ok(response) => self.state.apply_action(response),
            Err(err) => Err(self.fail(err)),
        }
    }

    pub async fn continue_story(&mut self) -> Result<(), SessionError> {
        let scene_id = self.state.begin_continue()?;
        self.load_scene(scene_id).await
    }

    async fn load_scene(&mut self, scene_id: SceneId) -> Result<(), SessionError> {
        match self.api.fetch_scene(&scene_id).await {
            Ok(response) => self.state.apply_scene(response),
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&mut self, err: anyhow::Error) -> SessionError {
        let message = format!("{err:#}");
        match self.state.fail_pending(message.clone()) {
            Some(failure) => SessionError::Request {
                kind: failure.kind,
                message: failure.message,
            },
            None => SessionError::Request {
                kind: RequestKind::Scene,
                message,
            },
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
