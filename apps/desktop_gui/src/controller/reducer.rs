//! View state owned by the UI thread and the transitions applied to it.
//!
//! Player intents and backend events both go through [`GameViewState`]; each
//! returns the backend commands that should be queued next.

use client_core::{SessionError, SessionPhase, SessionState};
use shared::{domain::SceneId, protocol::ObjectivesResponse};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::media::{artwork::PreviewImage, audio::AudioClip};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub severity: StatusBannerSeverity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArtworkState {
    Loading,
    Ready(PreviewImage),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneArtwork {
    pub url: String,
    pub state: ArtworkState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VoiceState {
    Loading,
    Ready(AudioClip),
    Failed(String),
}

/// The companion's voice clip for the reply on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueVoice {
    pub url: String,
    pub state: VoiceState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectivesState {
    Loading,
    Ready(ObjectivesResponse),
    Unavailable,
}

#[derive(Debug)]
pub struct GameViewState {
    pub session: SessionState,
    pub objectives: ObjectivesState,
    pub artwork: Option<SceneArtwork>,
    pub voice: Option<DialogueVoice>,
    pub status: String,
    pub status_banner: Option<StatusBanner>,
}

impl GameViewState {
    pub fn new(companion_name: impl Into<String>) -> Self {
        Self {
            session: SessionState::new(companion_name),
            objectives: ObjectivesState::Loading,
            artwork: None,
            voice: None,
            status: "Starting...".to_string(),
            status_banner: None,
        }
    }

    pub fn start_game(&mut self, entry_scene: &SceneId) -> Vec<BackendCommand> {
        match self.session.begin_start(entry_scene) {
            Ok(scene_id) => {
                self.status = format!("Loading scene {scene_id}...");
                vec![BackendCommand::FetchScene { scene_id }]
            }
            Err(err) => self.reject(err),
        }
    }

    pub fn choose(&mut self, choice_index: usize) -> Vec<BackendCommand> {
        match self.session.begin_choice(choice_index) {
            Ok(request) => {
                self.status = "Waiting for your companion...".to_string();
                vec![BackendCommand::SubmitAction { request }]
            }
            Err(err) => self.reject(err),
        }
    }

    pub fn continue_story(&mut self) -> Vec<BackendCommand> {
        match self.session.begin_continue() {
            Ok(scene_id) => {
                self.status = format!("Loading scene {scene_id}...");
                vec![BackendCommand::FetchScene { scene_id }]
            }
            Err(err) => self.reject(err),
        }
    }

    /// Called when a command could not be queued; a session request that never
    /// left the UI thread is settled as failed.
    pub fn dispatch_failed(&mut self, cmd: &BackendCommand) {
        if cmd.settles_session() {
            if let Some(failure) = self.session.fail_pending(self.status.clone()) {
                self.raise_banner(format!("The {} request failed: {}", failure.kind, failure.message));
            }
        }
    }

    pub fn dismiss_banner(&mut self) {
        self.status_banner = None;
        self.session.dismiss_error();
    }

    pub fn apply_event(&mut self, event: UiEvent) -> Vec<BackendCommand> {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
                Vec::new()
            }
            UiEvent::ObjectivesLoaded(objectives) => {
                self.objectives = ObjectivesState::Ready(objectives);
                Vec::new()
            }
            UiEvent::SceneLoaded(response) => match self.session.apply_scene(response) {
                Ok(()) => {
                    self.status_banner = None;
                    self.status = match self.session.scene() {
                        Some(scene) => format!("Scene {}", scene.scene_id),
                        None => String::new(),
                    };
                    self.sync_voice();
                    self.sync_artwork()
                }
                Err(err) => {
                    tracing::debug!("ignoring scene response: {err}");
                    Vec::new()
                }
            },
            UiEvent::ActionResolved(response) => match self.session.apply_action(response) {
                Ok(()) => {
                    self.status_banner = None;
                    self.status = format!("{} replied", self.session.companion_name());
                    self.sync_voice()
                }
                Err(err) => {
                    tracing::debug!("ignoring action response: {err}");
                    Vec::new()
                }
            },
            UiEvent::SceneImageLoaded { url, image } => {
                self.settle_artwork(&url, ArtworkState::Ready(image));
                Vec::new()
            }
            UiEvent::SceneImageFailed { url, reason } => {
                tracing::warn!(%url, %reason, "scene image unavailable");
                self.settle_artwork(&url, ArtworkState::Failed(reason));
                Vec::new()
            }
            UiEvent::DialogueAudioLoaded { url, clip } => {
                self.settle_voice(&url, VoiceState::Ready(clip));
                Vec::new()
            }
            UiEvent::DialogueAudioFailed { url, reason } => {
                tracing::warn!(%url, %reason, "dialogue audio unavailable");
                self.settle_voice(&url, VoiceState::Failed(reason));
                Vec::new()
            }
            UiEvent::Error(err) => {
                self.apply_error(err);
                self.sync_voice()
            }
        }
    }

    fn apply_error(&mut self, err: UiError) {
        tracing::warn!(
            category = ?err.category(),
            context = ?err.context(),
            "{}",
            err.message()
        );
        self.status = err.status_line();
        match err.context() {
            context if context.settles_session() => {
                if self.session.fail_pending(err.message()).is_some() {
                    self.raise_banner(self.status.clone());
                }
            }
            UiErrorContext::Objectives => {
                self.objectives = ObjectivesState::Unavailable;
            }
            UiErrorContext::BackendStartup | UiErrorContext::General => {
                self.raise_banner(self.status.clone());
            }
            _ => {}
        }
    }

    fn sync_artwork(&mut self) -> Vec<BackendCommand> {
        let Some(url) = self.session.scene_image().map(str::to_owned) else {
            self.artwork = None;
            return Vec::new();
        };
        if self.artwork.as_ref().is_some_and(|artwork| artwork.url == url) {
            return Vec::new();
        }
        self.artwork = Some(SceneArtwork {
            url: url.clone(),
            state: ArtworkState::Loading,
        });
        vec![BackendCommand::FetchSceneImage { url }]
    }

    fn settle_artwork(&mut self, url: &str, state: ArtworkState) {
        match self.artwork.as_mut() {
            Some(artwork) if artwork.url == url => artwork.state = state,
            _ => tracing::debug!(%url, "dropping stale scene image"),
        }
    }

    /// Keeps the voice clip on the reply's audio reference. A reply restored
    /// after a failed continue keeps the clip it already had.
    fn sync_voice(&mut self) -> Vec<BackendCommand> {
        let Some(url) = self.session.reply().and_then(|reply| reply.audio_url.clone()) else {
            if !self.session.is_loading() {
                self.voice = None;
            }
            return Vec::new();
        };
        if self.voice.as_ref().is_some_and(|voice| voice.url == url) {
            return Vec::new();
        }
        self.voice = Some(DialogueVoice {
            url: url.clone(),
            state: VoiceState::Loading,
        });
        vec![BackendCommand::FetchDialogueAudio { url }]
    }

    fn settle_voice(&mut self, url: &str, state: VoiceState) {
        match self.voice.as_mut() {
            Some(voice) if voice.url == url => voice.state = state,
            _ => tracing::debug!(%url, "dropping stale dialogue audio"),
        }
    }

    fn reject(&mut self, err: SessionError) -> Vec<BackendCommand> {
        tracing::debug!("ignored player intent: {err}");
        self.status = format!("Can't do that: {err}");
        Vec::new()
    }

    fn raise_banner(&mut self, message: String) {
        self.status_banner = Some(StatusBanner {
            severity: StatusBannerSeverity::Error,
            message,
        });
    }

    pub fn is_busy(&self) -> bool {
        self.session.phase() == SessionPhase::Loading
    }
}

#[cfg(test)]
mod tests {
    use shared::protocol::{ActionRequest, ActionResponse, Scene, SceneResponse};

    use super::*;

    fn scene_response(id: &str, choices: &[&str], image_url: &str) -> SceneResponse {
        SceneResponse {
            scene: Scene {
                scene_id: SceneId::from(id),
                description: format!("Scene {id}"),
                region: None,
            },
            choices: choices.iter().map(|c| c.to_string()).collect(),
            image_url: image_url.to_string(),
            historical_context: None,
            player_state: None,
        }
    }

    fn action_response(next: &str) -> ActionResponse {
        ActionResponse {
            agent_response: "Onward, then.".into(),
            audio_url: "/audio/reply.mp3".into(),
            historical_context: None,
            next_scene_id: SceneId::from(next),
            player_state: None,
            scoring: None,
        }
    }

    fn image() -> PreviewImage {
        PreviewImage {
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 255],
        }
    }

    #[test]
    fn full_turn_emits_commands_in_order() {
        let mut view = GameViewState::new("Ser Elyen");

        let cmds = view.start_game(&SceneId::from("intro"));
        assert_eq!(
            cmds,
            vec![BackendCommand::FetchScene {
                scene_id: SceneId::from("intro")
            }]
        );
        assert!(view.is_busy());

        let cmds = view.apply_event(UiEvent::SceneLoaded(scene_response(
            "intro",
            &["Flee", "Fight"],
            "/images/intro.png",
        )));
        assert_eq!(
            cmds,
            vec![BackendCommand::FetchSceneImage {
                url: "/images/intro.png".into()
            }]
        );
        assert_eq!(view.session.phase(), SessionPhase::SceneReady);

        let cmds = view.choose(1);
        assert_eq!(
            cmds,
            vec![BackendCommand::SubmitAction {
                request: ActionRequest {
                    scene_id: SceneId::from("intro"),
                    choice_index: 1
                }
            }]
        );

        let cmds = view.apply_event(UiEvent::ActionResolved(action_response("forest_1")));
        assert_eq!(
            cmds,
            vec![BackendCommand::FetchDialogueAudio {
                url: "/audio/reply.mp3".into()
            }]
        );
        assert!(view.session.shows_continue());
        assert!(view.session.actionable_choices().is_empty());

        let cmds = view.continue_story();
        assert_eq!(
            cmds,
            vec![BackendCommand::FetchScene {
                scene_id: SceneId::from("forest_1")
            }]
        );
        assert!(view.session.reply().is_none());
    }

    #[test]
    fn invalid_intents_queue_nothing() {
        let mut view = GameViewState::new("Ser Elyen");
        assert!(view.choose(0).is_empty());
        assert!(view.continue_story().is_empty());
        assert!(view.status.starts_with("Can't do that"));

        view.start_game(&SceneId::from("intro"));
        assert!(view.start_game(&SceneId::from("intro")).is_empty());
        view.apply_event(UiEvent::SceneLoaded(scene_response("intro", &["Wait"], "")));
        assert!(view.choose(5).is_empty());
        assert_eq!(view.session.phase(), SessionPhase::SceneReady);
    }

    #[test]
    fn scene_without_image_clears_artwork() {
        let mut view = GameViewState::new("Ser Elyen");
        view.start_game(&SceneId::from("intro"));
        let cmds = view.apply_event(UiEvent::SceneLoaded(scene_response("intro", &["Go"], "")));
        assert!(cmds.is_empty());
        assert!(view.artwork.is_none());
    }

    #[test]
    fn stale_image_results_are_dropped() {
        let mut view = GameViewState::new("Ser Elyen");
        view.start_game(&SceneId::from("intro"));
        view.apply_event(UiEvent::SceneLoaded(scene_response("intro", &["Go"], "/a.png")));

        view.apply_event(UiEvent::SceneImageLoaded {
            url: "/old.png".into(),
            image: image(),
        });
        assert_eq!(
            view.artwork.as_ref().map(|a| &a.state),
            Some(&ArtworkState::Loading)
        );

        view.apply_event(UiEvent::SceneImageLoaded {
            url: "/a.png".into(),
            image: image(),
        });
        assert_eq!(
            view.artwork.as_ref().map(|a| &a.state),
            Some(&ArtworkState::Ready(image()))
        );

        view.apply_event(UiEvent::SceneImageFailed {
            url: "/a.png".into(),
            reason: "404".into(),
        });
        assert_eq!(
            view.artwork.as_ref().map(|a| &a.state),
            Some(&ArtworkState::Failed("404".into()))
        );
    }

    #[test]
    fn reply_audio_is_fetched_once_and_cleared_by_the_next_scene() {
        let mut view = GameViewState::new("Ser Elyen");
        view.start_game(&SceneId::from("intro"));
        view.apply_event(UiEvent::SceneLoaded(scene_response("intro", &["Go"], "")));
        view.choose(0);

        let cmds = view.apply_event(UiEvent::ActionResolved(action_response("forest_1")));
        assert_eq!(
            cmds,
            vec![BackendCommand::FetchDialogueAudio {
                url: "/audio/reply.mp3".into()
            }]
        );

        view.apply_event(UiEvent::DialogueAudioLoaded {
            url: "/audio/old.mp3".into(),
            clip: AudioClip::from(vec![1u8, 2]),
        });
        assert_eq!(view.voice.as_ref().map(|v| &v.state), Some(&VoiceState::Loading));

        let clip = AudioClip::from(vec![7u8; 4]);
        view.apply_event(UiEvent::DialogueAudioLoaded {
            url: "/audio/reply.mp3".into(),
            clip: clip.clone(),
        });
        assert_eq!(
            view.voice.as_ref().map(|v| &v.state),
            Some(&VoiceState::Ready(clip))
        );

        view.continue_story();
        assert!(view.voice.is_some());
        let cmds = view.apply_event(UiEvent::Error(UiError::from_message(
            UiErrorContext::SceneFetch,
            "timed out",
        )));
        assert!(cmds.is_empty());
        assert!(matches!(
            view.voice.as_ref().map(|v| &v.state),
            Some(VoiceState::Ready(_))
        ));

        view.continue_story();
        view.apply_event(UiEvent::SceneLoaded(scene_response("forest_1", &["Hide"], "")));
        assert!(view.voice.is_none());
    }

    #[test]
    fn request_errors_settle_session_and_raise_banner() {
        let mut view = GameViewState::new("Ser Elyen");
        view.start_game(&SceneId::from("intro"));
        view.apply_event(UiEvent::Error(UiError::from_message(
            UiErrorContext::SceneFetch,
            "connection refused",
        )));

        assert_eq!(view.session.phase(), SessionPhase::NotStarted);
        assert!(view.session.last_error().is_some());
        let banner = view.status_banner.clone().expect("banner");
        assert_eq!(banner.severity, StatusBannerSeverity::Error);
        assert!(banner.message.contains("Error fetching scene"));

        view.dismiss_banner();
        assert!(view.status_banner.is_none());
        assert!(view.session.last_error().is_none());

        assert_eq!(view.start_game(&SceneId::from("intro")).len(), 1);
    }

    #[test]
    fn failed_continue_brings_the_reply_back() {
        let mut view = GameViewState::new("Ser Elyen");
        view.start_game(&SceneId::from("intro"));
        view.apply_event(UiEvent::SceneLoaded(scene_response("intro", &["Go"], "")));
        view.choose(0);
        view.apply_event(UiEvent::ActionResolved(action_response("forest_1")));
        view.continue_story();

        view.apply_event(UiEvent::Error(UiError::from_message(
            UiErrorContext::SceneFetch,
            "timed out",
        )));
        assert_eq!(view.session.phase(), SessionPhase::AwaitingContinue);
        assert!(view.session.reply().is_some());
        assert_eq!(view.continue_story().len(), 1);
    }

    #[test]
    fn unqueued_session_command_is_settled() {
        let mut view = GameViewState::new("Ser Elyen");
        let cmds = view.start_game(&SceneId::from("intro"));
        view.status = "UI command queue is full; please retry".into();
        view.dispatch_failed(&cmds[0]);

        assert_eq!(view.session.phase(), SessionPhase::NotStarted);
        assert!(view.status_banner.is_some());
    }

    #[test]
    fn objectives_failure_marks_them_unavailable() {
        let mut view = GameViewState::new("Ser Elyen");
        view.apply_event(UiEvent::Error(UiError::from_message(
            UiErrorContext::Objectives,
            "connection refused",
        )));
        assert_eq!(view.objectives, ObjectivesState::Unavailable);
        assert!(view.status_banner.is_none());

        view.apply_event(UiEvent::ObjectivesLoaded(ObjectivesResponse {
            objectives: vec!["Survive".into()],
            description: String::new(),
        }));
        assert!(matches!(view.objectives, ObjectivesState::Ready(_)));
    }
}
