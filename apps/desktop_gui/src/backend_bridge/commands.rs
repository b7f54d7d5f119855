//! Backend commands queued from UI to backend worker.

use shared::{domain::SceneId, protocol::ActionRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    FetchObjectives,
    FetchScene { scene_id: SceneId },
    SubmitAction { request: ActionRequest },
    FetchSceneImage { url: String },
    FetchDialogueAudio { url: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchObjectives => "fetch_objectives",
            Self::FetchScene { .. } => "fetch_scene",
            Self::SubmitAction { .. } => "submit_action",
            Self::FetchSceneImage { .. } => "fetch_scene_image",
            Self::FetchDialogueAudio { .. } => "fetch_dialogue_audio",
        }
    }

    /// Whether the session state is waiting on this command to settle.
    pub fn settles_session(&self) -> bool {
        matches!(self, Self::FetchScene { .. } | Self::SubmitAction { .. })
    }
}
