//! UI/backend events and error modeling for desktop GUI controller.

use shared::{
    error::{ApiException, ErrorCode},
    protocol::{ActionResponse, ObjectivesResponse, SceneResponse},
};

use crate::media::{artwork::PreviewImage, audio::AudioClip};

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    ObjectivesLoaded(ObjectivesResponse),
    SceneLoaded(SceneResponse),
    ActionResolved(ActionResponse),
    SceneImageLoaded { url: String, image: PreviewImage },
    SceneImageFailed { url: String, reason: String },
    DialogueAudioLoaded { url: String, clip: AudioClip },
    DialogueAudioFailed { url: String, reason: String },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Server,
    Decode,
    Validation,
    Unknown,
}

impl UiErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Transport => "Connection",
            Self::Server => "Server",
            Self::Decode => "Response",
            Self::Validation => "Request",
            Self::Unknown => "Unexpected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Objectives,
    SceneFetch,
    Action,
    General,
}

impl UiErrorContext {
    /// Whether the error settles a scene or action request the session is waiting on.
    pub fn settles_session(self) -> bool {
        matches!(self, Self::SceneFetch | Self::Action)
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("malformed")
            || message_lower.contains("expected")
            || message_lower.contains("decode")
        {
            UiErrorCategory::Decode
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("not found")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("connect")
            || message_lower.contains("network")
            || message_lower.contains("dns")
            || message_lower.contains("unavailable")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("internal") || message_lower.contains("server error") {
            UiErrorCategory::Server
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Classifies by the concrete error in the chain before falling back to
    /// message matching.
    pub fn from_anyhow(context: UiErrorContext, err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");
        let category = err.chain().find_map(|cause| {
            if let Some(api) = cause.downcast_ref::<ApiException>() {
                Some(match api.code {
                    ErrorCode::NotFound | ErrorCode::Validation => UiErrorCategory::Validation,
                    ErrorCode::Unavailable => UiErrorCategory::Transport,
                    ErrorCode::Internal => UiErrorCategory::Server,
                    ErrorCode::Unknown => UiErrorCategory::Unknown,
                })
            } else if let Some(http) = cause.downcast_ref::<reqwest::Error>() {
                Some(if http.is_decode() {
                    UiErrorCategory::Decode
                } else {
                    UiErrorCategory::Transport
                })
            } else if cause.downcast_ref::<serde_json::Error>().is_some() {
                Some(UiErrorCategory::Decode)
            } else {
                None
            }
        });

        match category {
            Some(category) => Self {
                category,
                context,
                message,
            },
            None => Self::from_message(context, message),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line text for the status bar.
    pub fn status_line(&self) -> String {
        let what = match self.context {
            UiErrorContext::BackendStartup => "Backend worker startup failure",
            UiErrorContext::Objectives => "Could not load objectives",
            UiErrorContext::SceneFetch => "Error fetching scene",
            UiErrorContext::Action => "Error making choice",
            UiErrorContext::General => "Error",
        };
        format!("{what} ({}): {}", self.category.label(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn api_exception_in_chain_decides_category() {
        let err = anyhow::Error::new(ApiException::new(ErrorCode::NotFound, "Scene not found"))
            .context("scene request for 'nowhere' failed");
        let ui = UiError::from_anyhow(UiErrorContext::SceneFetch, &err);
        assert_eq!(ui.category(), UiErrorCategory::Validation);
        assert_eq!(ui.context(), UiErrorContext::SceneFetch);
        assert!(ui.message().contains("Scene not found"));
        assert!(ui.message().starts_with("scene request for 'nowhere' failed"));

        let err = anyhow::Error::new(ApiException::new(ErrorCode::Internal, "boom"));
        assert_eq!(
            UiError::from_anyhow(UiErrorContext::Action, &err).category(),
            UiErrorCategory::Server
        );
    }

    #[test]
    fn json_errors_are_decode_failures() {
        let parse_err = serde_json::from_str::<SceneResponse>("<html>").expect_err("not json");
        let err = Err::<(), _>(parse_err)
            .context("malformed response body")
            .expect_err("error");
        let ui = UiError::from_anyhow(UiErrorContext::SceneFetch, &err);
        assert_eq!(ui.category(), UiErrorCategory::Decode);
    }

    #[test]
    fn plain_messages_fall_back_to_keyword_matching() {
        let ui = UiError::from_message(UiErrorContext::General, "Connection refused");
        assert_eq!(ui.category(), UiErrorCategory::Transport);

        let ui = UiError::from_message(UiErrorContext::General, "something odd");
        assert_eq!(ui.category(), UiErrorCategory::Unknown);
    }

    #[test]
    fn status_line_names_the_failed_operation() {
        let ui = UiError::from_message(UiErrorContext::Action, "connection reset");
        assert_eq!(
            ui.status_line(),
            "Error making choice (Connection): connection reset"
        );
        assert!(UiErrorContext::Action.settles_session());
        assert!(!UiErrorContext::Objectives.settles_session());
    }
}
