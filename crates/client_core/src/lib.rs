use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::SceneId,
    error::{ApiError, ApiException},
    protocol::{ActionRequest, ActionResponse, ObjectivesResponse, SceneResponse},
};
use tracing::debug;
use url::Url;

pub mod config;
pub mod session;

pub use config::{load_settings, ClientSettings, SettingsError};
pub use session::{
    CharacterReply, GameSession, PendingRequest, RequestKind, SessionError, SessionFailure,
    SessionPhase, SessionState,
};

/// The remote game service as seen by the client.
#[async_trait]
pub trait GameApi: Send + Sync {
    async fn fetch_objectives(&self) -> Result<ObjectivesResponse>;
    async fn fetch_scene(&self, scene_id: &SceneId) -> Result<SceneResponse>;
    async fn submit_action(&self, request: &ActionRequest) -> Result<ActionResponse>;
}

pub struct HttpGameClient {
    http: Client,
    base_url: Url,
}

impl HttpGameClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid game api url '{base_url}'"))?;
        Ok(Self::with_client(Client::new(), base_url))
    }

    pub fn with_client(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| anyhow!("game api url '{}' cannot be a base", self.base_url))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Downloads scene artwork. Relative references resolve against the api url.
    pub async fn fetch_image(&self, image_url: &str) -> Result<Vec<u8>> {
        self.fetch_media("image", image_url).await
    }

    /// Downloads a companion voice clip, resolved the same way as artwork.
    pub async fn fetch_audio(&self, audio_url: &str) -> Result<Vec<u8>> {
        self.fetch_media("audio", audio_url).await
    }

    async fn fetch_media(&self, kind: &str, reference: &str) -> Result<Vec<u8>> {
        let url = self
            .base_url
            .join(reference)
            .with_context(|| format!("invalid {kind} url '{reference}'"))?;
        debug!(%url, kind, "fetching media");
        let res = self.http.get(url.clone()).send().await?;
        let res = ensure_success(res)
            .await
            .with_context(|| format!("{kind} request to {url} failed"))?;
        Ok(res.bytes().await?.to_vec())
    }
}

async fn ensure_success(res: Response) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    let api_error = ApiError::from_response_body(status.as_u16(), &body);
    Err(ApiException::from(api_error).into())
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T> {
    let res = ensure_success(res).await?;
    let body = res.bytes().await?;
    serde_json::from_slice(&body).context("malformed response body")
}

#[async_trait]
impl GameApi for HttpGameClient {
    async fn fetch_objectives(&self) -> Result<ObjectivesResponse> {
        let url = self.endpoint(&["api", "objectives"])?;
        debug!(%url, "fetching objectives");
        let res = self.http.get(url).send().await?;
        read_json(res).await.context("objectives request failed")
    }

    async fn fetch_scene(&self, scene_id: &SceneId) -> Result<SceneResponse> {
        let url = self.endpoint(&["api", "scene", scene_id.as_str()])?;
        debug!(%url, scene_id = %scene_id, "fetching scene");
        let res = self.http.get(url).send().await?;
        read_json(res)
            .await
            .with_context(|| format!("scene request for '{scene_id}' failed"))
    }

    async fn submit_action(&self, request: &ActionRequest) -> Result<ActionResponse> {
        let url = self.endpoint(&["api", "action"])?;
        debug!(
            %url,
            scene_id = %request.scene_id,
            choice_index = request.choice_index,
            "submitting action"
        );
        let res = self.http.post(url).json(request).send().await?;
        read_json(res).await.with_context(|| {
            format!(
                "action request for scene '{}' choice {} failed",
                request.scene_id, request.choice_index
            )
        })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
