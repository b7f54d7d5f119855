use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use shared::domain::SceneId;
use thiserror::Error;
use url::Url;

pub const SETTINGS_FILE_NAME: &str = "client.toml";
const SETTINGS_DIR_NAME: &str = "maestro_adventure";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid api url '{url}': {source}")]
    InvalidApiUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("api url '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("failed to parse settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub api_url: String,
    pub entry_scene: SceneId,
    pub companion_name: String,
    /// Dialogue playback volume in `0.0..=1.0`.
    pub audio_volume: f32,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".into(),
            entry_scene: SceneId::from("intro"),
            companion_name: "Ser Elyen".into(),
            audio_volume: 1.0,
        }
    }
}

impl ClientSettings {
    pub fn parsed_api_url(&self) -> Result<Url, SettingsError> {
        let url = Url::parse(&self.api_url).map_err(|source| SettingsError::InvalidApiUrl {
            url: self.api_url.clone(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SettingsError::UnsupportedScheme(self.api_url.clone()));
        }
        Ok(url)
    }

    pub fn clamped_volume(&self) -> f32 {
        if self.audio_volume.is_finite() {
            self.audio_volume.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    api_url: Option<String>,
    entry_scene: Option<String>,
    companion_name: Option<String>,
    audio_volume: Option<f32>,
}

/// Defaults, then `client.toml`, then environment.
///
/// An unreadable or malformed file is logged and skipped so the client can
/// still start against the default api.
pub fn load_settings() -> ClientSettings {
    let path = settings_file_candidates()
        .into_iter()
        .find(|path| path.is_file());
    match load_settings_from(path.as_deref(), |name| std::env::var(name).ok()) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!("ignoring settings file: {err}");
            load_settings_from(None, |name| std::env::var(name).ok()).unwrap_or_default()
        }
    }
}

pub fn load_settings_from(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings, SettingsError> {
    let mut settings = ClientSettings::default();

    if let Some(path) = path {
        if let Ok(raw) = fs::read_to_string(path) {
            let file_cfg =
                toml::from_str::<SettingsFile>(&raw).map_err(|source| SettingsError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            apply_file(&mut settings, file_cfg);
        }
    }

    let read_env = |name: &str| env(name).filter(|value| !value.trim().is_empty());

    if let Some(v) = read_env("MAESTRO_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = read_env("APP__API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = read_env("APP__ENTRY_SCENE") {
        settings.entry_scene = SceneId::from(v);
    }
    if let Some(v) = read_env("APP__COMPANION_NAME") {
        settings.companion_name = v;
    }
    if let Some(v) = read_env("APP__AUDIO_VOLUME") {
        match v.trim().parse::<f32>() {
            Ok(parsed) => settings.audio_volume = parsed,
            Err(_) => tracing::warn!(value = %v, "ignoring unparsable APP__AUDIO_VOLUME"),
        }
    }

    Ok(settings)
}

fn apply_file(settings: &mut ClientSettings, file_cfg: SettingsFile) {
    if let Some(v) = file_cfg.api_url {
        settings.api_url = v;
    }
    if let Some(v) = file_cfg.entry_scene {
        settings.entry_scene = SceneId::from(v);
    }
    if let Some(v) = file_cfg.companion_name {
        settings.companion_name = v;
    }
    if let Some(v) = file_cfg.audio_volume {
        settings.audio_volume = v;
    }
}

fn settings_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(SETTINGS_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME));
    }
    candidates
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
