use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_settings_file(tag: &str, contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("maestro_client_settings_{tag}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join(SETTINGS_FILE_NAME);
    fs::write(&path, contents).expect("write settings");
    path
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| vars.get(name).cloned()
}

#[test]
fn defaults_point_at_local_api_and_intro() {
    let settings = load_settings_from(None, env_from(&[])).expect("settings");
    assert_eq!(settings, ClientSettings::default());
    assert_eq!(settings.api_url, "http://localhost:8000");
    assert_eq!(settings.entry_scene, SceneId::from("intro"));
    assert_eq!(settings.companion_name, "Ser Elyen");
    assert_eq!(settings.audio_volume, 1.0);
}

#[test]
fn file_overrides_defaults_and_env_overrides_file() {
    let path = temp_settings_file(
        "layered",
        r#"
api_url = "http://game.internal:8080"
companion_name = "Dame Aveline"
audio_volume = 0.4
"#,
    );

    let settings = load_settings_from(Some(path.as_path()), env_from(&[])).expect("settings");
    assert_eq!(settings.api_url, "http://game.internal:8080");
    assert_eq!(settings.companion_name, "Dame Aveline");
    assert_eq!(settings.audio_volume, 0.4);

    let settings = load_settings_from(
        Some(path.as_path()),
        env_from(&[
            ("MAESTRO_API_URL", "http://from-env:9000"),
            ("APP__ENTRY_SCENE", "village_elder"),
        ]),
    )
    .expect("settings");
    assert_eq!(settings.api_url, "http://from-env:9000");
    assert_eq!(settings.entry_scene, SceneId::from("village_elder"));
    assert_eq!(settings.companion_name, "Dame Aveline");

    if let Some(parent) = path.parent() {
        fs::remove_dir_all(parent).expect("cleanup");
    }
}

#[test]
fn app_prefixed_env_wins_and_blank_values_are_ignored() {
    let settings = load_settings_from(
        None,
        env_from(&[
            ("MAESTRO_API_URL", "http://first:1"),
            ("APP__API_URL", "http://second:2"),
            ("APP__COMPANION_NAME", "   "),
        ]),
    )
    .expect("settings");
    assert_eq!(settings.api_url, "http://second:2");
    assert_eq!(settings.companion_name, "Ser Elyen");
}

#[test]
fn malformed_file_is_reported() {
    let path = temp_settings_file("malformed", "api_url = [");
    let err = load_settings_from(Some(path.as_path()), env_from(&[])).expect_err("must fail");
    assert!(matches!(err, SettingsError::Parse { .. }));

    if let Some(parent) = path.parent() {
        fs::remove_dir_all(parent).expect("cleanup");
    }
}

#[test]
fn api_url_must_be_http() {
    let mut settings = ClientSettings::default();
    assert!(settings.parsed_api_url().is_ok());

    settings.api_url = "ftp://example.com".into();
    assert!(matches!(
        settings.parsed_api_url(),
        Err(SettingsError::UnsupportedScheme(_))
    ));

    settings.api_url = "localhost 8000".into();
    assert!(matches!(
        settings.parsed_api_url(),
        Err(SettingsError::InvalidApiUrl { .. })
    ));
}

#[test]
fn audio_volume_env_is_parsed_and_clamped() {
    let settings =
        load_settings_from(None, env_from(&[("APP__AUDIO_VOLUME", "2.5")])).expect("settings");
    assert_eq!(settings.audio_volume, 2.5);
    assert_eq!(settings.clamped_volume(), 1.0);

    let settings =
        load_settings_from(None, env_from(&[("APP__AUDIO_VOLUME", "loud")])).expect("settings");
    assert_eq!(settings.audio_volume, 1.0);

    let settings = ClientSettings {
        audio_volume: f32::NAN,
        ..ClientSettings::default()
    };
    assert_eq!(settings.clamped_volume(), 1.0);
}
