//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{GameApi, HttpGameClient};
use crossbeam_channel::{Receiver, Sender};
use url::Url;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::media::{artwork::decode_scene_image, audio::decode_dialogue_audio};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, api_url: Url) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = HttpGameClient::with_client(reqwest::Client::new(), api_url);
            tracing::info!(api_url = %client.base_url(), "backend worker ready");
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                let event = handle_command(&client, cmd).await;
                if ui_tx.send(event).is_err() {
                    tracing::debug!("ui event receiver dropped; stopping backend worker");
                    break;
                }
            }
        });
    });
}

/// Runs one command to completion; every command settles into exactly one event.
pub async fn handle_command(client: &HttpGameClient, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::FetchObjectives => match client.fetch_objectives().await {
            Ok(objectives) => UiEvent::ObjectivesLoaded(objectives),
            Err(err) => UiEvent::Error(UiError::from_anyhow(UiErrorContext::Objectives, &err)),
        },
        BackendCommand::FetchScene { scene_id } => match client.fetch_scene(&scene_id).await {
            Ok(scene) => UiEvent::SceneLoaded(scene),
            Err(err) => UiEvent::Error(UiError::from_anyhow(UiErrorContext::SceneFetch, &err)),
        },
        BackendCommand::SubmitAction { request } => match client.submit_action(&request).await {
            Ok(response) => UiEvent::ActionResolved(response),
            Err(err) => UiEvent::Error(UiError::from_anyhow(UiErrorContext::Action, &err)),
        },
        BackendCommand::FetchSceneImage { url } => {
            let decoded = match client.fetch_image(&url).await {
                Ok(bytes) => decode_scene_image(&bytes),
                Err(err) => Err(format!("{err:#}")),
            };
            match decoded {
                Ok(image) => UiEvent::SceneImageLoaded { url, image },
                Err(reason) => UiEvent::SceneImageFailed { url, reason },
            }
        }
        BackendCommand::FetchDialogueAudio { url } => {
            let decoded = match client.fetch_audio(&url).await {
                Ok(bytes) => decode_dialogue_audio(bytes),
                Err(err) => Err(format!("{err:#}")),
            };
            match decoded {
                Ok(clip) => UiEvent::DialogueAudioLoaded { url, clip },
                Err(reason) => UiEvent::DialogueAudioFailed { url, reason },
            }
        }
    }
}
