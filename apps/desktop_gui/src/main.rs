mod backend_bridge;
mod controller;
mod media;
mod ui;

use clap::Parser;
use client_core::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::GameApp;

#[derive(Parser, Debug)]
#[command(about = "Maestro medieval adventure desktop client")]
struct Args {
    /// Game API base url; overrides client.toml and environment.
    #[arg(long)]
    api_url: Option<String>,
    /// Scene to begin the adventure from.
    #[arg(long)]
    entry: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    if let Some(entry) = args.entry {
        settings.entry_scene = entry.into();
    }
    let api_url = settings.parsed_api_url()?;
    tracing::info!(%api_url, entry_scene = %settings.entry_scene, "starting desktop client");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, api_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Maestro: A Medieval Adventure")
            .with_inner_size([1200.0, 820.0])
            .with_min_inner_size([860.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Maestro: A Medieval Adventure",
        options,
        Box::new(move |_cc| Ok(Box::new(GameApp::new(cmd_tx, ui_rx, &settings)))),
    )
    .map_err(|err| anyhow::anyhow!("desktop client exited with error: {err}"))
}
