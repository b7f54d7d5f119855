use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{load_settings, GameApi, GameSession, HttpGameClient, SessionPhase};
use shared::domain::SceneId;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(about = "Play the Maestro medieval adventure from a terminal")]
struct Cli {
    /// Game API base url; overrides client.toml and environment.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    companion: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the game objectives shown before an adventure begins.
    Objectives,
    /// Fetch and print a single scene.
    Scene { scene_id: String },
    /// Start a session and play interactively, or through `--choose` picks.
    Play {
        #[arg(long)]
        entry: Option<String>,
        /// Zero-based choice indices to play without prompting.
        #[arg(long = "choose")]
        choices: Vec<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Some(companion) = cli.companion {
        settings.companion_name = companion;
    }
    let api_url = settings.parsed_api_url()?;
    tracing::info!(%api_url, "using game api");
    let client = HttpGameClient::new(api_url.as_str())?;

    match cli.command {
        Command::Objectives => {
            let objectives = client.fetch_objectives().await?;
            println!("{}", render::objectives(&objectives));
        }
        Command::Scene { scene_id } => {
            let scene = client
                .fetch_scene(&SceneId::from(scene_id))
                .await
                .context("failed to load scene")?;
            println!("{}", render::scene_response(&scene));
        }
        Command::Play { entry, choices } => {
            let entry = entry.map(SceneId::from).unwrap_or(settings.entry_scene);
            let mut session = GameSession::new(client, entry, settings.companion_name);
            if choices.is_empty() {
                play_interactive(&mut session).await?;
            } else {
                play_scripted(&mut session, &choices).await?;
            }
        }
    }

    Ok(())
}

async fn play_scripted(session: &mut GameSession<HttpGameClient>, picks: &[usize]) -> Result<()> {
    session.start().await?;
    println!("{}", render::session(session.state()));

    for &pick in picks {
        session.submit_choice(pick).await?;
        println!("{}", render::session(session.state()));
        session.continue_story().await?;
        println!("{}", render::session(session.state()));
    }
    Ok(())
}

async fn play_interactive(session: &mut GameSession<HttpGameClient>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("{}", render::session(session.state()));
        if let Some(message) = render::dead_end(session.state()) {
            println!("{message}");
            return Ok(());
        }
        println!("{}", render::prompt(session.state()));

        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        let input = line.trim();
        if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
            return Ok(());
        }

        let outcome = match session.state().phase() {
            SessionPhase::NotStarted => session.start().await,
            SessionPhase::AwaitingContinue => session.continue_story().await,
            SessionPhase::SceneReady => match input.parse::<usize>() {
                Ok(number) if number >= 1 => session.submit_choice(number - 1).await,
                _ => {
                    println!("Enter the number of a choice, or q to quit.");
                    continue;
                }
            },
            SessionPhase::Loading => continue,
        };

        if let Err(err) = outcome {
            println!("{}", render::failure(&err));
        }
    }
}
