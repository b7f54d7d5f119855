//! Plain-text views of the session. Each function only reads what it is given.

use std::fmt::Write as _;

use client_core::{CharacterReply, SessionError, SessionPhase, SessionState};
use shared::protocol::{HistoricalFact, ObjectivesResponse, PlayerState, SceneResponse};

const BAR_WIDTH: usize = 20;

pub fn objectives(objectives: &ObjectivesResponse) -> String {
    let mut out = String::new();
    if !objectives.description.is_empty() {
        let _ = writeln!(out, "{}\n", objectives.description);
    }
    let _ = writeln!(out, "Objectives:");
    for objective in &objectives.objectives {
        let _ = writeln!(out, "  * {objective}");
    }
    out
}

pub fn scene_response(response: &SceneResponse) -> String {
    let mut out = String::new();
    scene_view(
        &mut out,
        &response.scene.description,
        Some(response.image_url.as_str()).filter(|url| !url.is_empty()),
    );
    choice_list(&mut out, &response.choices);
    if let Some(facts) = &response.historical_context {
        fact_panel(&mut out, facts);
    }
    out
}

pub fn session(state: &SessionState) -> String {
    let mut out = String::new();
    match state.phase() {
        SessionPhase::NotStarted => {
            let _ = writeln!(
                out,
                "Embark on a journey through 13th century England with your companion, {}.",
                state.companion_name()
            );
            return out;
        }
        SessionPhase::Loading => {
            let _ = writeln!(out, "Loading your adventure...");
            return out;
        }
        SessionPhase::SceneReady | SessionPhase::AwaitingContinue => {}
    }

    if let Some(scene) = state.scene() {
        scene_view(&mut out, &scene.description, state.scene_image());
    }
    if let Some(reply) = state.reply() {
        dialogue(&mut out, reply);
    } else {
        choice_list(&mut out, state.actionable_choices());
    }
    if let Some(player) = state.player() {
        stat_panel(&mut out, player);
    }
    fact_panel(&mut out, state.facts());
    out
}

pub fn prompt(state: &SessionState) -> &'static str {
    if !state.has_started() {
        "Press enter to begin your adventure (q to quit)."
    } else if state.shows_continue() {
        "Press enter to continue (q to quit)."
    } else {
        "What will you do? (number, q to quit)"
    }
}

/// Message for a scene that offers nothing to choose, which ends play.
pub fn dead_end(state: &SessionState) -> Option<&'static str> {
    let stuck = state.phase() == SessionPhase::SceneReady
        && state.reply().is_none()
        && state.actionable_choices().is_empty();
    stuck.then_some("This scene offers no choices. Your adventure ends here.")
}

pub fn failure(err: &SessionError) -> String {
    match err {
        SessionError::Request { kind, message } => {
            format!("The {kind} request failed: {message}. Try again.")
        }
        other => format!("Can't do that: {other}."),
    }
}

fn scene_view(out: &mut String, description: &str, image_url: Option<&str>) {
    match image_url {
        Some(url) => {
            let _ = writeln!(out, "[scene image: {url}]");
        }
        None => {
            let _ = writeln!(out, "[no scene image]");
        }
    }
    let _ = writeln!(out, "{description}\n");
}

fn dialogue(out: &mut String, reply: &CharacterReply) {
    let _ = writeln!(out, "{} says:", reply.speaker);
    let _ = writeln!(out, "  \"{}\"", reply.text);
    if let Some(audio) = &reply.audio_url {
        let _ = writeln!(out, "  [audio: {audio}]");
    }
    let _ = writeln!(out);
}

fn choice_list(out: &mut String, choices: &[String]) {
    if choices.is_empty() {
        return;
    }
    let _ = writeln!(out, "What will you do?");
    for (index, choice) in choices.iter().enumerate() {
        let _ = writeln!(out, "  {}. {choice}", index + 1);
    }
    let _ = writeln!(out);
}

fn stat_panel(out: &mut String, player: &PlayerState) {
    let alignment = &player.alignment;
    let _ = writeln!(out, "Character Stats");
    let _ = writeln!(
        out,
        "  Alignment: {} (Law/Chaos {}, Good/Evil {})",
        alignment.label(),
        alignment.law_chaos,
        alignment.good_evil
    );
    let _ = writeln!(
        out,
        "  Experience {:>4} {}",
        player.experience,
        bar(player.experience_fraction())
    );
    let _ = writeln!(
        out,
        "  Score      {:>4} {}",
        player.rounded_score(),
        bar(player.score_fraction())
    );
    for (skill, level) in &player.skills {
        let _ = writeln!(out, "  {skill}: {level}");
    }
    if let Some(feedback) = &player.feedback {
        let _ = writeln!(out, "  Feedback: {feedback}");
    }
    let _ = writeln!(out);
}

fn fact_panel(out: &mut String, facts: &[HistoricalFact]) {
    if facts.is_empty() {
        return;
    }
    let _ = writeln!(out, "Historical Context");
    for fact in facts {
        let _ = writeln!(out, "  {}: {}", fact.title, fact.content);
    }
}

fn bar(fraction: f32) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
