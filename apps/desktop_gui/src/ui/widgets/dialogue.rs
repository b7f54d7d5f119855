use client_core::CharacterReply;

use crate::media::audio::DialogueAudio;
use crate::ui::theme;

/// Where the reply's voice clip stands.
#[derive(Clone, Copy)]
pub enum VoiceLine<'a> {
    None,
    Loading,
    Ready,
    Failed(&'a str),
}

/// Speaker, quoted reply and the audio toggle.
pub fn dialogue_view(
    ui: &mut egui::Ui,
    reply: &CharacterReply,
    voice: VoiceLine<'_>,
    audio: &mut DialogueAudio,
) {
    theme::card_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(
            egui::RichText::new(format!("{} says:", reply.speaker))
                .strong()
                .color(theme::ACCENT),
        );
        ui.add_space(4.0);
        ui.label(
            egui::RichText::new(format!("\u{201c}{}\u{201d}", reply.text))
                .italics()
                .size(16.0)
                .color(theme::TEXT),
        );

        if matches!(voice, VoiceLine::None) {
            return;
        }
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            match voice {
                VoiceLine::Ready => {
                    let label = if audio.is_playing() { "Pause" } else { "Play" };
                    let clicked = ui
                        .button(label)
                        .on_hover_text(audio.source().unwrap_or_default())
                        .clicked();
                    if clicked {
                        audio.toggle();
                    }
                }
                VoiceLine::Loading => {
                    ui.spinner();
                    ui.small(egui::RichText::new("Fetching voice...").color(theme::MUTED_TEXT));
                }
                VoiceLine::Failed(reason) => {
                    ui.add_enabled(false, egui::Button::new("Play"))
                        .on_disabled_hover_text(reason);
                }
                VoiceLine::None => {}
            }
            if let Some(err) = audio.last_error() {
                ui.small(egui::RichText::new(err).color(theme::MUTED_TEXT));
            }
        });
    });
}
