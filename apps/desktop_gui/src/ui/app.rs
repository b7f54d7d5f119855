use client_core::{ClientSettings, RequestKind};
use crossbeam_channel::{Receiver, Sender};
use shared::domain::SceneId;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{
    ArtworkState, DialogueVoice, GameViewState, SceneArtwork, StatusBannerSeverity, VoiceState,
};
use crate::media::audio::DialogueAudio;
use crate::ui::{theme, widgets};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerIntent {
    Start,
    Choose(usize),
    Continue,
}

pub struct GameApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    view: GameViewState,
    entry_scene: SceneId,
    audio: DialogueAudio,
    scene_texture: Option<(String, egui::TextureHandle)>,
    theme_applied: bool,
}

impl GameApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: &ClientSettings,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            view: GameViewState::new(settings.companion_name.clone()),
            entry_scene: settings.entry_scene.clone(),
            audio: DialogueAudio::new(settings.clamped_volume()),
            scene_texture: None,
            theme_applied: false,
        };
        app.dispatch_all(vec![BackendCommand::FetchObjectives]);
        app
    }

    fn dispatch_all(&mut self, cmds: Vec<BackendCommand>) {
        for cmd in cmds {
            if !dispatch_backend_command(&self.cmd_tx, cmd.clone(), &mut self.view.status) {
                self.view.dispatch_failed(&cmd);
            }
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            let follow_up = self.view.apply_event(event);
            self.dispatch_all(follow_up);
        }
    }

    fn handle_intent(&mut self, intent: PlayerIntent) {
        let cmds = match intent {
            PlayerIntent::Start => self.view.start_game(&self.entry_scene),
            PlayerIntent::Choose(index) => self.view.choose(index),
            PlayerIntent::Continue => self.view.continue_story(),
        };
        self.dispatch_all(cmds);
    }

    fn sync_scene_texture(&mut self, ctx: &egui::Context) {
        let Some(artwork) = self.view.artwork.as_ref() else {
            self.scene_texture = None;
            return;
        };
        if self
            .scene_texture
            .as_ref()
            .is_some_and(|(url, _)| url != &artwork.url)
        {
            self.scene_texture = None;
        }
        if let (ArtworkState::Ready(image), None) = (&artwork.state, &self.scene_texture) {
            let texture = ctx.load_texture(
                format!("scene_image_{}", artwork.url),
                image.to_color_image(),
                egui::TextureOptions::LINEAR,
            );
            self.scene_texture = Some((artwork.url.clone(), texture));
        }
    }

    /// Playback follows the voice clip of the reply on screen; no reply stops it.
    fn sync_dialogue_audio(&mut self) {
        match (&self.view.voice, self.view.session.reply()) {
            (Some(DialogueVoice { url, state }), Some(_)) => {
                let clip = match state {
                    VoiceState::Ready(clip) => Some(clip),
                    VoiceState::Loading | VoiceState::Failed(_) => None,
                };
                self.audio.sync(Some(url.as_str()), clip);
            }
            _ => self.audio.sync(None, None),
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.view.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.view.dismiss_banner();
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn show_top_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("game_top_bar")
            .frame(
                egui::Frame::NONE
                    .fill(theme::PANEL)
                    .inner_margin(egui::Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("Maestro: A Medieval Adventure")
                            .strong()
                            .size(18.0)
                            .color(theme::ACCENT),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.small(egui::RichText::new(&self.view.status).weak());
                    });
                });
            });
    }

    fn show_start_screen(&mut self, ctx: &egui::Context) -> Option<PlayerIntent> {
        let mut intent = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            let card_width = avail.x.clamp(440.0, 620.0);
            ui.add_space((avail.y * 0.12).clamp(18.0, 90.0));

            ui.vertical_centered(|ui| {
                ui.set_width(card_width);
                egui::Frame::NONE
                    .fill(theme::PANEL)
                    .corner_radius(14.0)
                    .stroke(egui::Stroke::new(1.0, theme::BORDER))
                    .inner_margin(egui::Margin::symmetric(20, 18))
                    .show(ui, |ui| {
                        ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 10.0);
                        ui.heading("Maestro: A Medieval Adventure");
                        ui.label(format!(
                            "Embark on a journey through 13th century England with your companion, {}.",
                            self.view.session.companion_name()
                        ));

                        self.show_status_banner(ui);
                        widgets::objectives_panel(ui, &self.view.objectives);
                        ui.add_space(10.0);

                        let button = egui::Button::new(
                            egui::RichText::new("Begin Your Adventure").strong().size(16.0),
                        )
                        .fill(theme::ACCENT.gamma_multiply(0.7))
                        .min_size(egui::vec2(ui.available_width(), 40.0));
                        if ui.add(button).clicked() {
                            intent = Some(PlayerIntent::Start);
                        }
                    });
            });
        });
        intent
    }

    fn show_side_panel(&self, ctx: &egui::Context) {
        let session = &self.view.session;
        if session.player().is_none() && session.facts().is_empty() {
            return;
        }

        egui::SidePanel::right("stats_panel")
            .resizable(true)
            .default_width(280.0)
            .min_width(220.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add_space(8.0);
                    if let Some(player) = session.player() {
                        widgets::stat_panel(ui, player, session.scoring());
                        ui.add_space(10.0);
                    }
                    widgets::fact_panel(ui, session.facts());
                });
            });
    }

    fn show_game_screen(&mut self, ctx: &egui::Context) -> Option<PlayerIntent> {
        self.show_side_panel(ctx);

        let mut intent = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);

            if self.view.is_busy() {
                let label = match self.view.session.pending().map(|pending| pending.kind()) {
                    Some(RequestKind::Action) => "Your companion considers...",
                    _ => "Loading your adventure...",
                };
                widgets::loading_indicator(ui, label);
                return;
            }

            let Some(scene) = self.view.session.scene() else {
                return;
            };

            let picture = match (&self.view.artwork, &self.scene_texture) {
                (None, _) => widgets::ScenePicture::None,
                (
                    Some(SceneArtwork {
                        state: ArtworkState::Failed(reason),
                        ..
                    }),
                    _,
                ) => widgets::ScenePicture::Failed(reason),
                (Some(artwork), Some((url, texture))) if url == &artwork.url => {
                    widgets::ScenePicture::Ready(texture)
                }
                (Some(_), _) => widgets::ScenePicture::Loading,
            };

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    widgets::scene_view(ui, &scene.description, picture);
                    ui.add_space(12.0);

                    match self.view.session.reply() {
                        Some(reply) => {
                            let voice = match &self.view.voice {
                                None => widgets::VoiceLine::None,
                                Some(voice) => match &voice.state {
                                    VoiceState::Loading => widgets::VoiceLine::Loading,
                                    VoiceState::Ready(_) => widgets::VoiceLine::Ready,
                                    VoiceState::Failed(reason) => widgets::VoiceLine::Failed(reason),
                                },
                            };
                            widgets::dialogue_view(ui, reply, voice, &mut self.audio);
                            ui.add_space(10.0);
                            if self.view.session.shows_continue() {
                                let button = egui::Button::new(
                                    egui::RichText::new("Continue").strong().size(16.0),
                                )
                                .fill(theme::ACCENT.gamma_multiply(0.7))
                                .min_size(egui::vec2(ui.available_width(), 38.0));
                                if ui.add(button).clicked() {
                                    intent = Some(PlayerIntent::Continue);
                                }
                            }
                        }
                        None => {
                            let choices = self.view.session.actionable_choices();
                            if let Some(index) = widgets::choice_list(ui, choices, true) {
                                intent = Some(PlayerIntent::Choose(index));
                            }
                        }
                    }
                });
        });
        intent
    }
}

impl eframe::App for GameApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            theme::apply(ctx);
            self.theme_applied = true;
        }

        self.process_ui_events();
        self.sync_scene_texture(ctx);
        self.sync_dialogue_audio();

        self.show_top_bar(ctx);
        let intent = if self.view.session.has_started() {
            self.show_game_screen(ctx)
        } else {
            self.show_start_screen(ctx)
        };
        if let Some(intent) = intent {
            self.handle_intent(intent);
        }

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
