//! Colours and frames shared by the game screens.

pub const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(34, 28, 22);
pub const PANEL: egui::Color32 = egui::Color32::from_rgb(52, 43, 33);
pub const CHOICE_FILL: egui::Color32 = egui::Color32::from_rgb(70, 57, 42);
pub const BORDER: egui::Color32 = egui::Color32::from_rgb(122, 98, 64);
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(212, 170, 92);
pub const TEXT: egui::Color32 = egui::Color32::from_rgb(236, 226, 206);
pub const MUTED_TEXT: egui::Color32 = egui::Color32::from_rgb(170, 156, 132);

pub fn card_frame() -> egui::Frame {
    egui::Frame::NONE
        .fill(PANEL)
        .corner_radius(12.0)
        .stroke(egui::Stroke::new(1.0, BORDER))
        .inner_margin(egui::Margin::symmetric(14, 12))
}

pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = PANEL;
    visuals.override_text_color = Some(TEXT);
    visuals.selection.bg_fill = ACCENT.gamma_multiply(0.6);
    ctx.set_visuals(visuals);
}
