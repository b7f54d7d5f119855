use crate::ui::theme;

/// Draws one button per choice; returns the index the player picked this frame.
pub fn choice_list(ui: &mut egui::Ui, choices: &[String], enabled: bool) -> Option<usize> {
    if choices.is_empty() {
        return None;
    }

    let mut picked = None;
    ui.label(egui::RichText::new("What will you do?").strong().size(16.0));
    ui.add_space(4.0);
    for (index, choice) in choices.iter().enumerate() {
        let button = egui::Button::new(
            egui::RichText::new(format!("{}. {choice}", index + 1)).color(theme::TEXT),
        )
        .fill(theme::CHOICE_FILL)
        .stroke(egui::Stroke::new(1.0, theme::BORDER))
        .corner_radius(egui::CornerRadius::same(8))
        .min_size(egui::vec2(ui.available_width(), 34.0));
        if ui.add_enabled(enabled, button).clicked() {
            picked = Some(index);
        }
    }
    picked
}
