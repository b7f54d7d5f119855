use crate::ui::theme;

pub fn loading_indicator(ui: &mut egui::Ui, label: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(24.0);
        ui.add(egui::Spinner::new().size(32.0).color(theme::ACCENT));
        ui.add_space(8.0);
        ui.label(egui::RichText::new(label).italics().color(theme::MUTED_TEXT));
        ui.add_space(24.0);
    });
}
