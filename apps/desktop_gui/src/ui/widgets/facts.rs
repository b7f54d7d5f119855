use shared::protocol::HistoricalFact;

use crate::ui::theme;

pub fn fact_panel(ui: &mut egui::Ui, facts: &[HistoricalFact]) {
    if facts.is_empty() {
        return;
    }

    theme::card_frame().show(ui, |ui| {
        ui.label(egui::RichText::new("Historical Context").strong().size(16.0));
        ui.add_space(4.0);
        for fact in facts {
            ui.label(egui::RichText::new(&fact.title).strong().color(theme::ACCENT));
            ui.label(egui::RichText::new(&fact.content).color(theme::TEXT));
            ui.add_space(6.0);
        }
    });
}
