use crate::controller::reducer::ObjectivesState;
use crate::ui::theme;

pub fn objectives_panel(ui: &mut egui::Ui, objectives: &ObjectivesState) {
    match objectives {
        ObjectivesState::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.weak("Loading objectives...");
            });
        }
        ObjectivesState::Unavailable => {
            ui.weak("Objectives are unavailable right now.");
        }
        ObjectivesState::Ready(objectives) => {
            if !objectives.description.is_empty() {
                ui.label(egui::RichText::new(&objectives.description).color(theme::TEXT));
                ui.add_space(6.0);
            }
            ui.label(egui::RichText::new("Objectives").strong());
            for objective in &objectives.objectives {
                ui.label(egui::RichText::new(format!("• {objective}")).color(theme::TEXT));
            }
        }
    }
}
