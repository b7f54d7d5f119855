use crate::ui::theme;

/// What to show above the scene description.
#[derive(Clone, Copy)]
pub enum ScenePicture<'a> {
    None,
    Loading,
    Ready(&'a egui::TextureHandle),
    Failed(&'a str),
}

pub fn scene_view(ui: &mut egui::Ui, description: &str, picture: ScenePicture<'_>) {
    let width = ui.available_width();
    match picture {
        ScenePicture::Ready(texture) => {
            let size = texture.size_vec2();
            let scale = (width / size.x.max(1.0)).min(1.0);
            ui.vertical_centered(|ui| {
                ui.add(egui::Image::new((texture.id(), size * scale)));
            });
        }
        ScenePicture::Loading | ScenePicture::None | ScenePicture::Failed(_) => {
            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(width, width * 9.0 / 16.0), egui::Sense::hover());
            ui.painter()
                .rect_filled(rect, egui::CornerRadius::same(12), theme::PANEL);
            ui.painter().rect_stroke(
                rect,
                egui::CornerRadius::same(12),
                egui::Stroke::new(1.0, theme::BORDER),
                egui::StrokeKind::Middle,
            );
            let caption = match picture {
                ScenePicture::Loading => "Loading scene image...",
                ScenePicture::Failed(_) => "The scene image could not be loaded",
                _ => "",
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                caption,
                egui::FontId::proportional(15.0),
                theme::MUTED_TEXT,
            );
            if let ScenePicture::Failed(reason) = picture {
                response.on_hover_text(reason);
            }
        }
    }

    ui.add_space(10.0);
    ui.label(egui::RichText::new(description).size(17.0).color(theme::TEXT));
}
