use shared::protocol::{Alignment, PlayerState, Scoring};

use crate::ui::theme;

const CHART_SIZE: f32 = 150.0;

pub fn stat_panel(ui: &mut egui::Ui, player: &PlayerState, scoring: Option<&Scoring>) {
    theme::card_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(egui::RichText::new("Character Stats").strong().size(16.0));
        ui.add_space(4.0);

        ui.label(format!("Alignment: {}", player.alignment.label()));
        alignment_chart(ui, &player.alignment);
        ui.add_space(6.0);

        stat_bar(ui, "Experience", player.experience_fraction(), player.experience.round() as i64);
        stat_bar(ui, "Score", player.score_fraction(), player.rounded_score());

        if !player.skills.is_empty() {
            ui.add_space(4.0);
            ui.label(egui::RichText::new("Skills").strong());
            for (skill, level) in &player.skills {
                ui.horizontal(|ui| {
                    ui.label(skill.as_str());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!("{level}"));
                    });
                });
            }
        }

        if let Some(scoring) = scoring {
            scoring_breakdown(ui, scoring);
        }

        if let Some(feedback) = &player.feedback {
            ui.add_space(4.0);
            ui.label(egui::RichText::new(feedback).italics().color(theme::MUTED_TEXT));
        }
    });
}

fn stat_bar(ui: &mut egui::Ui, label: &str, fraction: f32, value: i64) {
    ui.label(label);
    ui.add(
        egui::ProgressBar::new(fraction)
            .fill(theme::ACCENT)
            .text(value.to_string()),
    );
}

fn scoring_breakdown(ui: &mut egui::Ui, scoring: &Scoring) {
    let rows = [
        ("Alignment", scoring.alignment),
        ("Creativity", scoring.creativity),
        ("Strategy", scoring.strategy),
        ("Roleplay", scoring.roleplay),
        ("Total", scoring.total),
    ];
    if rows.iter().all(|(_, value)| value.is_none()) {
        return;
    }

    ui.add_space(4.0);
    ui.label(egui::RichText::new("Last choice").strong());
    egui::Grid::new("scoring_breakdown")
        .num_columns(2)
        .show(ui, |ui| {
            for (label, value) in rows {
                if let Some(value) = value {
                    ui.label(label);
                    ui.label(format!("{value:+}"));
                    ui.end_row();
                }
            }
        });
}

fn alignment_chart(ui: &mut egui::Ui, alignment: &Alignment) {
    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(CHART_SIZE, CHART_SIZE), egui::Sense::hover());
    let painter = ui.painter();
    let stroke = egui::Stroke::new(1.0, theme::BORDER);

    painter.rect_filled(rect, egui::CornerRadius::same(6), theme::BACKGROUND);
    painter.rect_stroke(
        rect,
        egui::CornerRadius::same(6),
        stroke,
        egui::StrokeKind::Middle,
    );
    painter.line_segment(
        [
            egui::pos2(rect.center().x, rect.top()),
            egui::pos2(rect.center().x, rect.bottom()),
        ],
        stroke,
    );
    painter.line_segment(
        [
            egui::pos2(rect.left(), rect.center().y),
            egui::pos2(rect.right(), rect.center().y),
        ],
        stroke,
    );

    let font = egui::FontId::proportional(10.0);
    for (anchor, align, text) in [
        (rect.center_top(), egui::Align2::CENTER_TOP, "Good"),
        (rect.center_bottom(), egui::Align2::CENTER_BOTTOM, "Evil"),
        (rect.left_center(), egui::Align2::LEFT_CENTER, "Chaotic"),
        (rect.right_center(), egui::Align2::RIGHT_CENTER, "Lawful"),
    ] {
        painter.text(anchor, align, text, font.clone(), theme::MUTED_TEXT);
    }

    painter.circle_filled(chart_marker(rect, alignment), 5.0, theme::ACCENT);
    response.on_hover_text(format!(
        "Law/Chaos {}, Good/Evil {}",
        alignment.law_chaos, alignment.good_evil
    ));
}

/// Lawful to the right, good at the top.
fn chart_marker(rect: egui::Rect, alignment: &Alignment) -> egui::Pos2 {
    let (x, y) = alignment.chart_position();
    egui::pos2(
        rect.left() + x * rect.width(),
        rect.bottom() - y * rect.height(),
    )
}
