use eframe::egui::{self, Color32, RichText, Sense, Stroke, Ui};

use super::super::ViewModel;
use super::super::render_utils::{CanvasTransform, draw_background};

const HOVER_OUTLINE: Stroke = Stroke {
    width: 2.0,
    color: Color32::BLACK,
};

impl ViewModel {
    pub(in crate::app) fn draw_chart(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let canvas = self.chart.geometry().size();
        let transform = CanvasTransform::fit(rect, canvas);

        draw_background(&painter, rect, transform.canvas_rect(canvas));

        // One tick per frame; the layout keeps requesting frames until it cools.
        if self.chart.tick() {
            ui.ctx().request_repaint();
        }

        self.hovered = self.hovered_index(ui, transform, &response);

        for bubble in self.chart.bubbles() {
            let center = transform.to_screen(bubble.position);
            let radius = (bubble.radius * transform.scale()).max(1.0);
            painter.circle_filled(center, radius, bubble.paint.fill);

            let stroke = if self.hovered == Some(bubble.index) {
                HOVER_OUTLINE
            } else {
                Stroke::new(1.0, bubble.paint.stroke)
            };
            painter.circle_stroke(center, radius, stroke);
        }

        self.draw_category_titles(&painter, transform);
        self.draw_legend(&painter, transform);

        if let Some(index) = self.hovered
            && let Some(tooltip) = self.chart.tooltip(index)
        {
            response.clone().on_hover_ui_at_pointer(|ui| {
                ui.label(RichText::new(tooltip.title.as_str()).strong());
                egui::Grid::new("bubble_tooltip")
                    .num_columns(2)
                    .spacing([12.0, 2.0])
                    .show(ui, |ui| {
                        for (label, value) in &tooltip.rows {
                            ui.weak(*label);
                            ui.label(value.as_str());
                            ui.end_row();
                        }
                    });
            });
        }

        self.handle_bubble_click(ui, &response);
    }
}
