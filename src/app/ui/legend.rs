use eframe::egui::{Align2, FontId, Painter, Stroke, vec2};

use crate::chart::ColorScheme;

use super::super::ViewModel;
use super::super::render_utils::{CanvasTransform, LABEL_COLOR, MUTED_LABEL_COLOR};

const LEGEND_ROW_HEIGHT: f32 = 22.0;
const LEGEND_SWATCH_RADIUS: f32 = 7.0;

impl ViewModel {
    pub(in crate::app) fn draw_legend(&self, painter: &Painter, transform: CanvasTransform) {
        let entries = self.chart.legend();
        if entries.is_empty() {
            return;
        }

        let title = match self.chart.state().color_scheme {
            ColorScheme::Category => "Category",
            ColorScheme::Growth => "Annual growth in expenditures",
        };

        let origin = transform.to_screen(self.chart.geometry().legend_origin());
        let top = origin - vec2(0.0, entries.len() as f32 * LEGEND_ROW_HEIGHT * 0.5);
        painter.text(
            top - vec2(0.0, LEGEND_ROW_HEIGHT),
            Align2::LEFT_CENTER,
            title,
            FontId::proportional(14.0),
            LABEL_COLOR,
        );

        for (row, entry) in entries.iter().enumerate() {
            let center = top + vec2(LEGEND_SWATCH_RADIUS, row as f32 * LEGEND_ROW_HEIGHT);
            painter.circle_filled(center, LEGEND_SWATCH_RADIUS, entry.fill);
            painter.circle_stroke(center, LEGEND_SWATCH_RADIUS, Stroke::new(1.0, entry.stroke));
            painter.text(
                center + vec2(LEGEND_SWATCH_RADIUS + 8.0, 0.0),
                Align2::LEFT_CENTER,
                entry.label.as_str(),
                FontId::proportional(12.0),
                MUTED_LABEL_COLOR,
            );
        }
    }

    pub(in crate::app) fn draw_category_titles(
        &self,
        painter: &Painter,
        transform: CanvasTransform,
    ) {
        for title in self.chart.category_titles() {
            painter.text(
                transform.to_screen(vec2(title.x, title.y)),
                Align2::CENTER_CENTER,
                title.label,
                FontId::proportional(16.0),
                LABEL_COLOR,
            );
        }
    }
}
