use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, RichText, Sense, Shape, Stroke, Ui, pos2,
    vec2,
};

use crate::chart::{DetailView, TrendPoint, ViewCommand};
use crate::util::format_amount;

use super::super::ViewModel;
use super::super::render_utils::{LABEL_COLOR, MUTED_LABEL_COLOR, lerp_axis};

const SALARIES_COLOR: Color32 = Color32::from_rgb(70, 130, 180);
const OTHER_COLOR: Color32 = Color32::from_rgb(0, 100, 0);
const AXIS_STROKE: Stroke = Stroke {
    width: 1.0,
    color: Color32::from_gray(90),
};
const Y_TICKS: usize = 5;
const PLOT_MARGIN_LEFT: f32 = 64.0;
const PLOT_MARGIN_BOTTOM: f32 = 28.0;
const PLOT_MARGIN_TOP: f32 = 12.0;
const PLOT_MARGIN_RIGHT: f32 = 120.0;

/// Screen mapping for the trend plot.
#[derive(Clone, Copy, Debug, PartialEq)]
struct TrendScale {
    plot: Rect,
    years: (f64, f64),
    values: (f64, f64),
}

impl TrendScale {
    fn new(view: &DetailView, plot: Rect) -> Option<Self> {
        let years = view.x_domain.as_ref()?;
        let values = view.y_domain.as_ref()?;
        Some(Self {
            plot,
            years: (f64::from(*years.start()), f64::from(*years.end())),
            values: (*values.start(), *values.end()),
        })
    }

    fn x(&self, year: i32) -> f32 {
        lerp_axis(f64::from(year), self.years, (self.plot.left(), self.plot.right()))
    }

    fn y(&self, value: f64) -> f32 {
        lerp_axis(value, self.values, (self.plot.bottom(), self.plot.top()))
    }

    fn point(&self, year: i32, value: f64) -> Pos2 {
        pos2(self.x(year), self.y(value))
    }

    fn y_ticks(&self) -> Vec<f64> {
        let (low, high) = self.values;
        if (high - low).abs() < f64::EPSILON {
            return vec![low];
        }
        (0..Y_TICKS)
            .map(|step| low + (high - low) * step as f64 / (Y_TICKS - 1) as f64)
            .collect()
    }
}

fn series_line(
    scale: &TrendScale,
    points: &[TrendPoint],
    value: fn(&TrendPoint) -> f64,
) -> Vec<Pos2> {
    points
        .iter()
        .map(|point| scale.point(point.year, value(point)))
        .collect()
}

fn draw_trend(painter: &Painter, scale: &TrendScale, view: &DetailView) {
    let plot = scale.plot;
    painter.line_segment([plot.left_bottom(), plot.right_bottom()], AXIS_STROKE);
    painter.line_segment([plot.left_bottom(), plot.left_top()], AXIS_STROKE);

    for point in &view.points {
        let x = scale.x(point.year);
        painter.line_segment(
            [pos2(x, plot.bottom()), pos2(x, plot.bottom() + 4.0)],
            AXIS_STROKE,
        );
        painter.text(
            pos2(x, plot.bottom() + 6.0),
            Align2::CENTER_TOP,
            point.year.to_string(),
            FontId::proportional(11.0),
            MUTED_LABEL_COLOR,
        );
    }

    for tick in scale.y_ticks() {
        let y = scale.y(tick);
        painter.line_segment([pos2(plot.left() - 4.0, y), pos2(plot.left(), y)], AXIS_STROKE);
        painter.text(
            pos2(plot.left() - 6.0, y),
            Align2::RIGHT_CENTER,
            format!("{tick:.1}"),
            FontId::proportional(11.0),
            MUTED_LABEL_COLOR,
        );
    }
    painter.text(
        plot.left_top() - vec2(PLOT_MARGIN_LEFT - 4.0, PLOT_MARGIN_TOP),
        Align2::LEFT_TOP,
        "$ (Millions)",
        FontId::proportional(11.0),
        LABEL_COLOR,
    );

    let series = [
        (
            "Salaries",
            SALARIES_COLOR,
            series_line(scale, &view.points, |point| point.salaries),
        ),
        (
            "Other",
            OTHER_COLOR,
            series_line(scale, &view.points, |point| point.other),
        ),
    ];
    for (row, (label, color, line)) in series.into_iter().enumerate() {
        for vertex in &line {
            painter.circle_filled(*vertex, 3.0, color);
        }
        if line.len() > 1 {
            painter.add(Shape::line(line, Stroke::new(2.0, color)));
        }

        let key = plot.right_top() + vec2(16.0, 8.0 + row as f32 * 20.0);
        painter.line_segment([key, key + vec2(18.0, 0.0)], Stroke::new(2.0, color));
        painter.text(
            key + vec2(24.0, 0.0),
            Align2::LEFT_CENTER,
            label,
            FontId::proportional(12.0),
            LABEL_COLOR,
        );
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let Some(view) = self.chart.detail().cloned() else {
            return;
        };

        let mut exit_requested = false;
        ui.horizontal(|ui| {
            ui.heading(view.name.as_str());
            if ui.button("Exit").clicked() {
                exit_requested = true;
            }
        });
        if !view.description.is_empty() {
            ui.label(view.description.as_str());
        }
        ui.add_space(8.0);

        let plot_height = (ui.available_height() * 0.55).clamp(160.0, 420.0);
        let (rect, _) =
            ui.allocate_exact_size(vec2(ui.available_width(), plot_height), Sense::hover());
        let plot = Rect::from_min_max(
            rect.min + vec2(PLOT_MARGIN_LEFT, PLOT_MARGIN_TOP),
            rect.max - vec2(PLOT_MARGIN_RIGHT, PLOT_MARGIN_BOTTOM),
        );
        let painter = ui.painter_at(rect);

        match TrendScale::new(&view, plot) {
            Some(scale) => draw_trend(&painter, &scale, &view),
            None => {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    "Only one fiscal year is available; there is no trend to show.",
                    FontId::proportional(13.0),
                    MUTED_LABEL_COLOR,
                );
            }
        }

        ui.add_space(8.0);
        egui::ScrollArea::vertical()
            .id_salt("detail_years_scroll")
            .auto_shrink([false, true])
            .show(ui, |ui| {
                egui::Grid::new("detail_years")
                    .num_columns(4)
                    .striped(true)
                    .spacing([24.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Year", "Budget", "Salaries", "Other"] {
                            ui.label(RichText::new(header).strong());
                        }
                        ui.end_row();

                        for point in &view.points {
                            ui.label(point.year.to_string());
                            for millions in [point.budget, point.salaries, point.other] {
                                ui.label(format_amount(millions * 1_000_000.0));
                            }
                            ui.end_row();
                        }
                    });
            });

        if exit_requested {
            self.apply_command(ViewCommand::Deselect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::fixtures::two_node_set;

    fn plot() -> Rect {
        Rect::from_min_max(pos2(0.0, 0.0), pos2(200.0, 100.0))
    }

    #[test]
    fn single_point_window_is_centered() {
        let set = two_node_set();
        let view = DetailView::build(&set.nodes[0], &set.axis);
        let scale = TrendScale::new(&view, plot()).unwrap();

        assert_eq!(scale.x(2017), 100.0);
        assert_eq!(scale.y_ticks().len(), 5);
    }

    #[test]
    fn values_map_bottom_to_top() {
        let scale = TrendScale {
            plot: plot(),
            years: (2016.0, 2018.0),
            values: (0.0, 10.0),
        };

        assert_eq!(scale.point(2016, 0.0), pos2(0.0, 100.0));
        assert_eq!(scale.point(2018, 10.0), pos2(200.0, 0.0));
        assert_eq!(scale.y_ticks(), vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    }
}
