use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

pub(super) const CANVAS_BACKGROUND: Color32 = Color32::WHITE;
pub(super) const LABEL_COLOR: Color32 = Color32::from_gray(40);
pub(super) const MUTED_LABEL_COLOR: Color32 = Color32::from_gray(110);

/// Uniform scale from chart canvas coordinates into the screen rect, letterboxed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct CanvasTransform {
    origin: Pos2,
    scale: f32,
}

impl CanvasTransform {
    pub(super) fn fit(rect: Rect, canvas: Vec2) -> Self {
        let scale = if canvas.x > 0.0 && canvas.y > 0.0 {
            (rect.width() / canvas.x).min(rect.height() / canvas.y).max(0.01)
        } else {
            1.0
        };
        let origin = rect.center() - canvas * scale * 0.5;
        Self { origin, scale }
    }

    pub(super) fn scale(self) -> f32 {
        self.scale
    }

    pub(super) fn to_screen(self, canvas: Vec2) -> Pos2 {
        self.origin + canvas * self.scale
    }

    pub(super) fn to_canvas(self, screen: Pos2) -> Vec2 {
        (screen - self.origin) / self.scale
    }

    pub(super) fn canvas_rect(self, canvas: Vec2) -> Rect {
        Rect::from_min_size(self.origin, canvas * self.scale)
    }
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, canvas_rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_gray(238));
    painter.rect_filled(canvas_rect, 0.0, CANVAS_BACKGROUND);

    let border = Stroke::new(1.0, Color32::from_gray(205));
    let corners = [
        canvas_rect.left_top(),
        canvas_rect.right_top(),
        canvas_rect.right_bottom(),
        canvas_rect.left_bottom(),
    ];
    for (index, start) in corners.iter().enumerate() {
        painter.line_segment([*start, corners[(index + 1) % corners.len()]], border);
    }
}

/// Straight interpolation of `value` from `domain` onto `range`.
/// A zero-width domain maps to the middle.
pub(super) fn lerp_axis(value: f64, domain: (f64, f64), range: (f32, f32)) -> f32 {
    let span = domain.1 - domain.0;
    let t = if span.abs() < f64::EPSILON {
        0.5
    } else {
        ((value - domain.0) / span) as f32
    };
    range.0 + (range.1 - range.0) * t
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn canvas_is_letterboxed_into_wide_rects() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(1800.0, 500.0));
        let transform = CanvasTransform::fit(rect, vec2(900.0, 500.0));

        assert_eq!(transform.scale(), 1.0);
        assert_eq!(transform.to_screen(vec2(0.0, 0.0)), pos2(450.0, 0.0));
        assert_eq!(transform.to_canvas(pos2(900.0, 250.0)), vec2(450.0, 250.0));
    }

    #[test]
    fn round_trip_through_a_scaled_rect() {
        let rect = Rect::from_min_size(pos2(10.0, 20.0), vec2(600.0, 600.0));
        let transform = CanvasTransform::fit(rect, vec2(1200.0, 1200.0 * 5.0 / 9.0));
        let canvas = vec2(321.0, 123.0);

        assert_eq!(transform.scale(), 0.5);
        assert!((transform.to_canvas(transform.to_screen(canvas)) - canvas).length() < 1e-3);
    }

    #[test]
    fn axis_interpolation_handles_flat_domains() {
        assert_eq!(lerp_axis(5.0, (0.0, 10.0), (100.0, 200.0)), 150.0);
        assert_eq!(lerp_axis(3.0, (3.0, 3.0), (100.0, 200.0)), 150.0);
        assert_eq!(lerp_axis(10.0, (0.0, 10.0), (300.0, 100.0)), 100.0);
    }
}
