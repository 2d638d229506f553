use eframe::egui::{Vec2, vec2};

/// Layout anchors derived from the canvas size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartGeometry {
    pub width: f32,
    pub height: f32,
}

impl ChartGeometry {
    pub fn from_width(width: f32) -> Self {
        Self {
            width,
            height: width * 5.0 / 9.0,
        }
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    pub fn canvas_center(&self) -> Vec2 {
        self.size() * 0.5
    }

    pub fn shared_center(&self) -> Vec2 {
        vec2(self.width * 0.37, self.height * 0.50)
    }

    pub fn category_center(&self, slot: usize, slots: usize) -> Vec2 {
        vec2(
            self.width * spread(0.27, 0.47, slot, slots),
            self.height * 0.51,
        )
    }

    pub fn category_title(&self, slot: usize, slots: usize) -> Vec2 {
        vec2(
            self.width * spread(0.17, 0.52, slot, slots),
            self.height * 0.15,
        )
    }

    pub fn legend_origin(&self) -> Vec2 {
        vec2(self.width * 0.72, self.height * 0.50)
    }
}

/// Evenly spaced fraction between `first` and `last`; a single slot sits midway.
fn spread(first: f32, last: f32, slot: usize, slots: usize) -> f32 {
    if slots <= 1 {
        return (first + last) * 0.5;
    }
    first + (last - first) * (slot as f32 / (slots - 1) as f32)
}
