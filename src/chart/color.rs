use std::collections::HashMap;

use eframe::egui::Color32;
use serde::Serialize;

use crate::budget::Growth;

/// Fill used for undefined growth, for both fill and stroke.
pub const UNDEFINED_GROWTH: Color32 = Color32::BLACK;

const KNOWN_CATEGORIES: [(&str, Color32); 2] = [
    ("Budgetary department", Color32::from_rgb(0x7a, 0xa2, 0x5c)),
    ("Non-departmental", Color32::from_rgb(0x50, 0x9c, 0xe7)),
];

const FALLBACK_PALETTE: [Color32; 6] = [
    Color32::from_rgb(0xe0, 0x8e, 0x45),
    Color32::from_rgb(0x9c, 0x6a, 0xc9),
    Color32::from_rgb(0xd4, 0x5d, 0x79),
    Color32::from_rgb(0x4c, 0xb0, 0xa5),
    Color32::from_rgb(0xc9, 0xb2, 0x3f),
    Color32::from_rgb(0x7f, 0x7f, 0x7f),
];

const GROWTH_NEGATIVE: Color32 = Color32::from_rgb(0xc0, 0x00, 0x00);
const GROWTH_NEUTRAL: Color32 = Color32::from_rgb(0xff, 0xff, 0xff);
const GROWTH_POSITIVE: Color32 = Color32::from_rgb(0x00, 0xc0, 0x00);
const GROWTH_DOMAIN: f64 = 100.0;
const GROWTH_EXPONENT: f64 = 0.5;

const GROWTH_LEGEND_STOPS: [(f64, &str); 9] = [
    (100.0, "100% +"),
    (50.0, "50%"),
    (25.0, "25%"),
    (12.5, "12.5%"),
    (0.0, "0%"),
    (-12.5, "-12.5%"),
    (-25.0, "-25%"),
    (-50.0, "-50%"),
    (-100.0, "-100%"),
];

/// Fill and stroke for one bubble.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BubblePaint {
    pub fill: Color32,
    pub stroke: Color32,
}

impl BubblePaint {
    fn with_darker_stroke(fill: Color32) -> Self {
        Self {
            fill,
            stroke: darker(fill),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    #[serde(serialize_with = "serialize_color")]
    pub fill: Color32,
    #[serde(serialize_with = "serialize_color")]
    pub stroke: Color32,
    pub label: String,
}

pub fn hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

pub fn serialize_color<S: serde::Serializer>(
    color: &Color32,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex(*color))
}

/// One step darker, matching the usual 0.7 channel factor.
pub fn darker(color: Color32) -> Color32 {
    const FACTOR: f32 = 0.7;
    Color32::from_rgb(
        (color.r() as f32 * FACTOR).round() as u8,
        (color.g() as f32 * FACTOR).round() as u8,
        (color.b() as f32 * FACTOR).round() as u8,
    )
}

fn lerp_color(from: Color32, to: Color32, t: f64) -> Color32 {
    let channel = |a: u8, b: u8| {
        (a as f64 + (b as f64 - a as f64) * t)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Color32::from_rgb(
        channel(from.r(), to.r()),
        channel(from.g(), to.g()),
        channel(from.b(), to.b()),
    )
}

/// One-to-one category colors. The two known categories always hold the first slots, even when
/// the data has none of them; other categories follow in first-seen order on a fallback palette.
#[derive(Clone, Debug)]
pub struct CategoryPalette {
    order: Vec<String>,
    colors: HashMap<String, Color32>,
}

impl CategoryPalette {
    pub fn new(categories: &[String]) -> Self {
        let mut order = KNOWN_CATEGORIES
            .iter()
            .map(|(name, _)| (*name).to_owned())
            .collect::<Vec<_>>();
        for category in categories {
            if !order.contains(category) {
                order.push(category.clone());
            }
        }

        let mut fallback = FALLBACK_PALETTE.iter().copied().cycle();
        let colors = order
            .iter()
            .map(|category| {
                let color = KNOWN_CATEGORIES
                    .iter()
                    .find(|(name, _)| name == category)
                    .map(|(_, color)| *color)
                    .or_else(|| fallback.next())
                    .unwrap_or(Color32::GRAY);
                (category.clone(), color)
            })
            .collect();

        Self { order, colors }
    }

    /// Categories in legend and layout order.
    pub fn categories(&self) -> &[String] {
        &self.order
    }

    pub fn slot(&self, category: &str) -> Option<usize> {
        self.order.iter().position(|known| known == category)
    }

    pub fn fill(&self, category: &str) -> Color32 {
        self.colors.get(category).copied().unwrap_or(Color32::GRAY)
    }

    pub fn paint(&self, category: &str) -> BubblePaint {
        BubblePaint::with_darker_stroke(self.fill(category))
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        self.order
            .iter()
            .map(|category| {
                let paint = self.paint(category);
                LegendEntry {
                    fill: paint.fill,
                    stroke: paint.stroke,
                    label: category.clone(),
                }
            })
            .collect()
    }
}

/// Diverging red/white/green scale over percent growth, square-root weighted and clamped to ±100%.
pub fn growth_fill(percent: f64) -> Color32 {
    let clamped = percent.clamp(-GROWTH_DOMAIN, GROWTH_DOMAIN);
    let weighted = clamped.abs().powf(GROWTH_EXPONENT) / GROWTH_DOMAIN.powf(GROWTH_EXPONENT);
    if clamped < 0.0 {
        lerp_color(GROWTH_NEUTRAL, GROWTH_NEGATIVE, weighted)
    } else {
        lerp_color(GROWTH_NEUTRAL, GROWTH_POSITIVE, weighted)
    }
}

pub fn growth_paint(growth: Growth) -> BubblePaint {
    match growth {
        Growth::Percent(percent) if percent.is_finite() => {
            BubblePaint::with_darker_stroke(growth_fill(percent))
        }
        _ => BubblePaint {
            fill: UNDEFINED_GROWTH,
            stroke: UNDEFINED_GROWTH,
        },
    }
}

pub fn growth_legend() -> Vec<LegendEntry> {
    GROWTH_LEGEND_STOPS
        .iter()
        .map(|(value, label)| {
            let fill = growth_fill(*value);
            LegendEntry {
                fill,
                stroke: fill,
                label: (*label).to_owned(),
            }
        })
        .chain(std::iter::once(LegendEntry {
            fill: UNDEFINED_GROWTH,
            stroke: UNDEFINED_GROWTH,
            label: "Undefined".to_owned(),
        }))
        .collect()
}
