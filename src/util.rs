use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_owned();
    }

    let rounded = value.abs().round() as u64;
    let digits = rounded.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if value < 0.0 && rounded > 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(value) if value.is_finite() => format!("{value:.1}%"),
        _ => "Undefined".to_owned(),
    }
}

pub fn short_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_owned();
    }

    let mut truncated = name
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    truncated.push('…');
    truncated
}

/// Deterministic pair in `[0, 1)` derived from `id`.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    (unit_fraction(hash), unit_fraction(hash >> 40))
}

/// Low 24 bits of `bits` as an exact `f32` fraction in `[0, 1)`.
fn unit_fraction(bits: u64) -> f32 {
    const MANTISSA_BITS: u32 = 24;
    let masked = bits & ((1 << MANTISSA_BITS) - 1);
    masked as f32 / (1u32 << MANTISSA_BITS) as f32
}
