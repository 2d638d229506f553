use eframe::egui::Vec2;

use super::quadtree::QuadNode;

/// Velocity nudge on bubble `index` from every other charge, written into `previous`.
///
/// Cells far enough away (side / distance below `theta`) act as a single charge
/// at their charge-weighted centroid.
pub(super) fn accumulate_charge_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    charges: &[f32],
    alpha: f32,
    theta: f32,
    previous: &mut Vec2,
) {
    if node.indices.is_empty() && node.is_leaf() {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index == index {
                continue;
            }
            apply_charge(point, positions[other_index], charges[other_index], alpha, previous);
        }
        return;
    }

    let delta = node.center_of_charge - point;
    let distance = delta.length();
    let can_approximate = distance > 0.0
        && !node.bounds.contains(point)
        && (node.bounds.side_length() / distance) < theta;

    if can_approximate {
        apply_charge(point, node.center_of_charge, node.charge, alpha, previous);
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_charge_for_node(child, index, positions, charges, alpha, theta, previous);
    }
}

fn apply_charge(point: Vec2, source: Vec2, charge: f32, alpha: f32, previous: &mut Vec2) {
    let delta = source - point;
    let distance_sq = delta.length_sq();
    if distance_sq <= 0.0 {
        return;
    }
    let k = alpha * charge / distance_sq;
    *previous -= delta * k;
}

/// Pull toward `anchor` proportional to the remaining distance.
pub(super) fn pull_towards(position: &mut Vec2, anchor: Vec2, strength: f32) {
    *position += (anchor - *position) * strength;
}
