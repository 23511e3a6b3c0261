use eframe::egui::{Vec2, vec2};

use super::super::MapNode;
use super::{COLLISION_PADDING, REPULSION, SPRING_LENGTH, SPRING_STIFFNESS};

/// Velocity impulse pushing the node at `point` away from `other`.
/// Squared distance is floored at 1 so coincident centers cannot produce a
/// non-finite force; the collision pass separates exact overlaps instead.
pub(super) fn repulsion_between(point: Vec2, other: Vec2) -> Vec2 {
    let delta = point - other;
    let distance_sq = delta.length_sq().max(1.0);
    let distance = distance_sq.sqrt();
    let direction = delta / distance;
    direction * (REPULSION / distance_sq)
}

/// Spring impulse on the node at `point` toward (or away from) its linked
/// neighbor at `target`, proportional to the offset from the ideal length.
pub(super) fn spring_pull(point: Vec2, target: Vec2) -> Vec2 {
    let delta = target - point;
    let distance = delta.length().max(1.0);
    let direction = delta / distance;
    direction * ((distance - SPRING_LENGTH) * SPRING_STIFFNESS)
}

/// One hard collision pass: every pair of card rectangles, inflated by the
/// padding margin, is pushed apart along the smaller-overlap axis by half
/// the overlap each, damping that axis's velocity.
pub(super) fn resolve_collisions(nodes: &mut [MapNode]) {
    for first in 0..nodes.len() {
        for second in (first + 1)..nodes.len() {
            let delta = nodes[second].world_pos - nodes[first].world_pos;
            let min_gap = (nodes[first].size + nodes[second].size) * 0.5
                + vec2(COLLISION_PADDING, COLLISION_PADDING);

            if delta.x.abs() >= min_gap.x || delta.y.abs() >= min_gap.y {
                continue;
            }

            let overlap_x = min_gap.x - delta.x.abs();
            let overlap_y = min_gap.y - delta.y.abs();

            if overlap_x < overlap_y {
                let shift = overlap_x / 2.0;
                let sign = if delta.x > 0.0 { 1.0 } else { -1.0 };
                nodes[first].world_pos.x -= shift * sign;
                nodes[second].world_pos.x += shift * sign;
                nodes[first].velocity.x *= 0.5;
                nodes[second].velocity.x *= 0.5;
            } else {
                let shift = overlap_y / 2.0;
                let sign = if delta.y > 0.0 { 1.0 } else { -1.0 };
                nodes[first].world_pos.y -= shift * sign;
                nodes[second].world_pos.y += shift * sign;
                nodes[first].velocity.y *= 0.5;
                nodes[second].velocity.y *= 0.5;
            }
        }
    }
}
