use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, pos2};

/// Buffer between a clipped edge end and the card border, leaving room for
/// the arrow tip.
const ARROW_GAP: f32 = 5.0;

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(250, 250, 250);
pub(super) const GRID_LINE: Color32 = Color32::from_rgb(235, 235, 235);
pub(super) const CARD_FILL: Color32 = Color32::WHITE;
pub(super) const CARD_BORDER: Color32 = Color32::from_rgb(209, 213, 219);
pub(super) const INK: Color32 = Color32::from_rgb(26, 26, 26);
pub(super) const EDGE_DEFAULT: Color32 = Color32::from_rgb(229, 229, 229);
pub(super) const TAG_TEXT: Color32 = Color32::from_rgb(156, 163, 175);

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, BACKGROUND);

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [pos2(x, rect.top()), pos2(x, rect.bottom())],
            Stroke::new(1.0, GRID_LINE),
        );
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [pos2(rect.left(), y), pos2(rect.right(), y)],
            Stroke::new(1.0, GRID_LINE),
        );
        y += step;
    }
}

/// Where the line from `source` should stop so it touches the border of the
/// target card instead of burying itself under the card center. The card
/// half-extents are inflated by the arrow gap. Both points are world space.
pub(super) fn edge_endpoint(source: Vec2, target: Vec2, target_size: Vec2) -> Vec2 {
    let half_width = target_size.x / 2.0 + ARROW_GAP;
    let half_height = target_size.y / 2.0 + ARROW_GAP;

    let delta = source - target;
    if delta.x == 0.0 && delta.y == 0.0 {
        return target;
    }

    let scale_x = if delta.x == 0.0 {
        f32::INFINITY
    } else {
        half_width / delta.x.abs()
    };
    let scale_y = if delta.y == 0.0 {
        f32::INFINITY
    } else {
        half_height / delta.y.abs()
    };

    target + delta * scale_x.min(scale_y)
}

/// Corner points of the triangular direction marker sitting at `tip`,
/// pointing along `direction` (screen space, need not be normalized).
pub(super) fn arrowhead_points(tip: Pos2, direction: Vec2, size: f32) -> Option<[Pos2; 3]> {
    let length = direction.length();
    if length <= f32::EPSILON {
        return None;
    }

    let forward = direction / length;
    let side = Vec2::new(-forward.y, forward.x);
    let base = tip - forward * size;

    Some([
        tip,
        base + side * (size * 0.45),
        base - side * (size * 0.45),
    ])
}
