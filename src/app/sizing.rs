use eframe::egui::{Vec2, vec2};

const FONT_SIZE: f32 = 18.0;
const LINE_HEIGHT: f32 = FONT_SIZE * 1.6;
const AVERAGE_CHAR_WIDTH: f32 = 9.0;
const MIN_CARD_HEIGHT: f32 = 120.0;
const VERTICAL_PADDING: f32 = 60.0;

/// Card size for a note's text. Width is a three-tier step function of the
/// text length; height is estimated from an average chars-per-line count,
/// rounding the line count up so wrapped text is never clipped.
pub(in crate::app) fn note_dimensions(content: &str) -> Vec2 {
    let length = content.chars().count();

    let width = if length > 150 {
        320.0
    } else if length > 50 {
        260.0
    } else {
        220.0
    };

    let chars_per_line = (width / AVERAGE_CHAR_WIDTH).floor().max(1.0);
    let lines = ((length as f32) / chars_per_line).ceil().max(1.0);
    let height = (lines * LINE_HEIGHT + VERTICAL_PADDING).max(MIN_CARD_HEIGHT);

    vec2(width, height)
}

#[cfg(test)]
mod tests {
    use super::{MIN_CARD_HEIGHT, note_dimensions};

    #[test]
    fn width_steps_up_with_text_length() {
        assert_eq!(note_dimensions("short").x, 220.0);
        assert_eq!(note_dimensions(&"m".repeat(80)).x, 260.0);
        assert_eq!(note_dimensions(&"l".repeat(200)).x, 320.0);
    }

    #[test]
    fn height_never_drops_below_minimum() {
        assert_eq!(note_dimensions("").y, MIN_CARD_HEIGHT);
        assert_eq!(note_dimensions("one liner").y, MIN_CARD_HEIGHT);
    }

    #[test]
    fn height_grows_with_line_count() {
        let short = note_dimensions(&"a".repeat(200));
        let long = note_dimensions(&"a".repeat(800));
        assert_eq!(short.x, long.x);
        assert!(long.y > short.y);
    }

    #[test]
    fn sizing_is_deterministic() {
        let text = "same #note twice";
        assert_eq!(note_dimensions(text), note_dimensions(text));
    }
}
