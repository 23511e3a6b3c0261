use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic pseudo-random pair in [-1, 1] derived from an id, so a note
/// entering the map always starts from the same spot.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

pub fn content_preview(content: &str, max_chars: usize) -> String {
    let flattened = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }

    let mut preview = flattened.chars().take(max_chars).collect::<String>();
    preview.push('…');
    preview
}

#[cfg(test)]
mod tests {
    use super::{content_preview, stable_pair};

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let (x1, y1) = stable_pair("note-a");
        let (x2, y2) = stable_pair("note-a");
        assert_eq!((x1, y1), (x2, y2));
        assert!((-1.0..=1.0).contains(&x1));
        assert!((-1.0..=1.0).contains(&y1));
    }

    #[test]
    fn content_preview_flattens_and_truncates() {
        assert_eq!(content_preview("one\ntwo   three", 64), "one two three");
        let long = "abcdefghij".repeat(10);
        let preview = content_preview(&long, 12);
        assert_eq!(preview.chars().count(), 13);
        assert!(preview.ends_with('…'));
    }
}
