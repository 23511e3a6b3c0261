use std::collections::HashSet;

use eframe::egui::{self, Rect, TouchPhase, Ui};

use super::super::MapModel;
use super::super::viewport::PointerEvent;

/// A press shorter than this is a tap (navigate to the note); anything
/// longer is a hold used to preview connections without navigating.
pub(in crate::app) const TAP_MAX_SECONDS: f64 = 0.2;

impl MapModel {
    /// Node press: start the tap timer and light the node with its direct
    /// neighbors.
    pub(in crate::app) fn press_node(&mut self, id: &str, now: f64) {
        self.press_started = Some((id.to_owned(), now));
        self.highlighted_id = Some(id.to_owned());
    }

    /// Node release: always clears the highlight; returns the tap target
    /// when the press was short enough to count as navigation.
    pub(in crate::app) fn release_press(&mut self, now: f64) -> Option<String> {
        self.highlighted_id = None;
        let (id, started) = self.press_started.take()?;
        if now - started < TAP_MAX_SECONDS {
            Some(id)
        } else {
            None
        }
    }

    /// The lit set while a node is held: the node itself plus every id in
    /// its anterior and posterior lists.
    pub(in crate::app) fn highlight_set(&self) -> HashSet<String> {
        let mut lit = HashSet::new();
        let Some(id) = &self.highlighted_id else {
            return lit;
        };

        lit.insert(id.clone());
        if let Some(note) = self.store.get(id) {
            for neighbor in note.links.neighbor_ids() {
                lit.insert(neighbor.to_owned());
            }
        }
        lit
    }

    /// Routes host input into the viewport: touch events drive the
    /// pan/pinch state machine, wheel scroll and mouse drags cover the
    /// desktop path.
    pub(in crate::app) fn handle_viewport_input(
        &mut self,
        ui: &Ui,
        _rect: Rect,
        response: &egui::Response,
    ) {
        let press_active = self.press_started.is_some();

        let touch_events = ui.input(|input| {
            input
                .events
                .iter()
                .filter_map(|event| {
                    if let egui::Event::Touch { id, phase, pos, .. } = event {
                        Some((id.0, *phase, *pos))
                    } else {
                        None
                    }
                })
                .collect::<Vec<_>>()
        });

        for (id, phase, pos) in touch_events {
            let event = match phase {
                TouchPhase::Start => PointerEvent::Down { id, pos },
                TouchPhase::Move => PointerEvent::Moved { id, pos },
                TouchPhase::End => PointerEvent::Up { id },
                TouchPhase::Cancel => PointerEvent::Cancelled { id },
            };

            // A press on a card must not also drag the whole map, so
            // single-pointer moves are swallowed while one is active.
            if press_active
                && matches!(event, PointerEvent::Moved { .. })
                && self.viewport.pointer_count() <= 1
            {
                continue;
            }
            self.viewport.apply(event);
        }

        if response.hovered() {
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            self.viewport.apply_wheel(scroll);
        }

        let any_touches = ui.input(|input| input.any_touches());
        if !any_touches && !press_active && response.dragged() {
            self.viewport.pan_by(response.drag_delta());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::store::{NoteStore, test_note};

    use super::super::super::MapModel;

    fn model() -> MapModel {
        MapModel::new(NoteStore::from_notes(vec![
            test_note("a", &[], &["b"]),
            test_note("b", &["a"], &["c"]),
            test_note("c", &["b"], &[]),
            test_note("far", &[], &[]),
        ]))
    }

    #[test]
    fn quick_press_and_release_is_a_tap() {
        let mut model = model();
        model.press_node("b", 10.0);
        assert_eq!(model.release_press(10.15), Some("b".to_owned()));
    }

    #[test]
    fn long_hold_does_not_navigate() {
        let mut model = model();
        model.press_node("b", 10.0);
        assert_eq!(model.release_press(10.5), None);
    }

    #[test]
    fn press_lights_the_node_and_its_direct_neighbors() {
        let mut model = model();
        model.press_node("b", 0.0);

        let expected = ["a", "b", "c"]
            .iter()
            .map(|s| s.to_string())
            .collect::<HashSet<_>>();
        assert_eq!(model.highlight_set(), expected);
        assert!(!model.highlight_set().contains("far"));
    }

    #[test]
    fn release_clears_the_highlight() {
        let mut model = model();
        model.press_node("b", 0.0);
        let _ = model.release_press(1.0);
        assert_eq!(model.highlighted_id, None);
        assert!(model.highlight_set().is_empty());
    }

    #[test]
    fn release_without_press_is_inert() {
        let mut model = model();
        assert_eq!(model.release_press(3.0), None);
    }
}
