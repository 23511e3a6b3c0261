use std::collections::HashMap;

use eframe::egui::{Pos2, Rect, Vec2};

pub(in crate::app) const MIN_ZOOM: f32 = 0.2;
pub(in crate::app) const MAX_ZOOM: f32 = 4.0;

const WHEEL_ZOOM_RATE: f32 = 0.001;

/// Pointer event stream feeding the viewport, after translation from the
/// host input system. Ids are stable per touch/pointer for its lifetime.
#[derive(Clone, Copy, Debug)]
pub(in crate::app) enum PointerEvent {
    Down { id: u64, pos: Pos2 },
    Moved { id: u64, pos: Pos2 },
    Up { id: u64 },
    Cancelled { id: u64 },
}

/// Pan/zoom state machine over an arbitrary number of active pointers:
/// one pointer pans, two pinch-zoom. The stored inter-pointer distance is
/// cleared whenever the pointer count leaves two, so the next pinch starts
/// fresh instead of jumping.
pub(in crate::app) struct Viewport {
    pub(in crate::app) pan: Vec2,
    pub(in crate::app) zoom: f32,
    pointers: HashMap<u64, Pos2>,
    last_pinch_distance: Option<f32>,
}

impl Viewport {
    pub(in crate::app) fn new() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            pointers: HashMap::new(),
            last_pinch_distance: None,
        }
    }

    pub(in crate::app) fn apply(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { id, pos } => {
                self.pointers.insert(id, pos);
                if self.pointers.len() != 2 {
                    self.last_pinch_distance = None;
                }
            }
            PointerEvent::Moved { id, pos } => {
                let Some(previous) = self.pointers.insert(id, pos) else {
                    return;
                };

                if self.pointers.len() == 2 {
                    let mut points = self.pointers.values();
                    if let (Some(&first), Some(&second)) = (points.next(), points.next()) {
                        let distance = first.distance(second);
                        if let Some(last) = self.last_pinch_distance
                            && last > f32::EPSILON
                        {
                            self.scale_zoom(distance / last);
                        }
                        self.last_pinch_distance = Some(distance);
                    }
                } else if self.pointers.len() == 1 {
                    self.last_pinch_distance = None;
                    self.pan += pos - previous;
                }
            }
            PointerEvent::Up { id } | PointerEvent::Cancelled { id } => {
                self.pointers.remove(&id);
                if self.pointers.len() < 2 {
                    self.last_pinch_distance = None;
                }
            }
        }
    }

    pub(in crate::app) fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub(in crate::app) fn apply_wheel(&mut self, scroll_y: f32) {
        if scroll_y.abs() <= f32::EPSILON {
            return;
        }
        let factor = (1.0 + (scroll_y * WHEEL_ZOOM_RATE)).clamp(0.85, 1.15);
        self.scale_zoom(factor);
    }

    fn scale_zoom(&mut self, factor: f32) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub(in crate::app) fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + self.pan + (world * self.zoom)
    }

    pub(in crate::app) fn pointer_count(&self) -> usize {
        self.pointers.len()
    }
}
