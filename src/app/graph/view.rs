use eframe::egui::{self, Align2, FontId, Rect, Sense, Shape, Stroke, StrokeKind, Ui, vec2};

use crate::util::content_preview;

use super::super::MapModel;
use super::super::physics::{StepMode, step_layout};
use super::super::render_utils::{
    CARD_BORDER, CARD_FILL, EDGE_DEFAULT, INK, TAG_TEXT, arrowhead_points, draw_background,
    edge_endpoint,
};

const CONTENT_FONT_SIZE: f32 = 16.0;
const CARD_PADDING: f32 = 16.0;

impl MapModel {
    pub(in crate::app) fn draw_map(&mut self, ui: &mut Ui) {
        if self.graph_dirty {
            self.rebuild_map_graph();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.handle_viewport_input(ui, rect, &response);

        if let Some(cache) = self.graph_cache.as_mut() {
            step_layout(cache, StepMode::Live);
        }
        // The live layout never freezes, so the loop keeps scheduling
        // itself until the view is closed.
        ui.ctx().request_repaint();

        let pan = self.viewport.pan;
        let zoom = self.viewport.zoom;
        draw_background(&painter, rect, pan, zoom);

        let now = ui.input(|input| input.time);
        let pointer_pos = ui.input(|input| input.pointer.interact_pos());
        let primary_pressed = ui.input(|input| input.pointer.primary_pressed());
        let primary_released = ui.input(|input| input.pointer.primary_released());

        let (screen_rects, hovered) = {
            let Some(cache) = self.graph_cache.as_ref() else {
                ui.painter().text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    "No notes to map yet.",
                    FontId::proportional(16.0),
                    TAG_TEXT,
                );
                return;
            };

            let screen_rects = cache
                .nodes
                .iter()
                .map(|node| {
                    let center = self.viewport.world_to_screen(rect, node.world_pos);
                    Rect::from_center_size(center, node.size * zoom)
                })
                .collect::<Vec<_>>();

            // Later cards draw on top, so hit-test back to front.
            let hovered = pointer_pos.and_then(|pointer| {
                screen_rects
                    .iter()
                    .enumerate()
                    .rev()
                    .find(|(_, card)| card.contains(pointer))
                    .map(|(index, _)| (index, cache.nodes[index].id.clone()))
            });

            (screen_rects, hovered)
        };

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if primary_pressed && response.hovered()
            && let Some((_, id)) = &hovered
        {
            self.press_node(id, now);
        }
        let pending_anchor = if primary_released {
            self.release_press(now)
        } else {
            None
        };

        let lit = self.highlight_set();
        let Some(cache) = self.graph_cache.as_ref() else {
            return;
        };

        let edge_width = (2.0 * zoom).clamp(0.8, 4.0);
        let arrow_size = (9.0 * zoom).clamp(4.0, 14.0);
        for &(source, target) in &cache.edges {
            if source >= cache.nodes.len() || target >= cache.nodes.len() {
                continue;
            }

            let start_world = cache.nodes[source].world_pos;
            let end_world = edge_endpoint(
                start_world,
                cache.nodes[target].world_pos,
                cache.nodes[target].size,
            );
            let start = self.viewport.world_to_screen(rect, start_world);
            let end = self.viewport.world_to_screen(rect, end_world);
            if !rect.intersects(Rect::from_two_pos(start, end)) {
                continue;
            }

            let highlighted = self.highlighted_id.as_deref() == Some(cache.nodes[source].id.as_str())
                || self.highlighted_id.as_deref() == Some(cache.nodes[target].id.as_str());
            let color = if highlighted { INK } else { EDGE_DEFAULT };

            painter.line_segment([start, end], Stroke::new(edge_width, color));
            if let Some(points) = arrowhead_points(end, end - start, arrow_size) {
                painter.add(Shape::convex_polygon(points.to_vec(), color, Stroke::NONE));
            }
        }

        for (index, node) in cache.nodes.iter().enumerate() {
            let card = screen_rects[index];
            if !rect.intersects(card) {
                continue;
            }

            let is_active = self.active_note_id.as_deref() == Some(node.id.as_str());
            let is_lit = lit.contains(&node.id);

            painter.rect_filled(card, 0.0, CARD_FILL);
            let border = if is_active {
                Stroke::new(2.0, INK)
            } else {
                Stroke::new(1.0, CARD_BORDER)
            };
            painter.rect_stroke(card, 0.0, border, StrokeKind::Inside);
            if is_lit {
                painter.rect_stroke(
                    card.expand(2.0 * zoom.max(0.5)),
                    0.0,
                    Stroke::new(2.0, INK),
                    StrokeKind::Outside,
                );
            }

            let padding = CARD_PADDING * zoom;
            let mut text_top = card.top() + padding;
            if !node.tags.is_empty() {
                let tag_line = node
                    .tags
                    .iter()
                    .map(|tag| format!("#{}", tag.to_uppercase()))
                    .collect::<Vec<_>>()
                    .join("  ");
                painter.text(
                    egui::pos2(card.left() + padding, text_top),
                    Align2::LEFT_TOP,
                    tag_line,
                    FontId::proportional((10.0 * zoom).max(5.0)),
                    TAG_TEXT,
                );
                text_top += 18.0 * zoom;
            }

            let wrap_width = ((node.size.x - (2.0 * CARD_PADDING)) * zoom).max(1.0);
            let galley = painter.layout(
                node.content.clone(),
                FontId::monospace((CONTENT_FONT_SIZE * zoom).max(4.0)),
                INK,
                wrap_width,
            );
            painter.galley(egui::pos2(card.left() + padding, text_top), galley, INK);
        }

        if let Some((hovered_index, _)) = &hovered {
            let node = &cache.nodes[*hovered_index];
            let status = format!(
                "{}  |  {} links",
                content_preview(&node.content, 60),
                cache.neighbors[*hovered_index].len()
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                status,
                FontId::proportional(13.0),
                INK,
            );
        }

        if let Some(id) = pending_anchor {
            self.set_anchor(id);
        }
    }
}
