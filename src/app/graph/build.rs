use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};
use log::debug;

use crate::util::stable_pair;

use super::super::physics::settle_layout;
use super::super::sizing::note_dimensions;
use super::super::{MapGraph, MapModel, MapNode};
use super::neighborhood::{max_available_depth, select_neighborhood};

/// Spread of the jitter applied to a node entering the map for the first
/// time. Small on purpose: the settle pass or the live simulation does the
/// actual spreading, starting from near the origin.
const ENTRY_JITTER: f32 = 10.0;

impl MapModel {
    fn anchor_id(&self) -> Option<String> {
        self.active_note_id
            .as_deref()
            .filter(|id| self.store.get(id).is_some())
            .or_else(|| self.store.first_id())
            .map(str::to_owned)
    }

    /// Recomputes the visible neighborhood and rebuilds the layout arena.
    /// Surviving nodes keep their position and velocity untouched; nodes
    /// entering the view start near the origin with a deterministic jitter.
    /// A mostly-new arena is settled synchronously before it is first drawn.
    pub(in crate::app) fn rebuild_map_graph(&mut self) {
        self.graph_dirty = false;

        let Some(anchor) = self.anchor_id() else {
            self.graph_cache = None;
            self.max_available_depth = 1;
            self.highlighted_id = None;
            self.visible_node_count = 0;
            self.visible_edge_count = 0;
            return;
        };

        self.max_available_depth = max_available_depth(&self.store, &anchor);
        let depth = self.effective_depth();
        let visible_ids = select_neighborhood(&self.store, &anchor, depth);

        let mut prior_nodes = self
            .graph_cache
            .take()
            .map(|cache| {
                cache
                    .nodes
                    .into_iter()
                    .map(|node| (node.id.clone(), node))
                    .collect::<HashMap<_, _>>()
            })
            .unwrap_or_default();

        let mut nodes = Vec::with_capacity(visible_ids.len());
        let mut carried = 0usize;
        for id in &visible_ids {
            let Some(note) = self.store.get(id) else {
                continue;
            };
            let size = note_dimensions(&note.content);

            if let Some(mut node) = prior_nodes.remove(id) {
                node.size = size;
                node.content = note.content.clone();
                node.tags = note.tags.clone();
                carried += 1;
                nodes.push(node);
            } else {
                nodes.push(MapNode {
                    id: id.clone(),
                    world_pos: entry_position(id),
                    velocity: Vec2::ZERO,
                    size,
                    content: note.content.clone(),
                    tags: note.tags.clone(),
                });
            }
        }

        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            index_by_id.insert(node.id.clone(), index);
        }

        let mut neighbors = vec![Vec::new(); nodes.len()];
        let mut edges = Vec::new();
        for (index, node) in nodes.iter().enumerate() {
            let Some(note) = self.store.get(&node.id) else {
                continue;
            };

            for neighbor_id in note.links.neighbor_ids() {
                if let Some(&neighbor_index) = index_by_id.get(neighbor_id)
                    && neighbor_index != index
                    && !neighbors[index].contains(&neighbor_index)
                {
                    neighbors[index].push(neighbor_index);
                }
            }

            for source_id in &note.links.anterior {
                if let Some(&source_index) = index_by_id.get(source_id)
                    && source_index != index
                {
                    edges.push((source_index, index));
                }
            }
        }
        edges.sort_unstable();
        edges.dedup();

        if let Some(stale) = &self.highlighted_id
            && !index_by_id.contains_key(stale)
        {
            self.highlighted_id = None;
            self.press_started = None;
        }

        let new_count = nodes.len() - carried;
        let mut cache = MapGraph {
            nodes,
            index_by_id,
            neighbors,
            edges,
        };

        // Settle before first paint when the arena is freshly populated or
        // dominated by nodes without a prior position.
        if !cache.nodes.is_empty() && (carried == 0 || new_count * 2 > cache.nodes.len()) {
            debug!(
                "settling layout for anchor {anchor}: {} nodes ({new_count} new)",
                cache.nodes.len()
            );
            settle_layout(&mut cache);
        }

        self.visible_node_count = cache.nodes.len();
        self.visible_edge_count = cache.edges.len();
        self.graph_cache = Some(cache);
    }
}

fn entry_position(id: &str) -> Vec2 {
    let (x, y) = stable_pair(id);
    vec2(x * ENTRY_JITTER, y * ENTRY_JITTER)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::store::{NoteStore, test_note};

    use super::super::super::MapModel;

    fn chain_model() -> MapModel {
        MapModel::new(NoteStore::from_notes(vec![
            test_note("a", &[], &["b"]),
            test_note("b", &["a"], &["c"]),
            test_note("c", &["b"], &[]),
        ]))
    }

    fn visible_ids(model: &MapModel) -> HashSet<String> {
        model
            .graph_cache
            .as_ref()
            .map(|cache| cache.index_by_id.keys().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn rebuild_falls_back_to_first_note_without_anchor() {
        let mut model = chain_model();
        model.rebuild_map_graph();
        assert!(!visible_ids(&model).is_empty());
    }

    #[test]
    fn rebuild_with_same_membership_preserves_positions() {
        let mut model = chain_model();
        model.active_note_id = Some("b".to_owned());
        model.rebuild_map_graph();

        let before = model
            .graph_cache
            .as_ref()
            .expect("cache")
            .nodes
            .iter()
            .map(|node| (node.id.clone(), node.world_pos))
            .collect::<Vec<_>>();

        model.graph_dirty = true;
        model.rebuild_map_graph();

        let cache = model.graph_cache.as_ref().expect("cache");
        for (id, position) in before {
            let index = cache.index_by_id[&id];
            assert_eq!(
                cache.nodes[index].world_pos, position,
                "position of {id} changed across an identical rebuild"
            );
        }
    }

    #[test]
    fn deepening_the_view_keeps_existing_positions() {
        let mut model = chain_model();
        model.active_note_id = Some("a".to_owned());
        model.rebuild_map_graph();

        let cache = model.graph_cache.as_ref().expect("cache");
        let kept = cache.index_by_id["b"];
        let position = cache.nodes[kept].world_pos;

        model.requested_depth = 2;
        model.graph_dirty = true;
        model.rebuild_map_graph();

        let cache = model.graph_cache.as_ref().expect("cache");
        assert!(cache.index_by_id.contains_key("c"), "depth 2 should reach c");
        assert_eq!(cache.nodes[cache.index_by_id["b"]].world_pos, position);
    }

    #[test]
    fn nodes_leaving_the_neighborhood_are_dropped() {
        let mut model = chain_model();
        model.active_note_id = Some("a".to_owned());
        model.requested_depth = 2;
        model.rebuild_map_graph();
        assert!(visible_ids(&model).contains("c"));

        model.requested_depth = 1;
        model.graph_dirty = true;
        model.rebuild_map_graph();
        let visible = visible_ids(&model);
        assert!(!visible.contains("c"));
        assert!(visible.contains("a") && visible.contains("b"));
    }

    #[test]
    fn empty_store_renders_nothing() {
        let mut model = MapModel::new(NoteStore::from_notes(Vec::new()));
        model.rebuild_map_graph();
        assert!(model.graph_cache.is_none());
        assert_eq!(model.visible_node_count, 0);
    }

    #[test]
    fn arrows_point_from_anterior_to_posterior() {
        let mut model = chain_model();
        model.active_note_id = Some("b".to_owned());
        model.rebuild_map_graph();

        let cache = model.graph_cache.as_ref().expect("cache");
        let a = cache.index_by_id["a"];
        let b = cache.index_by_id["b"];
        let c = cache.index_by_id["c"];
        let mut edges = cache.edges.clone();
        edges.sort_unstable();
        let mut expected = vec![(a, b), (b, c)];
        expected.sort_unstable();
        assert_eq!(edges, expected);
    }

    #[test]
    fn max_depth_and_clamping_follow_the_anchor() {
        let mut model = chain_model();
        model.active_note_id = Some("a".to_owned());
        model.requested_depth = 4;
        model.rebuild_map_graph();
        assert_eq!(model.max_available_depth, 2);
        assert_eq!(model.effective_depth(), 2);

        model.set_anchor("b".to_owned());
        assert_eq!(model.requested_depth, 1);
        model.rebuild_map_graph();
        assert_eq!(model.max_available_depth, 1);
    }

    #[test]
    fn stale_highlight_is_cleared_on_rebuild() {
        let mut model = chain_model();
        model.active_note_id = Some("a".to_owned());
        model.requested_depth = 2;
        model.rebuild_map_graph();
        model.highlighted_id = Some("c".to_owned());

        model.requested_depth = 1;
        model.graph_dirty = true;
        model.rebuild_map_graph();
        assert_eq!(model.highlighted_id, None);
    }
}
