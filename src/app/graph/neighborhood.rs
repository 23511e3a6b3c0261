use std::collections::HashSet;

use crate::store::NoteStore;

/// Hard ceiling on how many traversal layers the depth controls expose.
pub(in crate::app) const DEPTH_CEILING: usize = 5;

/// Breadth-first neighborhood of `anchor`: every id reachable within `depth`
/// hops over the undirected union of anterior/posterior links. Depth is
/// floored at 1, so the anchor's direct neighbors are always included.
/// Dangling ids are skipped; the anchor is always part of the result.
pub(in crate::app) fn select_neighborhood(
    store: &NoteStore,
    anchor: &str,
    depth: usize,
) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut selected = Vec::new();

    if store.get(anchor).is_none() {
        return selected;
    }

    visited.insert(anchor.to_owned());
    selected.push(anchor.to_owned());

    let mut current_layer = vec![anchor.to_owned()];
    for _ in 0..depth.max(1) {
        let mut next_layer = Vec::new();
        for id in &current_layer {
            let Some(note) = store.get(id) else {
                continue;
            };

            for neighbor in note.links.neighbor_ids() {
                if store.get(neighbor).is_none() {
                    continue;
                }
                if visited.insert(neighbor.to_owned()) {
                    selected.push(neighbor.to_owned());
                    next_layer.push(neighbor.to_owned());
                }
            }
        }

        if next_layer.is_empty() {
            break;
        }
        current_layer = next_layer;
    }

    selected
}

/// Number of BFS layers actually expandable from `anchor` before the
/// frontier empties, clamped to `[1, DEPTH_CEILING]`. This bounds the
/// user-adjustable depth for the current anchor.
pub(in crate::app) fn max_available_depth(store: &NoteStore, anchor: &str) -> usize {
    let mut visited = HashSet::new();
    if store.get(anchor).is_none() {
        return 1;
    }
    visited.insert(anchor.to_owned());

    let mut current_layer = vec![anchor.to_owned()];
    let mut layers = 0usize;

    while layers < DEPTH_CEILING {
        let mut next_layer = Vec::new();
        for id in &current_layer {
            let Some(note) = store.get(id) else {
                continue;
            };
            for neighbor in note.links.neighbor_ids() {
                if store.get(neighbor).is_none() {
                    continue;
                }
                if visited.insert(neighbor.to_owned()) {
                    next_layer.push(neighbor.to_owned());
                }
            }
        }

        if next_layer.is_empty() {
            break;
        }
        layers += 1;
        current_layer = next_layer;
    }

    layers.max(1)
}
