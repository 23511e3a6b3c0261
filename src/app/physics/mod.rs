mod forces;

use eframe::egui::{Vec2, vec2};
use rand::Rng;

use super::MapGraph;
use forces::{repulsion_between, resolve_collisions, spring_pull};

const REPULSION: f32 = 8_000.0;
const SPRING_LENGTH: f32 = 250.0;
const SPRING_STIFFNESS: f32 = 0.005;
const COLLISION_PADDING: f32 = 50.0;
const CENTER_PULL: f32 = 0.0005;
const FRICTION: f32 = 0.95;
const WANDER: f32 = 0.1;
const LIVE_MAX_SPEED: f32 = 3.0;
const SETTLE_MAX_SPEED: f32 = 20.0;

const SETTLE_ITERATIONS: usize = 200;

/// The two integration regimes sharing one force-and-collision step.
/// Settle runs synchronously before first paint with a high speed cap and
/// no wander; Live runs once per frame and keeps the layout gently drifting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum StepMode {
    Settle,
    Live,
}

/// Runs the full settle pass, leaving a stable non-overlapping layout for a
/// freshly populated neighborhood.
pub(in crate::app) fn settle_layout(graph: &mut MapGraph) {
    for _ in 0..SETTLE_ITERATIONS {
        step_layout(graph, StepMode::Settle);
    }
}

/// One simulation step: repulsion between every node pair, spring attraction
/// along links, ambient wander (live only), centering pull, damped and
/// speed-capped integration, then hard collision resolution.
pub(in crate::app) fn step_layout(graph: &mut MapGraph, mode: StepMode) {
    let node_count = graph.nodes.len();
    if node_count == 0 {
        return;
    }

    let mut impulses = vec![Vec2::ZERO; node_count];
    for index in 0..node_count {
        let position = graph.nodes[index].world_pos;

        for other in 0..node_count {
            if other != index {
                impulses[index] += repulsion_between(position, graph.nodes[other].world_pos);
            }
        }

        for &neighbor in &graph.neighbors[index] {
            if neighbor < node_count && neighbor != index {
                impulses[index] += spring_pull(position, graph.nodes[neighbor].world_pos);
            }
        }

        impulses[index] -= position * CENTER_PULL;
    }

    let max_speed = match mode {
        StepMode::Settle => SETTLE_MAX_SPEED,
        StepMode::Live => LIVE_MAX_SPEED,
    };
    let mut rng = rand::rng();

    for (node, impulse) in graph.nodes.iter_mut().zip(impulses) {
        node.velocity += impulse;
        if mode == StepMode::Live {
            node.velocity += vec2(
                rng.random_range(-0.5..0.5) * WANDER,
                rng.random_range(-0.5..0.5) * WANDER,
            );
        }

        node.velocity *= FRICTION;
        let speed = node.velocity.length();
        if speed > max_speed {
            node.velocity *= max_speed / speed;
        }

        node.world_pos += node.velocity;
    }

    // Live mode gets a second pass so per-frame residue converges faster.
    let passes = match mode {
        StepMode::Settle => 1,
        StepMode::Live => 2,
    };
    for _ in 0..passes {
        resolve_collisions(&mut graph.nodes);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use eframe::egui::{Vec2, vec2};

    use super::super::{MapGraph, MapNode};
    use super::{COLLISION_PADDING, SPRING_LENGTH, StepMode, settle_layout, step_layout};

    fn node(id: &str, x: f32, y: f32, width: f32, height: f32) -> MapNode {
        MapNode {
            id: id.to_owned(),
            world_pos: vec2(x, y),
            velocity: Vec2::ZERO,
            size: vec2(width, height),
            content: String::new(),
            tags: Vec::new(),
        }
    }

    fn graph(nodes: Vec<MapNode>, neighbor_pairs: &[(usize, usize)]) -> MapGraph {
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect::<HashMap<_, _>>();
        let mut neighbors = vec![Vec::new(); nodes.len()];
        for &(a, b) in neighbor_pairs {
            neighbors[a].push(b);
            neighbors[b].push(a);
        }
        MapGraph {
            nodes,
            index_by_id,
            neighbors,
            edges: neighbor_pairs.to_vec(),
        }
    }

    fn padded_overlap(a: &MapNode, b: &MapNode, margin: f32) -> bool {
        let delta = b.world_pos - a.world_pos;
        let min_gap = (a.size + b.size) * 0.5 + vec2(margin, margin);
        delta.x.abs() < min_gap.x && delta.y.abs() < min_gap.y
    }

    #[test]
    fn settle_separates_a_clump_of_cards() {
        let nodes = (0..6)
            .map(|index| {
                node(
                    &format!("n{index}"),
                    (index as f32) * 0.5,
                    (index as f32) * -0.3,
                    220.0,
                    120.0,
                )
            })
            .collect::<Vec<_>>();
        let mut graph = graph(nodes, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]);

        settle_layout(&mut graph);
        for _ in 0..10 {
            step_layout(&mut graph, StepMode::Live);
        }

        // The padding margin holds up to a small transient tolerance.
        let margin = COLLISION_PADDING - 2.0;
        for first in 0..graph.nodes.len() {
            for second in (first + 1)..graph.nodes.len() {
                assert!(
                    !padded_overlap(&graph.nodes[first], &graph.nodes[second], margin),
                    "cards {first} and {second} overlap after settling"
                );
            }
        }
    }

    #[test]
    fn linked_pair_converges_near_the_spring_length() {
        let mut graph = graph(
            vec![
                node("a", -500.0, 0.0, 10.0, 10.0),
                node("b", 500.0, 0.0, 10.0, 10.0),
            ],
            &[(0, 1)],
        );

        for _ in 0..800 {
            step_layout(&mut graph, StepMode::Live);
        }

        let distance = (graph.nodes[0].world_pos - graph.nodes[1].world_pos).length();
        assert!(
            (distance - SPRING_LENGTH).abs() < 25.0,
            "expected ~{SPRING_LENGTH}, got {distance}"
        );
    }

    #[test]
    fn coincident_centers_stay_finite_and_separate() {
        let mut graph = graph(
            vec![
                node("a", 0.0, 0.0, 120.0, 80.0),
                node("b", 0.0, 0.0, 120.0, 80.0),
            ],
            &[],
        );

        for _ in 0..50 {
            step_layout(&mut graph, StepMode::Live);
        }

        for node in &graph.nodes {
            assert!(node.world_pos.x.is_finite() && node.world_pos.y.is_finite());
            assert!(node.velocity.x.is_finite() && node.velocity.y.is_finite());
        }
        let distance = (graph.nodes[0].world_pos - graph.nodes[1].world_pos).length();
        assert!(distance > 1.0, "coincident cards should have been pushed apart");
    }

    #[test]
    fn stale_neighbor_indices_are_ignored() {
        let mut graph = graph(vec![node("a", 0.0, 0.0, 50.0, 50.0)], &[]);
        graph.neighbors[0].push(7);

        step_layout(&mut graph, StepMode::Live);
        assert!(graph.nodes[0].world_pos.x.is_finite());
    }

    #[test]
    fn empty_graph_steps_are_a_no_op() {
        let mut graph = graph(Vec::new(), &[]);
        step_layout(&mut graph, StepMode::Live);
        settle_layout(&mut graph);
    }
}
