//! Pure scene synthesis
//!
//! Structure is fixed by the question (counts, tiers, roles, edge layout);
//! positions, scores and picks come from the caller's random source so tests
//! can seed it.

use super::content::{answer_parts, CHUNK_TEXTS, SOURCES, WHY_USED};
use super::types::{
    AnswerStep, Connection, EdgeType, Endpoint, KnowledgeNode, NodeId, NodeRole, Scene, Tier,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::f64::consts::TAU;
use std::ops::RangeInclusive;

pub const MIN_NODES: usize = 8;
pub const MAX_NODES: usize = 12;

/// Nodes with an index below this get an edge to the answer core
pub const CORE_LINKED_NODES: usize = 6;

/// Nodes contributing to each answer step
pub const NODES_PER_STEP: usize = 2;

const RADIUS: RangeInclusive<f64> = 3.0..=5.0;
const RELEVANCE: RangeInclusive<f64> = 0.6..=1.0;
const CORE_STRENGTH: RangeInclusive<f64> = 0.5..=1.0;
const EXPLAIN_STRENGTH: RangeInclusive<f64> = 0.2..=0.5;
const EXPLAIN_PROBABILITY: f64 = 0.5;

/// Generate the full scene for `question`
pub fn generate_scene<R: Rng + ?Sized>(question: &str, rng: &mut R) -> Scene {
    let node_count = rng.gen_range(MIN_NODES..=MAX_NODES);
    let mut nodes = Vec::with_capacity(node_count);
    let mut connections = Vec::new();

    for index in 0..node_count {
        let node = generate_node(index, rng);

        if index < CORE_LINKED_NODES {
            connections.push(Connection {
                from: node.id.clone(),
                to: Endpoint::AnswerCore,
                strength: rng.gen_range(CORE_STRENGTH),
                is_active: false,
                edge_type: EdgeType::Support,
            });
        }

        if index > 0 && rng.gen_bool(EXPLAIN_PROBABILITY) {
            let target = rng.gen_range(0..index);
            connections.push(Connection {
                from: node.id.clone(),
                to: Endpoint::Node(NodeId::for_index(target)),
                strength: rng.gen_range(EXPLAIN_STRENGTH),
                is_active: false,
                edge_type: EdgeType::Explain,
            });
        }

        nodes.push(node);
    }

    let steps = build_steps(&answer_parts(question), &nodes);

    Scene {
        nodes,
        connections,
        steps,
    }
}

fn generate_node<R: Rng + ?Sized>(index: usize, rng: &mut R) -> KnowledgeNode {
    let role = NodeRole::for_index(index);
    let source = SOURCES.choose(rng).copied().unwrap_or("Knowledge Base");

    KnowledgeNode {
        id: NodeId::for_index(index),
        position: random_position(rng),
        title: format!("{source} - {role}"),
        source_url: format!("https://example.com/source-{}", index + 1),
        chunk_text: CHUNK_TEXTS.choose(rng).copied().unwrap_or_default().to_string(),
        why_used: WHY_USED.choose(rng).copied().unwrap_or_default().to_string(),
        is_active: false,
        tier: Tier::for_index(index),
        role,
        relevance_score: Some(rng.gen_range(RELEVANCE)),
    }
}

/// Area-uniform point on a shell of radius in [3, 5]
fn random_position<R: Rng + ?Sized>(rng: &mut R) -> [f64; 3] {
    let theta = rng.gen_range(0.0..TAU);
    let phi = rng.gen_range(-1.0_f64..=1.0).acos();
    let radius = rng.gen_range(RADIUS);

    [
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    ]
}

fn build_steps(parts: &[String], nodes: &[KnowledgeNode]) -> Vec<AnswerStep> {
    parts
        .iter()
        .enumerate()
        .map(|(order, text)| {
            let start = (order * NODES_PER_STEP).min(nodes.len());
            let end = (start + NODES_PER_STEP).min(nodes.len());
            AnswerStep {
                id: format!("step-{order}"),
                text: text.clone(),
                contributing_node_ids: nodes[start..end].iter().map(|n| n.id.clone()).collect(),
                order,
            }
        })
        .collect()
}

/// Connections whose source is among `revealed`, in generation order
pub fn revealed_connections(
    connections: &[Connection],
    revealed: &[KnowledgeNode],
) -> Vec<Connection> {
    let visible: HashSet<&NodeId> = revealed.iter().map(|n| &n.id).collect();
    connections
        .iter()
        .filter(|c| visible.contains(&c.from))
        .cloned()
        .collect()
}
