//! Property-based tests for scene generation

use super::generator::*;
use super::types::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn arb_question() -> impl Strategy<Value = String> {
    "[a-zA-Z ?]{0,80}"
}

proptest! {
    #[test]
    fn prop_connection_sources_are_generated_nodes(seed in any::<u64>(), question in arb_question()) {
        let scene = generate_scene(&question, &mut StdRng::seed_from_u64(seed));
        for c in &scene.connections {
            prop_assert!(scene.nodes.iter().any(|n| n.id == c.from));
            if let Endpoint::Node(target) = &c.to {
                prop_assert!(scene.nodes.iter().any(|n| &n.id == target));
            }
        }
    }

    #[test]
    fn prop_tiers_in_range(seed in any::<u64>()) {
        let scene = generate_scene("q", &mut StdRng::seed_from_u64(seed));
        for node in &scene.nodes {
            prop_assert!((1..=3).contains(&node.tier.level()));
        }
    }

    #[test]
    fn prop_answer_core_edge_count(seed in any::<u64>()) {
        let scene = generate_scene("Q", &mut StdRng::seed_from_u64(seed));
        let n = scene.node_count();
        prop_assert!((MIN_NODES..=MAX_NODES).contains(&n));
        let core = scene.connections.iter().filter(|c| c.to == Endpoint::AnswerCore).count();
        prop_assert_eq!(core, CORE_LINKED_NODES.min(n));
    }

    #[test]
    fn prop_revealed_connections_pure_and_closed(seed in any::<u64>(), cut in 0usize..=MAX_NODES) {
        let scene = generate_scene("Q", &mut StdRng::seed_from_u64(seed));
        let prefix = &scene.nodes[..cut.min(scene.node_count())];

        let first = revealed_connections(&scene.connections, prefix);
        let second = revealed_connections(&scene.connections, prefix);
        prop_assert_eq!(&first, &second);

        // Nothing exposed may reference a node outside the prefix
        for c in &first {
            prop_assert!(prefix.iter().any(|n| n.id == c.from));
            if let Endpoint::Node(target) = &c.to {
                prop_assert!(prefix.iter().any(|n| &n.id == target));
            }
        }
    }
}
