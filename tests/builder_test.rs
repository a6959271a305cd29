//! Tests for TreeBuilder

use std::collections::{HashMap, VecDeque};

use rstest::rstest;

use gvtree::domain::{
    Direction, DomainError, GraphFilter, TreeBuilder, TreeParams, ValueTree, WeightedDigraph,
};
use gvtree::util::testing;

fn graph(edges: &[(&str, &str, f64)]) -> WeightedDigraph {
    edges.iter().map(|&(s, t, w)| (s, t, w)).collect()
}

fn build(g: &WeightedDigraph, root: &str, layer_max: i64, direction: Direction) -> Result<ValueTree, DomainError> {
    testing::init_test_setup();
    let params = TreeParams::new(root, layer_max, direction)?;
    TreeBuilder::new(g).build(&params)
}

fn edge_triples(tree: &ValueTree) -> Vec<(String, String, usize)> {
    tree.edges()
        .into_iter()
        .map(|e| (e.source, e.target, e.layer))
        .collect()
}

fn triple(s: &str, t: &str, layer: usize) -> (String, String, usize) {
    (s.to_string(), t.to_string(), layer)
}

// ============================================================
// Worked scenarios
// ============================================================

//   A --5--> B --4--> D
//   A --3--> C --6--> D
#[test]
fn given_competing_parents_in_same_round_when_building_downstream_then_heavier_edge_wins() {
    // Arrange
    let g = graph(&[("A", "B", 5.0), ("A", "C", 3.0), ("B", "D", 4.0), ("C", "D", 6.0)]);

    // Act
    let tree = build(&g, "A", 2, Direction::Down).unwrap();

    // Assert
    assert_eq!(
        edge_triples(&tree),
        vec![triple("A", "B", 1), triple("A", "C", 1), triple("C", "D", 2)]
    );
    assert_eq!(tree.dist("A"), Some(0));
    assert_eq!(tree.dist("B"), Some(1));
    assert_eq!(tree.dist("C"), Some(1));
    assert_eq!(tree.dist("D"), Some(2));
    assert_eq!(tree.parent_of("D"), Some("C"));
}

#[test]
fn given_reversed_edges_when_building_upstream_then_tree_points_child_to_parent() {
    // Arrange: same shape as above with every edge reversed
    let g = graph(&[("B", "A", 5.0), ("C", "A", 3.0), ("D", "B", 4.0), ("D", "C", 6.0)]);

    // Act
    let tree = build(&g, "A", 2, Direction::Up).unwrap();

    // Assert
    assert_eq!(
        edge_triples(&tree),
        vec![triple("B", "A", 1), triple("C", "A", 1), triple("D", "C", 2)]
    );
    assert_eq!(tree.direction(), Direction::Up);
    assert_eq!(tree.dist("D"), Some(2));
}

#[test]
fn given_equal_weights_when_building_then_lower_parent_id_wins() {
    // Arrange
    let g = graph(&[("R", "Y", 1.0), ("R", "X", 1.0), ("Y", "Z", 2.0), ("X", "Z", 2.0)]);

    // Act
    let tree = build(&g, "R", 3, Direction::Down).unwrap();

    // Assert
    assert_eq!(tree.parent_of("Z"), Some("X"));
    assert_eq!(
        edge_triples(&tree),
        vec![triple("R", "X", 1), triple("R", "Y", 1), triple("X", "Z", 2)]
    );
}

#[test]
fn given_light_edge_in_earlier_round_when_building_then_first_reachable_round_wins() {
    // Arrange: B is reachable in round 1 via a light edge, in round 2 via a heavy one
    let g = graph(&[("A", "B", 1.0), ("A", "C", 10.0), ("C", "B", 100.0)]);

    // Act
    let tree = build(&g, "A", 5, Direction::Down).unwrap();

    // Assert
    assert_eq!(tree.parent_of("B"), Some("A"));
    assert_eq!(tree.dist("B"), Some(1));
    assert_eq!(tree.edge_count(), 2);
}

// ============================================================
// Termination
// ============================================================

#[rstest]
#[case(1, 2)]
#[case(2, 3)]
#[case(3, 4)]
#[case(10, 4)]
fn given_chain_when_building_then_layer_max_bounds_growth(#[case] layer_max: i64, #[case] nodes: usize) {
    // Arrange
    let g = graph(&[("A", "B", 1.0), ("B", "C", 1.0), ("C", "D", 1.0)]);

    // Act
    let tree = build(&g, "A", layer_max, Direction::Down).unwrap();

    // Assert
    assert_eq!(tree.len(), nodes);
    assert!(tree.nodes().all(|n| n.dist as i64 <= layer_max));
}

#[test]
fn given_layer_max_zero_when_building_then_returns_root_only() {
    let g = graph(&[("A", "B", 1.0)]);

    let tree = build(&g, "A", 0, Direction::Down).unwrap();

    assert!(tree.is_root_only());
    assert!(tree.edges().is_empty());
    assert_eq!(tree.dist("A"), Some(0));
}

#[test]
fn given_cycle_and_self_loop_when_building_then_each_node_appears_once() {
    // Arrange
    let g = graph(&[("A", "B", 2.0), ("B", "A", 3.0), ("A", "A", 9.0), ("B", "C", 1.0), ("C", "A", 1.0)]);

    // Act
    let tree = build(&g, "A", 10, Direction::Down).unwrap();

    // Assert
    assert_eq!(
        edge_triples(&tree),
        vec![triple("A", "B", 1), triple("B", "C", 2)]
    );
}

// ============================================================
// Failure conditions
// ============================================================

#[test]
fn given_root_missing_from_graph_when_building_then_invalid_root() {
    let g = graph(&[("A", "B", 1.0)]);

    let err = build(&g, "Z", 3, Direction::Down).unwrap_err();

    assert_eq!(err, DomainError::InvalidRoot("Z".into()));
}

#[test]
fn given_root_without_incoming_edges_when_building_upstream_then_empty_tree() {
    let g = graph(&[("A", "B", 1.0), ("A", "C", 1.0)]);

    let err = build(&g, "A", 3, Direction::Up).unwrap_err();

    assert_eq!(err, DomainError::EmptyTree { root: "A".into() });
}

#[test]
fn given_negative_layer_max_when_creating_params_then_invalid_config() {
    let err = TreeParams::new("A", -3, Direction::Up).unwrap_err();
    assert!(matches!(err, DomainError::InvalidConfig(_)));
}

// ============================================================
// Invariants on a larger generated graph
// ============================================================

/// Deterministic pseudo-random graph (linear congruential generator).
fn generated_graph(nodes: u64, edges: usize, seed: u64) -> WeightedDigraph {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        state >> 33
    };
    let mut g = WeightedDigraph::new();
    for _ in 0..edges {
        let s = next() % nodes;
        let t = next() % nodes;
        // weights in [-2.0, 8.0) with few ties
        let w = (next() % 1000) as f64 / 100.0 - 2.0;
        g.add_edge(format!("n{s:02}"), format!("n{t:02}"), w);
    }
    g
}

/// The node with the most edges leading away from it in the search direction.
fn busiest_node(g: &WeightedDigraph, direction: Direction) -> String {
    g.nodes()
        .max_by_key(|&n| {
            g.edges()
                .filter(|e| direction.near_far(e.source, e.target).0 == n)
                .count()
        })
        .unwrap()
        .to_string()
}

/// Hop distance from root following the search direction.
fn hop_distances(g: &WeightedDigraph, root: &str, direction: Direction) -> HashMap<String, usize> {
    let mut dist = HashMap::from([(root.to_string(), 0)]);
    let mut queue = VecDeque::from([root.to_string()]);
    while let Some(current) = queue.pop_front() {
        let d = dist[&current];
        for e in g.edges() {
            let (near, far) = direction.near_far(e.source, e.target);
            if near == current && !dist.contains_key(far) {
                dist.insert(far.to_string(), d + 1);
                queue.push_back(far.to_string());
            }
        }
    }
    dist
}

#[rstest]
#[case(Direction::Down, 1)]
#[case(Direction::Up, 1)]
#[case(Direction::Down, 42)]
#[case(Direction::Up, 42)]
fn given_generated_graph_when_building_then_tree_invariants_hold(
    #[case] direction: Direction,
    #[case] seed: u64,
) {
    // Arrange
    let cutoff = 1.0;
    let layer_max = 4;
    let raw = generated_graph(30, 150, seed);
    let g = GraphFilter::filter(&raw, cutoff);
    let root = busiest_node(&g, direction);

    // Act
    let tree = build(&g, &root, layer_max, direction).unwrap();

    // Assert
    let edges = tree.edges();
    let hops = hop_distances(&g, &root, direction);
    for node in tree.nodes() {
        let child_of = |e: &&gvtree::domain::TreeEdge| match direction {
            Direction::Up => e.source == node.id,
            Direction::Down => e.target == node.id,
        };
        let parents = edges.iter().filter(child_of).count();
        if node.id == root {
            assert_eq!(parents, 0);
            assert_eq!(node.dist, 0);
        } else {
            // exactly one parent, dist equals its layer and its first reachable round
            assert_eq!(parents, 1, "node {} has {} parents", node.id, parents);
            let link = edges.iter().find(child_of).unwrap();
            assert_eq!(node.dist, link.layer);
            assert_eq!(Some(&node.dist), hops.get(&node.id));
        }
    }
    // every node within reach of layer_max rounds is in the tree
    let reachable = hops.values().filter(|&&d| d <= layer_max as usize).count();
    assert_eq!(tree.len(), reachable);
    // edges come from the filtered graph, unchanged
    for e in &edges {
        assert!(e.weight >= cutoff);
        assert_eq!(g.weight(&e.source, &e.target), Some(e.weight));
    }
}

#[test]
fn given_same_inputs_when_building_twice_then_trees_are_identical() {
    let g = GraphFilter::filter(&generated_graph(25, 120, 7), 0.0);
    let root = busiest_node(&g, Direction::Down);

    let first = build(&g, &root, 5, Direction::Down).unwrap();
    let second = build(&g, &root, 5, Direction::Down).unwrap();

    assert_eq!(first, second);
    let dists = |t: &ValueTree| t.nodes().map(|n| (n.id.clone(), n.dist)).collect::<Vec<_>>();
    assert_eq!(dists(&first), dists(&second));
}
