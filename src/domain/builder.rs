//! Greedy layered tree growth over a filtered graph.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use generational_arena::Index;
use rayon::prelude::*;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{Link, ValueTree};
use crate::domain::entities::{Direction, TreeParams};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::graph::{Edge, WeightedDigraph};

/// An edge joining a reached node (near) to an unreached node (far).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate<'g> {
    near: &'g str,
    far: &'g str,
    weight: f64,
}

impl Candidate<'_> {
    /// Heaviest first. Equal weights order by far id, then near id, ascending.
    ///
    /// `-0.0` and `0.0` compare equal. NaN weights never pass the cutoff filter.
    fn rank(a: &Self, b: &Self) -> Ordering {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.far.cmp(b.far))
            .then_with(|| a.near.cmp(b.near))
    }
}

/// Working sets of one build: `reached` and `unreached` partition the graph's nodes.
struct GrowthState<'g> {
    reached: HashMap<&'g str, Index>,
    unreached: HashSet<&'g str>,
    tree: ValueTree,
}

impl<'g> GrowthState<'g> {
    fn new(graph: &'g WeightedDigraph, root: &'g str, direction: Direction) -> Self {
        let tree = ValueTree::new(root, direction);
        let reached = HashMap::from([(root, tree.root())]);
        let unreached = graph.nodes().filter(|&n| n != root).collect();
        Self {
            reached,
            unreached,
            tree,
        }
    }

    /// Apply the sorted candidates of one round in order.
    fn claim(&mut self, candidates: Vec<Candidate<'g>>, round: usize) {
        for c in candidates {
            let Some(&parent) = self.reached.get(c.near) else {
                continue;
            };
            // An earlier, heavier candidate of this round may already own it.
            if !self.unreached.remove(c.far) {
                trace!("{} already claimed, skipping {} -> {}", c.far, c.near, c.far);
                continue;
            }
            let idx = self.tree.attach(
                c.far,
                parent,
                Link {
                    weight: c.weight,
                    layer: round,
                },
            );
            self.reached.insert(c.far, idx);
        }
    }
}

/// Grows a single-parent tree outward from a root, one layer per round.
///
/// Each round scans every edge for candidates whose near endpoint is reached and
/// whose far endpoint is not. Candidates are walked heaviest first and each far
/// node goes to the first candidate that names it. Growth stops after
/// `layer_max` rounds or after a round that annexes nothing.
pub struct TreeBuilder<'g> {
    graph: &'g WeightedDigraph,
    edges: Vec<Edge<'g>>,
}

impl<'g> TreeBuilder<'g> {
    pub fn new(graph: &'g WeightedDigraph) -> Self {
        Self {
            graph,
            edges: graph.edges().collect(),
        }
    }

    #[instrument(level = "debug", skip(self), fields(root = %params.root, direction = %params.direction))]
    pub fn build(&self, params: &TreeParams) -> DomainResult<ValueTree> {
        let root = self
            .graph
            .nodes()
            .find(|&n| n == params.root)
            .ok_or_else(|| DomainError::InvalidRoot(params.root.clone()))?;

        let mut state = GrowthState::new(self.graph, root, params.direction);

        for round in 1..=params.layer_max {
            let before = state.reached.len();
            let candidates = self.candidates(&state, params.direction);
            trace!("round {}: {} candidate edge(s)", round, candidates.len());

            state.claim(candidates, round);

            let annexed = state.reached.len() - before;
            debug!("round {}: annexed {} node(s)", round, annexed);
            if annexed == 0 {
                break;
            }
        }

        if params.layer_max > 0 && state.tree.is_root_only() {
            return Err(DomainError::EmptyTree {
                root: params.root.clone(),
            });
        }

        debug!(
            "tree rooted at {}: {} node(s), depth {}",
            root,
            state.tree.len(),
            state.tree.depth()
        );
        Ok(state.tree)
    }

    /// Collect and rank this round's candidates. The scan is read-only.
    fn candidates(&self, state: &GrowthState<'g>, direction: Direction) -> Vec<Candidate<'g>> {
        let reached = &state.reached;
        let unreached = &state.unreached;
        let mut candidates: Vec<Candidate<'g>> = self
            .edges
            .par_iter()
            .filter_map(|e| {
                let (near, far) = direction.near_far(e.source, e.target);
                (reached.contains_key(near) && unreached.contains(far)).then_some(Candidate {
                    near,
                    far,
                    weight: e.weight,
                })
            })
            .collect();
        candidates.sort_by(Candidate::rank);
        candidates
    }
}
