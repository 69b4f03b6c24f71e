use std::collections::{BTreeSet, HashMap, HashSet};

use super::traits::EnergyLandscape;
use common::error::Error;

/// A basin of the landscape: the vertices of the loop that greedy descent
/// falls into from some seed vertex.
///
/// Members are kept ordered so that iterating a cycle (and therefore picking
/// among equally cheap exits) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cycle {
    members: BTreeSet<usize>,
}

impl Cycle {
    /// Traces the greedy minimum-edge chain from `seed` and returns the loop it
    /// closes.
    ///
    /// Only the loop counts: with a chain `s -> a -> b -> a` the cycle is
    /// `{a, b}`, not `{s, a, b}`. A chain that runs into a dead end never closes
    /// and yields an empty cycle.
    ///
    /// # Errors
    /// Propagates `Error::InvalidGraph` from edge lookups.
    pub fn trace<G: EnergyLandscape>(
        graph: &G,
        seed: usize,
        excluded: &HashSet<usize>,
    ) -> Result<Self, Error> {
        let mut trace: Vec<usize> = Vec::new();
        let mut position: HashMap<usize, usize> = HashMap::new();
        let mut trace_vertex = seed;

        loop {
            if let Some(&first) = position.get(&trace_vertex) {
                return Ok(Self {
                    members: trace[first..].iter().copied().collect(),
                });
            }

            position.insert(trace_vertex, trace.len());
            trace.push(trace_vertex);

            match graph.min_outgoing_edge(trace_vertex, excluded)? {
                Some(edge_idx) => trace_vertex = graph.edge_target(edge_idx)?,
                None => return Ok(Self::default()),
            }
        }
    }

    pub fn contains(&self, vertex: usize) -> bool {
        self.members.contains(&vertex)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Members in ascending order.
    pub fn members(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().copied()
    }
}

impl FromIterator<usize> for Cycle {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}
