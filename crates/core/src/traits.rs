use std::collections::HashSet;

use super::cycle::Cycle;
use super::registry::CycleRegistry;
use common::{error::Error, types::GraphPath};

/// The minimal query surface the path finder needs from a landscape graph.
///
/// Vertices and edges are plain indices. Implementors only describe the graph;
/// the minimum-edge queries are provided on top of `outgoing_edges` and may be
/// overridden when a graph can answer them faster.
pub trait EnergyLandscape {
    fn contains_vertex(&self, vertex: usize) -> bool;

    fn edge_source(&self, edge_idx: usize) -> Result<usize, Error>;

    fn edge_target(&self, edge_idx: usize) -> Result<usize, Error>;

    fn edge_weight(&self, edge_idx: usize) -> Result<f64, Error>;

    /// Outgoing edges of `vertex` in a fixed enumeration order.
    /// Unknown vertices have none.
    fn outgoing_edges(&self, vertex: usize) -> impl Iterator<Item = usize> + '_;

    /// Returns the cheapest outgoing edge of `vertex` that is not `excluded`.
    ///
    /// Ties go to the edge that comes first in `outgoing_edges`, which keeps
    /// repeated searches reproducible.
    fn min_outgoing_edge(
        &self,
        vertex: usize,
        excluded: &HashSet<usize>,
    ) -> Result<Option<usize>, Error> {
        let mut best: Option<(usize, f64)> = None;

        for edge_idx in self.outgoing_edges(vertex) {
            if excluded.contains(&edge_idx) {
                continue;
            }
            let weight = self.edge_weight(edge_idx)?;
            if best.is_none_or(|(_, best_weight)| weight < best_weight) {
                best = Some((edge_idx, weight));
            }
        }

        Ok(best.map(|(edge_idx, _)| edge_idx))
    }

    /// Returns the cheapest exit of the basin `vertex` is assigned to.
    ///
    /// An exit is an edge whose source is a member of `cycle` and whose target
    /// lies outside it. Without a cycle (or with a degenerate, empty one) this
    /// is exactly `min_outgoing_edge(vertex)`. `Ok(None)` with a non-empty
    /// cycle means the basin is closed.
    fn min_outgoing_edge_within_cycle(
        &self,
        vertex: usize,
        cycle: Option<&Cycle>,
        excluded: &HashSet<usize>,
    ) -> Result<Option<usize>, Error> {
        let Some(cycle) = cycle.filter(|cycle| !cycle.is_empty()) else {
            return self.min_outgoing_edge(vertex, excluded);
        };

        let mut best: Option<(usize, f64)> = None;

        for member in cycle.members() {
            for edge_idx in self.outgoing_edges(member) {
                if excluded.contains(&edge_idx) || cycle.contains(self.edge_target(edge_idx)?) {
                    continue;
                }
                let weight = self.edge_weight(edge_idx)?;
                if best.is_none_or(|(_, best_weight)| weight < best_weight) {
                    best = Some((edge_idx, weight));
                }
            }
        }

        Ok(best.map(|(edge_idx, _)| edge_idx))
    }
}

/// Trait for solvers that connect two vertices of an energy landscape.
pub trait PathSolver {
    /// Finds a path from `start` to `end`.
    ///
    /// `cycles` carries cycle assignments between searches; the solver reads
    /// and updates it. `radius` is accepted for compatibility and not consulted.
    ///
    /// Returns `Ok(path)` on success, or `Err(e)` when no path exists or the
    /// search had to stop.
    fn find_path<G: EnergyLandscape>(
        &self,
        graph: &G,
        cycles: &mut CycleRegistry,
        start: usize,
        end: usize,
        radius: f64,
    ) -> Result<GraphPath, Error>;
}
