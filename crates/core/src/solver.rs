use std::collections::HashSet;

use log::{debug, trace};
use serde::Deserialize;

use super::cycle::Cycle;
use super::registry::CycleRegistry;
use super::traits::{EnergyLandscape, PathSolver};
use common::{
    error::{Error, Exhaustion},
    types::GraphPath,
};

/// How long cycle assignments live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleScope {
    /// Assignments stay in the registry and are seen by later searches.
    #[default]
    Persistent,
    /// The registry is cleared at the start of every search.
    PerSearch,
}

/// Limits and switches for a steepest-descent search.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum nesting of escape detours.
    pub max_depth: usize,
    /// Maximum number of decisions across all frames of one search.
    pub max_steps: usize,
    /// Never re-select an edge that was popped off the path at a dead end.
    pub forbid_backtracked_edges: bool,
    pub cycle_scope: CycleScope,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_steps: 100_000,
            forbid_backtracked_edges: true,
            cycle_scope: CycleScope::Persistent,
        }
    }
}

/// Solver that walks an energy landscape by steepest descent.
///
/// At every vertex it commits to the cheapest outgoing edge. When the walk
/// closes a loop it records the loop as a cycle on that vertex and from then on
/// looks for the cheapest way out of the basin instead; dead ends are undone
/// one edge at a time. The result is a path, not the shortest one.
#[derive(Debug, Clone, Default)]
pub struct SteepestDescentSolver {
    config: SearchConfig,
}

impl SteepestDescentSolver {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }
}

impl PathSolver for SteepestDescentSolver {
    /// Connects `start` to `end` by steepest descent.
    ///
    /// # Parameters
    /// - `graph`: The landscape to walk.
    /// - `cycles`: Cycle assignments, read and updated by the search.
    /// - `start`: Starting vertex. It is not checked against the graph; an
    ///   unknown start simply has no outgoing edges.
    /// - `end`: Destination vertex, which must be in the graph.
    /// - `radius`: Accepted and ignored.
    ///
    /// # Returns
    /// - `Ok(path)` → Path found; `path.weight` is the sum of its edge weights.
    /// - `Err(Error::VertexNotInGraph)` → `end` is not in the graph.
    /// - `Err(Error::NoPathFound)` → Backtracking ran out at the origin.
    /// - `Err(Error::InconsistentEscape)` → An escape was needed with no history.
    /// - `Err(Error::ResourceExhausted)` → A depth, step or repetition guard fired.
    fn find_path<G: EnergyLandscape>(
        &self,
        graph: &G,
        cycles: &mut CycleRegistry,
        start: usize,
        end: usize,
        radius: f64,
    ) -> Result<GraphPath, Error> {
        if !graph.contains_vertex(end) {
            return Err(Error::VertexNotInGraph(end));
        }

        if self.config.cycle_scope == CycleScope::PerSearch {
            cycles.clear();
        }

        if start == end {
            return Ok(GraphPath::trivial(start));
        }

        debug!(
            "Descent from {} to {} (radius {} is not consulted)",
            start, end, radius
        );

        let mut run = DescentRun::new(graph, cycles, &self.config);
        let edge_indices = run.descend(start, end, 0)?;

        let path = resolve_path(graph, start, end, edge_indices)?;
        debug!(
            "Descent from {} to {} finished: {} edges, weight {}, {} steps, {} backtracks",
            start,
            end,
            path.len(),
            path.weight,
            run.steps,
            run.backtracks
        );

        Ok(path)
    }
}

/// Resolves CSR edge indices into a `GraphPath`, summing the edge weights.
fn resolve_path<G: EnergyLandscape>(
    graph: &G,
    start: usize,
    end: usize,
    edge_indices: Vec<usize>,
) -> Result<GraphPath, Error> {
    let mut path = Vec::with_capacity(edge_indices.len());
    let mut weight = 0.0f64;

    for &edge_idx in &edge_indices {
        let edge_weight = graph.edge_weight(edge_idx)?;
        path.push((
            graph.edge_source(edge_idx)?,
            graph.edge_target(edge_idx)?,
            edge_weight,
        ));
        weight += edge_weight;
    }

    Ok(GraphPath {
        start,
        end,
        edge_indices,
        path,
        weight,
    })
}

/// State shared by every frame of one search.
struct DescentRun<'a, G> {
    graph: &'a G,
    cycles: &'a mut CycleRegistry,
    config: &'a SearchConfig,
    /// Edges popped at dead ends; never selected again during this search.
    excluded: HashSet<usize>,
    steps: usize,
    backtracks: usize,
}

impl<'a, G: EnergyLandscape> DescentRun<'a, G> {
    fn new(graph: &'a G, cycles: &'a mut CycleRegistry, config: &'a SearchConfig) -> Self {
        Self {
            graph,
            cycles,
            config,
            excluded: HashSet::new(),
            steps: 0,
            backtracks: 0,
        }
    }

    /// One frame of the descent: walks from `start` until it stands on `end`
    /// and returns the edges it kept.
    fn descend(&mut self, start: usize, end: usize, depth: usize) -> Result<Vec<usize>, Error> {
        if depth > self.config.max_depth {
            return Err(Error::ResourceExhausted(Exhaustion::RecursionDepth(
                self.config.max_depth,
            )));
        }

        let mut visited: Vec<usize> = Vec::new();
        let mut edges: Vec<usize> = Vec::new();
        let mut seen_states: HashSet<(usize, usize, usize, u64)> = HashSet::new();
        let mut current = start;

        while current != end {
            self.steps += 1;
            if self.steps > self.config.max_steps {
                return Err(Error::ResourceExhausted(Exhaustion::StepBudget(
                    self.config.max_steps,
                )));
            }

            // Nothing the frame decides on changed since it last stood here, so
            // it would make the same choices again.
            let state = (
                current,
                edges.len(),
                self.excluded.len(),
                self.cycles.revision(),
            );
            if !seen_states.insert(state) {
                return Err(Error::ResourceExhausted(Exhaustion::RepeatedState {
                    vertex: current,
                }));
            }

            visited.push(current);

            let best = self.graph.min_outgoing_edge(current, &self.excluded)?;
            let assigned = self.cycles.cycle_of(current);

            if let Some(best) = best {
                let target = self.graph.edge_target(best)?;
                if visited.contains(&target) && self.close_loop(current, assigned.as_deref())? {
                    continue;
                }
            }

            // A basin that already holds the destination is walked, not escaped.
            let basin = assigned.filter(|cycle| !cycle.contains(end));
            let best_in_cycle = self.graph.min_outgoing_edge_within_cycle(
                current,
                basin.as_deref(),
                &self.excluded,
            )?;

            let Some(best) = best else {
                debug!("Dead end at vertex {}", current);
                current = self.backtrack(&mut edges, start, end)?;
                continue;
            };

            match (best_in_cycle, basin) {
                (None, _) => {
                    debug!("Basin around vertex {} has no exit", current);
                    current = self.backtrack(&mut edges, start, end)?;
                }
                (Some(exit), Some(basin)) if exit != best => {
                    current = self.escape(&mut edges, current, exit, &basin, depth)?;
                }
                _ => {
                    trace!("Greedy step along edge {} from vertex {}", best, current);
                    edges.push(best);
                    current = self.graph.edge_target(best)?;
                }
            }
        }

        Ok(edges)
    }

    /// Records the loop that greedy descent from `vertex` falls into.
    ///
    /// Returns `false` when there is nothing new to record: the chain runs
    /// into a dead end, or `vertex` already holds exactly this cycle.
    fn close_loop(&mut self, vertex: usize, assigned: Option<&Cycle>) -> Result<bool, Error> {
        let cycle = Cycle::trace(self.graph, vertex, &self.excluded)?;
        if cycle.is_empty() || assigned == Some(&cycle) {
            return Ok(false);
        }

        debug!(
            "Loop closed at vertex {}: assigning a cycle of {} vertices",
            vertex,
            cycle.len()
        );
        self.cycles.assign(vertex, cycle);
        Ok(true)
    }

    /// Pops the last edge of the path and returns its source.
    fn backtrack(&mut self, edges: &mut Vec<usize>, start: usize, end: usize) -> Result<usize, Error> {
        let edge_idx = edges.pop().ok_or(Error::NoPathFound { start, end })?;
        if self.config.forbid_backtracked_edges {
            self.excluded.insert(edge_idx);
        }
        self.backtracks += 1;

        self.graph.edge_source(edge_idx)
    }

    /// Moves towards the basin exit `exit` and returns the new current vertex.
    ///
    /// If the exit starts here it is taken. Otherwise the walk steps back one
    /// edge while that keeps it inside the exit's cycle, or runs a nested
    /// descent to the exit's source and then takes the exit.
    fn escape(
        &mut self,
        edges: &mut Vec<usize>,
        current: usize,
        exit: usize,
        basin: &Cycle,
        depth: usize,
    ) -> Result<usize, Error> {
        let out_vertex = self.graph.edge_source(exit)?;

        if out_vertex != current {
            let previous = *edges.last().ok_or(Error::InconsistentEscape(current))?;
            let previous_source = self.graph.edge_source(previous)?;

            let out_cycle = self.cycles.cycle_of(out_vertex);
            if out_cycle.as_deref().unwrap_or(basin).contains(previous_source) {
                debug!(
                    "Stepping back from {} to {} towards exit vertex {}",
                    current, previous_source, out_vertex
                );
                edges.pop();
                return Ok(previous_source);
            }

            debug!(
                "Detour from {} to exit vertex {} at depth {}",
                current,
                out_vertex,
                depth + 1
            );
            let detour = self.descend(current, out_vertex, depth + 1)?;
            edges.extend(detour);
        }

        debug!("Leaving basin through edge {} at vertex {}", exit, out_vertex);
        edges.push(exit);
        self.graph.edge_target(exit)
    }
}
