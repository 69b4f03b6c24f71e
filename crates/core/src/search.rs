use super::registry::CycleRegistry;
use super::solver::SteepestDescentSolver;
use super::traits::{EnergyLandscape, PathSolver};
use common::{error::Error, types::GraphPath};

/// A completed steepest-descent search.
///
/// The search runs when the value is constructed; afterwards the object only
/// answers questions about the path it found. A search that proved there is no
/// path still constructs successfully and reports the "no path" sentinels
/// (`None` and `f64::INFINITY`). Errors that say nothing about whether a path
/// exists (a bad end vertex, an exhausted guard) are returned as `Err` instead.
#[derive(Debug, Clone)]
pub struct DescentSearch {
    path: Option<GraphPath>,
    radius: f64,
}

impl DescentSearch {
    /// Runs an unbounded search with the default solver.
    pub fn new<G: EnergyLandscape>(
        graph: &G,
        cycles: &mut CycleRegistry,
        start: usize,
        end: usize,
    ) -> Result<Self, Error> {
        Self::with_radius(graph, cycles, start, end, f64::INFINITY)
    }

    /// Runs a search with the default solver, recording `radius`.
    ///
    /// The radius is kept for callers that pass one; it does not limit the search.
    pub fn with_radius<G: EnergyLandscape>(
        graph: &G,
        cycles: &mut CycleRegistry,
        start: usize,
        end: usize,
        radius: f64,
    ) -> Result<Self, Error> {
        Self::with_solver(
            &SteepestDescentSolver::default(),
            graph,
            cycles,
            start,
            end,
            radius,
        )
    }

    pub fn with_solver<S: PathSolver, G: EnergyLandscape>(
        solver: &S,
        graph: &G,
        cycles: &mut CycleRegistry,
        start: usize,
        end: usize,
        radius: f64,
    ) -> Result<Self, Error> {
        let path = match solver.find_path(graph, cycles, start, end, radius) {
            Ok(path) => Some(path),
            Err(Error::NoPathFound { .. }) => None,
            Err(e) => return Err(e),
        };

        Ok(Self { path, radius })
    }

    /// Return the path found, or `None` if no path exists.
    pub fn path(&self) -> Option<&GraphPath> {
        self.path.as_ref()
    }

    /// Return the edges making up the path found, or `None` if no path exists.
    pub fn path_edge_list(&self) -> Option<&[usize]> {
        self.path.as_ref().map(|path| path.edge_indices.as_slice())
    }

    /// Return the weighted length of the path found, or `f64::INFINITY` if no path exists.
    pub fn path_length(&self) -> f64 {
        self.path.as_ref().map_or(f64::INFINITY, |path| path.weight)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

/// Convenience function: run a default search and keep only the edge list.
///
/// Returns `Ok(None)` if no path exists.
pub fn find_path_between<G: EnergyLandscape>(
    graph: &G,
    cycles: &mut CycleRegistry,
    start: usize,
    end: usize,
) -> Result<Option<Vec<usize>>, Error> {
    let search = DescentSearch::new(graph, cycles, start, end)?;

    Ok(search.path_edge_list().map(<[usize]>::to_vec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csr::GraphCSR;
    use crate::solver::SearchConfig;
    use common::error::Exhaustion;

    fn chain_graph() -> GraphCSR {
        GraphCSR::from_edges(4, &mut [(0, 1, 1.0), (1, 2, 2.0), (0, 2, 5.0)]).unwrap()
    }

    #[test]
    fn completed_search_exposes_path_and_length() {
        let graph = chain_graph();
        let mut cycles = CycleRegistry::new();

        let search = DescentSearch::new(&graph, &mut cycles, 0, 2).unwrap();

        let expected = vec![graph.find_edge(0, 1).unwrap(), graph.find_edge(1, 2).unwrap()];
        assert_eq!(search.path_edge_list(), Some(expected.as_slice()));
        assert_eq!(search.path_length(), 3.0);
        assert_eq!(search.radius(), f64::INFINITY);
    }

    #[test]
    fn missing_path_reports_sentinels() {
        let graph = chain_graph();
        let mut cycles = CycleRegistry::new();

        // Vertex 3 exists but nothing leads to it.
        let search = DescentSearch::new(&graph, &mut cycles, 0, 3).unwrap();

        assert!(search.path().is_none());
        assert!(search.path_edge_list().is_none());
        assert_eq!(search.path_length(), f64::INFINITY);
    }

    #[test]
    fn bad_end_vertex_is_an_error() {
        let graph = chain_graph();
        let mut cycles = CycleRegistry::new();

        let result = DescentSearch::with_radius(&graph, &mut cycles, 0, 17, 2.0);

        assert_eq!(result.unwrap_err(), Error::VertexNotInGraph(17));
    }

    #[test]
    fn radius_is_recorded_but_not_applied() {
        let graph = chain_graph();
        let mut cycles = CycleRegistry::new();

        let search = DescentSearch::with_radius(&graph, &mut cycles, 0, 2, 1.0).unwrap();

        assert_eq!(search.radius(), 1.0);
        assert_eq!(search.path_length(), 3.0);
    }

    #[test]
    fn exhausted_guard_is_not_reported_as_missing_path() {
        let graph = chain_graph();
        let mut cycles = CycleRegistry::new();
        let solver = SteepestDescentSolver::new(SearchConfig {
            max_steps: 1,
            ..SearchConfig::default()
        });

        let result = DescentSearch::with_solver(&solver, &graph, &mut cycles, 0, 2, f64::INFINITY);

        assert_eq!(
            result.unwrap_err(),
            Error::ResourceExhausted(Exhaustion::StepBudget(1))
        );
    }

    #[test]
    fn find_path_between_returns_edges_only() {
        let graph = chain_graph();
        let mut cycles = CycleRegistry::new();

        let edges = find_path_between(&graph, &mut cycles, 0, 2).unwrap().unwrap();
        let none = find_path_between(&graph, &mut cycles, 2, 0).unwrap();

        assert_eq!(edges.len(), 2);
        assert_eq!(none, None);
    }
}
