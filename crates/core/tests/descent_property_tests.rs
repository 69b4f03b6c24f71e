use descent_core::{
    CycleRegistry, CycleScope, EnergyLandscape, GraphCSR, PathSolver, SearchConfig,
    SteepestDescentSolver,
};
use proptest::prelude::*;

type Scenario = (usize, Vec<(usize, usize, f64)>, usize, usize);

fn scenario_strategy() -> impl Strategy<Value = Scenario> {
    (1usize..10).prop_flat_map(|num_nodes| {
        let edge_generator = (0usize..num_nodes, 0usize..num_nodes, 0.01f64..10.0);
        (
            Just(num_nodes),
            prop::collection::vec(edge_generator, 0..40),
            0usize..num_nodes,
            0usize..num_nodes,
        )
    })
}

fn solver(cycle_scope: CycleScope) -> SteepestDescentSolver {
    SteepestDescentSolver::new(SearchConfig {
        max_steps: 10_000,
        cycle_scope,
        ..SearchConfig::default()
    })
}

proptest! {
    /// Property: every path returned is contiguous from start to end and its
    /// weight is the sum of its edge weights.
    #[test]
    fn returned_paths_are_well_formed(
        (num_nodes, mut edges, start, end) in scenario_strategy()
    ) {
        let graph = GraphCSR::from_edges(num_nodes, &mut edges).unwrap();
        let mut cycles = CycleRegistry::new();

        if let Ok(path) = solver(CycleScope::Persistent).find_path(&graph, &mut cycles, start, end, f64::INFINITY) {
            let vertices = path.vertices();
            prop_assert_eq!(vertices[0], start);
            prop_assert_eq!(*vertices.last().unwrap(), end);

            for (i, &(from, to, weight)) in path.path.iter().enumerate() {
                let edge_idx = path.edge_indices[i];
                prop_assert_eq!(graph.edge_source(edge_idx).unwrap(), from);
                prop_assert_eq!(graph.edge_target(edge_idx).unwrap(), to);
                prop_assert_eq!(vertices[i], from);
                prop_assert_eq!(weight, graph.edge_weights[edge_idx]);
            }

            let sum: f64 = path.path.iter().map(|&(_, _, w)| w).sum();
            prop_assert!((path.weight - sum).abs() < 1e-9);
        }
    }

    /// Property: cycles are only ever assigned to vertices of the graph, and
    /// every assigned cycle is a non-empty set of graph vertices.
    #[test]
    fn assigned_cycles_stay_inside_the_graph(
        (num_nodes, mut edges, start, end) in scenario_strategy()
    ) {
        let graph = GraphCSR::from_edges(num_nodes, &mut edges).unwrap();
        let mut cycles = CycleRegistry::new();

        let _ = solver(CycleScope::Persistent).find_path(&graph, &mut cycles, start, end, f64::INFINITY);

        for vertex in cycles.vertices() {
            prop_assert!(graph.contains_vertex(vertex));
            let cycle = cycles.cycle_of(vertex).unwrap();
            prop_assert!(!cycle.is_empty());
            prop_assert!(cycle.members().all(|member| graph.contains_vertex(member)));
        }
    }

    /// Property: with a per-search scope, repeating a search repeats its outcome.
    #[test]
    fn per_search_scope_is_reproducible(
        (num_nodes, mut edges, start, end) in scenario_strategy()
    ) {
        let graph = GraphCSR::from_edges(num_nodes, &mut edges).unwrap();
        let mut cycles = CycleRegistry::new();
        let solver = solver(CycleScope::PerSearch);

        let first = solver.find_path(&graph, &mut cycles, start, end, f64::INFINITY);
        let second = solver.find_path(&graph, &mut cycles, start, end, f64::INFINITY);

        prop_assert_eq!(first, second);
    }

    /// Property: starting on the destination always yields the empty path.
    #[test]
    fn start_on_destination_is_trivial(
        (num_nodes, mut edges, start, _end) in scenario_strategy()
    ) {
        let graph = GraphCSR::from_edges(num_nodes, &mut edges).unwrap();
        let mut cycles = CycleRegistry::new();

        let path = solver(CycleScope::Persistent)
            .find_path(&graph, &mut cycles, start, start, f64::INFINITY)
            .unwrap();

        prop_assert!(path.is_empty());
        prop_assert_eq!(path.weight, 0.0);
    }
}
