use std::ops::Range;

use common::error::Error;
use common::types::Edge;

use super::traits::EnergyLandscape;

/// Energy landscape graph in Compressed Sparse Row (CSR) format.
///
/// CSR format stores outgoing edges of each node contiguously in memory:
/// - `node_pointers[u]..node_pointers[u+1]` → edges from node `u`
/// - `edge_targets[i]` -> target node of edge `i`
/// - `edge_weights[i]` -> transition cost of edge `i`
/// - `edge_source_by_index[i]` -> source node of edge `i`
///
/// Within one node's block, edges keep the order they were supplied in. That
/// order is the enumeration order the minimum-edge queries use to break ties.
#[derive(Debug, Clone)]
pub struct GraphCSR {
    pub num_nodes: usize,
    pub node_pointers: Vec<usize>,
    pub edge_targets: Vec<usize>,
    pub edge_weights: Vec<f64>,
    pub edge_source_by_index: Vec<usize>,
}

impl GraphCSR {
    /// Creates a new CSR graph from a list of edges `(src, dst, weight)`.
    ///
    /// Edges are stably sorted by source node, so every node gets a contiguous
    /// block and edges sharing a source stay in input order.
    ///
    /// # Arguments
    /// - `num_nodes`: total number of nodes (graph indices: 0..num_nodes-1)
    /// - `edges`: slice of `(src, dst, weight)` tuples
    ///
    /// # Errors
    /// - `Error::NodeIndexOutOfBounds` if any endpoint is `>= num_nodes`.
    /// - `Error::NonFiniteWeight` if any weight is NaN or infinite.
    pub fn from_edges(num_nodes: usize, edges: &mut [Edge]) -> Result<Self, Error> {
        if let Some(&(u, v, _)) = edges.iter().find(|&&(u, v, _)| u >= num_nodes || v >= num_nodes)
        {
            return Err(Error::NodeIndexOutOfBounds(u.max(v)));
        }

        // NaN never compares less than anything, so it would break the minimum-edge rule.
        if let Some(&(from, to, _)) = edges.iter().find(|&&(_, _, weight)| !weight.is_finite()) {
            return Err(Error::NonFiniteWeight { from, to });
        }

        edges.sort_by_key(|(src, _, _)| *src);

        let (node_pointers, edge_targets, edge_weights, edge_source_by_index) =
            Self::build_csr_from_edges(num_nodes, edges);

        Ok(Self {
            num_nodes,
            node_pointers,
            edge_targets,
            edge_weights,
            edge_source_by_index,
        })
    }

    /// Creates a CSR graph sized to the largest node id that appears in `edges`.
    pub fn from_edge_list(mut edges: Vec<Edge>) -> Result<Self, Error> {
        let num_nodes = edges
            .iter()
            .flat_map(|&(u, v, _)| [u, v])
            .max()
            .map_or(0, |max_id| max_id + 1);

        Self::from_edges(num_nodes, &mut edges)
    }

    /// Internal helper to construct all necessary arrays for the CSR format.
    ///
    /// This function uses the two-pass counting technique to build the CSR index.
    ///
    /// # Returns
    /// A tuple containing the four core arrays:
    /// 1. `node_pointers`: Stores the starting index of each node’s outgoing edges
    ///    in the flattened edge arrays (size |V| + 1).
    /// 2. `edge_targets`: Stores the destination node `v` for each edge.
    /// 3. `edge_weights`: Stores the raw transition cost of each edge.
    /// 4. `edge_source_by_index`: Maps each edge index back to its source node `u`.
    ///
    ///    This array enables **O(1) reverse lookups** from any edge index to its
    ///    originating source node, which the path finder needs every time it steps
    ///    back along its own path.
    fn build_csr_from_edges(
        num_nodes: usize,
        edges: &[Edge],
    ) -> (Vec<usize>, Vec<usize>, Vec<f64>, Vec<usize>) {
        let m = edges.len();
        let mut node_pointers = vec![0; num_nodes + 1];

        for &(u, _, _) in edges {
            node_pointers[u + 1] += 1;
        }

        for i in 1..=num_nodes {
            node_pointers[i] += node_pointers[i - 1];
        }

        let mut edge_targets = vec![0; m];
        let mut edge_weights = vec![0.0; m];
        let mut edge_source_by_index = vec![0; m];

        let mut cursor = node_pointers.clone();

        for &(u, v, weight) in edges {
            let pos = cursor[u]; // Get the next available position for node 'u'
            edge_weights[pos] = weight;
            edge_targets[pos] = v;
            edge_source_by_index[pos] = u;

            cursor[u] += 1;
        }

        (
            node_pointers,
            edge_targets,
            edge_weights,
            edge_source_by_index,
        )
    }

    pub fn num_edges(&self) -> usize {
        self.edge_targets.len()
    }

    /// O(1) lookup for the source node of a given edge index.
    ///
    /// # Errors
    /// Returns `Error::InvalidGraph` if `edge_idx` is out of bounds.
    pub fn get_edge_source_node(&self, edge_idx: usize) -> Result<usize, Error> {
        self.edge_source_by_index
            .get(edge_idx)
            .copied()
            .ok_or(Error::InvalidGraph)
    }

    /// Returns the index of the first edge `from -> to`, if any.
    pub fn find_edge(&self, from: usize, to: usize) -> Option<usize> {
        self.edge_range(from).find(|&i| self.edge_targets[i] == to)
    }

    fn edge_range(&self, node: usize) -> Range<usize> {
        if node >= self.num_nodes {
            return 0..0;
        }
        self.node_pointers[node]..self.node_pointers[node + 1]
    }
}

impl EnergyLandscape for GraphCSR {
    fn contains_vertex(&self, vertex: usize) -> bool {
        vertex < self.num_nodes
    }

    fn edge_source(&self, edge_idx: usize) -> Result<usize, Error> {
        self.get_edge_source_node(edge_idx)
    }

    fn edge_target(&self, edge_idx: usize) -> Result<usize, Error> {
        self.edge_targets
            .get(edge_idx)
            .copied()
            .ok_or(Error::InvalidGraph)
    }

    fn edge_weight(&self, edge_idx: usize) -> Result<f64, Error> {
        self.edge_weights
            .get(edge_idx)
            .copied()
            .ok_or(Error::InvalidGraph)
    }

    fn outgoing_edges(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        self.edge_range(vertex)
    }
}
