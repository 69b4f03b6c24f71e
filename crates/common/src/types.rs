/// Represents a path found by steepest descent through a weighted directed graph.
///
/// This struct stores both the CSR indices of the traversed edges and their
/// resolved `(from, to, weight)` form, so callers can report the path without
/// going back to the graph.
///
/// Fields:
/// - `start` / `end`: The endpoints the search was asked to connect.
/// - `edge_indices`: CSR indices of the edges, in traversal order.
/// - `path`: The same edges resolved to `(from, to, weight)` tuples.
/// - `weight`: Sum of the edge weights along the path.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPath {
    pub start: usize,
    pub end: usize,
    pub edge_indices: Vec<usize>,
    pub path: Vec<Edge>,
    pub weight: f64,
}

impl GraphPath {
    /// The empty path a search returns when it starts on its destination.
    pub fn trivial(vertex: usize) -> Self {
        Self {
            start: vertex,
            end: vertex,
            edge_indices: Vec::new(),
            path: Vec::new(),
            weight: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Returns the vertex sequence visited by the path, starting at `start`.
    ///
    /// Example:
    /// ```text
    /// path = [(0, 1, 1.0), (1, 2, 2.0)]  ->  vertices = [0, 1, 2]
    /// ```
    pub fn vertices(&self) -> Vec<usize> {
        std::iter::once(self.start)
            .chain(self.path.iter().map(|&(_, to, _)| to))
            .collect()
    }
}

/// Type alias for a single edge: (from, to, weight)
pub type Edge = (usize, usize, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_path_has_zero_weight() {
        let path = GraphPath::trivial(4);

        assert!(path.is_empty());
        assert_eq!(path.weight, 0.0);
        assert_eq!(path.vertices(), vec![4]);
    }

    #[test]
    fn vertices_follow_edge_targets() {
        let path = GraphPath {
            start: 0,
            end: 2,
            edge_indices: vec![0, 2],
            path: vec![(0, 1, 1.0), (1, 2, 2.0)],
            weight: 3.0,
        };

        assert_eq!(path.len(), 2);
        assert_eq!(path.vertices(), vec![0, 1, 2]);
    }
}
