use std::fmt;

/// Which guard stopped a search before it could finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exhaustion {
    /// Nested cycle-escape detours went deeper than the configured limit.
    RecursionDepth(usize),

    /// The search took more decision steps than the configured budget.
    StepBudget(usize),

    /// A frame returned to a state it had already been in without any
    /// intervening change, so it would repeat the same decisions forever.
    RepeatedState { vertex: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Indicates an attempt to build a graph with an edge endpoint that exceeds the graph size (N).
    NodeIndexOutOfBounds(usize),

    /// Indicates a structural inconsistency found during graph processing or validation.
    InvalidGraph,

    /// An edge carries a weight that is NaN or infinite.
    NonFiniteWeight { from: usize, to: usize },

    /// The requested end vertex is not part of the graph.
    VertexNotInGraph(usize),

    /// Backtracking ran out of edges at the origin of the search.
    NoPathFound { start: usize, end: usize },

    /// A cycle escape was required at a vertex with no path history to step back along.
    InconsistentEscape(usize),

    /// The search hit one of its termination guards.
    ResourceExhausted(Exhaustion),
}

impl fmt::Display for Exhaustion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Exhaustion::RecursionDepth(limit) => {
                write!(f, "escape recursion exceeded depth limit {}", limit)
            }

            Exhaustion::StepBudget(limit) => write!(f, "step budget of {} exhausted", limit),

            Exhaustion::RepeatedState { vertex } => {
                write!(f, "search repeated an earlier state at vertex {}", vertex)
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NodeIndexOutOfBounds(n) => write!(f, "Node index {} is out of bounds.", n),

            Error::InvalidGraph => write!(f, "Graph structure is invalid or inconsistent."),

            Error::NonFiniteWeight { from, to } => {
                write!(f, "Edge {} -> {} has a non-finite weight.", from, to)
            }

            Error::VertexNotInGraph(v) => write!(f, "Graph must contain the end vertex {}.", v),

            Error::NoPathFound { start, end } => {
                write!(f, "No path found from vertex {} to vertex {}.", start, end)
            }

            Error::InconsistentEscape(v) => write!(
                f,
                "Cycle escape at vertex {} has no previous edge to step back along.",
                v
            ),

            Error::ResourceExhausted(kind) => write!(f, "Search aborted: {}.", kind),
        }
    }
}

impl std::error::Error for Error {}
