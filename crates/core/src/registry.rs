use std::collections::HashMap;
use std::sync::Arc;

use super::cycle::Cycle;

/// Side-table of cycle assignments, keyed by vertex.
///
/// Each vertex holds at most one cycle; assigning again replaces the old one.
/// Assignments outlive a single search, so a registry reused across searches
/// makes later searches see the basins earlier ones discovered.
///
/// `revision` counts assignments ever made and never goes backwards, not even
/// on `clear`. The path finder uses it to tell "same place, nothing changed"
/// apart from "same place, new knowledge".
#[derive(Debug, Default, Clone)]
pub struct CycleRegistry {
    assigned: HashMap<usize, Arc<Cycle>>,
    revision: u64,
}

impl CycleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cycle currently assigned to `vertex`.
    pub fn cycle_of(&self, vertex: usize) -> Option<Arc<Cycle>> {
        self.assigned.get(&vertex).cloned()
    }

    /// Assigns `cycle` to `vertex`, returning the assignment it replaced.
    pub fn assign(&mut self, vertex: usize, cycle: impl Into<Arc<Cycle>>) -> Option<Arc<Cycle>> {
        self.revision += 1;
        self.assigned.insert(vertex, cycle.into())
    }

    /// Drops every assignment.
    pub fn clear(&mut self) {
        self.assigned.clear();
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of vertices that currently hold a cycle.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    /// Vertices holding a cycle, in no particular order.
    pub fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.assigned.keys().copied()
    }
}
