use std::sync::Arc;
use tokio::sync::{Mutex, mpsc::Sender};
use tokio::task::JoinHandle;

use super::error::Error;
use descent_core::{CycleRegistry, GraphCSR};

/// A trait defining the contract for any source that generates and streams
/// path queries into the search pipeline.
///
/// This trait decouples the Producer task from the specific data source
/// (e.g., a query file vs. simulated queries).
///
/// The trait bounds (`Send`, `Sync`, `'static`) are required so the
/// implementation can run on the multi-threaded Tokio runtime.
#[async_trait::async_trait]
pub trait QueryStreamer: Send + Sync + 'static {
    async fn run_stream(self, sender: Sender<Vec<PathQuery>>) -> Result<(), Error>;
}

/// A request to connect two vertices of the loaded landscape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathQuery {
    pub start: usize,
    pub end: usize,
    pub radius: f64,
}

impl PathQuery {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            radius: f64::INFINITY,
        }
    }
}

/// A landscape together with the cycle assignments searches have made on it.
///
/// Cycle assignments are mutable state shared by every search over the graph,
/// so the two are locked together: one lock per graph.
#[derive(Debug)]
pub struct SearchSession {
    pub graph: GraphCSR,
    pub cycles: CycleRegistry,
}

impl SearchSession {
    pub fn new(graph: GraphCSR) -> Self {
        Self {
            graph,
            cycles: CycleRegistry::new(),
        }
    }
}

pub type SharedSession = Arc<Mutex<SearchSession>>;

pub type JoinHandleResult<T> = JoinHandle<Result<T, Error>>;

pub enum DataSource {
    SIM,
    CSV(String),
}
