use log::{info, warn};
use tokio::sync::mpsc::Receiver;

use super::{
    error::Error,
    types::{PathQuery, SharedSession},
};
use common::error::Error as DescentError;
use descent_core::traits::PathSolver;

/// Tally of query outcomes, returned when the query stream ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchSummary {
    pub found: usize,
    pub no_path: usize,
    pub failed: usize,
}

pub struct PathSearcher<S> {
    solver: S,
    session: SharedSession,
    receiver: Receiver<Vec<PathQuery>>,
}

impl<S> PathSearcher<S>
where
    S: PathSolver + Send + 'static,
{
    pub fn new(session: SharedSession, receiver: Receiver<Vec<PathQuery>>, solver: S) -> Self {
        PathSearcher {
            solver,
            session,
            receiver,
        }
    }

    /// Answers query batches until the producer side of the channel closes.
    ///
    /// The session lock is held for a whole batch, so cycle assignments made by
    /// one search are complete before the next search reads them.
    pub async fn process_queries(mut self) -> Result<SearchSummary, Error> {
        info!("Searcher ready.");

        let mut summary = SearchSummary::default();

        while let Some(queries) = self.receiver.recv().await {
            let mut session_guard = self.session.lock().await;
            let session = &mut *session_guard;

            for query in queries {
                let result = self.solver.find_path(
                    &session.graph,
                    &mut session.cycles,
                    query.start,
                    query.end,
                    query.radius,
                );

                match result {
                    Ok(path) => {
                        summary.found += 1;
                        info!(
                            "Path {} -> {}: vertices {:?}, weight {}",
                            query.start,
                            query.end,
                            path.vertices(),
                            path.weight
                        );
                    }
                    Err(DescentError::NoPathFound { .. }) => {
                        summary.no_path += 1;
                        info!("No path from {} to {}.", query.start, query.end);
                    }
                    Err(e) => {
                        summary.failed += 1;
                        warn!(
                            "Searcher Error: query {} -> {} failed due to: {}. Continuing.",
                            query.start, query.end, e
                        );
                    }
                }
            }
        }

        info!("Query stream closed, shutting down searcher.");
        Ok(summary)
    }

    /// Spawns the searcher onto the Tokio runtime.
    pub fn spawn_task(self) -> tokio::task::JoinHandle<Result<SearchSummary, Error>> {
        tokio::spawn(self.process_queries())
    }
}
