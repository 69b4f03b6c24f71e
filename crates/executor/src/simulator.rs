use async_trait::async_trait;
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc::Sender;
use tokio::time::{self, Duration};

use super::config::SimulatorConfig;
use super::error::Error;
use super::types::{PathQuery, QueryStreamer};

/// Produces synthetic path queries over a landscape of `total_nodes` vertices.
///
/// Emits `total_queries` random start/end pairs in batches of `batch_size`,
/// one batch per tick, then stops. A fixed `seed` makes the query stream
/// reproducible.
pub struct SimulatorStreamer {
    pub total_nodes: usize,
    pub total_queries: usize,
    pub batch_size: usize,
    pub interval_ms: u64,
    pub seed: Option<u64>,
}

impl SimulatorStreamer {
    pub fn new(config: SimulatorConfig, total_nodes: usize) -> Self {
        Self {
            total_nodes,
            total_queries: config.total_queries,
            batch_size: config.batch_size,
            interval_ms: config.interval_ms,
            seed: config.seed,
        }
    }
}

#[async_trait]
impl QueryStreamer for SimulatorStreamer {
    /// Runs the simulation asynchronously.
    ///
    /// Backpressure is handled by awaiting `sender.send()`. Exits early with
    /// `ChannelSendFailed` if the receiver is dropped.
    async fn run_stream(self, sender: Sender<Vec<PathQuery>>) -> Result<(), Error> {
        if self.total_nodes == 0 {
            info!("Simulator: Landscape is empty. Nothing to query.");
            return Ok(());
        }

        let mut interval = time::interval(Duration::from_millis(self.interval_ms.max(1)));

        let mut rng: SmallRng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let node_range = 0..self.total_nodes;
        let mut remaining = self.total_queries;

        while remaining > 0 {
            interval.tick().await;

            let size = remaining.min(self.batch_size.max(1));
            let queries: Vec<PathQuery> = (0..size)
                .map(|_| {
                    let start = rng.random_range(node_range.clone());
                    let end = rng.random_range(node_range.clone());

                    PathQuery::new(start, end)
                })
                .collect();

            info!("Simulator sent {} queries.", queries.len());
            if sender.send(queries).await.is_err() {
                info!("Simulator shutting down: Searcher receiver dropped.");
                return Err(Error::ChannelSendFailed);
            }
            remaining -= size;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::{Duration, timeout};

    fn simulator(total_queries: usize, batch_size: usize, seed: Option<u64>) -> SimulatorStreamer {
        SimulatorStreamer {
            total_nodes: 10,
            total_queries,
            batch_size,
            interval_ms: 1,
            seed,
        }
    }

    async fn collect(sim: SimulatorStreamer) -> Vec<Vec<PathQuery>> {
        let (tx, mut rx) = mpsc::channel(16);
        tokio::spawn(async move {
            let _ = sim.run_stream(tx).await;
        });

        let mut batches = Vec::new();
        while let Some(batch) = timeout(Duration::from_millis(500), rx.recv())
            .await
            .expect("Did not receive batch")
        {
            batches.push(batch);
        }
        batches
    }

    /// SimulatorStreamer splits its queries into batches and then stops.
    #[tokio::test]
    async fn test_batches_and_total() {
        let batches = collect(simulator(12, 5, Some(1))).await;

        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![5, 5, 2]);
    }

    /// All generated vertices are within bounds.
    #[tokio::test]
    async fn test_vertices_in_bounds() {
        let batches = collect(simulator(50, 50, None)).await;

        for query in batches.into_iter().flatten() {
            assert!(query.start < 10, "start vertex out of bounds");
            assert!(query.end < 10, "end vertex out of bounds");
            assert_eq!(query.radius, f64::INFINITY);
        }
    }

    /// The same seed produces the same queries.
    #[tokio::test]
    async fn test_seed_is_reproducible() {
        let first = collect(simulator(8, 4, Some(42))).await;
        let second = collect(simulator(8, 4, Some(42))).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_landscape_sends_nothing() {
        let mut sim = simulator(8, 4, Some(3));
        sim.total_nodes = 0;

        assert!(collect(sim).await.is_empty());
    }
}
