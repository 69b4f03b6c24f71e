pub mod config;
pub mod csv_streamer;
pub mod error;
pub mod loader;
pub mod producer;
pub mod searcher;
pub mod simulator;
pub mod types;

use log::{error, info};
use std::env;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, mpsc::Sender};

use csv_streamer::CsvStreamer;
use descent_core::SteepestDescentSolver;
use error::Error;
use producer::Producer;
use searcher::{PathSearcher, SearchSummary};
use simulator::SimulatorStreamer;
use types::{DataSource, JoinHandleResult, PathQuery, SearchSession, SharedSession};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let source = parse_args();
    if let Err(e) = run(source).await {
        error!("Executor failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(source: DataSource) -> Result<(), Error> {
    let config = config::load_config()?;
    let graph = loader::load_graph(&config.graph.edges_path)?;
    let total_nodes = graph.num_nodes;

    let session: SharedSession = Arc::new(Mutex::new(SearchSession::new(graph)));

    let (sender, receiver) = mpsc::channel::<Vec<PathQuery>>(config.executor.buffer_size);

    // Spawn tasks
    let producer_handle = spawn_producer(&source, sender, &config, total_nodes);
    let searcher_handle = spawn_searcher(session, receiver, config.search.clone());

    let (producer_result, searcher_result) = tokio::join!(producer_handle, searcher_handle);

    if let Ok(Err(e)) = producer_result {
        error!("Producer stopped early: {}", e);
    }

    match searcher_result {
        Ok(Ok(summary)) => info!(
            "Pipeline shut down. {} paths found, {} without path, {} failed.",
            summary.found, summary.no_path, summary.failed
        ),
        Ok(Err(e)) => return Err(e),
        Err(e) => error!("Searcher task panicked: {}", e),
    }

    Ok(())
}

/// Parse command-line arguments to determine the query source
fn parse_args() -> DataSource {
    let args: Vec<String> = env::args().collect();
    let source = args
        .get(1)
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "sim".to_string());

    match source.as_str() {
        "sim" => DataSource::SIM,
        "csv" => match args.get(2) {
            Some(path) => DataSource::CSV(path.clone()),
            None => usage(&args[0]),
        },
        _ => usage(&args[0]),
    }
}

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} <SIM|CSV> [path_to_queries_csv]\n  - SIM: answer simulated random queries\n  - CSV: answer queries from a start,end[,radius] CSV file",
        program
    );
    std::process::exit(1);
}

pub fn spawn_producer(
    source: &DataSource,
    sender: Sender<Vec<PathQuery>>,
    config: &config::Config,
    total_nodes: usize,
) -> JoinHandleResult<()> {
    match source {
        DataSource::SIM => {
            info!("Starting SimulatorStreamer producer task...");
            let streamer = SimulatorStreamer::new(config.simulator.clone(), total_nodes);
            Producer::new(streamer).spawn(sender)
        }
        DataSource::CSV(path) => {
            info!("Starting CsvStreamer producer task...");
            let streamer = CsvStreamer::new(path.clone(), config.executor.batch_size);
            Producer::new(streamer).spawn(sender)
        }
    }
}

/// Spawn searcher task
fn spawn_searcher(
    session: SharedSession,
    receiver: mpsc::Receiver<Vec<PathQuery>>,
    search_config: descent_core::SearchConfig,
) -> JoinHandleResult<SearchSummary> {
    let searcher = PathSearcher::new(session, receiver, SteepestDescentSolver::new(search_config));
    searcher.spawn_task()
}
