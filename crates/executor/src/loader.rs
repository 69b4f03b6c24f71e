use csv::ReaderBuilder;
use log::info;
use serde::Deserialize;
use std::fs::File;

use super::error::Error;
use common::types::Edge;
use descent_core::GraphCSR;

// Helper struct for CSV parsing
#[derive(Debug, Deserialize, Default)]
pub struct EdgeRecord {
    #[serde(rename = "from")]
    pub from_node: usize,

    #[serde(rename = "to")]
    pub to_node: usize,

    #[serde(rename = "weight")]
    pub weight: f64,
}

/// Reads `from,to,weight` rows, in file order.
pub fn parse_edges(path: &str) -> Result<Vec<Edge>, Error> {
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut edges = Vec::new();

    for result in rdr.deserialize() {
        let record: EdgeRecord = result?;
        edges.push((record.from_node, record.to_node, record.weight));
    }
    Ok(edges)
}

/// Builds the landscape graph from the edge file at `path`.
///
/// The node count is one more than the largest id mentioned. File order
/// decides which of two equally cheap edges the search prefers.
pub fn load_graph(path: &str) -> Result<GraphCSR, Error> {
    let edges = parse_edges(path)?;
    let graph = GraphCSR::from_edge_list(edges)?;

    info!(
        "Loaded landscape from {}: {} vertices, {} edges",
        path,
        graph.num_nodes,
        graph.num_edges()
    );
    Ok(graph)
}
