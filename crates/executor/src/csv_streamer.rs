use csv::ReaderBuilder;
use log::{info, warn};
use serde::Deserialize;
use std::fs::File;
use tokio::sync::mpsc::Sender;

use super::error::Error;
use super::types::{PathQuery, QueryStreamer};

// Helper struct for CSV parsing
#[derive(Debug, Deserialize, Default)]
pub struct QueryRecord {
    pub start: usize,
    pub end: usize,

    /// Empty or missing means unbounded.
    #[serde(default)]
    pub radius: Option<f64>,
}

impl From<QueryRecord> for PathQuery {
    fn from(record: QueryRecord) -> Self {
        PathQuery {
            start: record.start,
            end: record.end,
            radius: record.radius.unwrap_or(f64::INFINITY),
        }
    }
}

/// Streams path queries read from a `start,end[,radius]` CSV file.
pub struct CsvStreamer {
    path: String,
    batch_size: usize,
}

impl CsvStreamer {
    pub fn new(path: String, batch_size: usize) -> Self {
        CsvStreamer { path, batch_size }
    }

    fn parse_csv_to_queries(&self) -> Result<Vec<PathQuery>, Error> {
        let file = File::open(&self.path).map_err(|e| {
            warn!("Failed to read file {}: {:?}", self.path, e);
            Error::IoError(e)
        })?;

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let mut queries = Vec::new();

        for result in rdr.deserialize() {
            let record: QueryRecord = result?;
            queries.push(record.into());
        }
        Ok(queries)
    }
}

#[async_trait::async_trait]
impl QueryStreamer for CsvStreamer {
    async fn run_stream(self, sender: Sender<Vec<PathQuery>>) -> Result<(), Error> {
        let all_queries = self.parse_csv_to_queries()?;
        let mut queries_sent = 0;

        info!(
            "CsvStreamer: Starting transfer of {} queries...",
            all_queries.len()
        );

        for chunk in all_queries.chunks(self.batch_size.max(1)) {
            if let Err(e) = sender.send(chunk.to_vec()).await {
                warn!(
                    "CsvStreamer shutting down: Searcher receiver dropped during send. Error: {}",
                    e
                );
                return Err(Error::ChannelSendFailed);
            }

            queries_sent += chunk.len();
        }

        info!(
            "CsvStreamer: Successfully transferred {} queries in batches.",
            queries_sent
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokio::sync::mpsc;

    const MOCK_CSV_CONTENT: &str = "\
start,end,radius
0,2,
3,2,4.5
1,0
";

    const BATCH_SIZE: usize = 2;

    fn streamer_for(content: &str) -> (NamedTempFile, CsvStreamer) {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        temp_file
            .write_all(content.as_bytes())
            .expect("Failed to write mock content");
        let path = temp_file
            .path()
            .to_str()
            .expect("Failed to get path string")
            .to_string();

        (temp_file, CsvStreamer::new(path, BATCH_SIZE))
    }

    #[test]
    fn test_parse_csv_to_queries_success() {
        let (_file, streamer) = streamer_for(MOCK_CSV_CONTENT);

        let queries = streamer.parse_csv_to_queries().expect("Parsing should succeed");

        assert_eq!(
            queries,
            vec![
                PathQuery::new(0, 2),
                PathQuery {
                    start: 3,
                    end: 2,
                    radius: 4.5
                },
                PathQuery::new(1, 0),
            ]
        );
    }

    #[test]
    fn test_parse_csv_to_queries_file_not_found() {
        let streamer = CsvStreamer::new("non_existent_file.csv".to_string(), BATCH_SIZE);
        let result = streamer.parse_csv_to_queries();

        if let Err(Error::IoError(e)) = result {
            assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
        } else {
            panic!("Expected IoError, got: {:?}", result);
        }
    }

    #[tokio::test]
    async fn test_stream_sends_batches() {
        let (_file, streamer) = streamer_for(MOCK_CSV_CONTENT);
        let (tx, mut rx) = mpsc::channel(4);

        streamer.run_stream(tx).await.expect("Streaming should succeed");

        assert_eq!(rx.recv().await.map(|batch| batch.len()), Some(2));
        assert_eq!(rx.recv().await.map(|batch| batch.len()), Some(1));
        assert_eq!(rx.recv().await, None);
    }
}
