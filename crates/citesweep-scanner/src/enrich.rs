//! Detail enrichment of harvested citations.
//!
//! Reads the basic-record store, fetches each citation's detail page through a
//! pool of workers, and writes the 21-field enriched record to a second store.
//! Unlike the harvest stage, any transport error here aborts the whole run.

use crate::error::{Result, ScanError};
use crate::parser::parse_detail_page;
use crate::sink::DetailSink;
use citesweep_client::CitationLookup;
use citesweep_core::{CitationInfo, CiteSweepError, EnrichConfig};
use csv::ReaderBuilder;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// Default number of detail workers.
const DEFAULT_CONCURRENCY: usize = 16;

/// Summary of a finished enrichment run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichStats {
    /// Records read from the input store
    pub read: u64,
    /// Enriched records written to the output store
    pub written: u64,
}

/// Parse basic records from header-less CSV.
///
/// Every row must have exactly eight fields; the first row that does not
/// fails the whole read. `source` names the input in error messages.
pub fn parse_basic_records<R: Read>(reader: R, source: &str) -> Result<Vec<CitationInfo>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let record = CitationInfo::from_basic_row(row.iter()).map_err(|e| match e {
            CiteSweepError::Schema { expected, found } => ScanError::Schema {
                row: index + 1,
                expected,
                found,
            },
        })?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(ScanError::EmptyInput {
            path: source.to_string(),
        });
    }
    Ok(records)
}

/// Read and validate the basic-record store at `path`.
pub fn read_basic_records(path: &Path) -> Result<Vec<CitationInfo>> {
    let file = std::fs::File::open(path)?;
    parse_basic_records(file, &path.display().to_string())
}

/// Fetch the detail page for `citation` and fill in its detail fields.
///
/// Missing anchors leave fields empty; a transport error is returned as
/// [`ScanError::DetailLookup`].
pub async fn fill_details(lookup: &dyn CitationLookup, citation: &mut CitationInfo) -> Result<()> {
    let body = lookup
        .details(citation)
        .await
        .map_err(|source| ScanError::DetailLookup {
            citation: citation.citation_number.clone(),
            source,
        })?;
    parse_detail_page(&body, citation);
    Ok(())
}

/// Pool of detail workers feeding one [`DetailSink`].
pub struct EnrichmentPipeline {
    lookup: Arc<dyn CitationLookup>,
    concurrency: usize,
}

impl EnrichmentPipeline {
    /// Create a pipeline with the default worker count.
    #[must_use]
    pub fn new(lookup: Arc<dyn CitationLookup>) -> Self {
        Self {
            lookup,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Create a pipeline from enrichment settings.
    #[must_use]
    pub fn from_config(lookup: Arc<dyn CitationLookup>, config: &EnrichConfig) -> Self {
        Self::new(lookup).with_concurrency(config.concurrency)
    }

    /// Set the number of detail workers (at least one).
    #[must_use]
    pub fn with_concurrency(mut self, workers: usize) -> Self {
        self.concurrency = workers.max(1);
        self
    }

    /// Validate `input`, then enrich every record into `output`.
    ///
    /// The input is fully read and checked before the output is created or
    /// any detail page is requested.
    pub async fn run_files(&self, input: &Path, output: &Path) -> Result<EnrichStats> {
        let records = read_basic_records(input)?;
        tracing::info!("Loaded {} records from {}", records.len(), input.display());
        let sink = DetailSink::create(output)?;
        self.run(records, sink).await
    }

    /// Enrich `records` and write them to `sink`.
    ///
    /// The first failed detail lookup aborts the run; remaining workers are
    /// cancelled and the error is returned.
    pub async fn run<W>(
        &self,
        records: Vec<CitationInfo>,
        mut sink: DetailSink<W>,
    ) -> Result<EnrichStats>
    where
        W: Write + Send + 'static,
    {
        let read = records.len() as u64;
        let (input_tx, input_rx) = mpsc::channel::<CitationInfo>(records.len().max(1));
        for record in records {
            // Capacity covers every record, so this never waits.
            if input_tx.send(record).await.is_err() {
                break;
            }
        }
        drop(input_tx);

        let (output_tx, output_rx) = mpsc::channel::<CitationInfo>(self.concurrency);
        let inputs = Arc::new(Mutex::new(input_rx));
        let mut workers = JoinSet::new();
        for worker_id in 0..self.concurrency {
            workers.spawn(detail_worker(
                worker_id,
                self.lookup.clone(),
                inputs.clone(),
                output_tx.clone(),
            ));
        }
        drop(output_tx);
        drop(inputs);

        let sink_task = tokio::task::spawn_blocking(move || sink.drain(output_rx));

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined? {
                tracing::error!("Enrichment aborted: {}", e);
                workers.abort_all();
                // Let the sink finish what was already handed over.
                match sink_task.await {
                    Ok(Ok(written)) => tracing::info!("Kept {} records before abort", written),
                    Ok(Err(sink_err)) => tracing::warn!("Detail sink also failed: {}", sink_err),
                    Err(join_err) => tracing::warn!("Detail sink task failed: {}", join_err),
                }
                return Err(e);
            }
        }

        let written = sink_task.await??;
        tracing::info!("Enrichment complete: wrote {}/{} records", written, read);
        Ok(EnrichStats { read, written })
    }
}

async fn detail_worker(
    worker_id: usize,
    lookup: Arc<dyn CitationLookup>,
    inputs: Arc<Mutex<mpsc::Receiver<CitationInfo>>>,
    outputs: mpsc::Sender<CitationInfo>,
) -> Result<()> {
    loop {
        let next = inputs.lock().await.recv().await;
        let Some(mut citation) = next else {
            break;
        };

        fill_details(lookup.as_ref(), &mut citation).await?;
        if outputs.send(citation).await.is_err() {
            tracing::warn!("Output queue closed, worker {} exiting", worker_id);
            break;
        }
    }
    Ok(())
}
