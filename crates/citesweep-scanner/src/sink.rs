//! Durable CSV sinks for harvested and enriched records.
//!
//! Each sink is owned by a single consumer running on a blocking thread, and
//! every record is flushed as soon as it is written so a crash loses at most
//! the row in flight.

use crate::absence::AbsenceCache;
use crate::error::{Result, ScanError};
use citesweep_core::{CitationInfo, LookupResult, DETAIL_FIELD_NAMES};
use csv::{Writer, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tokio::sync::mpsc;

/// Counters kept by [`ResultSink::drain`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkCounters {
    /// Results received, positive or not
    pub processed: u64,
    /// Positive results written to the store
    pub found: u64,
}

/// Header-less, append-only store of positive lookup results.
pub struct ResultSink<W: Write> {
    writer: Writer<W>,
}

impl ResultSink<File> {
    /// Open `path` for appending, creating it if needed.
    pub fn open_append(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        tracing::debug!("Appending harvest results to {}", path.display());
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> ResultSink<W> {
    /// Wrap an arbitrary writer.
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: WriterBuilder::new().has_headers(false).from_writer(inner),
        }
    }

    /// Append one result row and flush it.
    pub fn append(&mut self, result: &LookupResult) -> Result<()> {
        self.writer.write_record(result.to_row())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Consume results until every sender is gone.
    ///
    /// Negative results are only counted. A progress line is logged every
    /// `progress_interval` results (never when it is 0). Must be called from a
    /// blocking thread.
    pub fn drain(
        &mut self,
        mut results: mpsc::Receiver<LookupResult>,
        absent: &AbsenceCache,
        progress_interval: u64,
    ) -> Result<SinkCounters> {
        let mut counters = SinkCounters::default();
        while let Some(result) = results.blocking_recv() {
            if result.found {
                self.append(&result)?;
                counters.found += 1;
            }
            counters.processed += 1;
            if progress_interval > 0 && counters.processed % progress_interval == 0 {
                tracing::info!(
                    "found {}/{} queries ({} absent agencies)",
                    counters.found,
                    counters.processed,
                    absent.len()
                );
            }
        }
        Ok(counters)
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| ScanError::Io(e.into_error()))
    }
}

/// Store of enriched records with a fixed 21-column header.
pub struct DetailSink<W: Write> {
    writer: Writer<W>,
    written: u64,
}

impl DetailSink<File> {
    /// Create (or truncate) `path` and write the header row.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        tracing::debug!("Writing enriched records to {}", path.display());
        Self::from_writer(file)
    }
}

impl<W: Write> DetailSink<W> {
    /// Wrap an arbitrary writer, writing the header row immediately.
    pub fn from_writer(inner: W) -> Result<Self> {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(inner);
        writer.write_record(DETAIL_FIELD_NAMES)?;
        writer.flush()?;
        Ok(Self { writer, written: 0 })
    }

    /// Write one enriched record and flush it.
    pub fn write(&mut self, citation: &CitationInfo) -> Result<()> {
        self.writer.write_record(citation.fields())?;
        self.writer.flush()?;
        self.written += 1;
        tracing::info!("done {} records", self.written);
        Ok(())
    }

    /// Records written so far, header excluded.
    #[must_use]
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Consume enriched records until every sender is gone.
    ///
    /// Must be called from a blocking thread.
    pub fn drain(&mut self, mut records: mpsc::Receiver<CitationInfo>) -> Result<u64> {
        while let Some(citation) = records.blocking_recv() {
            self.write(&citation)?;
        }
        Ok(self.written)
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| ScanError::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citesweep_core::Query;
    use tempfile::TempDir;

    fn positive(agency: u32, cite: &str) -> LookupResult {
        LookupResult {
            found: true,
            agency_name: "Acme, PD".to_string(),
            plate: "ABC123".to_string(),
            state: "CA".to_string(),
            date: "03/01/2020".to_string(),
            total: "$50.00".to_string(),
            ..LookupResult::not_found(Query::new(agency, cite))
        }
    }

    #[test]
    fn test_append_quotes_fields() {
        let mut sink = ResultSink::from_writer(Vec::new());
        sink.append(&positive(4, "100001")).expect("append");
        let bytes = sink.into_inner().expect("into inner");
        assert_eq!(
            String::from_utf8(bytes).expect("utf8"),
            "4,100001,\"Acme, PD\",ABC123,CA,03/01/2020,$50.00,\n"
        );
    }

    #[test]
    fn test_open_append_keeps_existing_rows() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("output.csv");
        std::fs::write(&path, "1,100000,Old,X,CA,01/01/2020,$1.00,\n").expect("seed file");

        let mut sink = ResultSink::open_append(&path).expect("open sink");
        sink.append(&positive(2, "100002")).expect("append");
        drop(sink);

        let contents = std::fs::read_to_string(&path).expect("read output");
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.starts_with("1,100000,Old"));
    }

    #[test]
    fn test_drain_counts_and_filters() {
        let (tx, rx) = mpsc::channel(8);
        let absent = AbsenceCache::new();
        absent.insert(9);

        let producer = std::thread::spawn(move || {
            tx.blocking_send(positive(1, "100000")).expect("send");
            tx.blocking_send(LookupResult::not_found(Query::new(9, "100001")))
                .expect("send");
            tx.blocking_send(positive(2, "100002")).expect("send");
        });

        let mut sink = ResultSink::from_writer(Vec::new());
        let counters = sink.drain(rx, &absent, 2).expect("drain");
        producer.join().expect("producer thread");

        assert_eq!(
            counters,
            SinkCounters {
                processed: 3,
                found: 2
            }
        );
        let bytes = sink.into_inner().expect("into inner");
        assert_eq!(String::from_utf8(bytes).expect("utf8").lines().count(), 2);
    }

    #[test]
    fn test_detail_sink_writes_header_first() {
        let mut sink = DetailSink::from_writer(Vec::new()).expect("create sink");
        let citation = CitationInfo {
            agency: "4".to_string(),
            citation_number: "100001".to_string(),
            officer: "Smith".to_string(),
            ..CitationInfo::default()
        };
        sink.write(&citation).expect("write");
        assert_eq!(sink.written(), 1);

        let text = String::from_utf8(sink.into_inner().expect("into inner")).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "Agency,CiteNum,AgencyName,Plate,State,Date,Total,Notes,Location,Time,Officer,\
                 VIN,VIN4,Make,Model,Color,TabMOYR,Permit,Violation.Code,Violation.Amount,\
                 Violation.Description"
            )
        );
        assert_eq!(lines.next(), Some("4,100001,,,,,,,,,Smith,,,,,,,,,,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_detail_sink_create_truncates() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("details.csv");
        std::fs::write(&path, "stale\nstale\n").expect("seed file");

        let sink = DetailSink::create(&path).expect("create sink");
        drop(sink);

        let contents = std::fs::read_to_string(&path).expect("read output");
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.starts_with("Agency,CiteNum"));
    }
}
