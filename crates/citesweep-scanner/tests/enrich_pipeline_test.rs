//! Detail enrichment runs against a scripted lookup service.

mod common;

use citesweep_client::ClientError;
use citesweep_core::{CitationInfo, DETAIL_FIELD_NAMES};
use citesweep_scanner::{
    fill_details, parse_basic_records, DetailSink, EnrichmentPipeline, ScanError,
};
use common::{full_detail_page, DiskFullWriter, MockLookup};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const INPUT: &str = "12,100042,Acme PD,ABC123,CA,03/01/2020,$50.00,\n\
                     7,100043,Metro Transit,XYZ9,NV,04/02/2021,$75.00,Paid\n";

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("open output");
    reader
        .records()
        .map(|row| row.expect("csv row").iter().map(String::from).collect())
        .collect()
}

#[tokio::test]
async fn test_short_row_aborts_before_any_lookup() {
    let tmp = TempDir::new().expect("create temp dir");
    let input = tmp.path().join("output.csv");
    let output = tmp.path().join("details.csv");
    std::fs::write(
        &input,
        "12,100042,Acme PD,ABC123,CA,03/01/2020,$50.00,\n7,100043,Metro,XYZ9,NV,04/02/2021,$75.00\n",
    )
    .expect("seed input");
    let lookup = Arc::new(MockLookup::detailing(|_| Ok(full_detail_page())));

    let err = EnrichmentPipeline::new(lookup.clone())
        .run_files(&input, &output)
        .await
        .expect_err("schema error");

    assert!(matches!(
        err,
        ScanError::Schema {
            row: 2,
            expected: 8,
            found: 7
        }
    ));
    assert_eq!(lookup.detail_calls(), 0);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_empty_input_is_an_error() {
    let tmp = TempDir::new().expect("create temp dir");
    let input = tmp.path().join("output.csv");
    let output = tmp.path().join("details.csv");
    std::fs::write(&input, "").expect("seed input");
    let lookup = Arc::new(MockLookup::detailing(|_| Ok(full_detail_page())));

    let err = EnrichmentPipeline::new(lookup.clone())
        .run_files(&input, &output)
        .await
        .expect_err("empty input");

    assert!(matches!(err, ScanError::EmptyInput { .. }));
    assert_eq!(lookup.detail_calls(), 0);
}

#[tokio::test]
async fn test_every_record_is_enriched() {
    let tmp = TempDir::new().expect("create temp dir");
    let input = tmp.path().join("output.csv");
    let output = tmp.path().join("details.csv");
    std::fs::write(&input, INPUT).expect("seed input");
    let lookup = Arc::new(MockLookup::detailing(|_| Ok(full_detail_page())));

    let stats = EnrichmentPipeline::new(lookup.clone())
        .with_concurrency(4)
        .run_files(&input, &output)
        .await
        .expect("enrichment run");

    assert_eq!(stats.read, 2);
    assert_eq!(stats.written, 2);
    assert_eq!(lookup.detail_calls(), 2);

    let rows = read_rows(&output);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], DETAIL_FIELD_NAMES.map(String::from).to_vec());

    let acme = rows
        .iter()
        .find(|row| row[1] == "100042")
        .expect("enriched acme row");
    assert_eq!(
        acme,
        &[
            "12",
            "100042",
            "Acme PD",
            "ABC123",
            "CA",
            "03/01/2020",
            "$50.00",
            "",
            "100 Main St",
            "10:15",
            "Smith",
            "1HGCM82633A004352",
            "4352",
            "HOND",
            "ACCORD",
            "BLK",
            "05/2021",
            "P-778",
            "22500",
            "$50.00",
            "Red zone & curb",
        ]
        .map(String::from)
        .to_vec()
    );
}

#[tokio::test]
async fn test_missing_anchors_leave_fields_empty() {
    let tmp = TempDir::new().expect("create temp dir");
    let input = tmp.path().join("output.csv");
    let output = tmp.path().join("details.csv");
    std::fs::write(&input, "12,100042,Acme PD,ABC123,CA,03/01/2020,$50.00,\n").expect("seed input");
    let lookup = Arc::new(MockLookup::detailing(|_| {
        Ok("<html><body>maintenance</body></html>".to_string())
    }));

    EnrichmentPipeline::new(lookup)
        .run_files(&input, &output)
        .await
        .expect("enrichment run");

    let rows = read_rows(&output);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].len(), 21);
    assert_eq!(rows[1][2], "Acme PD");
    assert!(rows[1][7..].iter().all(String::is_empty));
}

#[tokio::test]
async fn test_transport_error_is_fatal() {
    let tmp = TempDir::new().expect("create temp dir");
    let input = tmp.path().join("output.csv");
    let output = tmp.path().join("details.csv");
    std::fs::write(&input, INPUT).expect("seed input");
    let lookup = Arc::new(MockLookup::detailing(|citation| {
        if citation.citation_number == "100043" {
            Err(ClientError::Lookup("connection reset".to_string()))
        } else {
            Ok(full_detail_page())
        }
    }));

    let err = EnrichmentPipeline::new(lookup)
        .with_concurrency(1)
        .run_files(&input, &output)
        .await
        .expect_err("transport error");

    match err {
        ScanError::DetailLookup { citation, .. } => assert_eq!(citation, "100043"),
        other => panic!("unexpected error: {other}"),
    }
}

fn header_len() -> usize {
    DETAIL_FIELD_NAMES.join(",").len() + 1
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sink_failure_aborts_enrichment() {
    let records = parse_basic_records(INPUT.as_bytes(), "memory").expect("valid input");
    let lookup = Arc::new(MockLookup::detailing(|_| Ok(full_detail_page())));
    let sink =
        DetailSink::from_writer(DiskFullWriter::after(header_len())).expect("header fits");

    let pipeline = EnrichmentPipeline::new(lookup).with_concurrency(2);
    let run = pipeline.run(records, sink);
    let err = tokio::time::timeout(Duration::from_secs(10), run)
        .await
        .expect("enrichment must not hang on a failed sink")
        .expect_err("sink failure is fatal");

    assert!(matches!(err, ScanError::Io(_) | ScanError::Csv(_)), "{err}");
}

#[tokio::test]
async fn test_lookup_error_wins_over_sink_failure() {
    let records = parse_basic_records(INPUT.as_bytes(), "memory").expect("valid input");
    let lookup = Arc::new(MockLookup::detailing(|citation| {
        if citation.citation_number == "100043" {
            Err(ClientError::Lookup("connection reset".to_string()))
        } else {
            Ok(full_detail_page())
        }
    }));
    let sink =
        DetailSink::from_writer(DiskFullWriter::after(header_len())).expect("header fits");

    let err = EnrichmentPipeline::new(lookup)
        .with_concurrency(1)
        .run(records, sink)
        .await
        .expect_err("both stages failed");

    assert!(matches!(err, ScanError::DetailLookup { ref citation, .. } if citation == "100043"));
}

#[tokio::test]
async fn test_fill_details_keeps_basic_fields() {
    let lookup = MockLookup::detailing(|citation| {
        assert_eq!(citation.date, "03/01/2020");
        Ok(full_detail_page())
    });
    let mut citation = CitationInfo {
        agency: "12".to_string(),
        citation_number: "100042".to_string(),
        agency_name: "Acme PD".to_string(),
        date: "03/01/2020".to_string(),
        ..CitationInfo::default()
    };

    fill_details(&lookup, &mut citation).await.expect("fill details");

    assert_eq!(citation.agency_name, "Acme PD");
    assert_eq!(citation.officer, "Smith");
    assert_eq!(citation.vin, "1HGCM82633A004352");
    assert_eq!(citation.vin_suffix, "4352");
    assert_eq!(citation.permit, "P-778");
    assert_eq!(citation.tab_month_year, "05/2021");
    assert_eq!(citation.violation.description, "Red zone & curb");
}
