#![allow(dead_code)]

use async_trait::async_trait;
use citesweep_client::{CitationLookup, ClientError};
use citesweep_core::{CitationInfo, Query};
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const NO_CITATIONS_PAGE: &str =
    "<html><body><p>Sorry, no citations matched your search.</p></body></html>";

pub const AGENCY_NOT_FOUND_PAGE: &str =
    "<html><body><p>Agency not found.</p><p>Sorry, no citations matched your search.</p></body></html>";

/// Search page as served for a matching citation.
pub fn match_page(agency: &str, plate: &str, date: &str, total: &str, notes: &str) -> String {
    format!(
        r#"<html><body><table id="DataGrid1"><tr>
<td><span id="DataGrid1_ctl02_LabelAgency">{agency}</span></td>
<td><span id="DataGrid1_ctl02_LabelPlate">{plate}</span></td>
<td><span id="DataGrid1_ctl02_LabelState">CA</span></td>
<td align="center"><font face="Verdana">{date}</font></td>
<td align="right"><font face="Verdana">{total}</font></td>
<td><span id="DataGrid1_ctl02_LabelMessage">{notes}</span></td>
</tr></table></body></html>"#
    )
}

/// Detail page with every anchor and one violation row.
pub fn full_detail_page() -> String {
    let span = |id: &str, value: &str| {
        format!(r#"<td><span id="{id}"><b><font face="verdana" size="2">{value}</font></b></span></td>"#)
    };
    let mut page = String::from("<html><body><table>");
    for (id, value) in [
        ("txtVioLocation", "100 Main St"),
        ("txtCiteTime", "10:15"),
        ("txtOfficer", "Smith"),
        ("txtVIN", "1HGCM82633A004352"),
        ("txtVIN4", "4352"),
        ("lblMake", "HOND"),
        ("lblModel", "ACCORD"),
        ("lblColor", "BLK"),
        ("txtTabMOYR", "05/2021"),
        ("txtOrgPermit", "P-778"),
    ] {
        page.push_str(&span(id, value));
    }
    page.push_str(
        r#"</table><table id="dgViolation"><tr><td>Code</td><td>Amount</td><td>Description</td></tr><tr><td><font face="Verdana" size="2">22500</font></td><td><font face="Verdana" size="2">$50.00</font></td><td><font face="Verdana" size="2">Red zone &amp; curb</font></td></tr></table></body></html>"#,
    );
    page
}

type SearchFn = dyn Fn(&Query, usize) -> Result<String, ClientError> + Send + Sync;
type DetailFn = dyn Fn(&CitationInfo) -> Result<String, ClientError> + Send + Sync;

/// Scripted lookup that counts every call and remembers which queries it saw.
pub struct MockLookup {
    search: Box<SearchFn>,
    details: Box<DetailFn>,
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    seen: Mutex<Vec<(Query, tokio::time::Instant)>>,
}

impl MockLookup {
    /// `search` receives the query and the zero-based call index.
    pub fn searching<F>(search: F) -> Self
    where
        F: Fn(&Query, usize) -> Result<String, ClientError> + Send + Sync + 'static,
    {
        Self {
            search: Box::new(search),
            details: Box::new(|_| Err(ClientError::Lookup("no detail script".to_string()))),
            search_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn detailing<F>(details: F) -> Self
    where
        F: Fn(&CitationInfo) -> Result<String, ClientError> + Send + Sync + 'static,
    {
        Self {
            details: Box::new(details),
            ..Self::searching(|_, _| Err(ClientError::Lookup("no search script".to_string())))
        }
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<(Query, tokio::time::Instant)> {
        self.seen.lock().expect("seen lock").clone()
    }
}

#[async_trait]
impl CitationLookup for MockLookup {
    async fn search(&self, query: &Query) -> Result<String, ClientError> {
        let call = self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .expect("seen lock")
            .push((query.clone(), tokio::time::Instant::now()));
        (self.search)(query, call)
    }

    async fn details(&self, citation: &CitationInfo) -> Result<String, ClientError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        (self.details)(citation)
    }
}

/// Writer that accepts `budget` bytes and then fails every write.
pub struct DiskFullWriter {
    budget: usize,
}

impl DiskFullWriter {
    pub fn after(budget: usize) -> Self {
        Self { budget }
    }
}

impl Write for DiskFullWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::Error::other("disk full"));
        }
        let accepted = buf.len().min(self.budget);
        self.budget -= accepted;
        Ok(accepted)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
