use crate::error::Result;
use citesweep_core::{CitationInfo, Query};
use url::Url;

const SEARCH_PAGE: &str = "SearchAgency.aspx";
const DETAIL_PAGE: &str = "OnlineContest.aspx";

/// Parse a base URL and make sure it ends with `/`, so page names are joined
/// under it instead of replacing its last path segment.
pub fn normalize_base_url(base: &str) -> Result<Url> {
    let mut url = Url::parse(base)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

pub fn build_search_url(base: &Url, query: &Query) -> Result<Url> {
    let mut url = base.join(SEARCH_PAGE)?;
    url.query_pairs_mut()
        .append_pair("agency", &query.agency.to_string())
        .append_pair("plate", "")
        .append_pair("cite", &query.citation_number)
        .append_pair("state", "");
    Ok(url)
}

pub fn build_detail_url(base: &Url, citation: &CitationInfo) -> Result<Url> {
    let mut url = base.join(DETAIL_PAGE)?;
    url.query_pairs_mut()
        .append_pair("agency", &citation.agency_name)
        .append_pair("cite", &citation.citation_number)
        .append_pair("platestate", "")
        .append_pair("citedate", &citation.date)
        .append_pair("citebal", "")
        .append_pair("S1", "")
        .append_pair("S2", "")
        .append_pair("S3", "")
        .append_pair("S4", "")
        .append_pair("SearchType", "1");
    Ok(url)
}
