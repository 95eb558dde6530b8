use citesweep_core::{CitationInfo, LookupResult, Query, Violation};

pub const AGENCY_NOT_FOUND_MARKER: &str = "Agency not found.";
pub const NO_CITATIONS_MARKER: &str = "Sorry, no citations matched your search.";

const SEARCH_LABELS: [&str; 4] = [
    "DataGrid1_ctl02_LabelAgency",
    "DataGrid1_ctl02_LabelPlate",
    "DataGrid1_ctl02_LabelState",
    "DataGrid1_ctl02_LabelMessage",
];
const SEARCH_CELL_ANCHOR: &str = r#"<span id="DataGrid1_ctl02_LabelState">"#;
const SEARCH_CELL_WRAPPER: &str = r#"<font face="Verdana">"#;

const DETAIL_FIELD_WRAPPER: &str = r#"<b><font face="verdana" size="2">"#;
const VIOLATION_ANCHOR: &str = "dgViolation";
const VIOLATION_ROW: &str = "</tr><tr>";
const VIOLATION_CELL_WRAPPER: &str = r#"<font face="Verdana" size="2">"#;

/// How the search page answered a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPage {
    AgencyNotFound,
    NoCitations,
    Match(SearchFields),
}

/// Fields scraped from a matching search page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFields {
    pub agency_name: String,
    pub plate: String,
    pub state: String,
    pub notes: String,
    pub date: String,
    pub total: String,
}

impl SearchFields {
    pub fn into_result(self, query: Query) -> LookupResult {
        LookupResult {
            query,
            found: true,
            agency_name: self.agency_name,
            plate: self.plate,
            state: self.state,
            date: self.date,
            total: self.total,
            notes: self.notes,
        }
    }
}

pub fn classify_search_page(body: &str) -> SearchPage {
    if body.contains(AGENCY_NOT_FOUND_MARKER) {
        return SearchPage::AgencyNotFound;
    }
    if body.contains(NO_CITATIONS_MARKER) {
        return SearchPage::NoCitations;
    }

    let [agency_name, plate, state, notes] = SEARCH_LABELS.map(|id| parse_table_entry(body, id));
    let (date, total) = parse_date_and_total(body);
    SearchPage::Match(SearchFields {
        agency_name,
        plate,
        state,
        notes,
        date,
        total,
    })
}

/// Text of `<span id="{id}">…</span>`, or empty if the span is missing.
pub fn parse_table_entry(content: &str, id: &str) -> String {
    let starter = format!(r#"<span id="{id}">"#);
    let Some(start) = content.find(&starter) else {
        return String::new();
    };
    let rest = &content[start + starter.len()..];
    rest.find("</span>")
        .map(|end| unescape(&rest[..end]))
        .unwrap_or_default()
}

/// The two table cells following the state label: citation date and total.
pub fn parse_date_and_total(content: &str) -> (String, String) {
    let Some(start) = content.find(SEARCH_CELL_ANCHOR) else {
        return (String::new(), String::new());
    };
    let section = content[start..].replace(SEARCH_CELL_WRAPPER, "");
    let [date, total] = cell_values::<2>(&section);
    (date, total)
}

/// Fill the detail fields of `citation` from a detail page.
///
/// Missing anchors leave the corresponding field empty.
pub fn parse_detail_page(body: &str, citation: &mut CitationInfo) {
    let content = body.replace(DETAIL_FIELD_WRAPPER, "");
    let fields: [(&str, &mut String); 10] = [
        ("txtVioLocation", &mut citation.location),
        ("txtCiteTime", &mut citation.time),
        ("txtOfficer", &mut citation.officer),
        ("txtVIN", &mut citation.vin),
        ("txtVIN4", &mut citation.vin_suffix),
        ("lblMake", &mut citation.make),
        ("lblModel", &mut citation.model),
        ("lblColor", &mut citation.color),
        ("txtTabMOYR", &mut citation.tab_month_year),
        ("txtOrgPermit", &mut citation.permit),
    ];
    for (id, field) in fields {
        *field = field_value(&content, id);
    }
    citation.violation = parse_violation(body);
}

/// Value of the element opened by `<span id="{id}"`, up to the next tag.
pub fn field_value(content: &str, id: &str) -> String {
    let anchor = format!(r#"<span id="{id}""#);
    let Some(start) = content.find(&anchor) else {
        return String::new();
    };
    let rest = &content[start..];
    let Some(open_end) = rest.find('>') else {
        return String::new();
    };
    let rest = &rest[open_end + 1..];
    rest.find('<')
        .map(|end| unescape(&rest[..end]))
        .unwrap_or_default()
}

/// First data row of the violation table: code, amount, description.
pub fn parse_violation(body: &str) -> Violation {
    let content = body.replace(VIOLATION_CELL_WRAPPER, "");
    let Some(table) = content.find(VIOLATION_ANCHOR) else {
        return Violation::default();
    };
    let Some(row) = content[table..].find(VIOLATION_ROW) else {
        return Violation::default();
    };
    let [code, amount, description] = cell_values::<3>(&content[table + row..]);
    Violation {
        code,
        amount,
        description,
    }
}

/// Read up to `N` consecutive `<td …>value<` cells; missing cells stay empty.
fn cell_values<const N: usize>(mut content: &str) -> [String; N] {
    let mut values: [String; N] = std::array::from_fn(|_| String::new());
    for value in &mut values {
        let Some(cell) = content.find("<td") else {
            break;
        };
        content = &content[cell..];
        let Some(open_end) = content.find('>') else {
            break;
        };
        content = &content[open_end + 1..];
        let Some(end) = content.find('<') else {
            break;
        };
        *value = unescape(&content[..end]);
        content = &content[end..];
    }
    values
}

/// Decode markup entities (`&amp;`, `&#39;`, `&nbsp;`, ...) in a text run.
///
/// Tags and line endings pass through untouched.
pub fn unescape(raw: &str) -> String {
    html_escape::decode_html_entities(raw).into_owned()
}
