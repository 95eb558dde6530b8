//! Shared record types used across CiteSweep.
//!
//! A [`Query`] names one point of the (agency, citation number) search space,
//! a [`LookupResult`] is what a harvest worker learned about it, and a
//! [`CitationInfo`] is the enriched record produced by the detail stage.

use crate::error::{CiteSweepError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer identifier of an issuing agency in the remote lookup system.
pub type AgencyId = u32;

/// Number of fields in a basic (harvested) record row.
pub const BASIC_FIELD_COUNT: usize = 8;

/// Column names of the enriched record store, in schema order.
pub const DETAIL_FIELD_NAMES: [&str; 21] = [
    "Agency",
    "CiteNum",
    "AgencyName",
    "Plate",
    "State",
    "Date",
    "Total",
    "Notes",
    "Location",
    "Time",
    "Officer",
    "VIN",
    "VIN4",
    "Make",
    "Model",
    "Color",
    "TabMOYR",
    "Permit",
    "Violation.Code",
    "Violation.Amount",
    "Violation.Description",
];

/// One (agency, citation number) pair to look up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    /// Agency to search within
    pub agency: AgencyId,
    /// Citation number, rendered as decimal digits
    pub citation_number: String,
}

impl Query {
    /// Create a new query.
    #[must_use]
    pub fn new(agency: AgencyId, citation_number: impl Into<String>) -> Self {
        Self {
            agency,
            citation_number: citation_number.into(),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agency {} cite {}", self.agency, self.citation_number)
    }
}

/// Outcome of one harvest lookup.
///
/// When `found` is false every text field is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    /// Query this result answers
    pub query: Query,
    /// Whether the service returned a matching record
    pub found: bool,
    /// Agency display name
    pub agency_name: String,
    /// License plate
    pub plate: String,
    /// Plate state
    pub state: String,
    /// Citation date
    pub date: String,
    /// Outstanding total
    pub total: String,
    /// Free-form notes shown alongside the record
    pub notes: String,
}

impl LookupResult {
    /// Build a negative result carrying no field data.
    #[must_use]
    pub fn not_found(query: Query) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    /// Row written to the basic-record store.
    #[must_use]
    pub fn to_row(&self) -> [String; BASIC_FIELD_COUNT] {
        [
            self.query.agency.to_string(),
            self.query.citation_number.clone(),
            self.agency_name.clone(),
            self.plate.clone(),
            self.state.clone(),
            self.date.clone(),
            self.total.clone(),
            self.notes.clone(),
        ]
    }
}

/// Violation line attached to a citation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Violation code
    pub code: String,
    /// Fine amount
    pub amount: String,
    /// Human-readable description
    pub description: String,
}

/// Fully enriched citation record.
///
/// The first eight fields come from the basic-record store; the rest are
/// filled in by the detail lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationInfo {
    /// Agency ID as stored
    pub agency: String,
    /// Citation number
    pub citation_number: String,
    /// Agency display name
    pub agency_name: String,
    /// License plate
    pub plate: String,
    /// Plate state
    pub state: String,
    /// Citation date
    pub date: String,
    /// Outstanding total
    pub total: String,
    /// Notes from the search page
    pub notes: String,

    /// Violation location
    pub location: String,
    /// Time of the citation
    pub time: String,
    /// Issuing officer
    pub officer: String,
    /// Vehicle identification number
    pub vin: String,
    /// Last four characters of the VIN
    pub vin_suffix: String,
    /// Vehicle make
    pub make: String,
    /// Vehicle model
    pub model: String,
    /// Vehicle color
    pub color: String,
    /// Registration tab month/year
    pub tab_month_year: String,
    /// Permit number
    pub permit: String,
    /// First violation listed on the citation
    pub violation: Violation,
}

impl CitationInfo {
    /// Build a record from one basic-record row.
    ///
    /// # Errors
    /// Returns [`CiteSweepError::Schema`] unless the row has exactly
    /// [`BASIC_FIELD_COUNT`] fields.
    pub fn from_basic_row<'a, I>(row: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = row.into_iter().collect();
        let &[agency, citation_number, agency_name, plate, state, date, total, notes] =
            fields.as_slice()
        else {
            return Err(CiteSweepError::Schema {
                expected: BASIC_FIELD_COUNT,
                found: fields.len(),
            });
        };

        Ok(Self {
            agency: agency.to_string(),
            citation_number: citation_number.to_string(),
            agency_name: agency_name.to_string(),
            plate: plate.to_string(),
            state: state.to_string(),
            date: date.to_string(),
            total: total.to_string(),
            notes: notes.to_string(),
            ..Self::default()
        })
    }

    /// All fields in [`DETAIL_FIELD_NAMES`] order.
    #[must_use]
    pub fn fields(&self) -> [&str; 21] {
        [
            self.agency.as_str(),
            self.citation_number.as_str(),
            self.agency_name.as_str(),
            self.plate.as_str(),
            self.state.as_str(),
            self.date.as_str(),
            self.total.as_str(),
            self.notes.as_str(),
            self.location.as_str(),
            self.time.as_str(),
            self.officer.as_str(),
            self.vin.as_str(),
            self.vin_suffix.as_str(),
            self.make.as_str(),
            self.model.as_str(),
            self.color.as_str(),
            self.tab_month_year.as_str(),
            self.permit.as_str(),
            self.violation.code.as_str(),
            self.violation.amount.as_str(),
            self.violation.description.as_str(),
        ]
    }
}
