//! Query space enumeration.
//!
//! One random permutation of the citation range is drawn per run and reused
//! for every agency pass; each pass rotates which agency a permutation slot
//! maps to. Consecutive queries therefore walk across agencies round-robin
//! while citation numbers stay shuffled.

use citesweep_core::{AgencyId, HarvestConfig, Query};
use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::mpsc;

/// Inclusive (agency, citation number) ranges to sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySpace {
    start_agency: AgencyId,
    end_agency: AgencyId,
    start_cite_num: u64,
    end_cite_num: u64,
}

impl QuerySpace {
    /// Create a space over `[start_agency, end_agency] x [start_cite_num, end_cite_num]`.
    ///
    /// Inverted ranges are not rejected; they simply contain no queries.
    #[must_use]
    pub fn new(
        start_agency: AgencyId,
        end_agency: AgencyId,
        start_cite_num: u64,
        end_cite_num: u64,
    ) -> Self {
        Self {
            start_agency,
            end_agency,
            start_cite_num,
            end_cite_num,
        }
    }

    /// Build the space from harvest settings.
    #[must_use]
    pub fn from_config(config: &HarvestConfig) -> Self {
        Self::new(
            config.start_agency,
            config.end_agency,
            config.start_cite_num,
            config.end_cite_num,
        )
    }

    /// Number of agencies in the range.
    #[must_use]
    pub fn agency_count(&self) -> u64 {
        inclusive_len(u64::from(self.start_agency), u64::from(self.end_agency))
    }

    /// Number of citation numbers in the range.
    #[must_use]
    pub fn citation_count(&self) -> u64 {
        inclusive_len(self.start_cite_num, self.end_cite_num)
    }

    /// Total number of queries one pass emits, saturating at `u64::MAX`.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.agency_count().saturating_mul(self.citation_count())
    }

    /// Whether the space contains no queries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Draw the per-run permutation of citation offsets.
    pub fn permutation<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<u64> {
        let mut offsets: Vec<u64> = (0..self.citation_count()).collect();
        offsets.shuffle(rng);
        offsets
    }

    /// Every query of one pass, in emission order, for a given permutation.
    #[allow(clippy::cast_possible_truncation)]
    pub fn queries<'a>(&'a self, permutation: &'a [u64]) -> impl Iterator<Item = Query> + 'a {
        let agencies = self.agency_count();
        (0..agencies).flat_map(move |agency_offset| {
            permutation
                .iter()
                .enumerate()
                .map(move |(slot, &cite_offset)| {
                    // Bounded by end_agency, so the cast cannot truncate.
                    let agency = u64::from(self.start_agency)
                        + (slot as u64 % agencies + agency_offset) % agencies;
                    Query::new(
                        agency as AgencyId,
                        (self.start_cite_num + cite_offset).to_string(),
                    )
                })
        })
    }

    /// Push one full pass into the bounded query queue.
    ///
    /// Blocks whenever the queue is full. Returns the number of queries sent;
    /// stops early if every receiver is gone.
    pub async fn feed(self, permutation: Vec<u64>, queries: mpsc::Sender<Query>) -> u64 {
        let mut sent = 0;
        for query in self.queries(&permutation) {
            if queries.send(query).await.is_err() {
                tracing::warn!("Query queue closed after {} queries, stopping generator", sent);
                break;
            }
            sent += 1;
        }
        tracing::debug!("Generator finished after {} queries", sent);
        sent
    }
}

fn inclusive_len(start: u64, end: u64) -> u64 {
    end.checked_sub(start).map_or(0, |span| span.saturating_add(1))
}
