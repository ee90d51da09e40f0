//! Domain searcher: keyword-overlap retrieval over one partition.

use crate::dataset::RecordSource;
use crate::matcher::{normalize_keywords, score};
use crate::types::{Domain, Record, SearchHit};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Maximum number of hits a search returns.
pub const MAX_SEARCH_RESULTS: usize = 5;

/// Searches the partition of a domain for records sharing query keywords.
///
/// One implementation serves all four domains; the domain only selects
/// which partition the [`RecordSource`] loads.
#[derive(Clone)]
pub struct DomainSearcher {
    source: Arc<dyn RecordSource>,
    limit: usize,
}

impl DomainSearcher {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self {
            source,
            limit: MAX_SEARCH_RESULTS,
        }
    }

    /// Search `domain` for records matching `keywords`.
    ///
    /// Never fails: a missing or unreadable partition is logged and yields
    /// no hits. Blank or duplicate keywords are ignored; if nothing is left
    /// the partition is not read at all.
    pub fn search<S: AsRef<str>>(&self, domain: Domain, keywords: &[S]) -> Vec<SearchHit> {
        let query = normalize_keywords(keywords);
        if query.is_empty() {
            tracing::debug!("No usable keywords for {} search", domain);
            return Vec::new();
        }

        let records = match self.source.load(domain) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Partition for {} unavailable, returning no hits: {}", domain, e);
                return Vec::new();
            }
        };

        let candidates = records.len();
        let ranked = rank(&query, records, self.limit);

        tracing::info!(
            "Searched {} with {:?}: {} hits (from {} records)",
            domain,
            query,
            ranked.len(),
            candidates
        );

        ranked.into_iter().map(|(_, record)| record.into()).collect()
    }
}

/// Score records, drop non-matches, order by descending score and truncate.
///
/// Ties keep their storage order.
pub(crate) fn rank(
    query: &BTreeSet<String>,
    records: Vec<Record>,
    limit: usize,
) -> Vec<(usize, Record)> {
    let mut scored: Vec<(usize, Record)> = records
        .into_iter()
        .filter_map(|record| {
            let matched = score(query, &record.keywords);
            (matched > 0).then_some((matched, record))
        })
        .collect();

    // Stable sort
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(limit);
    scored
}
