//! Keyword-overlap scoring.
//!
//! A record's score is the number of query keywords it carries. Nothing
//! fuzzier than exact set intersection is attempted.

use std::collections::BTreeSet;

/// Trim, drop blanks and dedupe a keyword list into a set.
pub fn normalize_keywords<I, S>(keywords: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keywords
        .into_iter()
        .filter_map(|keyword| {
            let trimmed = keyword.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}

/// Split a comma-separated keyword cell into a normalized set.
pub fn parse_keyword_cell(cell: &str) -> BTreeSet<String> {
    normalize_keywords(cell.split(','))
}

/// Cardinality of the intersection of the two keyword sets.
pub fn score(query: &BTreeSet<String>, record: &BTreeSet<String>) -> usize {
    let (small, large) = if query.len() <= record.len() {
        (query, record)
    } else {
        (record, query)
    };

    small.iter().filter(|keyword| large.contains(*keyword)).count()
}
