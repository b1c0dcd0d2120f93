use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::store::TermCountMap;

/// Terms by descending count; equal counts keep first-seen order.
fn rank_terms(counts: &TermCountMap) -> Vec<(&String, u64)> {
    let mut ranked: Vec<(&String, u64)> = counts.iter().map(|(t, c)| (t, *c)).collect();
    // stable: ties stay in first-seen order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Sum of all counts, wide enough that no record can overflow it.
fn total_count(counts: &TermCountMap) -> u128 {
    counts.values().map(|&c| u128::from(c)).sum()
}

/// Fixed, ordered feature axis shared by every document vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    terms: IndexSet<String>,
    coverage: f64,
}

impl Vocabulary {
    /// Selects the `k` most frequent terms of `aggregate`.
    ///
    /// Equal counts keep the aggregate's insertion order. `coverage` is the
    /// share of all occurrences carried by the selected terms (0 when the
    /// aggregate is empty).
    pub fn select(aggregate: &TermCountMap, k: usize) -> Self {
        let mut ranked = rank_terms(aggregate);
        ranked.truncate(k);

        let total = total_count(aggregate);
        let selected: u128 = ranked.iter().map(|(_, c)| u128::from(*c)).sum();
        let coverage = if total == 0 { 0.0 } else { selected as f64 / total as f64 };

        let terms = ranked.into_iter().map(|(t, _)| t.clone()).collect();
        Self { terms, coverage }
    }

    /// Builds a vocabulary from an explicit term list; duplicates are ignored.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { terms: terms.into_iter().map(Into::into).collect(), coverage: 1.0 }
    }

    /// Position of `term` on the feature axis.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get_index(index).map(String::as_str)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn coverage(&self) -> f64 {
        self.coverage
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// One row of a [`FrequencySummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermShare {
    pub term: String,
    pub count: u64,
    /// Fraction of all occurrences.
    pub share: f64,
    /// Running total of `share` down to this row.
    pub cumulative: f64,
}

/// Most frequent terms of a count map with their individual and cumulative
/// share of all occurrences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencySummary {
    pub total: u128,
    pub distinct: usize,
    pub top: Vec<TermShare>,
}

impl FrequencySummary {
    pub fn from_counts(counts: &TermCountMap, k: usize) -> Self {
        let total = total_count(counts);
        let mut running: u128 = 0;
        let top = rank_terms(counts)
            .into_iter()
            .take(k)
            .map(|(term, count)| {
                running += u128::from(count);
                let (share, cumulative) = if total == 0 {
                    (0.0, 0.0)
                } else {
                    (count as f64 / total as f64, running as f64 / total as f64)
                };
                TermShare { term: term.clone(), count, share, cumulative }
            })
            .collect();
        Self { total, distinct: counts.len(), top }
    }
}
