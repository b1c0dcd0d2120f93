use tracing::debug;

use crate::store::{DocumentId, TermCountMap, TermCountStore};
use crate::vocab::Vocabulary;

/// Dense raw-count vector aligned to a [`Vocabulary`]. Terms outside the
/// vocabulary are dropped.
pub fn count_vector(counts: &TermCountMap, vocab: &Vocabulary) -> Vec<u64> {
    let mut vec = vec![0u64; vocab.len()];
    for (term, count) in counts {
        if let Some(idx) = vocab.index_of(term) {
            vec[idx] = *count;
        }
    }
    vec
}

/// Outcome of the scan that feeds [`CorpusMatrix`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub scanned: usize,
    pub retained: usize,
    /// Documents without a single vocabulary term.
    pub zero_vector: usize,
    /// Qualifying documents turned away because the cap was reached.
    pub over_cap: usize,
}

/// Count vectors of the retained documents, row-aligned with their ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusMatrix {
    ids: Vec<DocumentId>,
    rows: Vec<Vec<u64>>,
    width: usize,
}

impl CorpusMatrix {
    /// Scans every document of `store` in id order, keeping those with at
    /// least one vocabulary term until `cap` rows have been retained.
    pub fn build(store: &TermCountStore, vocab: &Vocabulary, cap: Option<usize>) -> (Self, ScanStats) {
        let mut matrix = Self { ids: Vec::new(), rows: Vec::new(), width: vocab.len() };
        let mut stats = ScanStats::default();

        for (id, counts) in store.documents() {
            stats.scanned += 1;
            let row = count_vector(counts, vocab);
            if !row.iter().any(|&c| c > 0) {
                debug!(doc = %id, "no vocabulary terms, dropped");
                stats.zero_vector += 1;
                continue;
            }
            if cap.is_some_and(|c| matrix.rows.len() >= c) {
                stats.over_cap += 1;
                continue;
            }
            matrix.ids.push(id.clone());
            matrix.rows.push(row);
        }
        stats.retained = matrix.rows.len();
        (matrix, stats)
    }

    /// Builds a matrix directly from rows.
    ///
    /// # Panics
    ///
    /// If `ids` and `rows` differ in length or a row is not `width` long.
    pub fn from_rows(ids: Vec<DocumentId>, rows: Vec<Vec<u64>>, width: usize) -> Self {
        assert_eq!(ids.len(), rows.len(), "one id per row");
        assert!(rows.iter().all(|r| r.len() == width), "rows must match width");
        Self { ids, rows, width }
    }

    pub fn ids(&self) -> &[DocumentId] {
        &self.ids
    }

    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }

    /// Number of vocabulary columns.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
