//! Smoothed TF-IDF weighting with L2 row normalization.
//!
//! `idf(t) = ln((1 + N) / (1 + df(t))) + 1` and `w(d, t) = count(d, t) * idf(t)`,
//! after which every row is scaled to unit length. Zero rows stay zero.

use crate::store::DocumentId;
use crate::vector::CorpusMatrix;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfidfMatrix {
    ids: Vec<DocumentId>,
    rows: Vec<Vec<f64>>,
    idf: Vec<f64>,
}

impl TfidfMatrix {
    /// Fits IDF over the whole corpus and weights every row with it.
    pub fn fit_transform(corpus: &CorpusMatrix) -> Self {
        let idf = inverse_document_frequency(corpus);
        let rows = corpus
            .rows()
            .iter()
            .map(|counts| {
                let mut row: Vec<f64> = counts.iter().zip(&idf).map(|(&c, &w)| c as f64 * w).collect();
                l2_normalize(&mut row);
                row
            })
            .collect();
        Self { ids: corpus.ids().to_vec(), rows, idf }
    }

    pub fn ids(&self) -> &[DocumentId] {
        &self.ids
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.rows[i]
    }

    /// Fitted IDF weight per vocabulary column.
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn inverse_document_frequency(corpus: &CorpusMatrix) -> Vec<f64> {
    let n = corpus.len() as f64;
    let mut df = vec![0u64; corpus.width()];
    for row in corpus.rows() {
        for (slot, &count) in df.iter_mut().zip(row) {
            if count > 0 {
                *slot += 1;
            }
        }
    }
    df.into_iter().map(|d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0).collect()
}

/// Scales `row` to unit Euclidean norm in place, leaving zero rows alone.
pub(crate) fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().fold(0.0f64, |acc, x| acc + x * x).sqrt();
    if norm > 0.0 {
        for x in row.iter_mut() {
            *x /= norm;
        }
    }
}
