use rayon::prelude::*;
use tracing::debug;

use crate::config::Metric;
use crate::tfidf::TfidfMatrix;

/// Square all-pairs distance matrix, stored row-major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Computes every pairwise distance under `metric`.
    ///
    /// Each entry is summed over the term axis in column order, so the
    /// result does not depend on `parallel`; rows are merely spread over the
    /// rayon pool.
    pub fn compute(tfidf: &TfidfMatrix, metric: Metric, parallel: bool) -> Self {
        let n = tfidf.len();
        let rows = tfidf.rows();
        let norms: Vec<f64> = rows.iter().map(|r| dot(r, r).sqrt()).collect();
        let mut values = vec![0.0f64; n * n];
        if n == 0 {
            return Self { n, values };
        }

        let fill = |(i, out): (usize, &mut [f64])| {
            for (j, slot) in out.iter_mut().enumerate() {
                *slot = if i == j {
                    0.0
                } else {
                    match metric {
                        Metric::Euclidean => euclidean(&rows[i], &rows[j]),
                        Metric::Cosine => cosine(&rows[i], &rows[j], norms[i], norms[j]),
                    }
                };
            }
        };
        if parallel {
            values.par_chunks_mut(n).enumerate().for_each(fill);
        } else {
            values.chunks_mut(n).enumerate().for_each(fill);
        }
        debug!(n, %metric, "distance matrix computed");
        Self { n, values }
    }

    /// Builds a matrix from explicit rows.
    ///
    /// # Panics
    ///
    /// If the rows do not form a square matrix.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let n = rows.len();
        assert!(rows.iter().all(|r| r.len() == n), "distance matrix must be square");
        Self { n, values: rows.into_iter().flatten().collect() }
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}

/// `sqrt(Σ (a_i - b_i)^2)`.
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .fold(0.0f64, |acc, (x, y)| {
            let d = x - y;
            acc + d * d
        })
        .sqrt()
}

/// `1 - cos(a, b)`, clamped at zero. A zero-norm side is at distance 1.
pub fn cosine(a: &[f64], b: &[f64], norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    (1.0 - dot(a, b) / (norm_a * norm_b)).max(0.0)
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).fold(0.0f64, |acc, (x, y)| acc + x * y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentId;
    use crate::vector::CorpusMatrix;

    fn tfidf(rows: Vec<Vec<u64>>) -> TfidfMatrix {
        let width = rows.first().map_or(0, Vec::len);
        let ids = (0..rows.len()).map(|i| DocumentId::new(format!("d{i}"))).collect();
        TfidfMatrix::fit_transform(&CorpusMatrix::from_rows(ids, rows, width))
    }

    #[test]
    fn euclidean_of_orthogonal_unit_vectors() {
        assert!((euclidean(&[1.0, 0.0], &[0.0, 1.0]) - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(euclidean(&[0.5, 0.5], &[0.5, 0.5]), 0.0);
    }

    #[test]
    fn cosine_zero_norm_is_max_distance() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 0.0], 0.0, 1.0), 1.0);
        assert!((cosine(&[1.0, 0.0], &[0.0, 1.0], 1.0, 1.0) - 1.0).abs() < 1e-12);
        assert_eq!(cosine(&[1.0, 0.0], &[2.0, 0.0], 1.0, 2.0), 0.0);
    }

    #[test]
    fn diagonal_is_zero_and_matrix_symmetric() {
        let m = DistanceMatrix::compute(&tfidf(vec![vec![3, 1, 0], vec![0, 2, 5], vec![1, 1, 1]]), Metric::Euclidean, false);
        for i in 0..m.len() {
            assert_eq!(m.get(i, i), 0.0);
            for j in 0..m.len() {
                assert_eq!(m.get(i, j), m.get(j, i));
                assert!(m.get(i, j) >= 0.0);
            }
        }
    }

    #[test]
    fn parallel_matches_sequential_bit_for_bit() {
        let t = tfidf(vec![vec![3, 1, 0, 4], vec![0, 2, 5, 1], vec![1, 1, 1, 0], vec![7, 0, 0, 2]]);
        for metric in [Metric::Euclidean, Metric::Cosine] {
            let a = DistanceMatrix::compute(&t, metric, false);
            let b = DistanceMatrix::compute(&t, metric, true);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn empty_input_yields_empty_matrix() {
        let m = DistanceMatrix::compute(&TfidfMatrix::default(), Metric::Cosine, true);
        assert!(m.is_empty());
    }
}
