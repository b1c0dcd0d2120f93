//! Runs the stages in order: vocabulary, count vectors, TF-IDF, distances,
//! top-k graph. Each stage consumes the previous stage's output whole.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{Metric, PipelineConfig};
use crate::distance::DistanceMatrix;
use crate::error::Result;
use crate::graph::SimilarityGraph;
use crate::store::TermCountStore;
use crate::tfidf::TfidfMatrix;
use crate::vector::{CorpusMatrix, ScanStats};
use crate::vocab::Vocabulary;

/// How the run terminated. Every variant carries a consistent graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpusStatus {
    /// At least two documents survived; every node has neighbors.
    Complete,
    /// No vocabulary terms; the graph is empty.
    EmptyVocabulary,
    /// Vocabulary exists but no document contains any of it.
    EmptyCorpus,
    /// One surviving document; the graph has a single node without edges.
    InsufficientCorpus,
}

/// Summary of a run, persisted next to the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub status: CorpusStatus,
    pub metric: Metric,
    pub vocabulary_len: usize,
    pub coverage: f64,
    pub documents_scanned: usize,
    pub documents_retained: usize,
    pub documents_zero_vector: usize,
    pub documents_over_cap: usize,
    pub edges: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub vocabulary: Vocabulary,
    pub graph: SimilarityGraph,
    pub report: RunReport,
}

/// Builds the similarity graph for `store`.
///
/// Only configuration errors are fatal here; input records have already
/// been loaded by the time a store exists.
pub fn run(store: &TermCountStore, config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;

    let vocabulary = Vocabulary::select(store.aggregate(), config.vocab_size);
    info!(terms = vocabulary.len(), coverage = vocabulary.coverage(), "vocabulary selected");

    let (corpus, scan) = CorpusMatrix::build(store, &vocabulary, config.retention_cap());
    info!(
        scanned = scan.scanned,
        retained = scan.retained,
        zero_vector = scan.zero_vector,
        over_cap = scan.over_cap,
        "count vectors built"
    );

    let status = status_for(&vocabulary, &scan);
    if status != CorpusStatus::Complete {
        warn!(?status, "degenerate corpus");
    }

    let tfidf = TfidfMatrix::fit_transform(&corpus);
    let distances = DistanceMatrix::compute(&tfidf, config.metric, config.parallel);
    let graph = SimilarityGraph::from_distances(tfidf.ids(), &distances, config.neighbors);
    info!(nodes = graph.len(), edges = graph.edge_count(), metric = %config.metric, "similarity graph built");

    let report = RunReport {
        status,
        metric: config.metric,
        vocabulary_len: vocabulary.len(),
        coverage: vocabulary.coverage(),
        documents_scanned: scan.scanned,
        documents_retained: scan.retained,
        documents_zero_vector: scan.zero_vector,
        documents_over_cap: scan.over_cap,
        edges: graph.edge_count(),
    };
    Ok(PipelineOutput { vocabulary, graph, report })
}

fn status_for(vocabulary: &Vocabulary, scan: &ScanStats) -> CorpusStatus {
    match scan.retained {
        _ if vocabulary.is_empty() => CorpusStatus::EmptyVocabulary,
        0 => CorpusStatus::EmptyCorpus,
        1 => CorpusStatus::InsufficientCorpus,
        _ => CorpusStatus::Complete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TermCountMap;

    fn counts(pairs: &[(&str, u64)]) -> TermCountMap {
        pairs.iter().map(|(t, c)| (t.to_string(), *c)).collect()
    }

    #[test]
    fn status_reflects_corpus_shape() {
        let cfg = PipelineConfig::default();

        let empty = TermCountStore::from_documents(Vec::<(&str, TermCountMap)>::new()).unwrap();
        assert_eq!(run(&empty, &cfg).unwrap().report.status, CorpusStatus::EmptyVocabulary);

        let one = TermCountStore::from_documents(vec![("a", counts(&[("x", 1)]))]).unwrap();
        let out = run(&one, &cfg).unwrap();
        assert_eq!(out.report.status, CorpusStatus::InsufficientCorpus);
        assert_eq!(out.graph.len(), 1);
        assert_eq!(out.graph.edge_count(), 0);

        let two = TermCountStore::from_documents(vec![("a", counts(&[("x", 1)])), ("b", counts(&[("y", 1)]))]).unwrap();
        assert_eq!(run(&two, &cfg).unwrap().report.status, CorpusStatus::Complete);
    }

    #[test]
    fn vocabulary_without_matching_documents_is_empty_corpus() {
        let mut store = TermCountStore::new(counts(&[("orphan", 3)]));
        store.insert_document("a".into(), counts(&[("other", 2)])).unwrap();
        let out = run(&store, &PipelineConfig::default()).unwrap();
        assert_eq!(out.report.status, CorpusStatus::EmptyCorpus);
        assert!(out.graph.is_empty());
    }

    #[test]
    fn invalid_config_is_fatal() {
        let store = TermCountStore::default();
        let cfg = PipelineConfig { neighbors: 0, ..Default::default() };
        assert!(run(&store, &cfg).is_err());
    }
}
