//! Document-similarity graphs from per-document term counts.
//!
//! Stages, in order: [`vocab`] picks the feature axis, [`vector`] aligns
//! each document to it, [`tfidf`] weights the counts, [`distance`] compares
//! every pair and [`graph`] keeps each document's nearest neighbors.
//! [`pipeline::run`] drives them end to end.

pub mod config;
pub mod distance;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod persist;
pub mod pipeline;
pub mod render;
pub mod store;
pub mod tfidf;
pub mod tokenizer;
pub mod vector;
pub mod vocab;

pub use config::{Metric, ParseConfig, PipelineConfig, RenderConfig, Settings};
pub use error::{GraphError, Result};
pub use graph::{NeighborList, SimilarityGraph};
pub use pipeline::{run, CorpusStatus, PipelineOutput, RunReport};
pub use store::{DocumentId, TermCountMap, TermCountStore};
pub use vocab::{FrequencySummary, Vocabulary};
