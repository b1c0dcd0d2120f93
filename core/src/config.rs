//! Settings for every pipeline stage, resolved once before a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{GraphError, Result};

/// Distance between two TF-IDF rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Euclidean,
    /// `1 - cosine_similarity`; rows with zero norm are at distance 1.
    Cosine,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Euclidean => f.write_str("euclidean"),
            Metric::Cosine => f.write_str("cosine"),
        }
    }
}

impl FromStr for Metric {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Metric::Euclidean),
            "cosine" => Ok(Metric::Cosine),
            other => Err(GraphError::InvalidConfig(format!("unknown metric `{other}`"))),
        }
    }
}

/// Options for the vocabulary-to-graph pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Number of top aggregate terms kept as the feature axis.
    pub vocab_size: usize,
    pub metric: Metric,
    /// Neighbors kept per document.
    pub neighbors: usize,
    /// Cap on retained documents; `0` disables the cap.
    pub min_pages: usize,
    /// Compute distance rows on the rayon pool.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { vocab_size: 100, metric: Metric::Euclidean, neighbors: 10, min_pages: 500, parallel: true }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.neighbors == 0 {
            return Err(GraphError::InvalidConfig("neighbors must be greater than zero".into()));
        }
        Ok(())
    }

    /// Retention cap, if any.
    pub fn retention_cap(&self) -> Option<usize> {
        (self.min_pages > 0).then_some(self.min_pages)
    }
}

/// Options for turning raw documents into term-count records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseConfig {
    /// Documents yielding fewer terms than this are skipped.
    pub min_page_vocab: usize,
    /// Extra terms dropped alongside the English stop words.
    pub exclude_vocab: Vec<String>,
    pub min_term_len: usize,
    pub stem: bool,
    /// Rows in the aggregate frequency summary; `0` skips the summary.
    pub summary_top_k: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self { min_page_vocab: 5, exclude_vocab: Vec::new(), min_term_len: 3, stem: false, summary_top_k: 40 }
    }
}

impl ParseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_term_len == 0 {
            return Err(GraphError::InvalidConfig("min_term_len must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Options for the Graphviz diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub title: String,
    /// Edges drawn per document.
    pub top_k: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { title: "similarity graph".into(), top_k: 10 }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(GraphError::InvalidConfig("render top_k must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Contents of a settings file. Every section and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub parse: ParseConfig,
    pub similarity: PipelineConfig,
    pub render: RenderConfig,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
        let settings: Settings = serde_json::from_str(&text)?;
        Ok(settings)
    }

    /// Loads `path` if given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.parse.validate()?;
        self.similarity.validate()?;
        self.render.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.vocab_size, 100);
        assert_eq!(cfg.neighbors, 10);
        assert_eq!(cfg.min_pages, 500);
        assert_eq!(cfg.metric, Metric::Euclidean);
        assert_eq!(cfg.retention_cap(), Some(500));
        assert_eq!(ParseConfig::default().summary_top_k, 40);
    }

    #[test]
    fn partial_settings_fill_defaults() {
        let s: Settings = serde_json::from_str(r#"{"similarity": {"metric": "cosine", "neighbors": 3}}"#).unwrap();
        assert_eq!(s.similarity.metric, Metric::Cosine);
        assert_eq!(s.similarity.neighbors, 3);
        assert_eq!(s.similarity.vocab_size, 100);
        assert_eq!(s.parse, ParseConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<Settings>(r#"{"similarity": {"k": 3}}"#).is_err());
    }

    #[test]
    fn zero_neighbors_is_invalid() {
        let cfg = PipelineConfig { neighbors: 0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(GraphError::InvalidConfig(_))));
    }

    #[test]
    fn zero_cap_disables_retention_limit() {
        let cfg = PipelineConfig { min_pages: 0, ..Default::default() };
        assert_eq!(cfg.retention_cap(), None);
    }

    #[test]
    fn metric_parses_case_insensitively() {
        assert_eq!("Cosine".parse::<Metric>().unwrap(), Metric::Cosine);
        assert!("manhattan".parse::<Metric>().is_err());
    }
}
