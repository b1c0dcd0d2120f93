use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, remove_dir_all, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{GraphError, Result};
use crate::graph::SimilarityGraph;
use crate::pipeline::RunReport;
use crate::store::{DocumentId, TermCountMap, TermCountStore};
use crate::vocab::FrequencySummary;

pub const META_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaFile {
    pub created_at: String,
    pub version: u32,
    #[serde(flatten)]
    pub report: RunReport,
}

impl MetaFile {
    /// Stamps `report` with the current UTC time.
    pub fn now(report: RunReport) -> Self {
        let created_at = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default();
        Self { created_at, version: META_VERSION, report }
    }
}

/// Layout of an artifacts directory.
pub struct ArtifactPaths {
    pub root: PathBuf,
}

impl ArtifactPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn vocab_dir(&self) -> PathBuf { self.root.join("vocab") }
    pub fn docs_dir(&self) -> PathBuf { self.vocab_dir().join("docs") }
    pub fn total_count(&self) -> PathBuf { self.vocab_dir().join("total_count.json") }
    pub fn summary(&self) -> PathBuf { self.vocab_dir().join("total_count_summary.json") }
    pub fn graph_dir(&self) -> PathBuf { self.root.join("graph") }
    pub fn graph(&self) -> PathBuf { self.graph_dir().join("raw_graph_info.json") }
    pub fn meta(&self) -> PathBuf { self.graph_dir().join("meta.json") }
    pub fn diagram(&self) -> PathBuf { self.graph_dir().join("similarity_graph.dot") }
    fn document(&self, id: &DocumentId) -> PathBuf {
        self.docs_dir().join(format!("{}.json", id.storage_key()))
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        create_dir_all(dir).map_err(|e| GraphError::io(dir, e))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    let mut f = File::create(path).map_err(|e| GraphError::io(path, e))?;
    f.write_all(json.as_bytes()).map_err(|e| GraphError::io(path, e))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &'static str) -> Result<T> {
    if !path.is_file() {
        return Err(GraphError::missing(what, path.display().to_string()));
    }
    let f = File::open(path).map_err(|e| GraphError::io(path, e))?;
    let value = serde_json::from_reader(BufReader::new(f))?;
    Ok(value)
}

pub fn save_document_counts(paths: &ArtifactPaths, id: &DocumentId, counts: &TermCountMap) -> Result<()> {
    write_json(&paths.document(id), counts)
}

pub fn save_total_counts(paths: &ArtifactPaths, counts: &TermCountMap) -> Result<()> {
    write_json(&paths.total_count(), counts)
}

pub fn save_frequency_summary(paths: &ArtifactPaths, summary: &FrequencySummary) -> Result<()> {
    write_json(&paths.summary(), summary)
}

pub fn load_frequency_summary(paths: &ArtifactPaths) -> Result<FrequencySummary> {
    read_json(&paths.summary(), "frequency summary")
}

/// Writes every record of `store`: one file per document plus the aggregate.
///
/// Records left in the directory by an earlier corpus are removed first so
/// the records on disk always match the aggregate written alongside them.
pub fn save_store(paths: &ArtifactPaths, store: &TermCountStore) -> Result<()> {
    let docs_dir = paths.docs_dir();
    if docs_dir.exists() {
        remove_dir_all(&docs_dir).map_err(|e| GraphError::io(&docs_dir, e))?;
    }
    create_dir_all(&docs_dir).map_err(|e| GraphError::io(&docs_dir, e))?;
    for (id, counts) in store.documents() {
        save_document_counts(paths, id, counts)?;
    }
    save_total_counts(paths, store.aggregate())
}

/// Loads the aggregate map and every per-document record.
///
/// Records are keyed by their decoded file stem; enumeration order on disk
/// does not matter since the store sorts by id.
pub fn load_store(paths: &ArtifactPaths) -> Result<TermCountStore> {
    let aggregate: TermCountMap = read_json(&paths.total_count(), "aggregate term counts")?;
    let docs_dir = paths.docs_dir();
    if !docs_dir.is_dir() {
        return Err(GraphError::missing("term-count records directory", docs_dir.display().to_string()));
    }

    let mut store = TermCountStore::new(aggregate);
    for entry in WalkDir::new(&docs_dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| docs_dir.clone());
            GraphError::io(path, e.into())
        })?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        let Some(id) = DocumentId::from_path(path) else {
            continue;
        };
        let counts: TermCountMap = read_json(path, "document term counts")?;
        store.insert_document(id, counts)?;
    }

    if store.is_empty() {
        return Err(GraphError::missing("term-count records", docs_dir.display().to_string()));
    }
    tracing::debug!(documents = store.len(), terms = store.aggregate().len(), "term counts loaded");
    Ok(store)
}

pub fn save_graph(paths: &ArtifactPaths, graph: &SimilarityGraph) -> Result<()> {
    write_json(&paths.graph(), graph)
}

pub fn load_graph(paths: &ArtifactPaths) -> Result<SimilarityGraph> {
    read_json(&paths.graph(), "similarity graph")
}

pub fn save_meta(paths: &ArtifactPaths, meta: &MetaFile) -> Result<()> {
    write_json(&paths.meta(), meta)
}

pub fn load_meta(paths: &ArtifactPaths) -> Result<MetaFile> {
    read_json(&paths.meta(), "run metadata")
}

pub fn save_diagram(paths: &ArtifactPaths, dot: &str) -> Result<()> {
    let path = paths.diagram();
    let dir = paths.graph_dir();
    create_dir_all(&dir).map_err(|e| GraphError::io(&dir, e))?;
    std::fs::write(&path, dot).map_err(|e| GraphError::io(&path, e))
}
