//! Raw documents -> term-count records.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::ParseConfig;
use crate::error::{GraphError, Result};
use crate::store::{DocumentId, TermCountMap, TermCountStore};
use crate::tokenizer::{html_paragraph_text, strip_asides, Tokenizer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub scanned: usize,
    pub kept: usize,
    /// Documents with fewer than `min_page_vocab` terms.
    pub too_small: usize,
    /// Directory entries that could not be read.
    pub unreadable: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Html,
    Text,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str())?.to_ascii_lowercase().as_str() {
            "html" | "htm" => Some(Self::Html),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Term counts of a single raw document.
pub fn count_document(raw: &str, format: DocumentFormat, tokenizer: &Tokenizer) -> TermCountMap {
    let text = match format {
        DocumentFormat::Html => html_paragraph_text(raw),
        DocumentFormat::Text => raw.to_string(),
    };
    tokenizer.count_terms(&strip_asides(&text))
}

/// Tokenizes every `.html`, `.htm` and `.txt` file under `dir`.
///
/// Files are processed in document-id order so the aggregate map, and with
/// it the vocabulary tie-break, is the same on every run.
pub fn ingest_directory(dir: &Path, config: &ParseConfig) -> Result<(TermCountStore, IngestStats)> {
    if !dir.is_dir() {
        return Err(GraphError::missing("raw documents directory", dir.display().to_string()));
    }

    let mut stats = IngestStats::default();
    let mut files: Vec<(DocumentId, PathBuf, DocumentFormat)> = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = ?e.path(), error = %e, "unreadable entry skipped");
                stats.unreadable += 1;
                continue;
            }
        };
        let p = entry.path();
        if !p.is_file() {
            continue;
        }
        if let (Some(format), Some(id)) = (DocumentFormat::from_path(p), DocumentId::from_path(p)) {
            files.push((id, p.to_path_buf(), format));
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let tokenizer = Tokenizer::new(config);
    let mut documents = Vec::with_capacity(files.len());
    for (id, path, format) in files {
        stats.scanned += 1;
        let raw = fs::read_to_string(&path).map_err(|e| GraphError::io(&path, e))?;
        let counts = count_document(&raw, format, &tokenizer);
        let terms = counts.values().fold(0u64, |acc, &c| acc.saturating_add(c));
        if terms < config.min_page_vocab as u64 {
            debug!(doc = %id, terms, "too few terms, skipped");
            stats.too_small += 1;
            continue;
        }
        documents.push((id, counts));
    }

    let store = TermCountStore::from_documents(documents)?;
    stats.kept = store.len();
    info!(
        scanned = stats.scanned,
        kept = stats.kept,
        too_small = stats.too_small,
        unreadable = stats.unreadable,
        "documents tokenized"
    );
    Ok((store, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_uses_paragraph_text_only() {
        let html = r#"<html><head><title>Ignored title</title></head><body>
            <div id="mw-content-text"><p>Insulin regulates glucose<sup class="reference">[1]</sup>.</p></div>
            <ul><li>navigation sidebar</li></ul></body></html>"#;
        let counts = count_document(html, DocumentFormat::Html, &Tokenizer::default());
        let terms: Vec<&str> = counts.keys().map(String::as_str).collect();
        assert_eq!(terms, vec!["insulin", "regulates", "glucose"]);
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a/Asthma.HTML")), Some(DocumentFormat::Html));
        assert_eq!(DocumentFormat::from_path(Path::new("notes.txt")), Some(DocumentFormat::Text));
        assert_eq!(DocumentFormat::from_path(Path::new("total_count.json")), None);
    }

    #[test]
    fn stats_count_every_outcome() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Gout.txt"), "Gout inflames joints when uric acid crystals build up.").unwrap();
        fs::write(dir.path().join("Stub.txt"), "Stub.").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored entirely").unwrap();

        let (store, stats) = ingest_directory(dir.path(), &ParseConfig::default()).unwrap();
        assert_eq!(stats, IngestStats { scanned: 2, kept: 1, too_small: 1, unreadable: 0 });
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_directory_is_fatal() {
        let err = ingest_directory(Path::new("/definitely/not/here"), &ParseConfig::default()).unwrap_err();
        assert!(matches!(err, GraphError::MissingInput { .. }));
    }
}
