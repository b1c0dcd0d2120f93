use indexmap::IndexMap;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{GraphError, Result};

/// Term -> raw occurrence count. Iteration order is insertion order.
pub type TermCountMap = IndexMap<String, u64>;

/// Characters escaped when a document id becomes a file name.
const STORAGE_KEY: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-');

/// Canonical display form of a document's storage identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Decodes a URL-encoded storage key, e.g. `Alzheimer%27s_disease`.
    pub fn from_storage_key(key: &str) -> Self {
        Self(percent_decode_str(key).decode_utf8_lossy().into_owned())
    }

    /// Id of a stored record: its file stem, decoded.
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        Some(Self::from_storage_key(stem))
    }

    /// File-name-safe form; inverse of [`DocumentId::from_storage_key`].
    pub fn storage_key(&self) -> String {
        utf8_percent_encode(&self.0, STORAGE_KEY).to_string()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Per-document term counts plus the corpus-wide aggregate.
///
/// Documents are held sorted by id so every downstream stage enumerates
/// them in the same order regardless of how they were discovered on disk.
#[derive(Debug, Clone, Default)]
pub struct TermCountStore {
    documents: BTreeMap<DocumentId, TermCountMap>,
    aggregate: TermCountMap,
}

impl TermCountStore {
    pub fn new(aggregate: TermCountMap) -> Self {
        Self { documents: BTreeMap::new(), aggregate }
    }

    /// Builds a store whose aggregate is accumulated from the documents in
    /// the order given.
    pub fn from_documents<I, D>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = (D, TermCountMap)>,
        D: Into<DocumentId>,
    {
        let mut store = Self::default();
        for (id, counts) in documents {
            for (term, count) in &counts {
                let total = store.aggregate.entry(term.clone()).or_insert(0);
                *total = total.saturating_add(*count);
            }
            store.insert_document(id.into(), counts)?;
        }
        Ok(store)
    }

    pub fn insert_document(&mut self, id: DocumentId, counts: TermCountMap) -> Result<()> {
        if self.documents.contains_key(&id) {
            return Err(GraphError::DuplicateDocument(id));
        }
        self.documents.insert(id, counts);
        Ok(())
    }

    pub fn documents(&self) -> impl Iterator<Item = (&DocumentId, &TermCountMap)> {
        self.documents.iter()
    }

    pub fn document(&self, id: &DocumentId) -> Option<&TermCountMap> {
        self.documents.get(id)
    }

    pub fn aggregate(&self) -> &TermCountMap {
        &self.aggregate
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
