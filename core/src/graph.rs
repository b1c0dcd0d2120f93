use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::store::DocumentId;

/// Ranked neighbors of one document, nearest first. `names[r]` and
/// `similarities[r]` hold rank `r + 1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeighborList {
    pub names: Vec<DocumentId>,
    /// Distances to `names`, non-decreasing.
    pub similarities: Vec<f64>,
}

impl NeighborList {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Neighbor<'_>> {
        self.names
            .iter()
            .zip(&self.similarities)
            .enumerate()
            .map(|(pos, (id, &distance))| Neighbor { rank: pos + 1, id, distance })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    /// 1-based.
    pub rank: usize,
    pub id: &'a DocumentId,
    pub distance: f64,
}

/// Directed ranked similarity graph: document -> nearest neighbors.
///
/// Serializes as `{id: {"names": [...], "similarities": [...]}}` with
/// documents in corpus order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityGraph {
    nodes: IndexMap<DocumentId, NeighborList>,
}

impl SimilarityGraph {
    /// Keeps, for every row of `distances`, the `k` closest other documents.
    ///
    /// Self is skipped by index rather than by value, so a genuine
    /// zero-distance neighbor is never mistaken for it. Equal distances
    /// rank by document position.
    ///
    /// # Panics
    ///
    /// If `ids` and `distances` disagree in size.
    pub fn from_distances(ids: &[DocumentId], distances: &DistanceMatrix, k: usize) -> Self {
        assert_eq!(ids.len(), distances.len(), "one id per distance row");
        let n = ids.len();
        let mut nodes = IndexMap::with_capacity(n);

        for (i, id) in ids.iter().enumerate() {
            let row = distances.row(i);
            let mut candidates: Vec<usize> = (0..n).filter(|&j| j != i).collect();
            candidates.sort_by(|&a, &b| row[a].total_cmp(&row[b]).then(a.cmp(&b)));
            candidates.truncate(k);

            let list = NeighborList {
                names: candidates.iter().map(|&j| ids[j].clone()).collect(),
                similarities: candidates.iter().map(|&j| row[j]).collect(),
            };
            nodes.insert(id.clone(), list);
        }
        Self { nodes }
    }

    pub fn neighbors(&self, id: &DocumentId) -> Option<&NeighborList> {
        self.nodes.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DocumentId, &NeighborList)> {
        self.nodes.iter()
    }

    /// Total number of ranked edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(NeighborList::len).sum()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
