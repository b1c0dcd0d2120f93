//! Graphviz DOT output for a [`SimilarityGraph`].

use std::collections::HashMap;
use std::fmt::Write;

use crate::config::RenderConfig;
use crate::graph::SimilarityGraph;
use crate::store::DocumentId;

/// Allocates diagram node names in first-seen order.
///
/// Callers own the namer, so names stay stable across several graphs
/// rendered with the same instance.
#[derive(Debug, Default)]
pub struct NodeNamer {
    names: HashMap<DocumentId, usize>,
}

impl NodeNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of `id`, allocating the next one if unseen. Second field is
    /// `true` on first allocation.
    pub fn name(&mut self, id: &DocumentId) -> (String, bool) {
        let next = self.names.len();
        match self.names.get(id) {
            Some(n) => (format!("n{n}"), false),
            None => {
                self.names.insert(id.clone(), next);
                (format!("n{next}"), true)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Renders `graph` as a directed DOT graph: one node per document, one edge
/// per neighbor labelled with its rank, at most `config.top_k` per node.
pub fn to_dot(graph: &SimilarityGraph, config: &RenderConfig, namer: &mut NodeNamer) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// {}", config.title);
    let _ = writeln!(out, "digraph {{");
    let _ = writeln!(out, "  label={};", quote(&config.title));

    let mut declare = |out: &mut String, id: &DocumentId| -> String {
        let (name, fresh) = namer.name(id);
        if fresh {
            let _ = writeln!(out, "  {name} [label={}];", quote(id.as_str()));
        }
        name
    };

    for (id, neighbors) in graph.iter() {
        let from = declare(&mut out, id);
        for neighbor in neighbors.iter().take(config.top_k) {
            let to = declare(&mut out, neighbor.id);
            let _ = writeln!(out, "  {from} -> {to} [label=\"{}\"];", neighbor.rank);
        }
    }
    out.push_str("}\n");
    out
}
