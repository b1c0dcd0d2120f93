use anyhow::{Context, Result};
use docgraph_core::ingest::{ingest_directory, IngestStats};
use docgraph_core::persist::{
    load_graph, load_store, save_diagram, save_frequency_summary, save_graph, save_meta, save_store, ArtifactPaths, MetaFile,
};
use docgraph_core::render::{to_dot, NodeNamer};
use docgraph_core::vocab::FrequencySummary;
use docgraph_core::{run, Metric, RunReport, Settings};
use std::path::{Path, PathBuf};

/// Command-line values that take precedence over the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub metric: Option<Metric>,
    pub vocab_size: Option<usize>,
    pub neighbors: Option<usize>,
    pub min_pages: Option<usize>,
    pub title: Option<String>,
    pub top_k: Option<usize>,
}

/// Loads the settings file (or defaults), applies `overrides` and validates
/// the result once.
pub fn resolve_settings(path: Option<&Path>, overrides: &Overrides) -> Result<Settings> {
    let mut settings = Settings::load_or_default(path)
        .with_context(|| format!("loading settings from {}", path.map_or("<defaults>".into(), |p| p.display().to_string())))?;
    let sim = &mut settings.similarity;
    if let Some(m) = overrides.metric { sim.metric = m; }
    if let Some(k) = overrides.vocab_size { sim.vocab_size = k; }
    if let Some(k) = overrides.neighbors { sim.neighbors = k; }
    if let Some(n) = overrides.min_pages { sim.min_pages = n; }
    if let Some(t) = &overrides.title { settings.render.title = t.clone(); }
    if let Some(k) = overrides.top_k { settings.render.top_k = k; }
    settings.validate()?;
    Ok(settings)
}

/// Tokenizes the raw documents under `input` into term-count records.
pub fn build_vocab(input: &Path, artifacts: &Path, settings: &Settings) -> Result<IngestStats> {
    let paths = ArtifactPaths::new(artifacts);
    let (store, stats) = ingest_directory(input, &settings.parse)
        .with_context(|| format!("tokenizing documents in {}", input.display()))?;
    save_store(&paths, &store).context("writing term-count records")?;
    let top_k = settings.parse.summary_top_k;
    if top_k > 0 {
        let summary = FrequencySummary::from_counts(store.aggregate(), top_k);
        save_frequency_summary(&paths, &summary).context("writing frequency summary")?;
        if let Some(last) = summary.top.last() {
            tracing::info!(terms = summary.top.len(), coverage = last.cumulative, "frequency summary written");
        }
    }
    tracing::info!(documents = store.len(), terms = store.aggregate().len(), output = %paths.vocab_dir().display(), "term counts written");
    Ok(stats)
}

/// Builds the similarity graph from stored term-count records.
pub fn build_graph(artifacts: &Path, settings: &Settings) -> Result<RunReport> {
    let paths = ArtifactPaths::new(artifacts);
    let store = load_store(&paths).context("loading term-count records")?;
    let out = run(&store, &settings.similarity)?;
    save_graph(&paths, &out.graph).context("writing similarity graph")?;
    save_meta(&paths, &MetaFile::now(out.report.clone())).context("writing run metadata")?;
    tracing::info!(status = ?out.report.status, output = %paths.graph().display(), "graph build complete");
    Ok(out.report)
}

/// Renders the stored graph as Graphviz DOT and returns the file written.
pub fn render_graph(artifacts: &Path, settings: &Settings) -> Result<PathBuf> {
    let paths = ArtifactPaths::new(artifacts);
    let graph = load_graph(&paths).context("loading similarity graph")?;
    let mut namer = NodeNamer::new();
    let dot = to_dot(&graph, &settings.render, &mut namer);
    save_diagram(&paths, &dot).context("writing diagram")?;
    tracing::info!(nodes = namer.len(), output = %paths.diagram().display(), "diagram rendered");
    Ok(paths.diagram())
}
