use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use docgraph::{build_graph, build_vocab, render_graph, resolve_settings, Overrides};
use docgraph_core::Metric;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "docgraph")]
#[command(about = "Build a TF-IDF document similarity graph", long_about = None)]
struct Cli {
    /// JSON settings file with `parse`, `similarity` and `render` sections
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize raw .html/.txt documents into term-count records
    Vocab {
        /// Directory of raw documents
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        out: ArtifactsArg,
    },
    /// Build the nearest-neighbor graph from term-count records
    Graph {
        #[command(flatten)]
        out: ArtifactsArg,
        #[command(flatten)]
        sim: SimilarityArgs,
    },
    /// Render the graph as Graphviz DOT
    Render {
        #[command(flatten)]
        out: ArtifactsArg,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Vocab, graph and render in one go
    Run {
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        out: ArtifactsArg,
        #[command(flatten)]
        sim: SimilarityArgs,
        #[command(flatten)]
        render: RenderArgs,
    },
}

#[derive(Args)]
struct ArtifactsArg {
    /// Artifacts directory
    #[arg(long, default_value = "./artifacts")]
    artifacts: PathBuf,
}

#[derive(Args, Default)]
struct SimilarityArgs {
    /// euclidean or cosine
    #[arg(long)]
    metric: Option<Metric>,
    /// Vocabulary terms kept (top-K by corpus frequency)
    #[arg(long)]
    vocab_size: Option<usize>,
    /// Neighbors per document
    #[arg(long)]
    neighbors: Option<usize>,
    /// Cap on documents kept in the graph, 0 for no cap
    #[arg(long)]
    min_pages: Option<usize>,
}

#[derive(Args, Default)]
struct RenderArgs {
    /// Diagram title
    #[arg(long)]
    title: Option<String>,
    /// Edges drawn per document
    #[arg(long)]
    top_k: Option<usize>,
}

fn overrides(sim: SimilarityArgs, render: RenderArgs) -> Overrides {
    Overrides {
        metric: sim.metric,
        vocab_size: sim.vocab_size,
        neighbors: sim.neighbors,
        min_pages: sim.min_pages,
        title: render.title,
        top_k: render.top_k,
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let settings_path = cli.settings.as_deref();

    match cli.command {
        Commands::Vocab { input, out } => {
            let settings = resolve_settings(settings_path, &Overrides::default())?;
            build_vocab(&input, &out.artifacts, &settings)?;
        }
        Commands::Graph { out, sim } => {
            let settings = resolve_settings(settings_path, &overrides(sim, RenderArgs::default()))?;
            build_graph(&out.artifacts, &settings)?;
        }
        Commands::Render { out, render } => {
            let settings = resolve_settings(settings_path, &overrides(SimilarityArgs::default(), render))?;
            render_graph(&out.artifacts, &settings)?;
        }
        Commands::Run { input, out, sim, render } => {
            let settings = resolve_settings(settings_path, &overrides(sim, render))?;
            build_vocab(&input, &out.artifacts, &settings)?;
            build_graph(&out.artifacts, &settings)?;
            render_graph(&out.artifacts, &settings)?;
        }
    }
    Ok(())
}
