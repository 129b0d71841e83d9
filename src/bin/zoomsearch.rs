//! ZOOMSEARCH CLI
//!
//! Builds an exact search engine from a document collection and a table of
//! precomputed vectors, then answers a query or runs a hit-rate evaluation.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use zoomsearch::evaluation::filter_ground_truth;
use zoomsearch::vector::normalize_vector;
use zoomsearch::{
    embed_documents, filter_by_course, load_documents, load_ground_truth, Embedder, Evaluator,
    PrecomputedEmbedder, SearchConfig, VectorSearchEngine, DEFAULT_NUM_RESULTS,
};

/// ZOOMSEARCH - Exact vector search over FAQ documents
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Field holding the document identifier
    #[arg(long, global = true, default_value = "id")]
    id_field: String,

    /// Comma-separated fields joined to form each document's text
    #[arg(long, global = true, value_delimiter = ',', default_value = "question,text")]
    text_fields: Vec<String>,

    /// Normalize looked-up vectors to unit length
    #[arg(long, global = true)]
    normalize: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank documents against a single query
    Search(SearchArgs),
    /// Measure hit rate against ground-truth question/document pairs
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug)]
struct CollectionArgs {
    /// JSON document collection
    #[arg(short, long)]
    documents: PathBuf,

    /// JSON object mapping text to its embedding
    #[arg(short, long)]
    vectors: PathBuf,

    /// Only index documents from this course
    #[arg(short, long)]
    course: Option<String>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[command(flatten)]
    collection: CollectionArgs,

    /// Query text, looked up in the vector table
    #[arg(short, long, conflicts_with = "query_vector", required_unless_present = "query_vector")]
    query: Option<String>,

    /// Query embedding as a JSON array
    #[arg(long)]
    query_vector: Option<String>,

    /// Number of results
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_RESULTS)]
    num_results: usize,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    #[command(flatten)]
    collection: CollectionArgs,

    /// Ground-truth records: CSV with a question,course,document header
    /// when the file ends in .csv, otherwise a JSON array of those objects
    #[arg(short, long)]
    ground_truth: PathBuf,

    /// Hit cutoff
    #[arg(short = 'n', long, default_value_t = 5)]
    num_results: usize,

    /// Query threads (0 = auto-detect based on CPU cores)
    #[arg(long, default_value_t = 0)]
    workers: usize,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("zoomsearch=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let load_vectors = |path: &Path| -> anyhow::Result<PrecomputedEmbedder> {
        Ok(PrecomputedEmbedder::from_file(path)
            .with_context(|| format!("loading vectors from {}", path.display()))?
            .with_normalize(cli.normalize))
    };

    match &cli.command {
        Command::Search(args) => {
            let config = search_config(&cli, &args.collection).with_num_results(args.num_results);
            let embedder = load_vectors(&args.collection.vectors)?;
            let engine = build_engine(&args.collection.documents, &config, &embedder)?;

            let query = match (&args.query, &args.query_vector) {
                (_, Some(raw)) => parse_query_vector(raw, cli.normalize)?,
                (Some(text), None) => embedder.embed(text)?,
                (None, None) => anyhow::bail!("either --query or --query-vector is required"),
            };

            for (rank, hit) in engine
                .search_scored(&query, config.num_results)?
                .into_iter()
                .enumerate()
            {
                let line = json!({
                    "rank": rank + 1,
                    "score": hit.score,
                    "document": hit.document,
                });
                println!("{}", line);
            }
        }

        Command::Evaluate(args) => {
            let config = search_config(&cli, &args.collection).with_num_results(args.num_results);
            let embedder = load_vectors(&args.collection.vectors)?;
            let engine = build_engine(&args.collection.documents, &config, &embedder)?;

            let mut records = load_ground_truth(&args.ground_truth)
                .with_context(|| format!("loading {}", args.ground_truth.display()))?;
            if let Some(course) = &config.course {
                records = filter_ground_truth(records, course);
            }

            let eval_config = config.evaluation().with_workers(args.workers);
            let report = Evaluator::new(&engine, &embedder, eval_config).evaluate(&records)?;
            println!("{}", report);
        }
    }

    Ok(())
}

/// Parse a `--query-vector` argument, scaling it like looked-up vectors
fn parse_query_vector(raw: &str, normalize: bool) -> anyhow::Result<Vec<f32>> {
    let mut query: Vec<f32> = serde_json::from_str(raw)
        .context("parsing --query-vector as a JSON array of numbers")?;
    if normalize {
        normalize_vector(&mut query);
    }
    Ok(query)
}

fn search_config(cli: &Cli, collection: &CollectionArgs) -> SearchConfig {
    let mut config = SearchConfig::default()
        .with_id_field(&cli.id_field)
        .with_text_fields(cli.text_fields.iter().cloned());
    if let Some(course) = &collection.course {
        config = config.with_course(course);
    }
    config
}

fn build_engine(
    documents: &Path,
    config: &SearchConfig,
    embedder: &dyn Embedder,
) -> anyhow::Result<VectorSearchEngine<zoomsearch::Document>> {
    let mut docs = load_documents(documents)
        .with_context(|| format!("loading documents from {}", documents.display()))?;
    if let Some(course) = &config.course {
        docs = filter_by_course(docs, course);
        info!("{} documents belong to {}", docs.len(), course);
    }

    let embeddings = embed_documents(embedder, &docs, &config.text_fields)?;
    let engine = VectorSearchEngine::new(docs, embeddings)?;
    info!(
        "Engine ready: {} documents, dimension {:?}",
        engine.len(),
        engine.dimension()
    );
    Ok(engine)
}
