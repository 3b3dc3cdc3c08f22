use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sommelier_core::{Catalog, SearchConfig, SearchIndex, SimilarRequest, SimilarityEngine};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and inspect the in-memory TF-IDF index over a wine catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IndexArgs {
    /// Catalog path (.json/.jsonl file or directory)
    #[arg(long)]
    input: String,
    /// Minimum document frequency for a term to carry weight
    #[arg(long, default_value_t = 200)]
    min_df: u32,
    /// Maximum fraction of documents a weighted term may appear in
    #[arg(long, default_value_t = 0.2)]
    max_df_ratio: f64,
}

impl IndexArgs {
    fn config(&self) -> SearchConfig {
        SearchConfig::with_df_cutoffs(self.min_df, self.max_df_ratio)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and print a summary report
    Stats {
        #[command(flatten)]
        index: IndexArgs,
        /// How many highest-IDF terms to list
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
    /// Run one similarity query
    Similar {
        #[command(flatten)]
        index: IndexArgs,
        /// Anchor wine name
        #[arg(long)]
        wine: Option<String>,
        /// Liked wine names (comma-separated)
        #[arg(long, value_delimiter = ',')]
        liked: Vec<String>,
        /// Disliked wine names (comma-separated)
        #[arg(long, value_delimiter = ',')]
        disliked: Vec<String>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Serialize)]
struct StatsReport {
    num_docs: u32,
    num_terms: usize,
    qualified_terms: usize,
    min_df: u32,
    max_df_ratio: f64,
    build_ms: u128,
    built_at: String,
    top_terms: Vec<TermStat>,
}

#[derive(Serialize)]
struct TermStat {
    term: String,
    df: u32,
    idf: f64,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { index, top } => stats(&index, top),
        Commands::Similar { index, wine, liked, disliked, limit } => {
            let catalog = Arc::new(Catalog::load(&index.input)?);
            let engine = SimilarityEngine::new(catalog, index.config());
            let hits = engine.similar(&SimilarRequest { wine, liked, disliked, limit })?;
            println!("{}", serde_json::to_string_pretty(&hits)?);
            Ok(())
        }
    }
}

fn stats(args: &IndexArgs, top: usize) -> Result<()> {
    let catalog = Catalog::load(&args.input)?;
    let documents = sommelier_core::CorpusSource::documents(&catalog)?;
    let start = Instant::now();
    let index = SearchIndex::build(&documents, args.min_df, args.max_df_ratio)?;
    let build_ms = start.elapsed().as_millis();

    let mut top_terms: Vec<TermStat> = (0..index.vocabulary_size() as u32)
        .filter_map(|tid| {
            let idf = index.idf(tid)?;
            Some(TermStat { term: index.term(tid)?.to_string(), df: index.df(tid), idf })
        })
        .collect();
    top_terms.sort_by(|a, b| b.idf.total_cmp(&a.idf).then_with(|| a.term.cmp(&b.term)));
    top_terms.truncate(top);

    let report = StatsReport {
        num_docs: index.num_docs(),
        num_terms: index.vocabulary_size(),
        qualified_terms: index.qualified_terms(),
        min_df: args.min_df,
        max_df_ratio: args.max_df_ratio,
        build_ms,
        built_at: time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339).unwrap_or_else(|_| "".into()),
        top_terms,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    tracing::info!(input = %args.input, "stats complete");
    Ok(())
}
