//! Command implementations for the boolsearch CLI.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::SearchConfig;
use crate::engine::SearchEngine;
use crate::index::{IndexReader, MemoryIndex};
use crate::query::{QueryPlan, SearchContext};

/// Execute a CLI command.
pub fn execute_command(args: BoolSearchArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => search_index(search_args, &args),
        Command::Inspect(inspect_args) => inspect_plan(inspect_args, &args),
    }
}

/// Run a plan and print the top hits.
fn search_index(args: &SearchArgs, cli_args: &BoolSearchArgs) -> Result<()> {
    let reader = load_index(&args.index)?;
    let plan = load_plan(&args.query)?;
    let config = merge_config(args)?;

    let start = Instant::now();
    let engine = SearchEngine::new(reader, config);
    let results = engine.search(&plan).context("search failed")?;
    info!(
        "search returned {} of {} hits in {:?}",
        results.hits.len(),
        results.total_hits,
        start.elapsed()
    );

    output_result("Search results", &results, cli_args)?;
    Ok(())
}

/// Build the searcher tree of a plan and print its statistics.
fn inspect_plan(args: &InspectArgs, cli_args: &BoolSearchArgs) -> Result<()> {
    let reader = load_index(&args.index)?;
    let plan = load_plan(&args.query)?;

    let mut searcher = plan
        .searcher(&reader, false)
        .context("failed to build searcher tree")?;
    let stats = PlanStats {
        doc_count: reader.doc_count(),
        max_matches: searcher.count(),
        weight: searcher.weight(),
        pool_size: searcher.document_match_pool_size(),
    };
    let mut ctx = SearchContext::for_searcher(searcher.as_ref());
    searcher.close(&mut ctx)?;

    output_result("Plan statistics", &stats, cli_args)?;
    Ok(())
}

/// Flags on the command line take precedence over the config file.
fn merge_config(args: &SearchArgs) -> Result<SearchConfig> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::from_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => SearchConfig::default(),
    };

    if args.explain {
        config.explain = true;
    }
    if let Some(limit) = args.limit {
        config.max_results = limit;
    }
    if let Some(min_score) = args.min_score {
        config.min_score = Some(min_score);
    }
    Ok(config)
}

fn load_index(path: &Path) -> Result<Arc<dyn IndexReader>> {
    let index = MemoryIndex::from_json_file(path)
        .with_context(|| format!("failed to load index {}", path.display()))?;
    info!("loaded {} documents from {}", index.doc_count(), path.display());
    Ok(Arc::new(index))
}

fn load_plan(path: &Path) -> Result<QueryPlan> {
    QueryPlan::from_json_file(path)
        .with_context(|| format!("failed to load query plan {}", path.display()))
}
