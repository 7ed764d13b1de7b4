//! Findex CLI - faceted search over a JSONL corpus

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use findex_core::Error;
use findex_core::config::Config;
use findex_core::domain::search::dates::parse_iso_date;
use findex_core::domain::search::{
    Corpus, DateRange, EntityType, FacetCounts, Query, SavedQueryStore, SearchPage,
    SearchResult, SearchService, SortBy, SortOrder, TextMatch, active_filter_dimensions,
};
use findex_core::storage::{JsonFileSavedQueryRepository, load_corpus_jsonl};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "findex")]
#[command(author, version, about = "Faceted search over record collections", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the corpus
    Search {
        #[command(flatten)]
        filters: FilterArgs,

        /// Corpus file (defaults to storage.corpus_path)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Start from the most recent saved search with this name
        #[arg(long)]
        saved: Option<String>,

        /// Skip this many results
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Page size (defaults to display.page_size)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the distinct owners, tags and statuses in the corpus
    Facets {
        /// Corpus file (defaults to storage.corpus_path)
        #[arg(long)]
        corpus: Option<PathBuf>,
    },

    /// Manage saved searches
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum SavedAction {
    /// List saved searches
    List,
    /// Save a search under a name
    Save {
        name: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show a saved search (1-based position)
    Show { index: usize },
    /// Delete a saved search (1-based position)
    Delete { index: usize },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration
    List,
    /// Reset to defaults
    Reset,
}

/// Query dimensions settable from the command line
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Free text matched against names, descriptions and contact fields
    text: Option<String>,

    /// Entity type to search; repeat for several (default: all)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    types: Vec<EntityType>,

    /// Text match mode: contains, exact, startsWith, endsWith
    #[arg(short = 'm', long = "match", value_name = "MODE")]
    text_match: Option<TextMatch>,

    /// Earliest creation date (YYYY-MM-DD), inclusive
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,

    /// Latest creation date (YYYY-MM-DD), inclusive
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,

    /// Required owner; repeat for several (replaces saved owners)
    #[arg(long = "owner", value_name = "OWNER")]
    owners: Vec<String>,

    /// Entity must carry one of these tags; repeat for several (replaces saved tags)
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Required status; repeat for several (replaces saved statuses)
    #[arg(long = "status", value_name = "STATUS")]
    statuses: Vec<String>,

    /// Include archived entities
    #[arg(long, conflicts_with = "no_show_archived")]
    show_archived: bool,

    /// Hide archived entities, even if the saved search shows them
    #[arg(long)]
    no_show_archived: bool,

    /// Sort key: relevance, name, date, status
    #[arg(long)]
    sort_by: Option<SortBy>,

    /// Sort order: asc, desc
    #[arg(long)]
    order: Option<SortOrder>,
}

impl FilterArgs {
    /// Overlay the flags that were given onto `query`
    ///
    /// A given flag replaces that dimension of the base query; repeated
    /// flags build the replacement set.
    fn apply_to(self, mut query: Query) -> Query {
        if let Some(text) = self.text {
            query.free_text = text;
        }
        if !self.types.is_empty() {
            query.selected_types = self.types.into_iter().collect();
        }
        if let Some(text_match) = self.text_match {
            query.text_match = text_match;
        }
        if self.from.is_some() || self.to.is_some() {
            if let (Some(from), Some(to)) = (self.from, self.to) {
                if from > to {
                    warn!(%from, %to, "Date range is empty; only undated entities can match");
                }
            }
            query.date_range = Some(DateRange::new(self.from, self.to));
        }
        if !self.owners.is_empty() {
            query.owners = self.owners.into_iter().collect();
        }
        if !self.tags.is_empty() {
            query.tags = self.tags.into_iter().collect();
        }
        if !self.statuses.is_empty() {
            query.statuses = self.statuses.into_iter().collect();
        }
        if self.show_archived {
            query.show_archived = true;
        } else if self.no_show_archived {
            query.show_archived = false;
        }
        if let Some(sort_by) = self.sort_by {
            query.sort_by = sort_by;
        }
        if let Some(order) = self.order {
            query.sort_order = order;
        }
        query
    }
}

fn parse_date(input: &str) -> Result<NaiveDate, String> {
    parse_iso_date(input).ok_or_else(|| format!("'{}' is not an ISO date (YYYY-MM-DD)", input))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays machine-readable
    let directive = if cli.quiet { "findex=warn" } else { "findex=info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .init();

    let result = run(cli);
    if let Some(hint) = result
        .as_ref()
        .err()
        .and_then(|err| err.downcast_ref::<Error>())
        .and_then(Error::suggestion)
    {
        eprintln!("hint: {}", hint);
    }
    result
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let out = Output {
        format: cli.format,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Search {
            filters,
            corpus,
            saved,
            offset,
            limit,
        } => cmd_search(filters, corpus, saved, offset, limit, out),

        Commands::Facets { corpus } => cmd_facets(corpus, out),

        Commands::Saved { action } => cmd_saved(action, out),

        Commands::Config { action } => cmd_config(action, out),
    }
}

#[derive(Clone, Copy)]
struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    fn print_json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

fn load_corpus(explicit: Option<PathBuf>, config: &Config) -> anyhow::Result<Corpus> {
    let path = explicit
        .or_else(|| config.storage.corpus_path.clone())
        .ok_or_else(|| {
            Error::ConfigError(
                "no corpus file given. Pass --corpus <file> or set storage.corpus_path".to_string(),
            )
        })?;
    Ok(load_corpus_jsonl(&path)?)
}

fn open_saved(config: &Config) -> anyhow::Result<SavedQueryStore<JsonFileSavedQueryRepository>> {
    let path = config.saved_queries_path()?;
    debug!(path = %path.display(), "Opening saved searches");
    Ok(SavedQueryStore::open(JsonFileSavedQueryRepository::new(path))?)
}

fn cmd_search(
    filters: FilterArgs,
    corpus: Option<PathBuf>,
    saved: Option<String>,
    offset: usize,
    limit: Option<usize>,
    out: Output,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let limit = limit.unwrap_or(config.display.page_size);
    if limit == 0 {
        return Err(Error::InvalidInput("--limit must be at least 1".to_string()).into());
    }

    let base = match saved {
        Some(name) => {
            let store = open_saved(&config)?;
            let entry = store
                .find_latest(&name)
                .ok_or_else(|| Error::SavedQueryNameNotFound(name.clone()))?;
            store.apply(entry)
        }
        None => Query::default(),
    };
    let query = filters.apply_to(base);

    let corpus = load_corpus(corpus, &config)?;
    let page = SearchService::new(&corpus).search_page(&query, offset, limit);

    if out.json() {
        return out.print_json(&page);
    }

    print_page(&page, &query, &config.display.date_format, out.quiet);
    Ok(())
}

fn print_page(page: &SearchPage, query: &Query, date_format: &str, quiet: bool) {
    if !quiet {
        if page.results.is_empty() {
            if page.total == 0 {
                println!("No results.");
            } else {
                println!("No results past offset {} ({} total).", page.offset, page.total);
            }
        } else {
            println!(
                "Results {}-{} of {}",
                page.offset + 1,
                page.offset + page.results.len(),
                page.total
            );
        }
        if page.active_filters > 0 {
            let names: Vec<&str> = active_filter_dimensions(query)
                .iter()
                .map(|dimension| dimension.as_str())
                .collect();
            println!(
                "Active filters: {} ({})",
                page.active_filters,
                names.join(", ")
            );
        }
    }

    for result in &page.results {
        println!("{}", result_line(result, date_format));
    }

    if !quiet && page.has_more() {
        println!(
            "\nMore results available: --offset {}",
            page.offset + page.results.len()
        );
    }
}

fn result_line(result: &SearchResult, date_format: &str) -> String {
    let key = format!("{}#{}", result.entity_type, result.id);
    let mut line = format!("  {:<26} {}", key, result.name);

    if let Some(status) = &result.status {
        line.push_str(&format!(" [{}]", status));
    }
    if let Some(created_at) = result.created_at {
        line.push_str(&format!(" {}", created_at.format(date_format)));
    }
    if let Some(owner) = &result.owner {
        line.push_str(&format!(" @{}", owner));
    }
    if let Some(tags) = &result.tags {
        for tag in tags {
            line.push_str(&format!(" #{}", tag));
        }
    }
    line
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FacetsReport {
    total: usize,
    types: BTreeMap<EntityType, usize>,
    #[serde(flatten)]
    counts: FacetCounts,
}

fn cmd_facets(corpus: Option<PathBuf>, out: Output) -> anyhow::Result<()> {
    let config = Config::load()?;
    let corpus = load_corpus(corpus, &config)?;
    let report = FacetsReport {
        total: corpus.len(),
        types: corpus.type_counts(),
        counts: corpus.facet_counts(),
    };

    if out.json() {
        return out.print_json(&report);
    }

    if !out.quiet {
        println!("Entities: {}", report.total);
    }
    println!("Types:");
    for (entity_type, count) in &report.types {
        println!("  {} ({})", entity_type, count);
    }
    for (title, values) in [
        ("Owners", &report.counts.owners),
        ("Tags", &report.counts.tags),
        ("Statuses", &report.counts.statuses),
    ] {
        println!("{}:", title);
        if values.is_empty() && !out.quiet {
            println!("  (none)");
        }
        for (value, count) in values {
            println!("  {} ({})", value, count);
        }
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedSummary<'a> {
    index: usize,
    name: &'a str,
    active_filters: usize,
    query: Query,
}

fn cmd_saved(action: SavedAction, out: Output) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut store = open_saved(&config)?;

    match action {
        SavedAction::List => {
            let summaries: Vec<SavedSummary<'_>> = store
                .list()
                .iter()
                .enumerate()
                .map(|(position, saved)| {
                    let query = saved.apply();
                    SavedSummary {
                        index: position + 1,
                        name: &saved.name,
                        active_filters: active_filter_dimensions(&query).len(),
                        query,
                    }
                })
                .collect();

            if out.json() {
                return out.print_json(&summaries);
            }
            if summaries.is_empty() {
                if !out.quiet {
                    println!("No saved searches.");
                    println!("\nSave one with: findex saved save <name> [filters]");
                }
                return Ok(());
            }
            if !out.quiet {
                println!("Saved searches:");
            }
            for summary in summaries {
                let text = if summary.query.free_text.is_empty() {
                    String::new()
                } else {
                    format!(" \"{}\"", summary.query.free_text)
                };
                println!(
                    "  {}. {}{} ({} active filters)",
                    summary.index, summary.name, text, summary.active_filters
                );
            }
        }
        SavedAction::Save { name, filters } => {
            let query = filters.apply_to(Query::default());
            store.save(name.as_str(), &query)?;
            if out.json() {
                return out.print_json(&SavedSummary {
                    index: store.len(),
                    name: &name,
                    active_filters: active_filter_dimensions(&query).len(),
                    query,
                });
            }
            if !out.quiet {
                println!("Saved search '{}' as #{}", name, store.len());
            }
        }
        SavedAction::Show { index } => {
            let saved = index
                .checked_sub(1)
                .and_then(|position| store.get(position))
                .ok_or(Error::SavedQueryNotFound(index))?;
            let query = store.apply(saved);

            if out.json() {
                return out.print_json(&SavedSummary {
                    index,
                    name: &saved.name,
                    active_filters: active_filter_dimensions(&query).len(),
                    query,
                });
            }
            println!("Saved search #{}: {}", index, saved.name);
            println!("{}", serde_json::to_string_pretty(&query)?);
        }
        SavedAction::Delete { index } => {
            let before = store.len();
            // Positions past the end delete nothing
            store.delete(index.checked_sub(1).unwrap_or(usize::MAX))?;
            let deleted = store.len() < before;

            if out.json() {
                return out.print_json(&serde_json::json!({
                    "index": index,
                    "deleted": deleted,
                    "remaining": store.len(),
                }));
            }
            if !out.quiet {
                if deleted {
                    println!("Deleted saved search #{}", index);
                } else {
                    println!("No saved search #{}; nothing deleted.", index);
                }
            }
        }
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, out: Output) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !out.quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            if out.json() {
                let map: BTreeMap<String, String> = items.into_iter().collect();
                return out.print_json(&map);
            }
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !out.quiet {
                println!("Configuration reset to defaults.");
            }
        }
    }
    Ok(())
}
