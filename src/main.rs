//! swisstour CLI
//!
//! Browse Swiss sights, alpine resorts and travel offers from the terminal.
//!
//! ```bash
//! SWISSTOUR_MCP_URL=https://example.ch/mcp swisstour sights --query glacier
//! RUST_LOG=swisstour=debug swisstour overview --lang de
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::time::Duration;

use swisstour::catalog::{self, ProductQuery, ResortQuery, SightQuery};
use swisstour::config::{self, ClientConfig};
use swisstour::filter::{markers, Listing};
use swisstour::i18n::{t, t_with};
use swisstour::{Language, ListingFilter, McpClient, PreferenceStore, ProductKind, SortBy};

#[derive(Parser)]
#[command(name = "swisstour")]
#[command(author, version, about = "Swiss tourism map data from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// MCP endpoint (defaults to the dev proxy in development mode)
    #[arg(long, global = true, env = config::ENV_ENDPOINT)]
    endpoint: Option<String>,

    /// UI language for this run (en, de, fr, it); overrides the saved one
    #[arg(long, global = true)]
    lang: Option<Language>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten)]
    Query(Query),

    /// Show or change the saved UI language
    Lang { code: Option<Language> },
}

/// Commands that talk to the service.
#[derive(Subcommand)]
enum Query {
    /// List the tools the service offers
    Tools,

    /// Search sights
    Sights(ListArgs),

    /// Search alpine resorts
    Resorts(ListArgs),

    /// Search travel products of one kind (rail, pass, holiday)
    Products {
        kind: ProductKind,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Load everything the map shows and print a summary
    Overview,
}

#[derive(Args)]
struct ListArgs {
    /// Free-text filter applied to the fetched results
    #[arg(short, long, default_value = "")]
    query: String,

    /// Keep only items in these categories (repeatable)
    #[arg(short, long)]
    category: Vec<String>,

    #[arg(long, value_enum, default_value = "name")]
    sort: SortArg,

    /// Maximum number of results to request
    #[arg(long)]
    limit: Option<u32>,
}

// Mirrors `SortBy` so the library does not depend on clap.
#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    NameDesc,
    RankAsc,
    RankDesc,
}

impl From<SortArg> for SortBy {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Name     => SortBy::Name,
            SortArg::NameDesc => SortBy::NameDesc,
            SortArg::RankAsc  => SortBy::RankAsc,
            SortArg::RankDesc => SortBy::RankDesc,
        }
    }
}

impl ListArgs {
    fn filter(&self) -> ListingFilter {
        let mut f = ListingFilter::new().query(self.query.clone()).sort(self.sort.into());
        for c in &self.category {
            f = f.category(c.clone());
        }
        f
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let mut prefs = PreferenceStore::open(config::preferences_path());
    let lang = cli.lang.unwrap_or_else(|| prefs.load_language());

    let query = match &cli.command {
        Command::Lang { code } => return set_language(&mut prefs, *code, lang),
        Command::Query(query) => query,
    };

    let mut cfg = match cli.endpoint.clone() {
        Some(url) => ClientConfig::new(url),
        None => ClientConfig::from_env()?,
    };
    if let Some(secs) = cli.timeout {
        cfg = cfg.with_request_timeout(Duration::from_secs(secs));
    }

    if let Err(e) = run(query, &cfg, lang).await {
        eprintln!("{}", t(lang, "common.error"));
        eprintln!("{}", t_with(lang, "errors.loadFailed", [("message", format!("{:#}", e))]));
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: &Query, cfg: &ClientConfig, lang: Language) -> Result<()> {
    let client = McpClient::connect(cfg)
        .await
        .with_context(|| format!("connecting to {}", cfg.endpoint))?;

    match command {
        Query::Tools => {
            let tools = client.list_tools().await?;
            println!("{}", t_with(lang, "common.tools", [("count", tools.len())]));
            for tool in tools {
                println!("  {:<28} {}", tool.name, tool.description.unwrap_or_default());
            }
        }
        Query::Sights(args) => {
            let query = SightQuery { lang: Some(lang), limit: args.limit, ..Default::default() };
            let found = catalog::search_sights(&client, &query).await?;
            print_listing(lang, "sights.title", &found.results, found.total(), &args.filter());
        }
        Query::Resorts(args) => {
            let query = ResortQuery { lang: Some(lang), limit: args.limit, ..Default::default() };
            let found = catalog::search_resorts(&client, &query).await?;
            print_listing(lang, "resorts.title", &found.results, found.total(), &args.filter());
        }
        Query::Products { kind, list } => {
            let query = ProductQuery { lang: Some(lang), limit: list.limit, ..Default::default() };
            let found = catalog::search_products(&client, *kind, &query).await?;
            print_listing(lang, kind.label_key(), &found.results, found.total(), &list.filter());
        }
        Query::Overview => {
            let overview = catalog::load_overview(&client, lang).await?;
            println!("{}", t(lang, "title"));
            println!("{}", t(lang, "subtitle"));
            println!();
            println!("{}", t_with(lang, "map.sightsCount", [
                ("displayed", markers(&overview.sights.results).len()),
                ("total", overview.sights.total()),
            ]));
            println!("{}", t_with(lang, "map.resortsCount", [
                ("displayed", markers(&overview.resorts.results).len()),
                ("total", overview.resorts.total()),
            ]));
            for kind in ProductKind::ALL {
                let marker = if overview.degraded.contains(&kind) { " (!)" } else { "" };
                println!("{}: {}{}", t(lang, kind.label_key()), overview.products(kind).len(), marker);
            }
        }
    }
    Ok(())
}

fn print_listing<T: Listing>(lang: Language, title_key: &str, items: &[T], total: usize, filter: &ListingFilter) {
    let shown = filter.apply(items);
    println!("{} ({}/{})", t(lang, title_key), shown.len(), total);

    if shown.is_empty() {
        println!("  {}", t(lang, "common.noResults"));
        return;
    }
    for item in shown {
        match item.rank() {
            Some(rank) => println!("  {:<40} {:>8.0}", item.name(), rank),
            None => println!("  {}", item.name()),
        }
    }
}

fn set_language(prefs: &mut PreferenceStore, code: Option<Language>, current: Language) -> Result<()> {
    match code {
        Some(lang) => {
            prefs.save_language(lang)?;
            println!("{}: {}", t(lang, "common.language"), t(lang, &format!("language.{}", lang.code())));
        }
        None => {
            println!("{}: {}", t(current, "common.language"), t(current, &format!("language.{}", current.code())));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn lang_is_handled_apart_from_service_queries() {
        let cli = Cli::try_parse_from(["swisstour", "lang", "de"]).unwrap();
        assert!(matches!(cli.command, Command::Lang { code: Some(Language::De) }));

        let cli = Cli::try_parse_from(["swisstour", "sights", "--sort", "rank-desc"]).unwrap();
        assert!(matches!(cli.command, Command::Query(Query::Sights(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["swisstour", "--timeout", "0", "overview"]).is_err());
        let cli = Cli::try_parse_from(["swisstour", "--timeout", "5", "overview"]).unwrap();
        assert_eq!(cli.timeout, Some(5));
    }
}
