//! Anime catalog CLI application.

use anyhow::{Context, Result};
use catalog_client::{CatalogClient, SearchParams, Season};
use clap::{Parser, Subcommand};
use serde::Serialize;
use shared::Config;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "anime-catalog")]
#[command(author, version, about = "Browse the Jikan anime catalog from the terminal", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Top ranked anime
    Top {
        /// Media type (tv, movie, ova, ...)
        #[arg(long = "type")]
        kind: Option<String>,

        /// Ranking filter (airing, upcoming, bypopularity, favorite)
        #[arg(long)]
        filter: Option<String>,

        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Anime of a broadcast season (defaults to the current one)
    Seasonal {
        #[arg(long)]
        year: Option<i32>,

        #[arg(long, value_parser = parse_season)]
        season: Option<Season>,
    },

    /// Upcoming anime
    Upcoming,

    /// Full details of one anime
    Detail {
        id: u32,

        /// Also fetch characters and staff
        #[arg(long)]
        with_credits: bool,
    },

    /// Characters of one anime
    Characters { id: u32 },

    /// Staff of one anime
    Staff { id: u32 },

    /// Free-text search with optional filters
    Search {
        /// Search text (may be empty)
        #[arg(default_value = "")]
        query: String,

        /// Extra filter as key=value, repeatable
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Collapse entries of the same series
        #[arg(long)]
        dedup: bool,

        /// Keep at most this many results
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List anime genres
    Genres,
}

fn parse_season(s: &str) -> Result<Season, String> {
    s.parse()
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

#[derive(Serialize)]
struct DetailWithCredits {
    anime: serde_json::Value,
    characters: Vec<serde_json::Value>,
    staff: Vec<serde_json::Value>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{}", rendered);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        config.log_level()
    };

    shared::logging::init(shared::LogConfig {
        log_dir: config.log_dir().to_string_lossy().to_string(),
        component: "anime-catalog".to_string(),
        default_level: log_level,
        console: config.logging.console,
        file: config.logging.file,
        json_format: config.logging.json_format,
    })?;

    info!(config_file = %args.config.display(), base_url = %config.catalog.base_url, "Anime catalog starting");

    let client = CatalogClient::new(&config.catalog).context("Failed to create catalog client")?;

    run(&client, args.command).await?;

    let stats = client.cache_stats();
    info!(
        cached_entries = stats.total_entries,
        fresh_entries = stats.fresh_entries,
        "Done"
    );

    Ok(())
}

async fn run(client: &CatalogClient, command: Command) -> Result<()> {
    match command {
        Command::Top { kind, filter, page } => {
            let page = client
                .top_anime(kind.as_deref(), filter.as_deref(), page)
                .await
                .context("Failed to fetch top anime")?;
            print_json(&page)
        }
        Command::Seasonal { year, season } => {
            let page = client
                .seasonal_anime(year, season)
                .await
                .context("Failed to fetch seasonal anime")?;
            print_json(&page)
        }
        Command::Upcoming => {
            let page = client
                .upcoming_anime()
                .await
                .context("Failed to fetch upcoming anime")?;
            print_json(&page)
        }
        Command::Detail { id, with_credits } => {
            if !with_credits {
                let details = client
                    .anime_details(id)
                    .await
                    .with_context(|| format!("Failed to fetch anime {}", id))?;
                return print_json(&details.data);
            }

            let (details, characters, staff) = tokio::join!(
                client.anime_details(id),
                client.anime_characters(id),
                client.anime_staff(id)
            );

            let details = details.with_context(|| format!("Failed to fetch anime {}", id))?;
            let characters = characters.with_context(|| format!("Failed to fetch characters of {}", id))?;
            let staff = staff.with_context(|| format!("Failed to fetch staff of {}", id))?;

            print_json(&DetailWithCredits {
                anime: serde_json::to_value(&details.data)?,
                characters: characters.data,
                staff: staff.data,
            })
        }
        Command::Characters { id } => {
            let characters = client
                .anime_characters(id)
                .await
                .with_context(|| format!("Failed to fetch characters of {}", id))?;
            print_json(&characters.data)
        }
        Command::Staff { id } => {
            let staff = client
                .anime_staff(id)
                .await
                .with_context(|| format!("Failed to fetch staff of {}", id))?;
            print_json(&staff.data)
        }
        Command::Search {
            query,
            params,
            dedup,
            limit,
        } => {
            let mut search_params = SearchParams::new();
            for (key, value) in params {
                search_params.insert(key, value);
            }

            let mut page = client
                .search_anime(&query, &search_params)
                .await
                .context("Search failed")?;

            if dedup {
                let before = page.data.len();
                page.data = CatalogClient::deduplicate(&page.data);
                info!(before = before, after = page.data.len(), "Deduplicated search results");
            }
            if let Some(limit) = limit {
                page.data.truncate(limit);
            }

            print_json(&page)
        }
        Command::Genres => {
            let genres = client.genres().await.context("Failed to fetch genres")?;
            print_json(&genres)
        }
    }
}
