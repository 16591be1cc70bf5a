//! Command-line interface for reelmatch.
//!
//! Provides commands for syncing the catalog mirror, running searches,
//! listing featured entries and inspecting the derived vocabulary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::FileCatalogSource;
use crate::config;
use crate::core::ShortFilmSkill;
use crate::domain::{MatchResult, ResultKind};
use crate::library::EntityCategory;
use crate::search::DEFAULT_PLAYLIST_LIMIT;

/// reelmatch - Short film catalog mirror and media matcher
#[derive(Parser, Debug)]
#[command(name = "reelmatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the remote catalog once and merge it
    Sync {
        /// Load the bootstrap snapshot before syncing
        #[arg(long)]
        bootstrap: bool,

        /// Merge a local snapshot file instead of the remote source
        #[arg(long)]
        from_file: Option<PathBuf>,
    },

    /// Search the catalog with a natural-language phrase
    Search {
        /// Phrase, e.g. "play a short film by Masters of Pie"
        phrase: String,

        /// Declared media type
        #[arg(short, long, default_value = "short_film")]
        media_type: String,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List featured entries in catalog order
    Featured {
        /// Maximum number of entries to show
        #[arg(short, long, default_value_t = DEFAULT_PLAYLIST_LIMIT)]
        limit: usize,
    },

    /// Show the entity vocabulary derived from the catalog
    Vocab {
        /// Only show one category (e.g. film_studio)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Keep the catalog in sync until interrupted
    Watch,

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Sync {
                bootstrap,
                from_file,
            } => sync(bootstrap, from_file).await,
            Commands::Search {
                phrase,
                media_type,
                json,
            } => search(&phrase, &media_type, json).await,
            Commands::Featured { limit } => featured(limit).await,
            Commands::Vocab { category } => vocab(category).await,
            Commands::Watch => watch().await,
            Commands::Config => show_config(),
        }
    }
}

async fn open_skill() -> Result<ShortFilmSkill> {
    let config = config::config()?;
    ShortFilmSkill::from_config(config).await
}

/// One-shot sync
async fn sync(bootstrap: bool, from_file: Option<PathBuf>) -> Result<()> {
    let config = config::config()?;
    let skill = ShortFilmSkill::from_config(config).await?;

    if let Some(path) = from_file {
        let manager = crate::sync::SyncManager::new(
            Arc::clone(skill.store()),
            Arc::new(FileCatalogSource::new(path)),
        );
        let report = manager.sync_once().await?;
        print_report(&report);
        print_saved_to(&skill);
        return Ok(());
    }

    let manager = skill.sync_manager(&config.sync)?;

    if bootstrap {
        match manager.bootstrap().await {
            Some(result) => print_report(&result?),
            None => eprintln!("No bootstrap_url configured, skipping bootstrap"),
        }
    }

    let report = manager.sync_once().await?;
    print_report(&report);
    print_saved_to(&skill);

    Ok(())
}

fn print_report(report: &crate::sync::SyncReport) {
    println!(
        "Merged {} records from {}: {} new, {} updated, {} unchanged ({} in catalog)",
        report.stats.total(),
        report.source,
        report.stats.inserted,
        report.stats.updated,
        report.stats.unchanged,
        report.catalog_len
    );
}

fn print_saved_to(skill: &ShortFilmSkill) {
    if let Some(path) = skill.store().path() {
        println!("Catalog saved to {}", path.display());
    }
}

/// Search and print ranked results
async fn search(phrase: &str, media_type: &str, json: bool) -> Result<()> {
    let skill = open_skill().await?;
    let results = skill.search_str(phrase, media_type)?;
    let matched: Vec<String> = results
        .matched()
        .iter()
        .map(|(category, entity)| format!("{}={}", category, entity))
        .collect();
    let results: Vec<MatchResult> = results.collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if !matched.is_empty() {
        println!("Matched: {}", matched.join(", "));
    }

    if results.is_empty() {
        println!("No matches for \"{}\"", phrase);
        return Ok(());
    }

    println!("{:<6} {:<10} {}", "SCORE", "KIND", "TITLE");
    println!("{}", "-".repeat(75));

    for result in &results {
        match &result.kind {
            ResultKind::Video { uri } => {
                println!("{:<6} {:<10} {}", result.match_confidence, "video", result.title);
                println!("{:<17} {}", "", uri);
            }
            ResultKind::Playlist { entries } => {
                println!(
                    "{:<6} {:<10} {} ({} entries)",
                    result.match_confidence,
                    "playlist",
                    result.title,
                    entries.len()
                );
            }
        }
    }

    Ok(())
}

/// Print the featured view
async fn featured(limit: usize) -> Result<()> {
    let skill = open_skill().await?;
    let entries = skill.featured();

    if entries.is_empty() {
        println!("Catalog is empty. Run `reelmatch sync` first.");
        return Ok(());
    }

    println!("Featured from {}:", skill.identity().provider_name);
    for (idx, entry) in entries.iter().take(limit).enumerate() {
        println!("{:>4}. {}", idx + 1, entry.title);
    }

    if entries.len() > limit {
        println!("... and {} more", entries.len() - limit);
    }

    Ok(())
}

/// Print vocabulary categories
async fn vocab(category: Option<String>) -> Result<()> {
    let categories = match category {
        Some(name) => vec![name
            .parse::<EntityCategory>()
            .map_err(anyhow::Error::msg)?],
        None => EntityCategory::ALL.to_vec(),
    };

    let skill = open_skill().await?;
    let snapshot = skill.store().snapshot();

    for category in categories {
        println!(
            "{} ({})",
            category,
            snapshot.vocabulary.count(category)
        );
        for entry in snapshot.vocabulary.entries(category) {
            println!("  {}", entry);
        }
    }

    Ok(())
}

/// Run the sync loop until Ctrl-C
async fn watch() -> Result<()> {
    let config = config::config()?;
    let skill = ShortFilmSkill::from_config(config).await?;
    let manager = skill.sync_manager(&config.sync)?;

    let schedule = *manager.schedule();
    tracing::info!(
        "Syncing {} every {:?} to {:?}",
        config.sync.source_url,
        schedule.min_delay(),
        schedule.max_delay()
    );

    let handle = manager.start();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    tracing::info!("Stopping catalog sync...");
    handle.stop().await
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let config = config::config()?;

    println!("Home:          {}", config.home.display());
    println!("Catalog:       {}", config.catalog_path().display());
    match &config.config_file {
        Some(path) => println!("Config file:   {}", path.display()),
        None => println!("Config file:   (none, using defaults)"),
    }
    println!("Source URL:    {}", config.sync.source_url);
    println!(
        "Bootstrap URL: {}",
        config.sync.bootstrap_url.as_deref().unwrap_or("(none)")
    );
    println!(
        "Sync window:   {}s - {}s (fetch timeout {}s)",
        config.sync.min_delay_seconds, config.sync.max_delay_seconds, config.sync.fetch_timeout_seconds
    );
    println!("Skill ID:      {}", config.skill.identity.skill_id);
    println!("Provider:      {}", config.skill.identity.provider_name);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_command() {
        let cli = Cli::try_parse_from(["reelmatch", "search", "play Dust", "-m", "generic"]).unwrap();

        match cli.command {
            Commands::Search {
                phrase,
                media_type,
                json,
            } => {
                assert_eq!(phrase, "play Dust");
                assert_eq!(media_type, "generic");
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_sync_defaults() {
        let cli = Cli::try_parse_from(["reelmatch", "sync"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Sync {
                bootstrap: false,
                from_file: None
            }
        ));
    }

    #[test]
    fn test_featured_default_limit() {
        let cli = Cli::try_parse_from(["reelmatch", "featured"]).unwrap();
        assert!(matches!(cli.command, Commands::Featured { limit } if limit == DEFAULT_PLAYLIST_LIMIT));
    }
}
