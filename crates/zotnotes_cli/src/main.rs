//! `zotnotes` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, load config and bootstrap logging.
//! - Dispatch to core services and print progress for humans.

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use log::{error, warn};
use std::path::PathBuf;
use zotnotes_core::config::resolve_config_path;
use zotnotes_core::service::collection_service::{render_groups, render_note_counts};
use zotnotes_core::{
    default_log_level, init_logging, render_body, write_document, AppConfig, CollectionService,
    NoteService, NotesReport, ZoteroClient,
};

/// File label for whole-library exports.
const LIBRARY_LABEL: &str = "Library";

#[derive(Debug, Parser)]
#[command(
    name = "zotnotes",
    version,
    about = "Export Zotero extracted-annotation notes to RTF"
)]
struct Cli {
    /// Config file; defaults to $ZOTNOTES_CONFIG or ./zotnotes.toml.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// trace|debug|info|warn|error; overrides the config file.
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Export annotation notes from one collection.
    Collection {
        /// Exact collection name; falls back to `defaults.collection`.
        name: Option<String>,
    },
    /// Export annotation notes attached to search results.
    Search {
        /// Free-text query; falls back to `defaults.search`.
        query: Option<String>,
    },
    /// Export annotation notes from every item in the library.
    Library,
    /// Print the collection hierarchy.
    #[command(name = "list-collections")]
    ListCollections,
    /// Print note counts per collection.
    #[command(name = "collections-with-notes")]
    CollectionsWithNotes,
    /// Print groups visible to the user.
    #[command(name = "list-groups")]
    ListGroups,
    /// Print collection picker JSON for launcher workflows.
    Picker,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = resolve_config_path(cli.config.as_deref());
    let config = AppConfig::load(&config_path)
        .with_context(|| format!("loading config from `{}`", config_path.display()))?;

    let level = cli
        .log_level
        .clone()
        .or_else(|| config.logging.level.clone())
        .unwrap_or_else(|| default_log_level().to_string());
    init_logging(&level, config.logging.directory.as_deref()).map_err(|err| anyhow!(err))?;

    let client = ZoteroClient::from_config(&config.library)?;

    match cli.command {
        Commands::Collection { name } => {
            let name = pick_query(name, config.defaults.collection.as_deref(), "collection")?;
            println!("Processing collection: {name}");
            let service = NoteService::load(&client)?;
            let report = service.collect_collection_notes(&name).inspect_err(|err| {
                error!("event=collection_failed module=cli status=error error={err}");
            })?;
            export(&config, &name, &report)
        }
        Commands::Search { query } => {
            let query = pick_query(query, config.defaults.search.as_deref(), "search")?;
            println!("Searching library: {query}");
            let service = NoteService::load(&client)?;
            let report = service.collect_search_notes(&query)?;
            export(&config, &query, &report)
        }
        Commands::Library => {
            println!("Processing whole library");
            let service = NoteService::load(&client)?;
            let report = service.collect_library_notes()?;
            export(&config, LIBRARY_LABEL, &report)
        }
        Commands::ListCollections => {
            let service = CollectionService::load(&client)?;
            println!("{}", service.tree_listing());
            Ok(())
        }
        Commands::CollectionsWithNotes => {
            let service = CollectionService::load(&client)?;
            if service.index().is_empty() {
                println!("No collections found.");
                return Ok(());
            }
            println!("{}", render_note_counts(&service.note_counts()?));
            Ok(())
        }
        Commands::ListGroups => {
            let service = CollectionService::load(&client)?;
            println!("{}", render_groups(&service.groups()?));
            Ok(())
        }
        Commands::Picker => {
            let service = CollectionService::load(&client)?;
            println!("{}", service.picker_json()?);
            Ok(())
        }
    }
}

/// Names match exactly, so the chosen value is passed on untrimmed.
fn pick_query(explicit: Option<String>, fallback: Option<&str>, kind: &str) -> Result<String> {
    explicit
        .or_else(|| fallback.map(str::to_string))
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| anyhow!("no {kind} query given and `defaults.{kind}` is not set"))
}

fn export(config: &AppConfig, label: &str, report: &NotesReport) -> Result<()> {
    println!("Scanned {} candidate notes", report.scanned_notes);
    if report.records.is_empty() {
        warn!("event=no_notes module=cli status=warn label={label}");
        println!("No annotation notes found.");
    } else {
        println!("Found {} annotation notes", report.records.len());
    }

    let body = render_body(&report.records);
    let today = Local::now().date_naive();
    let written = write_document(&config.output.directory, label, today, &body)
        .with_context(|| format!("exporting notes for `{label}`"))?;

    if written.overwrote {
        println!("Replaced existing file");
    }
    println!(
        "Wrote {} ({} bytes)",
        written.path.display(),
        written.bytes_written
    );
    if !written.header_verified {
        bail!(
            "written file `{}` does not start with an RTF header",
            written.path.display()
        );
    }
    println!("Notes exported: {}", report.records.len());
    Ok(())
}
