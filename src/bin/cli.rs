//! Folio CLI
//!
//! Search books, mark favorites and keep short rated notes.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use folio::{
    error::Result,
    models::Config,
    pipeline,
    services::{AnnotationStore, BookStateManager, OpenLibraryClient},
    storage::LocalStorage,
};

/// Folio - Book Search and Notes
#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Book search with local favorites and notes")]
struct Cli {
    /// Directory holding config.toml and the saved favorites/notes
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search books and show them with favorites and notes
    Search {
        /// Free-text query (default from config)
        query: Option<String>,

        /// Maximum number of results (default from config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only list favorites
        #[arg(long)]
        favorites_only: bool,
    },

    /// Search and show the full record of one book
    Details {
        /// Book id, e.g. /works/OL27448W
        id: String,

        /// Query whose results contain the book (default from config)
        #[arg(short, long)]
        query: Option<String>,

        /// Maximum number of results (default from config)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Add or remove a favorite
    Favorite {
        /// Book id, e.g. /works/OL27448W
        id: String,
    },

    /// Remove all favorites
    ClearFavorites,

    /// Add or update a note
    Note {
        /// Book id
        id: String,

        /// Rating from 1 to 5
        #[arg(short, long, allow_negative_numbers = true)]
        rating: i64,

        /// Note text (10 to 500 characters)
        #[arg(short, long)]
        text: String,

        /// Book title to keep with the note
        #[arg(long)]
        title: Option<String>,
    },

    /// Delete a note
    DeleteNote {
        /// Book id
        id: String,
    },

    /// List all notes
    Notes,

    /// Show or set the theme preference
    Theme {
        #[arg(long, conflicts_with = "light")]
        dark: bool,

        #[arg(long)]
        light: bool,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging from the configured level and verbosity flag.
fn init_logging(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.storage_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);
    init_logging(&config.logging.level, cli.verbose);

    log::debug!("Using storage directory {}", cli.storage_dir.display());

    let store = AnnotationStore::open(LocalStorage::new(&cli.storage_dir));
    let provider = OpenLibraryClient::new(&config.search)?;
    let mut manager = BookStateManager::new(store, Arc::new(provider));

    match cli.command {
        Command::Search {
            query,
            limit,
            favorites_only,
        } => {
            let query = query.unwrap_or_else(|| config.search.default_query.clone());
            let limit = limit.unwrap_or(config.search.default_limit);
            pipeline::run_search(&mut manager, &query, limit, favorites_only).await?;
        }

        Command::Details { id, query, limit } => {
            let query = query.unwrap_or_else(|| config.search.default_query.clone());
            let limit = limit.unwrap_or(config.search.default_limit);
            pipeline::run_details(
                &mut manager,
                &id,
                &query,
                limit,
                &config.search.cover_base_url,
            )
            .await?;
        }

        Command::Favorite { id } => pipeline::run_toggle_favorite(&mut manager, &id)?,

        Command::ClearFavorites => pipeline::run_clear_favorites(&mut manager)?,

        Command::Note {
            id,
            rating,
            text,
            title,
        } => pipeline::run_upsert_note(&mut manager, &id, &text, rating, title.as_deref())?,

        Command::DeleteNote { id } => pipeline::run_delete_note(&mut manager, &id)?,

        Command::Notes => pipeline::run_list_notes(&manager)?,

        Command::Theme { dark, light } => {
            let choice = match (dark, light) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            pipeline::run_theme(manager.store(), choice)?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({})", config.search.base_url);
        }
    }

    Ok(())
}
