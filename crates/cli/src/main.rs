mod render;

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ffsetup_core::{
    config::{self, AppConfig},
    filters, Catalog, CatalogLoader, CatalogMetadata, GameState, Resolver,
};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ffsetup")]
#[command(about = "Resolve Firefly game setups from selected sources", long_about = None)]
struct Cli {
    /// Directory of catalog fragments, overriding the configured one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every setup domain for a saved game state
    Resolve {
        /// Game state JSON file
        #[arg(long)]
        state: PathBuf,

        /// Print the resolved setup as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// List expansions that can be enabled
    Expansions {
        /// Game state JSON file used for edition filtering
        #[arg(long)]
        state: Option<PathBuf>,

        /// Include hidden expansions
        #[arg(long, default_value = "false")]
        hidden: bool,
    },

    /// List story cards and why unavailable ones cannot be picked
    Stories {
        /// Game state JSON file
        #[arg(long)]
        state: Option<PathBuf>,

        /// Include hidden story cards
        #[arg(long, default_value = "false")]
        hidden: bool,
    },

    /// Load and validate the catalog
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config.log_dir)?;

    let (catalog, metadata) = load_catalog(cli.catalog.as_ref().or(config.catalog_dir.as_ref()))?;

    match cli.command {
        Commands::Resolve { state, json } => {
            let state = GameState::load(&state)?;
            let resolver = Resolver::new(config.priority_table()?, config.baselines.clone());
            let setup = resolver.resolve(&catalog, &state);
            if json {
                println!("{}", serde_json::to_string_pretty(&setup)?);
            } else {
                print!("{}", render::setup(&setup));
            }
        }
        Commands::Expansions { state, hidden } => {
            let state = load_state(state.as_deref())?;
            let include_hidden = hidden || config.show_hidden || state.show_hidden_content;
            for expansion in filters::eligible_expansions(&catalog, &state, include_hidden) {
                let marker = if state.has_expansion(&expansion.id) { "*" } else { " " };
                println!("{marker} {:<24} {}", expansion.id, expansion.name);
            }
        }
        Commands::Stories { state, hidden } => {
            let state = load_state(state.as_deref())?;
            let include_hidden = hidden || config.show_hidden || state.show_hidden_content;
            for entry in filters::story_availability(&catalog, &state, include_hidden) {
                println!("{}", render::story(&entry));
            }
        }
        Commands::Validate => {
            catalog.validate()?;
            println!("{}", render::catalog_summary(&catalog, metadata.as_ref()));
        }
    }

    Ok(())
}

fn load_catalog(dir: Option<&PathBuf>) -> Result<(Arc<Catalog>, Option<CatalogMetadata>)> {
    match dir {
        Some(dir) => {
            let loader = CatalogLoader::new(dir);
            let catalog = loader.catalog()?;
            let metadata = loader.metadata()?;
            info!(
                version = %metadata.clone().unwrap_or_default(),
                "using catalog from {}",
                dir.display()
            );
            Ok((catalog, metadata))
        }
        None => Ok((Arc::new(Catalog::builtin().clone()), None)),
    }
}

fn load_state(path: Option<&Path>) -> Result<GameState> {
    path.map(GameState::load)
        .transpose()
        .map(Option::unwrap_or_default)
}

fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("ffsetup.log");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
