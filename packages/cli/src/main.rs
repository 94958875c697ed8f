#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line driver for the survey map core.
//!
//! Loads an entity `GeoJSON` file and one or more region files into a
//! session, then resolves navigation tokens or runs searches against it,
//! printing the results as JSON.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use survey_map_catalog::{input, merge_regions};
use survey_map_catalog_models::BoundingBox;
use survey_map_router_models::Route;
use survey_map_search::SearchMode;
use survey_map_session::{Session, SessionConfig};

#[derive(Parser)]
#[command(name = "survey_map", about = "Survey map navigation and search")]
struct Cli {
    /// Entity `FeatureCollection`
    #[arg(long)]
    entities: PathBuf,

    /// Region `FeatureCollection`; repeat to merge several, in order
    #[arg(long = "regions")]
    regions: Vec<PathBuf>,

    /// Session config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve navigation tokens in order, printing each resolved view
    Navigate {
        /// Tokens such as `district/Elm%20Park` or `survey/color/Red`
        #[arg(required = true)]
        tokens: Vec<String>,

        /// Follow a viewport (`west,south,east,north`) before navigating
        #[arg(long)]
        viewport: Option<BoundingBox>,
    },
    /// Search entity addresses
    Search {
        query: String,

        #[arg(long, value_enum, default_value_t = Mode::Full)]
        mode: Mode,
    },
    /// List regions with their member counts
    Regions,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Full,
    Suggest,
    Lookup,
}

impl From<Mode> for SearchMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Full => Self::Full,
            Mode::Suggest => Self::Suggest,
            Mode::Lookup => Self::Lookup,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let cli = Cli::parse();

    let config = cli
        .config
        .as_deref()
        .map(SessionConfig::from_file)
        .transpose()?
        .unwrap_or_default();

    let mut session = load_session(config, &cli.entities, &cli.regions)?;

    match cli.command {
        Commands::Navigate { tokens, viewport } => {
            if let Some(bbox) = viewport {
                follow_viewport(&mut session, bbox);
            }
            for token in &tokens {
                if let Some(update) = session.navigate(token) {
                    println!("{}", serde_json::to_string_pretty(&update)?);
                }
            }
        }
        Commands::Search { query, mode } => {
            let outcome = match SearchMode::from(mode) {
                SearchMode::Suggest => session.suggest(&query),
                SearchMode::Lookup => session.lookup(&query),
                SearchMode::Full => session
                    .navigate(&Route::Search(query.clone()).to_string())
                    .and_then(|update| update.search),
            };
            if let Some(outcome) = outcome {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
        }
        Commands::Regions => {
            let (Some(catalog), Some(index)) = (session.catalog(), session.index()) else {
                return Ok(());
            };
            for region in catalog.regions() {
                println!(
                    "{}\t{}\t{}",
                    region.name,
                    index.entities_in(&region.name).len(),
                    region.color.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

fn load_session(
    config: SessionConfig,
    entities: &Path,
    regions: &[PathBuf],
) -> Result<Session, Box<dyn std::error::Error>> {
    let records = input::load_entities_from_path(entities)?;
    let regions = merge_regions(
        regions
            .iter()
            .map(input::load_regions_from_path)
            .collect::<Result<Vec<_>, _>>()?,
    );

    let mut session = Session::new(config);
    let summary = session.load(records, regions);
    log::info!(
        "Loaded {} entities and {} regions",
        summary.entities,
        summary.regions
    );

    Ok(session)
}

/// Turns on view following and lets the debounced refresh settle.
fn follow_viewport(session: &mut Session, bbox: BoundingBox) {
    let window = session.config().debounce_window();
    session.set_follow_view(true);
    session.set_viewport(bbox, std::time::Duration::ZERO);
    session.tick(window);
}
