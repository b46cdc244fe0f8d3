//! holdfast - save slots and inventory for a 2D survival base builder
//!
//! Command-line front end over the save directory.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::AppConfig;
use holdfast_save::SaveManager;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect and edit holdfast save slots", long_about = None)]
struct Cli {
    /// TOML config file (defaults to config/holdfast.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Save root directory; overrides the config file
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,
    /// Slot to act on instead of the active one
    #[arg(long, global = true, value_name = "N")]
    slot: Option<u32>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every slot
    Slots,
    /// Start a new game in a slot and select it
    New {
        slot: u32,
        name: Option<String>,
        /// Replace an existing game
        #[arg(long)]
        overwrite: bool,
    },
    /// Select an existing slot
    Select { slot: u32 },
    /// Delete a slot and its save
    Delete { slot: u32 },
    /// Print a slot's inventory, base and raid state
    Show,
    /// Add items to the inventory
    Give { item: String, amount: u32 },
    /// Remove items from the inventory
    Take { item: String, amount: u32 },
    /// List recipes the slot's inventory can afford
    Recipes,
    /// Craft one item from its recipe
    Craft { recipe: String },
    /// Build a structure on the grid cell containing (x, y)
    Place {
        kind: String,
        #[arg(allow_hyphen_values = true)]
        x: i32,
        #[arg(allow_hyphen_values = true)]
        y: i32,
    },
    /// Change raid noise by a signed amount
    Noise {
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Set the weather (clear, rain, fog)
    Weather { weather: String },
    /// Show or change display settings
    Display {
        #[arg(long)]
        fullscreen: Option<bool>,
        /// WIDTHxHEIGHT
        #[arg(long)]
        resolution: Option<String>,
    },
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut app_config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    };
    if let Some(root) = cli.root {
        app_config.storage.root = root;
    }

    let storage = app_config.storage();
    info!("holdfast v{} using {}", env!("CARGO_PKG_VERSION"), storage.root().display());
    let slot = cli.slot.map(|n| storage.slot(n)).transpose()?;
    let recipes = app_config.recipe_book()?;
    let mut saves = SaveManager::open(storage);

    commands::run(&mut saves, slot, &recipes, cli.command)
}
