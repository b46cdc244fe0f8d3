use anyhow::{bail, Context, Result};
use holdfast_core::DEFAULT_SLOT_COUNT;
use holdfast_save::Storage;
use holdfast_world::RecipeBook;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

pub const DEFAULT_APP_CONFIG_PATH: &str = "config/holdfast.toml";
const DISPLAY_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub crafting: CraftingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `saves/`, the legacy `save.json` and `config.json`.
    pub root: PathBuf,
    pub slot_count: u8,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            slot_count: DEFAULT_SLOT_COUNT,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CraftingConfig {
    /// JSON recipe list replacing the built-in catalogue.
    pub recipes: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_APP_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    AppConfig::default()
                }
            },
            Err(err) => {
                if path == Path::new(DEFAULT_APP_CONFIG_PATH)
                    && err.kind() == std::io::ErrorKind::NotFound
                {
                    debug!("No config at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                AppConfig::default()
            }
        }
    }

    /// Storage layout described by this configuration.
    pub fn storage(&self) -> Storage {
        Storage::new(&self.storage.root).with_slot_count(self.storage.slot_count)
    }

    /// Recipes for crafting and build costs. A configured file that cannot be
    /// read or parsed is an error rather than a silent fallback.
    pub fn recipe_book(&self) -> Result<RecipeBook> {
        let Some(path) = &self.crafting.recipes else {
            return Ok(RecipeBook::with_defaults());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading recipes from {}", path.display()))?;
        let book = RecipeBook::load_from_str(&contents)
            .with_context(|| format!("loading recipes from {}", path.display()))?;
        debug!(recipes = book.len(), "loaded {}", path.display());
        Ok(book)
    }
}

/// Window settings shared with the game client, stored as `<root>/config.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub fullscreen: bool,
    /// Width and height in pixels.
    pub resolution: [u32; 2],
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fullscreen: true,
            resolution: [1920, 1080],
        }
    }
}

impl DisplayConfig {
    pub fn path(root: &Path) -> PathBuf {
        root.join(DISPLAY_CONFIG_FILE)
    }

    /// Load display settings; missing keys take defaults, unreadable files yield defaults.
    pub fn load(root: &Path) -> Self {
        let path = Self::path(root);
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Failed to parse {}: {err}. Using defaults", path.display());
                DisplayConfig::default()
            }),
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                DisplayConfig::default()
            }
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = Self::path(root);
        let json = serde_json::to_string_pretty(self)?;
        fs::create_dir_all(root).with_context(|| format!("creating {}", root.display()))?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

/// Parse `WIDTHxHEIGHT`, e.g. `1280x720`.
pub fn parse_resolution(text: &str) -> Result<[u32; 2]> {
    let Some((width, height)) = text.trim().split_once(['x', 'X']) else {
        bail!("expected WIDTHxHEIGHT, got {text:?}");
    };
    let width: u32 = width
        .parse()
        .with_context(|| format!("invalid width in {text:?}"))?;
    let height: u32 = height
        .parse()
        .with_context(|| format!("invalid height in {text:?}"))?;
    if width == 0 || height == 0 {
        bail!("resolution must be non-zero, got {text:?}");
    }
    Ok([width, height])
}
