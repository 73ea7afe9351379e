//! Application configuration: built-in defaults, a TOML file, then `FFSETUP_*`
//! environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    compose::ResourceBaselines,
    rules::{PriorityError, PriorityTable, SourceKind},
};

/// Directory under `~/.config` holding the configuration file.
pub const CONFIG_DIR: &str = "ffsetup";
/// Name of the configuration file.
pub const CONFIG_FILE: &str = "config.toml";

const DEFAULT_CONFIG: &str = r#"# Setup engine configuration.

# Directory of catalog fragments to use instead of the built-in catalog.
# catalog_dir = "/path/to/catalog"

# Offer hidden expansions and story cards.
show_hidden = false

# Source kinds in arbitration order, highest priority first.
priority = [
    "story",
    "challenge",
    "combinable_setup_card",
    "setup_card",
    "optional_rule",
    "expansion",
]

[baselines]
credits = 3000
fuel = 6
parts = 2
warrants = 0
goal_tokens = 0
"#;

/// Runtime settings shared by every frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Optional directory of catalog fragments; the built-in catalog is used otherwise.
    pub catalog_dir: Option<PathBuf>,
    /// Whether hidden catalog entries are listed.
    pub show_hidden: bool,
    /// Directory receiving the log file.
    pub log_dir: PathBuf,
    /// Arbitration order of the competing source kinds, highest first.
    pub priority: Vec<SourceKind>,
    /// Starting resource values.
    pub baselines: ResourceBaselines,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_dir: None,
            show_hidden: false,
            log_dir: default_log_dir(),
            priority: SourceKind::COMPETING.to_vec(),
            baselines: ResourceBaselines::default(),
        }
    }
}

impl AppConfig {
    /// Load from the default configuration path.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Layer the file at `path` (if present) and the environment over the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("FFSETUP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    /// Validated arbitration table built from `priority`.
    pub fn priority_table(&self) -> Result<PriorityTable, PriorityError> {
        PriorityTable::new(self.priority.clone())
    }
}

/// Location of the configuration file under the user's config directory.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("logs")
}

/// Write the commented default configuration if no file exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))?;
    info!("wrote default configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let temp = tempdir()?;
        let config = AppConfig::load_from(temp.path().join("absent.toml"))?;
        assert_eq!(config.priority, SourceKind::COMPETING.to_vec());
        assert_eq!(config.baselines, ResourceBaselines::default());
        assert!(config.catalog_dir.is_none());
        Ok(())
    }

    #[test]
    fn default_file_round_trips() -> Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("nested").join(CONFIG_FILE);
        write_default_config(&path)?;
        assert!(path.exists());

        let config = AppConfig::load_from(&path)?;
        assert!(!config.show_hidden);
        assert_eq!(config.baselines.credits, 3000);
        assert_eq!(config.priority_table()?, PriorityTable::default());
        Ok(())
    }

    #[test]
    fn existing_file_is_left_alone() -> Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "show_hidden = true\n")?;
        write_default_config(&path)?;
        assert_eq!(fs::read_to_string(&path)?, "show_hidden = true\n");
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
catalog_dir = "/srv/catalog"
show_hidden = true

[baselines]
credits = 5000
"#,
        )?;

        let config = AppConfig::load_from(&path)?;
        assert!(config.show_hidden);
        assert_eq!(config.catalog_dir, Some(PathBuf::from("/srv/catalog")));
        assert_eq!(config.baselines.credits, 5000);
        assert_eq!(config.baselines.fuel, 6);
        Ok(())
    }

    #[test]
    fn invalid_priority_is_rejected() -> Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "priority = [\"story\", \"warning\"]\n")?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(
            config.priority_table(),
            Err(PriorityError::Synthetic(SourceKind::Warning))
        );
        Ok(())
    }
}
