//! Application configuration: defaults, an optional TOML file, then
//! `CITY_TRADER_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use tracing::info;

use crate::{models::PlayerState, world::World};

/// Directory under the user's config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "city-trader";
/// Prefix for environment overrides, e.g. `CITY_TRADER_STARTING_MONEY`.
pub const ENV_PREFIX: &str = "CITY_TRADER";

const DEFAULT_CONFIG: &str = r#"# City Trader configuration.

# Path to a world description; the built-in world is used when unset.
# world_path = "/path/to/world.json"

# Starting city; defaults to the first city of the world in name order.
# start_city = "Paris"

starting_fuel = 100.0
starting_money = 500

# How many times the trade advisor may be consulted per session.
advisor_uses = 1
"#;

/// Settings for a trading session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    /// World description to load instead of the built-in one.
    #[serde(default)]
    pub world_path: Option<PathBuf>,
    /// City the player starts in.
    #[serde(default)]
    pub start_city: Option<String>,
    /// Fuel the player starts with.
    pub starting_fuel: f64,
    /// Money the player starts with.
    pub starting_money: i64,
    /// Advisor consultations allowed per session.
    pub advisor_uses: u32,
}

impl AppConfig {
    /// Load from the default config file and the environment.
    pub fn load() -> Result<Self> {
        let builder = defaults()?
            .add_source(File::from(config_path()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        build(builder)
    }

    /// Load from an explicit file, without environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let builder = defaults()?.add_source(File::from(path));
        build(builder).with_context(|| format!("failed to load config {}", path.display()))
    }

    /// Starting player for `world`, honouring `start_city` when set.
    pub fn starting_player(&self, world: &World) -> PlayerState {
        let location = self
            .start_city
            .clone()
            .unwrap_or_else(|| world.default_start());
        PlayerState::new(location, self.starting_fuel, self.starting_money)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            world_path: None,
            start_city: None,
            starting_fuel: 100.0,
            starting_money: 500,
            advisor_uses: 1,
        }
    }
}

/// Location of the user config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Write a commented default config file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(config_path())
}

fn write_default_config(path: PathBuf) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))?;
    info!("wrote default configuration to {}", path.display());
    Ok(())
}

fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>> {
    let fallback = AppConfig::default();
    Config::builder()
        .set_default("starting_fuel", fallback.starting_fuel)?
        .set_default("starting_money", fallback.starting_money)?
        .set_default("advisor_uses", i64::from(fallback.advisor_uses))
        .context("failed to apply configuration defaults")
}

fn build(builder: ConfigBuilder<config::builder::DefaultState>) -> Result<AppConfig> {
    builder
        .build()
        .context("failed to read configuration")?
        .try_deserialize()
        .context("invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_file_parses_to_defaults() -> Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("nested").join("config.toml");

        write_default_config(path.clone())?;
        assert!(path.exists());
        assert_eq!(AppConfig::load_from(&path)?, AppConfig::default());

        fs::write(&path, "starting_money = 9")?;
        write_default_config(path.clone())?;
        assert_eq!(fs::read_to_string(&path)?, "starting_money = 9");
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "start_city = \"Rome\"\nstarting_money = 1000\nworld_path = \"maps/europe.json\"\n",
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.start_city.as_deref(), Some("Rome"));
        assert_eq!(config.starting_money, 1000);
        assert_eq!(config.starting_fuel, 100.0);
        assert_eq!(config.advisor_uses, 1);
        assert_eq!(config.world_path, Some(PathBuf::from("maps/europe.json")));
        Ok(())
    }

    #[test]
    fn starting_player_defaults_to_first_city() -> Result<()> {
        let world = World::builtin()?;
        let player = AppConfig::default().starting_player(&world);
        assert_eq!(player.location, "Amsterdam");
        assert_eq!(player.fuel, 100.0);
        assert_eq!(player.money, 500);
        Ok(())
    }
}
