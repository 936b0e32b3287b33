use crate::elo::EloSettings;
use crate::glicko2::Glicko2Settings;
use crate::log_internal;
use crate::service::RatingSettings;
use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

const CONFIG_PATH_REL_HOME: &str = ".config/ladder/config.toml";
const STATE_PATH_REL_HOME: &str = ".config/ladder/state.json";

/// Ladder configuration
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub elo: EloSettings,
    pub glicko2: Glicko2Settings,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct General {
    pub command_prefix: String,
    /// Where the match log is kept.  Defaults to a file next to the configuration.
    pub state_path: Option<PathBuf>,
    /// How many lines `top` and `gtop` print.
    pub top_size: usize,
}

impl Default for General {
    fn default() -> Self {
        General {
            command_prefix: "/".to_string(),
            state_path: None,
            top_size: 10,
        }
    }
}

impl Config {
    fn config_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|p| p.join(CONFIG_PATH_REL_HOME))
            .ok_or(anyhow!("Could not find home directory"))
    }

    /// Loads `~/.config/ladder/config.toml`, falling back to the defaults if there is none.
    pub async fn load() -> Result<Self> {
        let path = Self::config_path()?;

        let mut file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log_internal!(
                    "No configuration at `{}`, using defaults",
                    path.to_string_lossy()
                );
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(anyhow!(
                    "Could not open configuration at `{}`: {}",
                    path.to_string_lossy(),
                    e
                ))
            }
        };

        let mut contents = String::new();
        file.read_to_string(&mut contents).await.map_err(|e| {
            anyhow!(
                "Could not read configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        let cfg = Self::parse(&contents).map_err(|e| {
            anyhow!(
                "Could not parse configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;
        cfg.glicko2.validate().map_err(|e| {
            anyhow!(
                "Invalid configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;
        Ok(cfg)
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn state_path(&self) -> Result<PathBuf> {
        match &self.general.state_path {
            Some(path) => Ok(path.clone()),
            None => dirs::home_dir()
                .map(|p| p.join(STATE_PATH_REL_HOME))
                .ok_or(anyhow!("Could not find home directory")),
        }
    }

    pub fn rating_settings(&self) -> RatingSettings {
        RatingSettings {
            elo: self.elo.clone(),
            glicko2: self.glicko2.clone(),
        }
    }
}
