use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, anyhow};

use crate::locale::Locale;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
/// Upper bound for `max_input_rows`; larger values are clamped on load.
pub const MAX_INPUT_ROWS: u16 = 20;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub locale: Locale,
    /// Delay between opening the window and focusing the input.
    pub focus_delay_ms: u64,
    pub max_input_rows: u16,
    pub default_ticker: Option<String>,
    /// Preset questions offered on F1..F4.
    pub examples: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            locale: Locale::Fr,
            focus_delay_ms: 100,
            max_input_rows: 5,
            default_ticker: None,
            examples: vec![
                "Quelle est la stratégie de croissance de cette entreprise ?".to_string(),
                "Quels sont les principaux facteurs de risque ?".to_string(),
                "Résume les résultats financiers de l'année.".to_string(),
                "Comment évolue le chiffre d'affaires ?".to_string(),
            ],
        }
    }

    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let mut config: Config = serde_json::from_str(&config_content)?;
        config.max_input_rows = config.max_input_rows.clamp(1, MAX_INPUT_ROWS);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    pub fn save_default_ticker(ticker: &str) -> Result<()> {
        let mut config = Self::load().unwrap_or_else(|_| Self::new());
        config.default_ticker = Some(ticker.to_string());
        config.save()
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("tickerchat").join("config.json"))
    }
}
