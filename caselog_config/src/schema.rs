use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level pipeline configuration.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSettings,

    #[serde(default)]
    pub columns: ColumnMap,
}

/// Engine tuning knobs.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EngineSettings {
    /// Findings below this confidence are flagged for manual review and
    /// kept out of output cells.
    #[serde(default = "EngineSettings::default_review_threshold")]
    pub review_threshold: f64,

    /// Characters of context captured around matched spans.
    #[serde(default = "EngineSettings::default_context_window")]
    pub context_window: usize,

    /// Fallback year when a case date cannot be parsed.
    #[serde(default = "EngineSettings::default_year")]
    pub default_year: i32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            review_threshold: Self::default_review_threshold(),
            context_window: Self::default_context_window(),
            default_year: Self::default_year(),
        }
    }
}

impl EngineSettings {
    const fn default_review_threshold() -> f64 {
        0.5
    }

    const fn default_context_window() -> usize {
        40
    }

    const fn default_year() -> i32 {
        2025
    }
}

/// Column names of the tabular input.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ColumnMap {
    #[serde(default = "ColumnMap::default_date")]
    pub date: String,
    #[serde(default = "ColumnMap::default_episode_id")]
    pub episode_id: String,
    #[serde(default = "ColumnMap::default_anesthesiologist")]
    pub anesthesiologist: String,
    #[serde(default = "ColumnMap::default_age")]
    pub age: String,
    /// Optional column; when present and truthy, the ASA status gains the
    /// emergency suffix.
    #[serde(default = "ColumnMap::default_emergent")]
    pub emergent: String,
    #[serde(default = "ColumnMap::default_asa")]
    pub asa: String,
    #[serde(default = "ColumnMap::default_final_anesthesia_type")]
    pub final_anesthesia_type: String,
    #[serde(default = "ColumnMap::default_procedure_notes")]
    pub procedure_notes: String,
    #[serde(default = "ColumnMap::default_procedure")]
    pub procedure: String,
    #[serde(default = "ColumnMap::default_services")]
    pub services: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            date: Self::default_date(),
            episode_id: Self::default_episode_id(),
            anesthesiologist: Self::default_anesthesiologist(),
            age: Self::default_age(),
            emergent: Self::default_emergent(),
            asa: Self::default_asa(),
            final_anesthesia_type: Self::default_final_anesthesia_type(),
            procedure_notes: Self::default_procedure_notes(),
            procedure: Self::default_procedure(),
            services: Self::default_services(),
        }
    }
}

impl ColumnMap {
    fn default_date() -> String {
        "Date".to_string()
    }

    fn default_episode_id() -> String {
        "Episode ID".to_string()
    }

    fn default_anesthesiologist() -> String {
        "Responsible Provider".to_string()
    }

    fn default_age() -> String {
        "Age At Encounter".to_string()
    }

    fn default_emergent() -> String {
        "Emergent".to_string()
    }

    fn default_asa() -> String {
        "ASA".to_string()
    }

    fn default_final_anesthesia_type() -> String {
        "Final Anesthesia Type".to_string()
    }

    fn default_procedure_notes() -> String {
        "Procedure Notes".to_string()
    }

    fn default_procedure() -> String {
        "Procedure".to_string()
    }

    fn default_services() -> String {
        "Services".to_string()
    }
}

impl Config {
    /// Load configuration from the default location, falling back to
    /// defaults when no file exists.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::default_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// The default config file location (`~/caselog/config.json`).
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?;
        Ok(home.join("caselog").join("config.json"))
    }

    /// Create the default config file, refusing to clobber an existing one.
    pub fn create_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::default_path()?;
        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = serde_json::to_string_pretty(&Self::default())?;
        std::fs::write(&config_path, template)?;
        Ok(config_path)
    }
}
