use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use lotto645_draws::source::DEFAULT_ENDPOINT;

/// Réglages d'une génération de grilles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub unique_only: bool,
    pub sort_ascending: bool,
    pub use_analysis: bool,
    /// Nombre de tirages récents à analyser.
    pub analysis_range: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            unique_only: true,
            sort_ascending: true,
            use_analysis: true,
            analysis_range: 50,
        }
    }
}

impl GenerationConfig {
    /// Vrai si le passage de `self` à `other` rend la table de poids en cache obsolète.
    pub fn analysis_changed(&self, other: &GenerationConfig) -> bool {
        self.use_analysis != other.use_analysis || self.analysis_range != other.analysis_range
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generation: GenerationConfig,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 10,
        }
    }
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn load_config(path: &Path) -> Result<AppConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let config: AppConfig =
        serde_json::from_str(&json).with_context(|| format!("JSON invalide dans {:?}", path))?;
    Ok(config)
}

pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json).with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(())
}
