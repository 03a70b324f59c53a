use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub catalog: CatalogConfig,

    pub analytics: AnalyticsConfig,

    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Request timeout in seconds for all outbound HTTP calls (default: 30)
    pub request_timeout_seconds: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,

    /// Bearer credential for the catalog API. Required.
    pub api_token: String,

    /// Template prefix for poster images; the catalog's `poster_path`
    /// is appended verbatim.
    pub image_base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_token: String::new(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub endpoint: String,

    pub project_id: String,

    pub api_key: String,

    pub database_id: String,

    pub collection_id: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: String::new(),
            api_key: String::new(),
            database_id: String::new(),
            collection_id: "metrics".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet window before a query edit propagates to a search (default: 500)
    pub debounce_ms: u64,

    /// How many trending records to load at startup (default: 5)
    pub trending_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            trending_limit: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            catalog: CatalogConfig::default(),
            analytics: AnalyticsConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load_file()?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Layers secrets from the environment over the parsed config, so
    /// credentials do not have to live in config.toml.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("REELSEARCH_CATALOG_API_TOKEN") {
            self.catalog.api_token = token;
        }

        if let Ok(project_id) = std::env::var("REELSEARCH_ANALYTICS_PROJECT_ID") {
            self.analytics.project_id = project_id;
        }

        if let Ok(api_key) = std::env::var("REELSEARCH_ANALYTICS_API_KEY") {
            self.analytics.api_key = api_key;
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("reelsearch").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".reelsearch").join("config.toml"));
        }

        paths
    }

    pub fn create_default_if_missing() -> Result<bool> {
        Self::create_default_if_missing_at(Path::new("config.toml"))
    }

    pub fn create_default_if_missing_at(path: &Path) -> Result<bool> {
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.catalog.api_token.is_empty() {
            anyhow::bail!("Catalog API token cannot be empty");
        }

        if self.analytics.project_id.is_empty()
            || self.analytics.database_id.is_empty()
            || self.analytics.collection_id.is_empty()
        {
            anyhow::bail!("Analytics project, database and collection ids must be set");
        }

        if self.search.trending_limit == 0 {
            anyhow::bail!("Trending limit must be > 0");
        }

        Ok(())
    }
}
