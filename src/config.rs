use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct QualMasterConfig {
    pub server: ServerConfig,
    pub knowledge: KnowledgeConfig,
    pub embedding: EmbeddingConfig,
    pub index: IndexConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: String,
    pub log_level: String,
    pub host: String,
    pub port: u16,
}

/// Where the knowledge tables and the rubric come from. Empty paths select
/// the resources compiled into the binary.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub path: String,
    pub rubric_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub cache_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct IndexConfig {
    pub enabled: bool,
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    pub semantic_top_k: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            log_level: "info".into(),
            host: "127.0.0.1".into(),
            port: 8770,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        let cache_dir = default_qualmaster_dir()
            .join("models")
            .to_string_lossy()
            .into_owned();
        Self {
            provider: "local".into(),
            model: "all-MiniLM-L6-v2".into(),
            cache_dir,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        let db_path = default_qualmaster_dir()
            .join("index.db")
            .to_string_lossy()
            .into_owned();
        Self {
            enabled: true,
            db_path,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { semantic_top_k: 3 }
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Returns `~/.qualmaster/`
pub fn default_qualmaster_dir() -> PathBuf {
    home_dir().join(".qualmaster")
}

/// Returns the default config file path: `~/.qualmaster/config.toml`
pub fn default_config_path() -> PathBuf {
    default_qualmaster_dir().join("config.toml")
}

impl QualMasterConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            QualMasterConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (QUALMASTER_INDEX, QUALMASTER_KNOWLEDGE, QUALMASTER_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("QUALMASTER_INDEX") {
            self.index.db_path = val;
        }
        if let Ok(val) = std::env::var("QUALMASTER_KNOWLEDGE") {
            self.knowledge.path = val;
        }
        if let Ok(val) = std::env::var("QUALMASTER_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the vector index path, expanding `~` if needed.
    pub fn resolved_index_path(&self) -> PathBuf {
        expand_tilde(&self.index.db_path)
    }

    /// Custom knowledge file, if one is configured.
    pub fn knowledge_path(&self) -> Option<PathBuf> {
        non_empty_path(&self.knowledge.path)
    }

    /// Custom rubric file, if one is configured.
    pub fn rubric_path(&self) -> Option<PathBuf> {
        non_empty_path(&self.knowledge.rubric_path)
    }
}

fn non_empty_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| expand_tilde(trimmed))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else {
        PathBuf::from(path)
    }
}
