use serde::Deserialize;
use std::fs;
use std::path::Path;

const ENV_CONFIG_PATH: &str = "DELIB_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Deliberation engine limits
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Maximum tree depth; nodes at this depth are leaves
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Sub-questions requested per node; 0 makes every node a leaf
    #[serde(default = "default_max_width")]
    pub max_width: usize,
    /// Evidence units retrieved per node
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Hard cap on expanded nodes per tree, independent of depth/width
    #[serde(default = "default_node_budget")]
    pub node_budget: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_width: default_max_width(),
            top_k: default_top_k(),
            node_budget: default_node_budget(),
        }
    }
}

fn default_max_depth() -> usize {
    2
}

fn default_max_width() -> usize {
    2
}

fn default_top_k() -> usize {
    2
}

fn default_node_budget() -> usize {
    64
}

/// Which evidence backend serves retrieval queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceBackend {
    /// Canned excerpts, no index or embeddings required
    Stub,
    /// Embedded chunks persisted under `index_dir`
    #[default]
    Vector,
}

/// Evidence store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: EvidenceBackend,
    /// Directory holding the persisted index; fully replaced on each ingest
    #[serde(default = "default_index_dir")]
    pub index_dir: String,
    /// Chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Overlap between consecutive chunks, so a sentence spanning a chunk
    /// boundary is present in full in at least one chunk
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: EvidenceBackend::default(),
            index_dir: default_index_dir(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

fn default_index_dir() -> String {
    "./evidence_index".to_string()
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

/// LLM model selection and call limits
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_generation_model")]
    pub generation_model: String,
    #[serde(default = "default_judge_model")]
    pub judge_model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Per-request timeout; a timed-out call degrades like any other
    /// generation failure instead of hanging the tree expansion
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            generation_model: default_generation_model(),
            judge_model: default_judge_model(),
            embedding_model: default_embedding_model(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_generation_model() -> String {
    "gpt-4o".to_string()
}

fn default_judge_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub engine: Option<EngineConfig>,
    #[serde(default)]
    pub store: Option<StoreConfig>,
    #[serde(default)]
    pub llm: Option<LlmConfig>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub engine: EngineConfig,
    pub store: StoreConfig,
    pub llm: LlmConfig,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            store: StoreConfig::default(),
            llm: LlmConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();

        Self {
            engine: file.engine.unwrap_or_default(),
            store: file.store.unwrap_or_default(),
            llm: file.llm.unwrap_or_default(),
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Handle empty file
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
