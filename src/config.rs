use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Legalens server.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the vector store instance holding document embeddings.
    pub store_url: String,
    /// Name of the collection used for document embeddings.
    pub store_collection_name: String,
    /// Optional API key required to access the vector store.
    pub store_api_key: Option<String>,
    /// Dimensionality of the produced embedding vectors.
    pub embedding_dimension: usize,
    /// Chat-completions endpoint used by the generative QA backend.
    pub completion_url: String,
    /// Model identifier sent to the completion endpoint.
    pub completion_model: String,
    /// Optional bearer token for the completion endpoint.
    pub completion_api_key: Option<String>,
    /// Endpoint serving the regulatory-update feed.
    pub regulatory_feed_url: String,
    /// Backend used to answer questions about a loaded document.
    pub qa_backend: QaBackendKind,
    /// Number of sentences selected for extractive summaries.
    pub summary_sentence_count: usize,
    /// Number of stored passages retrieved as grounding context.
    pub retrieval_limit: usize,
    /// Timeout in seconds applied to every outbound HTTP request.
    pub request_timeout_secs: u64,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

/// Supported question-answering strategies.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QaBackendKind {
    /// Select the best-supported answer span directly from the document.
    Extractive,
    /// Retrieve stored passages and forward a grounded prompt to the
    /// completion endpoint.
    Generative,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            store_url: load_env("VECTOR_STORE_URL")?,
            store_collection_name: load_env("VECTOR_STORE_COLLECTION")?,
            store_api_key: load_env_optional("VECTOR_STORE_API_KEY"),
            embedding_dimension: load_env("EMBEDDING_DIMENSION")?
                .parse()
                .map_err(|_| ConfigError::InvalidValue("EMBEDDING_DIMENSION".to_string()))?,
            completion_url: load_env("COMPLETION_URL")?,
            completion_model: load_env("COMPLETION_MODEL")?,
            completion_api_key: load_env_optional("COMPLETION_API_KEY"),
            regulatory_feed_url: load_env("REGULATORY_FEED_URL")?,
            qa_backend: load_env_optional("QA_BACKEND")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("QA_BACKEND".to_string()))
                })
                .transpose()?
                .unwrap_or(QaBackendKind::Generative),
            summary_sentence_count: parse_optional("SUMMARY_SENTENCE_COUNT", 5)?,
            retrieval_limit: parse_optional("RETRIEVAL_LIMIT", 4)?,
            request_timeout_secs: parse_optional("REQUEST_TIMEOUT_SECS", 30)?,
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match load_env_optional(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

impl std::str::FromStr for QaBackendKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "extractive" => Ok(Self::Extractive),
            "generative" => Ok(Self::Generative),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        store_url = %config.store_url,
        collection = %config.store_collection_name,
        qa_backend = ?config.qa_backend,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
