use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration for the caseload services.
///
/// Every section falls back to its defaults when missing, so a config file
/// only needs the values it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

/// Which embedding backend turns text into vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Uniform random vectors. No semantic meaning; stands in for a real model.
    Random {
        /// Seed for reproducible vectors. Unseeded runs draw from the OS.
        #[serde(default)]
        seed: Option<u64>,
    },
    /// An Ollama-compatible `/api/embed` endpoint.
    Ollama { base_url: String, model: String },
}

impl Default for EmbeddingBackend {
    fn default() -> Self {
        Self::Random { seed: None }
    }
}

/// Configuration for embedding generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub backend: EmbeddingBackend,
    /// Length of every embedding vector
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

/// Configuration for similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of documents returned for a question
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Text the assistant answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Reply sent for every successful chat turn
    #[serde(default = "default_reply")]
    pub reply: String,
    /// Shown to the user in place of a failed reply
    #[serde(default = "default_apology")]
    pub apology: String,
}

fn default_dimension() -> usize {
    1536
}

fn default_top_k() -> usize {
    3
}

fn default_reply() -> String {
    "I've analyzed your question and found some relevant documents. \
     Based on the available information, I can help provide guidance on this topic. \
     Let me know if you'd like more specific details from the related documents I found."
        .to_string()
}

fn default_apology() -> String {
    "I apologize, but I encountered an error. Please try again.".to_string()
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            dimension: default_dimension(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            reply: default_reply(),
            apology: default_apology(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `config.yaml` if it exists, otherwise use defaults.
    pub fn load_or_default() -> Self {
        Self::load("config.yaml").unwrap_or_default()
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the configuration to `path` as YAML.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.embedding.dimension == 0 {
            return Err(ConfigError::Invalid(
                "embedding.dimension must be greater than zero".to_string(),
            ));
        }
        if self.retrieval.top_k == 0 {
            return Err(ConfigError::Invalid(
                "retrieval.top_k must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.embedding.dimension, 1536);
        assert_eq!(config.embedding.backend, EmbeddingBackend::Random { seed: None });
        assert_eq!(config.retrieval.top_k, 3);
        assert!(config.assistant.apology.starts_with("I apologize"));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "retrieval:\n  top_k: 5\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.embedding, EmbeddingConfig::default());
        assert_eq!(config.assistant, AssistantConfig::default());
    }

    #[test]
    fn test_ollama_backend_yaml() {
        let yaml = r#"
embedding:
  backend:
    kind: ollama
    base_url: http://localhost:11434
    model: nomic-embed-text
  dimension: 768
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.embedding.dimension, 768);
        assert_eq!(
            config.embedding.backend,
            EmbeddingBackend::Ollama {
                base_url: "http://localhost:11434".to_string(),
                model: "nomic-embed-text".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_zero_top_k() {
        let err = Config::from_yaml("retrieval:\n  top_k: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let mut config = Config::default();
        config.embedding.backend = EmbeddingBackend::Random { seed: Some(7) };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/caseload.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_)));
    }
}
