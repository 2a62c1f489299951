//! Configuration management for paperscout
//!
//! Handles loading, saving, and validating configuration from TOML files.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// arXiv search keywords (quoted, OR-combined)
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Result cap for the arXiv adapter
    #[serde(default = "default_max_arxiv")]
    pub max_arxiv: usize,

    /// Per-topic result cap for the GitHub adapter
    #[serde(default = "default_max_github")]
    pub max_github: usize,

    /// GitHub topics to watch
    #[serde(default = "default_github_topics")]
    pub github_topics: Vec<String>,

    /// Hugging Face adapter configuration
    #[serde(default)]
    pub huggingface: HuggingFaceConfig,

    /// Heuristic interest-score keyword weights
    #[serde(default)]
    pub interest_scoring: InterestScoringConfig,

    /// Scoring oracle (LLM) configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Notification configuration
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Outbound endpoint overrides (useful for tests)
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// HTTP client tuning
    #[serde(default)]
    pub http: HttpConfig,

    /// Paths configuration (internal, not user-editable)
    #[serde(skip)]
    pub paths: PathsConfig,
}

/// Hugging Face adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuggingFaceConfig {
    /// Pipeline tasks for the trending pass
    #[serde(default = "default_hf_tasks")]
    pub tasks: Vec<String>,

    /// Organizations whose official releases are watched
    #[serde(default)]
    pub orgs: Vec<String>,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            tasks: default_hf_tasks(),
            orgs: Vec::new(),
        }
    }
}

/// Keyword weights for the heuristic interest score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestScoringConfig {
    /// +3 per hit
    #[serde(default = "default_scoring_high")]
    pub high: Vec<String>,

    /// +1 per hit
    #[serde(default = "default_scoring_medium")]
    pub medium: Vec<String>,
}

impl Default for InterestScoringConfig {
    fn default() -> Self {
        Self {
            high: default_scoring_high(),
            medium: default_scoring_medium(),
        }
    }
}

/// Scoring oracle configuration (OpenAI-compatible endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Empty string disables the oracle
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    #[serde(default = "default_llm_model")]
    pub model_name: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_llm_base_url(),
            model_name: default_llm_model(),
        }
    }
}

/// Notification configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub email: EmailConfig,
}

/// Email digest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub sender: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub receiver: String,

    #[serde(default)]
    pub smtp_server: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sender: String::new(),
            password: String::new(),
            receiver: String::new(),
            smtp_server: String::new(),
            smtp_port: default_smtp_port(),
        }
    }
}

/// Outbound API endpoints, overridable for testing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_arxiv_endpoint")]
    pub arxiv: String,

    #[serde(default = "default_github_endpoint")]
    pub github: String,

    #[serde(default = "default_huggingface_endpoint")]
    pub huggingface: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            arxiv: default_arxiv_endpoint(),
            github: default_github_endpoint(),
            huggingface: default_huggingface_endpoint(),
        }
    }
}

/// HTTP client tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Hard timeout per request attempt, in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,

    /// Base delay for exponential backoff, in milliseconds
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout_secs(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

/// Resolved filesystem paths
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    pub base_dir: PathBuf,
    pub config_file: PathBuf,
    pub db_file: PathBuf,
    pub snapshot_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let mut config = Self {
            keywords: default_keywords(),
            max_arxiv: default_max_arxiv(),
            max_github: default_max_github(),
            github_topics: default_github_topics(),
            huggingface: HuggingFaceConfig::default(),
            interest_scoring: InterestScoringConfig::default(),
            llm: LlmConfig::default(),
            notification: NotificationConfig::default(),
            endpoints: EndpointsConfig::default(),
            http: HttpConfig::default(),
            paths: PathsConfig::default(),
        };
        config.init_paths(None);
        config
    }
}

impl Config {
    /// Default base directory (~/.paperscout)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".paperscout")
    }

    /// Default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    fn init_paths(&mut self, base_dir: Option<PathBuf>) {
        let base = base_dir.unwrap_or_else(Self::default_base_dir);
        self.paths = PathsConfig {
            config_file: base.join("config.toml"),
            db_file: base.join("items.db"),
            snapshot_file: base.join("snapshot.json"),
            base_dir: base,
        };
    }

    /// Load configuration from a specific file path. Missing file is a
    /// fatal configuration error (the pipeline must not run unconfigured).
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        let base = config_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        config.init_paths(Some(base));
        config.paths.config_file = config_path.to_path_buf();

        config.validate()?;
        Ok(config)
    }

    /// Load from a base directory, falling back to defaults if no config
    /// file exists there yet.
    pub fn load_from(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::default();
        config.init_paths(base_dir);

        if config.paths.config_file.exists() {
            config = Self::load(&config.paths.config_file)?;
        } else {
            debug!("No config file found, using defaults");
        }

        Ok(config)
    }

    /// Save configuration to its config file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.paths.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.paths.config_file, content)?;
        info!("Saved config to {:?}", self.paths.config_file);
        Ok(())
    }

    /// True when the oracle is configured
    pub fn oracle_enabled(&self) -> bool {
        !self.llm.api_key.is_empty()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.keywords.is_empty() {
            return Err(Error::Config("keywords must not be empty".to_string()));
        }

        if self.max_arxiv == 0 {
            return Err(Error::Config("max_arxiv must be positive".to_string()));
        }

        if self.max_github == 0 {
            return Err(Error::Config("max_github must be positive".to_string()));
        }

        if self.http.timeout_secs == 0 {
            return Err(Error::Config(
                "http.timeout_secs must be positive".to_string(),
            ));
        }

        let email = &self.notification.email;
        if email.enabled
            && (email.sender.is_empty() || email.receiver.is_empty() || email.smtp_server.is_empty())
        {
            return Err(Error::Config(
                "notification.email.enabled requires sender, receiver and smtp_server".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(!config.oracle_enabled());
        assert_eq!(config.endpoints.arxiv, "http://export.arxiv.org/api/query");
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.init_paths(Some(tmp.path().to_path_buf()));
        config.keywords = vec!["grasping".to_string()];
        config.max_arxiv = 7;
        config.save().unwrap();

        let loaded = Config::load(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(loaded.keywords, vec!["grasping".to_string()]);
        assert_eq!(loaded.max_arxiv, 7);
        assert_eq!(loaded.paths.db_file, tmp.path().join("items.db"));
    }

    #[test]
    fn test_missing_config_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let err = Config::load(&tmp.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_enabled_email_requires_fields() {
        let mut config = Config::default();
        config.notification.email.enabled = true;
        assert!(config.validate().is_err());

        config.notification.email.sender = "a@example.com".to_string();
        config.notification.email.receiver = "b@example.com".to_string();
        config.notification.email.smtp_server = "smtp.example.com".to_string();
        assert!(config.validate().is_ok());
    }
}
