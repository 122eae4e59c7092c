//! Configuration loading.
//!
//! Configuration is loaded from TOML with the following resolution order:
//! 1. explicit path (e.g. `--config <path>`)
//! 2. `~/.switchyard/config.toml` (user)
//! 3. `/etc/switchyard/config.toml` (system)
//! 4. built-in defaults
//!
//! API keys never live in the config file; they are read from the
//! provider's environment variable (see [`PROVIDER_ENV_VARS`]).
//!
//! ```toml
//! [cache]
//! ttl_secs = 3600
//! propagation_delay_ms = 50
//!
//! [routing]
//! stickiness = 0.05
//!
//! [backend]
//! provider = "google"
//!
//! [[models]]
//! id = "general"
//! invocation_target = "gemini-2.5-flash"
//! embedding = { complexity = 0.6, code_affinity = 0.5, language_affinity = 0.2, cost_efficiency = 0.9 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::backend::{LlmBackend, backend_from_name};
use crate::cache::CacheConfig;
use crate::catalog::ModelDescriptor;
use crate::orchestrator::SwitchyardBuilder;
use crate::router::RoutingWeights;
use crate::{Result, Switchyard, SwitchyardError};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub routing: RoutingWeights,
    #[serde(default)]
    pub backend: BackendSettings,
    /// Catalog override. The built-in catalog is used when absent.
    #[serde(default)]
    pub models: Option<Vec<ModelDescriptor>>,
}

/// Cache section.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Time-to-live in seconds (default: 3600).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Maximum entries per tier (default: 10,000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    /// Hot-to-warm propagation delay in milliseconds (default: 50).
    #[serde(default = "default_propagation_delay_ms")]
    pub propagation_delay_ms: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
            propagation_delay_ms: default_propagation_delay_ms(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_max_entries() -> u64 {
    10_000
}

fn default_propagation_delay_ms() -> u64 {
    50
}

impl From<CacheSettings> for CacheConfig {
    fn from(settings: CacheSettings) -> Self {
        CacheConfig::new()
            .ttl(Duration::from_secs(settings.ttl_secs))
            .max_entries(settings.max_entries)
            .propagation_delay(Duration::from_millis(settings.propagation_delay_ms))
    }
}

/// Backend section.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    /// Provider name: google, openrouter, anthropic, openai or ollama
    /// (default: google).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Base URL override (Ollama or self-hosted gateways).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 120).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_provider() -> String {
    "google".to_string()
}

fn default_timeout() -> u64 {
    120
}

/// Provider name → environment variable holding its API key.
pub const PROVIDER_ENV_VARS: &[(&str, &str)] = &[
    ("google", "GOOGLE_API_KEY"),
    ("gemini", "GOOGLE_API_KEY"),
    ("openrouter", "OPENROUTER_API_KEY"),
    ("anthropic", "ANTHROPIC_API_KEY"),
    ("openai", "OPENAI_API_KEY"),
];

/// The environment variable holding `provider`'s API key, matched
/// case-insensitively. `None` for keyless or unknown providers.
pub fn api_key_var(provider: &str) -> Option<&'static str> {
    PROVIDER_ENV_VARS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(provider))
        .map(|(_, var)| *var)
}

impl Config {
    /// Load configuration from the standard locations, falling back to
    /// defaults when no file exists.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SwitchyardError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::parse(&content).map_err(|e| match e {
            SwitchyardError::Configuration(msg) => {
                SwitchyardError::Configuration(format!("{path:?}: {msg}"))
            }
            other => other,
        })
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            SwitchyardError::Configuration(format!("Failed to parse config: {e}"))
        })
    }

    /// Resolve the config file path. An explicit path must exist.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(SwitchyardError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".switchyard").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/switchyard/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// API key for the configured provider, from its environment variable.
    pub fn api_key(&self) -> Option<String> {
        api_key_var(&self.backend.provider)
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty())
    }

    /// A builder with everything but the backend applied.
    pub fn builder(&self) -> SwitchyardBuilder {
        let mut builder = Switchyard::builder()
            .weights(self.routing)
            .cache(self.cache.clone().into());
        if let Some(ref models) = self.models {
            builder = builder.models(models.clone());
        }
        builder
    }

    /// The llm-crate backend described by the `[backend]` section.
    ///
    /// Every provider except Ollama needs its API key in the environment.
    pub fn llm_backend(&self) -> Result<LlmBackend> {
        let settings = &self.backend;
        let backend = backend_from_name(&settings.provider)?;
        let is_ollama = settings.provider.eq_ignore_ascii_case("ollama");

        let api_key = self.api_key();
        if api_key.is_none() && !is_ollama {
            return Err(SwitchyardError::Configuration(format!(
                "no API key for provider '{}'",
                settings.provider
            )));
        }

        let mut llm = LlmBackend::new(backend, api_key, settings.provider.clone())
            .timeout_secs(settings.timeout_secs);
        if let Some(ref url) = settings.base_url {
            llm = llm.base_url(url.clone());
        }
        Ok(llm)
    }
}
