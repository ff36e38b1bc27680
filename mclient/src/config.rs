//! Configuration resolution: settings in, a validated provider profile out.
//!
//! ```rust
//! use mclient::Settings;
//!
//! let config = Settings::new()
//!     .with_provider("ollama")
//!     .with_timeout_secs(10)
//!     .resolve()
//!     .expect("local provider needs no credential");
//!
//! assert_eq!(config.model, "llama3");
//! assert_eq!(config.timeout.as_secs(), 10);
//! ```

use std::time::Duration;

use mprovider::{ProviderId, SecretString};

use crate::error::ClientError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

pub const ENV_PROVIDER: &str = "LLM_PROVIDER";
pub const ENV_MODEL: &str = "LLM_MODEL";
pub const ENV_TIMEOUT: &str = "LLM_TIMEOUT";
pub const ENV_TEMPERATURE: &str = "LLM_TEMPERATURE";
pub const ENV_OLLAMA_BASE_URL: &str = "OLLAMA_BASE_URL";
pub const ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";

/// Fixed per-provider defaults consulted by the resolver.
///
/// Hosted providers carry no endpoint here; their base URLs are owned by
/// the adapters. Only the local provider accepts an endpoint override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderProfile {
    pub provider: ProviderId,
    pub default_model: &'static str,
    pub credential_env: Option<&'static str>,
    pub default_endpoint: Option<&'static str>,
}

pub fn profile(provider: ProviderId) -> ProviderProfile {
    match provider {
        ProviderId::Ollama => ProviderProfile {
            provider,
            default_model: "llama3",
            credential_env: None,
            default_endpoint: Some("http://localhost:11434"),
        },
        ProviderId::Gemini => ProviderProfile {
            provider,
            default_model: "gemini-1.5-flash",
            credential_env: Some(ENV_GOOGLE_API_KEY),
            default_endpoint: None,
        },
        ProviderId::OpenAi => ProviderProfile {
            provider,
            default_model: "gpt-4o-mini",
            credential_env: Some(ENV_OPENAI_API_KEY),
            default_endpoint: None,
        },
        ProviderId::Anthropic => ProviderProfile {
            provider,
            default_model: "claude-3-haiku",
            credential_env: Some(ENV_ANTHROPIC_API_KEY),
            default_endpoint: None,
        },
    }
}

/// Maps a provider name to its identifier. Names are matched
/// case-insensitively and common aliases are accepted; anything outside the
/// supported set is rejected.
pub fn parse_provider(name: &str) -> Result<ProviderId, ClientError> {
    let provider = match name.trim().to_ascii_lowercase().as_str() {
        "ollama" | "local" => Some(ProviderId::Ollama),
        "gemini" | "google" => Some(ProviderId::Gemini),
        "openai" | "gpt" => Some(ProviderId::OpenAi),
        "anthropic" | "claude" => Some(ProviderId::Anthropic),
        _ => None,
    };
    provider.ok_or_else(|| {
        ClientError::invalid_provider(format!(
            "unsupported provider '{name}', expected one of ollama, gemini, openai, anthropic"
        ))
    })
}

/// A warning recorded while resolving configuration. Bad numeric settings
/// fall back to defaults instead of failing the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub setting: String,
    pub message: String,
}

impl ConfigWarning {
    pub fn new(setting: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            setting: setting.into(),
            message: message.into(),
        }
    }
}

/// Raw, unvalidated settings as they arrive from the environment or an
/// explicit override. Every field is optional; `resolve` applies the
/// per-provider defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub timeout: Option<String>,
    pub temperature: Option<String>,
    pub endpoint: Option<String>,
    pub google_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the process environment. Blank values count as unset.
    pub fn from_env() -> Self {
        Self {
            provider: read_env(ENV_PROVIDER),
            model: read_env(ENV_MODEL),
            timeout: read_env(ENV_TIMEOUT),
            temperature: read_env(ENV_TEMPERATURE),
            endpoint: read_env(ENV_OLLAMA_BASE_URL),
            google_api_key: read_env(ENV_GOOGLE_API_KEY),
            openai_api_key: read_env(ENV_OPENAI_API_KEY),
            anthropic_api_key: read_env(ENV_ANTHROPIC_API_KEY),
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(secs.to_string());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature.to_string());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_google_api_key(mut self, key: impl Into<String>) -> Self {
        self.google_api_key = Some(key.into());
        self
    }

    pub fn with_openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = Some(key.into());
        self
    }

    pub fn with_anthropic_api_key(mut self, key: impl Into<String>) -> Self {
        self.anthropic_api_key = Some(key.into());
        self
    }

    /// Fills any unset field from `fallback`. Used to layer explicit
    /// overrides on top of environment values.
    pub fn or(self, fallback: Settings) -> Settings {
        Settings {
            provider: self.provider.or(fallback.provider),
            model: self.model.or(fallback.model),
            timeout: self.timeout.or(fallback.timeout),
            temperature: self.temperature.or(fallback.temperature),
            endpoint: self.endpoint.or(fallback.endpoint),
            google_api_key: self.google_api_key.or(fallback.google_api_key),
            openai_api_key: self.openai_api_key.or(fallback.openai_api_key),
            anthropic_api_key: self.anthropic_api_key.or(fallback.anthropic_api_key),
        }
    }

    /// Validates the settings into an immutable configuration.
    ///
    /// Fails fast on an unknown provider, a missing credential, or a
    /// malformed endpoint override. Bad timeout or temperature values
    /// fall back to defaults and record a [`ConfigWarning`] instead.
    /// Performs no network I/O.
    pub fn resolve(&self) -> Result<ResolvedConfig, ClientError> {
        let mut warnings = Vec::new();

        let provider = match self.provider.as_deref() {
            None => ProviderId::Ollama,
            Some(name) if name.trim().is_empty() => ProviderId::Ollama,
            Some(name) => parse_provider(name)?,
        };
        let profile = profile(provider);

        let model = self
            .model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(profile.default_model)
            .to_string();

        let timeout = resolve_timeout(self.timeout.as_deref(), &mut warnings);
        let temperature = resolve_temperature(self.temperature.as_deref(), &mut warnings);

        let endpoint = match provider {
            ProviderId::Ollama => match self.endpoint.as_deref() {
                Some(raw) => Some(validate_endpoint(raw)?),
                None => profile.default_endpoint.map(str::to_string),
            },
            _ => None,
        };

        let credential = match profile.credential_env {
            None => None,
            Some(key) => {
                let value = self
                    .credential_for(provider)
                    .map(str::trim)
                    .filter(|value| !value.is_empty());
                match value {
                    Some(value) => Some(SecretString::new(value)),
                    None => {
                        return Err(ClientError::missing_credential(format!(
                            "the {provider} provider requires {key} to be set"
                        )));
                    }
                }
            }
        };

        Ok(ResolvedConfig {
            provider,
            model,
            timeout,
            temperature,
            endpoint,
            credential,
            warnings,
        })
    }

    fn credential_for(&self, provider: ProviderId) -> Option<&str> {
        match provider {
            ProviderId::Ollama => None,
            ProviderId::Gemini => self.google_api_key.as_deref(),
            ProviderId::OpenAi => self.openai_api_key.as_deref(),
            ProviderId::Anthropic => self.anthropic_api_key.as_deref(),
        }
    }
}

/// The validated, immutable output of [`Settings::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub provider: ProviderId,
    pub model: String,
    pub timeout: Duration,
    pub temperature: f32,
    /// Local-provider endpoint; `None` for hosted providers.
    pub endpoint: Option<String>,
    pub credential: Option<SecretString>,
    pub warnings: Vec<ConfigWarning>,
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn resolve_timeout(raw: Option<&str>, warnings: &mut Vec<ConfigWarning>) -> Duration {
    let fallback = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
    let Some(raw) = raw else {
        return fallback;
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        Ok(_) => {
            warnings.push(ConfigWarning::new(
                ENV_TIMEOUT,
                format!("timeout must be greater than zero, using {DEFAULT_TIMEOUT_SECS}s"),
            ));
            fallback
        }
        Err(_) => {
            warnings.push(ConfigWarning::new(
                ENV_TIMEOUT,
                format!(
                    "timeout '{raw}' is not a whole number of seconds, using {DEFAULT_TIMEOUT_SECS}s"
                ),
            ));
            fallback
        }
    }
}

fn resolve_temperature(raw: Option<&str>, warnings: &mut Vec<ConfigWarning>) -> f32 {
    let Some(raw) = raw else {
        return DEFAULT_TEMPERATURE;
    };
    match raw.trim().parse::<f32>() {
        Ok(value) if (0.0..=2.0).contains(&value) => value,
        Ok(value) => {
            warnings.push(ConfigWarning::new(
                ENV_TEMPERATURE,
                format!("temperature {value} is outside 0.0..=2.0, using {DEFAULT_TEMPERATURE}"),
            ));
            DEFAULT_TEMPERATURE
        }
        Err(_) => {
            warnings.push(ConfigWarning::new(
                ENV_TEMPERATURE,
                format!("temperature '{raw}' is not a number, using {DEFAULT_TEMPERATURE}"),
            ));
            DEFAULT_TEMPERATURE
        }
    }
}

fn validate_endpoint(raw: &str) -> Result<String, ClientError> {
    let raw = raw.trim();
    let url = reqwest::Url::parse(raw).map_err(|err| {
        ClientError::invalid_value(format!("{ENV_OLLAMA_BASE_URL} '{raw}' is not a valid URL: {err}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::invalid_value(format!(
            "{ENV_OLLAMA_BASE_URL} must use http or https, got '{}'",
            url.scheme()
        )));
    }
    Ok(raw.trim_end_matches('/').to_string())
}
