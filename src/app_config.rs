use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use url::Url;

/// Application configuration module
///
/// Loads, validates and saves `conf.json`: the log level and the translation
/// profiles (provider, model, credentials, prompt, target language) the
/// editor can switch between.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Name of the profile used for translation
    #[serde(default = "default_active_profile")]
    pub active_profile: String,

    /// Available profiles
    #[serde(default = "default_profiles")]
    pub profiles: Vec<Profile>,
}

/// Language-model provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    // @provider: OpenAI
    #[default]
    OpenAI,
    // @provider: Anthropic
    Anthropic,
}

impl ProviderKind {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }

    pub fn default_model(&self) -> String {
        match self {
            Self::OpenAI => "gpt-4-turbo".to_string(),
            Self::Anthropic => "claude-3-sonnet-latest".to_string(),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// One named translation profile
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Profile {
    // @field: Unique profile name
    pub name: String,

    // @field: Provider type identifier
    #[serde(default)]
    pub provider: ProviderKind,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: OpenAI organization id
    #[serde(default)]
    pub organization_id: Option<String>,

    // @field: API base URL, empty for the public endpoint
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Instructions sent as the system prompt
    #[serde(default = "String::new")]
    pub system_prompt: String,

    // @field: Target language, ISO code or free text
    #[serde(default = "String::new")]
    pub target_language: String,

    // @field: Sampling temperature
    #[serde(default)]
    pub temperature: Option<f32>,

    // @field: Maximum reply tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Profile {
    // @param provider: Provider enum
    // @returns: Profile with provider defaults and no credentials
    pub fn new(name: impl Into<String>, provider: ProviderKind) -> Self {
        Self {
            name: name.into(),
            provider,
            model: provider.default_model(),
            api_key: String::new(),
            organization_id: None,
            endpoint: String::new(),
            system_prompt: String::new(),
            target_language: String::new(),
            temperature: None,
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Model name, falling back to the provider default
    pub fn effective_model(&self) -> String {
        if self.model.trim().is_empty() {
            self.provider.default_model()
        } else {
            self.model.trim().to_string()
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(anyhow!("Profile name must not be empty"));
        }
        if !self.endpoint.trim().is_empty() {
            let url = Url::parse(self.endpoint.trim())
                .with_context(|| format!("Invalid endpoint for profile '{}': {}", self.name, self.endpoint))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(anyhow!(
                    "Endpoint for profile '{}' must use http or https, found '{}'",
                    self.name,
                    url.scheme()
                ));
            }
        }
        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(anyhow!(
                    "Temperature for profile '{}' must be between 0.0 and 2.0, found {}",
                    self.name,
                    temperature
                ));
            }
        }
        if self.max_tokens == 0 {
            return Err(anyhow!("max_tokens for profile '{}' must be positive", self.name));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs for profile '{}' must be positive", self.name));
        }
        Ok(())
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_active_profile() -> String {
    "Profile 1".to_string()
}

fn default_profiles() -> Vec<Profile> {
    let mut french = Profile::new("Profile 1", ProviderKind::OpenAI);
    french.system_prompt = "Translate to French".to_string();
    french.target_language = "French".to_string();

    let mut spanish = Profile::new("Profile 2", ProviderKind::Anthropic);
    spanish.system_prompt = "Translate to Spanish".to_string();
    spanish.target_language = "Spanish".to_string();

    vec![french, spanish]
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for profile in &self.profiles {
            profile.validate()?;
            if !names.insert(profile.name.as_str()) {
                return Err(anyhow!("Duplicate profile name: {}", profile.name));
            }
        }
        if self.active().is_none() {
            return Err(anyhow!("Active profile '{}' is not defined", self.active_profile));
        }
        Ok(())
    }

    /// The active profile
    pub fn active(&self) -> Option<&Profile> {
        self.profile(&self.active_profile)
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn profile_mut(&mut self, name: &str) -> Option<&mut Profile> {
        self.profiles.iter_mut().find(|p| p.name == name)
    }

    /// Load the config file, writing a default one when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        fs::write(path, json).with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            active_profile: default_active_profile(),
            profiles: default_profiles(),
        }
    }
}
