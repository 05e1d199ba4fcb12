use crate::core::ConfigProvider;
use crate::utils::error::{BotError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_INSTRUCTIONS: &str =
    "You are a weather bot. Use the provided functions to answer questions.";
pub const DEFAULT_QUESTION: &str = "What's the temperature in Houston, TX?";
pub const DEFAULT_GEOCODE_BASE_URL: &str = "https://geocode.xyz";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.weather.gov";
pub const DEFAULT_USER_AGENT: &str = "MyWeatherApp (contact@example.com)";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub assistant: AssistantConfig,
    pub conversation: ConversationConfig,
    pub geocoding: GeocodingConfig,
    pub weather: WeatherConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub instructions: String,
    pub name: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            name: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    pub question: String,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            question: DEFAULT_QUESTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    pub base_url: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODE_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_seconds: 30 }
    }
}

impl BotConfig {
    /// Load from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BotError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML text, substituting `${VAR}` references first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BotError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    // Unset variables are left as written so validation can point at them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BotError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Fill the API key from `OPENAI_API_KEY` when the file leaves it unset or unresolved.
    pub fn with_env_api_key(mut self) -> Self {
        let unresolved = self
            .assistant
            .api_key
            .as_deref()
            .map(|key| key.trim().is_empty() || key.contains("${"))
            .unwrap_or(true);

        if unresolved {
            self.assistant.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        }
        self
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("assistant.api_base_url", &self.assistant.api_base_url)?;
        validation::validate_url("geocoding.base_url", &self.geocoding.base_url)?;
        validation::validate_url("weather.base_url", &self.weather.base_url)?;
        validation::validate_non_empty_string("assistant.model", &self.assistant.model)?;
        validation::validate_non_empty_string("weather.user_agent", &self.weather.user_agent)?;
        validation::validate_non_empty_string("conversation.question", &self.conversation.question)?;
        validation::validate_range("http.timeout_seconds", self.http.timeout_seconds, 1, 300)?;
        Ok(())
    }

    /// The assistant session cannot start without a key; the bare lookup can.
    pub fn require_api_key(&self) -> Result<&str> {
        validation::validate_required_field("assistant.api_key", &self.assistant.api_key)
            .map(String::as_str)
    }
}

impl ConfigProvider for BotConfig {
    fn openai_base_url(&self) -> &str {
        &self.assistant.api_base_url
    }

    fn openai_api_key(&self) -> Option<&str> {
        self.assistant.api_key.as_deref()
    }

    fn model(&self) -> &str {
        &self.assistant.model
    }

    fn instructions(&self) -> &str {
        &self.assistant.instructions
    }

    fn assistant_name(&self) -> Option<&str> {
        self.assistant.name.as_deref()
    }

    fn geocode_base_url(&self) -> &str {
        &self.geocoding.base_url
    }

    fn weather_base_url(&self) -> &str {
        &self.weather.base_url
    }

    fn user_agent(&self) -> &str {
        &self.weather.user_agent
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }
}

impl Validate for BotConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
