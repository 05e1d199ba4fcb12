pub mod toml_config;

pub use toml_config::BotConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "weather-bot")]
#[command(about = "Ask a hosted assistant about the weather, answering its get_temperature tool calls")]
pub struct CliConfig {
    #[arg(long, help = "TOML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Question to ask (default: the config file's conversation.question)")]
    pub question: Option<String>,

    #[arg(long, help = "Model to create the assistant with")]
    pub model: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// File (or defaults), then environment, then command-line overrides.
    pub fn load(&self) -> Result<BotConfig> {
        let mut config = match &self.config {
            Some(path) => BotConfig::from_file(path)?,
            None => BotConfig::default(),
        };

        if let Some(question) = &self.question {
            config.conversation.question = question.clone();
        }
        if let Some(model) = &self.model {
            config.assistant.model = model.clone();
        }

        Ok(config.with_env_api_key())
    }
}
