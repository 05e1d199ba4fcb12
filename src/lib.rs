pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::BotConfig;
pub use crate::core::session::{AssistantSession, SessionSummary};
pub use crate::core::temperature::TemperatureService;
pub use crate::core::tool_handler::ToolCallHandler;
pub use crate::utils::error::{BotError, Result};
