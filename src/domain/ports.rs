use crate::domain::model::{Coordinates, ForecastPeriod, FunctionTool, Location, Run, ToolOutput};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn openai_base_url(&self) -> &str;
    fn openai_api_key(&self) -> Option<&str>;
    fn model(&self) -> &str;
    fn instructions(&self) -> &str;
    fn assistant_name(&self) -> Option<&str>;
    fn geocode_base_url(&self) -> &str;
    fn weather_base_url(&self) -> &str;
    fn user_agent(&self) -> &str;
    fn request_timeout(&self) -> Duration;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn locate(&self, location: &Location) -> Result<Coordinates>;
}

#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// The first (current) hourly forecast period at the given point.
    async fn current_period(&self, coordinates: Coordinates) -> Result<ForecastPeriod>;
}

/// Answers a run that paused in `requires_action`.
#[async_trait]
pub trait RequiredActionHandler: Send + Sync {
    fn tools(&self) -> Vec<FunctionTool>;
    async fn handle_requires_action(&self, run: &Run) -> Vec<ToolOutput>;
}
