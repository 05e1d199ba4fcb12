// Adapters layer: HTTP clients for the geocoder, the weather service and the assistant API.

pub mod events;
pub mod geocode;
pub mod openai;
pub mod weather_gov;

use crate::core::ConfigProvider;
use crate::utils::error::{BotError, Result};
use reqwest::Client;
use url::Url;

pub use events::{AssistantEvent, RunEventStream};
pub use geocode::GeocodeXyzClient;
pub use openai::AssistantClient;
pub use weather_gov::WeatherGovClient;

/// Shared client with the configured request timeout.
pub fn http_client<C: ConfigProvider>(config: &C) -> Result<Client> {
    let client = Client::builder().timeout(config.request_timeout()).build()?;
    Ok(client)
}

/// Client for the assistant API. Runs stream for as long as the model talks, so there is
/// no total timeout; connecting and each read are bounded instead.
pub fn streaming_http_client<C: ConfigProvider>(config: &C) -> Result<Client> {
    let client = Client::builder()
        .connect_timeout(config.request_timeout())
        .read_timeout(config.request_timeout())
        .build()?;
    Ok(client)
}

/// Appends percent-encoded path segments to `base`, keeping any base path.
pub(crate) fn join_segments(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| BotError::InvalidConfigValueError {
                field: "base_url".to_string(),
                value: base.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}
