use crate::adapters::join_segments;
use crate::core::{Coordinates, ForecastPeriod, ForecastProvider};
use crate::utils::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use serde_json::Value;

const SERVICE: &str = "api.weather.gov";

/// National Weather Service client: points lookup, then the hourly forecast it links to.
#[derive(Debug, Clone)]
pub struct WeatherGovClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl WeatherGovClient {
    pub fn new(client: Client, base_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            user_agent: user_agent.into(),
        }
    }

    /// `properties.forecastHourly` of the forecast point covering `coordinates`.
    pub async fn forecast_hourly_url(&self, coordinates: Coordinates) -> Result<String> {
        let url = join_segments(&self.base_url, &["points", &coordinates.to_string()])?;
        let body = self.get_json(url.as_str(), "Points request failed").await?;

        body.pointer("/properties/forecastHourly")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BotError::MissingField {
                service: SERVICE.to_string(),
                field: "properties.forecastHourly".to_string(),
            })
    }

    pub async fn first_hourly_period(&self, forecast_hourly_url: &str) -> Result<ForecastPeriod> {
        let body = self
            .get_json(forecast_hourly_url, "Hourly forecast request failed")
            .await?;

        let period = body
            .pointer("/properties/periods/0")
            .cloned()
            .ok_or_else(|| BotError::MissingField {
                service: SERVICE.to_string(),
                field: "properties.periods[0]".to_string(),
            })?;

        Ok(serde_json::from_value(period)?)
    }

    async fn get_json(&self, url: &str, failure: &str) -> Result<Value> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(BotError::UnexpectedStatus {
                service: SERVICE.to_string(),
                status: status.as_u16(),
                message: failure.to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ForecastProvider for WeatherGovClient {
    async fn current_period(&self, coordinates: Coordinates) -> Result<ForecastPeriod> {
        let forecast_url = self.forecast_hourly_url(coordinates).await?;
        self.first_hourly_period(&forecast_url).await
    }
}
