use crate::adapters::{http_client, GeocodeXyzClient, WeatherGovClient};
use crate::core::{ConfigProvider, Coordinates, ForecastProvider, Geocoder, Location};
use crate::utils::error::Result;

/// Location → coordinates → current hourly temperature.
///
/// Every failure along the chain is logged and turns into `None`; nothing is retried.
pub struct TemperatureService<G: Geocoder, F: ForecastProvider> {
    geocoder: G,
    forecast: F,
}

impl<G: Geocoder, F: ForecastProvider> TemperatureService<G, F> {
    pub fn new(geocoder: G, forecast: F) -> Self {
        Self { geocoder, forecast }
    }

    pub async fn get_lat_lon(&self, location: &Location) -> Option<Coordinates> {
        match self.geocoder.locate(location).await {
            Ok(coordinates) => {
                tracing::debug!("{} resolved to {}", location, coordinates);
                Some(coordinates)
            }
            Err(e) => {
                tracing::error!("Could not find latitude and longitude for {}: {}", location, e);
                None
            }
        }
    }

    /// Temperature of the first hourly period, in the unit the service reports (Fahrenheit for NWS).
    pub async fn get_weather_forecast(&self, coordinates: Coordinates) -> Option<i64> {
        match self.forecast.current_period(coordinates).await {
            Ok(period) => {
                tracing::debug!(
                    "Forecast at {}: {}°{} {} (period {}, starting {})",
                    coordinates,
                    period.temperature,
                    period.temperature_unit,
                    period.short_forecast.as_deref().unwrap_or(""),
                    period.number,
                    period
                        .start_time
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "unknown".to_string())
                );
                Some(period.temperature)
            }
            Err(e) => {
                tracing::error!("Forecast lookup failed for {}: {}", coordinates, e);
                None
            }
        }
    }

    pub async fn get_temperature(&self, location: &Location) -> Option<i64> {
        let coordinates = self.get_lat_lon(location).await?;
        self.get_weather_forecast(coordinates).await
    }
}

impl TemperatureService<GeocodeXyzClient, WeatherGovClient> {
    /// geocode.xyz + api.weather.gov, sharing one HTTP client.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = http_client(config)?;
        Ok(Self::new(
            GeocodeXyzClient::new(client.clone(), config.geocode_base_url()),
            WeatherGovClient::new(client, config.weather_base_url(), config.user_agent()),
        ))
    }
}
