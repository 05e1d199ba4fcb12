use crate::adapters::join_segments;
use crate::core::{Coordinates, Geocoder, Location};
use crate::utils::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

const SERVICE: &str = "geocode.xyz";

/// Forward geocoding through `GET {base}/{city[,state]}?json=1`.
#[derive(Debug, Clone)]
pub struct GeocodeXyzClient {
    client: Client,
    base_url: String,
}

impl GeocodeXyzClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Geocoder for GeocodeXyzClient {
    async fn locate(&self, location: &Location) -> Result<Coordinates> {
        let mut url = join_segments(&self.base_url, &[&location.query()])?;
        url.query_pairs_mut().append_pair("json", "1");

        tracing::debug!("Geocoding {} via {}", location, url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(BotError::UnexpectedStatus {
                service: SERVICE.to_string(),
                status: status.as_u16(),
                message: "Geocoding request failed".to_string(),
            });
        }

        let body: Value = response.json().await?;
        let latitude = coordinate_field(&body, "latt")?;
        let longitude = coordinate_field(&body, "longt")?;

        Ok(Coordinates::new(latitude, longitude))
    }
}

/// geocode.xyz sends coordinates as strings ("29.76328"); plain numbers are accepted too.
fn coordinate_field(body: &Value, field: &str) -> Result<f64> {
    let missing = || BotError::MissingField {
        service: SERVICE.to_string(),
        field: field.to_string(),
    };

    match body.get(field) {
        Some(Value::String(raw)) => raw.trim().parse::<f64>().map_err(|_| missing()),
        Some(Value::Number(number)) => number.as_f64().ok_or_else(missing),
        _ => Err(missing()),
    }
}
