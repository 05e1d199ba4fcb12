use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A place as the assistant phrases it: "Houston, TX".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub city: String,
    pub state: Option<String>,
}

impl Location {
    pub fn new(city: impl Into<String>, state: Option<String>) -> Self {
        Self {
            city: city.into(),
            state,
        }
    }

    /// Splits on `", "`: first piece is the city, second the state, the rest is dropped.
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split(", ");
        let city = parts.next().unwrap_or_default().to_string();
        let state = parts.next().map(str::to_string);
        Self { city, state }
    }

    /// Geocoder query form, `city,state` or just `city`.
    pub fn query(&self) -> String {
        match &self.state {
            Some(state) => format!("{},{}", self.city, state),
            None => self.city.clone(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            Some(state) => write!(f, "{}, {}", self.city, state),
            None => f.write_str(&self.city),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// One entry of `properties.periods` in an hourly forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub start_time: Option<DateTime<FixedOffset>>,
    pub temperature: i64,
    #[serde(default = "default_temperature_unit")]
    pub temperature_unit: String,
    #[serde(default)]
    pub short_forecast: Option<String>,
}

fn default_temperature_unit() -> String {
    "F".to_string()
}

// Assistants API wire types.

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionTool {
    pub r#type: String,
    pub function: FunctionDefinition,
}

impl FunctionTool {
    pub fn new(function: FunctionDefinition) -> Self {
        Self {
            r#type: "function".to_string(),
            function,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded argument object, exactly as the model produced it.
    pub arguments: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub id: String,
    #[serde(default)]
    pub r#type: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitToolOutputs {
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredAction {
    pub r#type: String,
    #[serde(default)]
    pub submit_tool_outputs: SubmitToolOutputs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub thread_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub required_action: Option<RequiredAction>,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

impl Run {
    pub fn tool_calls(&self) -> &[ToolCall] {
        self.required_action
            .as_ref()
            .map(|action| action.submit_tool_outputs.tool_calls.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assistant {
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextDelta {
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageContentDelta {
    #[serde(default)]
    pub index: usize,
    pub r#type: String,
    #[serde(default)]
    pub text: Option<TextDelta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageDeltaBody {
    #[serde(default)]
    pub content: Vec<MessageContentDelta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDelta {
    pub id: String,
    #[serde(default)]
    pub delta: MessageDeltaBody,
}

impl MessageDelta {
    /// Concatenated text of all text parts in this delta.
    pub fn text(&self) -> String {
        self.delta
            .content
            .iter()
            .filter_map(|part| part.text.as_ref().and_then(|t| t.value.as_deref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parse_city_and_state() {
        let location = Location::parse("Houston, TX");
        assert_eq!(location.city, "Houston");
        assert_eq!(location.state.as_deref(), Some("TX"));
        assert_eq!(location.query(), "Houston,TX");
    }

    #[test]
    fn test_location_parse_city_only() {
        let location = Location::parse("Paris");
        assert_eq!(location, Location::new("Paris", None));
        assert_eq!(location.query(), "Paris");
    }

    #[test]
    fn test_location_parse_drops_extra_pieces() {
        let location = Location::parse("Springfield, IL, USA");
        assert_eq!(location.query(), "Springfield,IL");
    }

    #[test]
    fn test_location_parse_requires_space_after_comma() {
        let location = Location::parse("Houston,TX");
        assert_eq!(location.city, "Houston,TX");
        assert!(location.state.is_none());
    }

    #[test]
    fn test_coordinates_display() {
        assert_eq!(Coordinates::new(29.76328, -95.36327).to_string(), "29.76328,-95.36327");
    }

    #[test]
    fn test_forecast_period_decodes_weather_gov_fields() {
        let period: ForecastPeriod = serde_json::from_value(serde_json::json!({
            "number": 1,
            "startTime": "2024-06-01T14:00:00-05:00",
            "temperature": 91,
            "temperatureUnit": "F",
            "shortForecast": "Sunny"
        }))
        .unwrap();

        assert_eq!(period.temperature, 91);
        assert_eq!(period.short_forecast.as_deref(), Some("Sunny"));
        assert!(period.start_time.is_some());
    }

    #[test]
    fn test_run_tool_calls() {
        let run: Run = serde_json::from_value(serde_json::json!({
            "id": "run_1",
            "thread_id": "thread_1",
            "status": "requires_action",
            "required_action": {
                "type": "submit_tool_outputs",
                "submit_tool_outputs": {
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "get_temperature", "arguments": "{\"location\":\"Houston, TX\"}"}
                    }]
                }
            }
        }))
        .unwrap();

        assert_eq!(run.tool_calls().len(), 1);
        assert_eq!(run.tool_calls()[0].function.name, "get_temperature");
    }

    #[test]
    fn test_message_delta_text() {
        let delta: MessageDelta = serde_json::from_value(serde_json::json!({
            "id": "msg_1",
            "delta": {"content": [
                {"index": 0, "type": "text", "text": {"value": "It is "}},
                {"index": 1, "type": "text", "text": {"value": "91°F."}}
            ]}
        }))
        .unwrap();

        assert_eq!(delta.text(), "It is 91°F.");
    }
}
