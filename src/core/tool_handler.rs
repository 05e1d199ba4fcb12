use crate::core::temperature::TemperatureService;
use crate::core::{
    ForecastProvider, FunctionDefinition, FunctionTool, Geocoder, Location,
    RequiredActionHandler, Run, ToolCall, ToolOutput,
};
use crate::utils::error::{BotError, Result};
use async_trait::async_trait;
use serde::Deserialize;

pub const GET_TEMPERATURE: &str = "get_temperature";

/// Rendered in place of a temperature when the lookup failed.
pub const ABSENT_OUTPUT: &str = "None";

pub fn get_temperature_tool() -> FunctionTool {
    FunctionTool::new(FunctionDefinition {
        name: GET_TEMPERATURE.to_string(),
        description: "Get the current temperature for a specific location".to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city and state, e.g., San Francisco, CA"
                }
            },
            "required": ["location"]
        }),
    })
}

#[derive(Debug, Deserialize)]
struct TemperatureArgs {
    location: String,
}

fn parse_location(arguments: &str) -> Result<Location> {
    let args: TemperatureArgs =
        serde_json::from_str(arguments).map_err(|e| BotError::ToolArgumentError {
            message: format!("{}: {}", GET_TEMPERATURE, e),
        })?;
    Ok(Location::parse(&args.location))
}

pub fn format_temperature(temperature: Option<i64>) -> String {
    temperature
        .map(|t| t.to_string())
        .unwrap_or_else(|| ABSENT_OUTPUT.to_string())
}

/// Dispatches `get_temperature` calls to a [`TemperatureService`].
pub struct ToolCallHandler<G: Geocoder, F: ForecastProvider> {
    temperature: TemperatureService<G, F>,
}

impl<G: Geocoder, F: ForecastProvider> ToolCallHandler<G, F> {
    pub fn new(temperature: TemperatureService<G, F>) -> Self {
        Self { temperature }
    }

    /// Output for a single call, or `None` for tools this handler does not own.
    pub async fn handle_tool_call(&self, call: &ToolCall) -> Option<ToolOutput> {
        if call.function.name != GET_TEMPERATURE {
            tracing::warn!("Skipping unknown tool {} ({})", call.function.name, call.id);
            return None;
        }

        let output = match parse_location(&call.function.arguments) {
            Ok(location) => {
                tracing::info!("🌡️ Looking up temperature for {}", location);
                format_temperature(self.temperature.get_temperature(&location).await)
            }
            Err(e) => {
                tracing::error!("{} (arguments: {})", e, call.function.arguments);
                ABSENT_OUTPUT.to_string()
            }
        };

        Some(ToolOutput {
            tool_call_id: call.id.clone(),
            output,
        })
    }
}

#[async_trait]
impl<G: Geocoder, F: ForecastProvider> RequiredActionHandler for ToolCallHandler<G, F> {
    fn tools(&self) -> Vec<FunctionTool> {
        vec![get_temperature_tool()]
    }

    async fn handle_requires_action(&self, run: &Run) -> Vec<ToolOutput> {
        let mut tool_outputs = Vec::new();
        for call in run.tool_calls() {
            if let Some(output) = self.handle_tool_call(call).await {
                tool_outputs.push(output);
            }
        }
        tool_outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Coordinates, ForecastPeriod, FunctionCall};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingGeocoder {
        seen: Arc<Mutex<Vec<Location>>>,
    }

    #[async_trait]
    impl Geocoder for RecordingGeocoder {
        async fn locate(&self, location: &Location) -> Result<Coordinates> {
            self.seen.lock().unwrap().push(location.clone());
            if location.city == "Atlantis" {
                return Err(BotError::MissingField {
                    service: "geocode.xyz".to_string(),
                    field: "latt".to_string(),
                });
            }
            Ok(Coordinates::new(29.76328, -95.36327))
        }
    }

    struct Sunny;

    #[async_trait]
    impl ForecastProvider for Sunny {
        async fn current_period(&self, _coordinates: Coordinates) -> Result<ForecastPeriod> {
            Ok(ForecastPeriod {
                number: 1,
                start_time: None,
                temperature: 72,
                temperature_unit: "F".to_string(),
                short_forecast: Some("Sunny".to_string()),
            })
        }
    }

    fn call(id: &str, name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            r#type: "function".to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        }
    }

    fn run_with(calls: Vec<ToolCall>) -> Run {
        serde_json::from_value(serde_json::json!({
            "id": "run_1",
            "thread_id": "thread_1",
            "status": "requires_action",
            "required_action": {
                "type": "submit_tool_outputs",
                "submit_tool_outputs": {"tool_calls": calls}
            }
        }))
        .unwrap()
    }

    fn handler() -> (ToolCallHandler<RecordingGeocoder, Sunny>, Arc<Mutex<Vec<Location>>>) {
        let geocoder = RecordingGeocoder::default();
        let seen = geocoder.seen.clone();
        (ToolCallHandler::new(TemperatureService::new(geocoder, Sunny)), seen)
    }

    #[test]
    fn test_tool_declaration() {
        let tool = get_temperature_tool();
        assert_eq!(tool.r#type, "function");
        assert_eq!(tool.function.name, "get_temperature");
        assert_eq!(tool.function.parameters["required"][0], "location");
    }

    #[test]
    fn test_format_temperature() {
        assert_eq!(format_temperature(Some(72)), "72");
        assert_eq!(format_temperature(Some(-4)), "-4");
        assert_eq!(format_temperature(None), "None");
    }

    #[tokio::test]
    async fn test_handles_temperature_call() {
        let (handler, seen) = handler();
        let run = run_with(vec![call("call_1", GET_TEMPERATURE, r#"{"location": "Houston, TX"}"#)]);

        let outputs = handler.handle_requires_action(&run).await;

        assert_eq!(
            outputs,
            vec![ToolOutput {
                tool_call_id: "call_1".to_string(),
                output: "72".to_string(),
            }]
        );
        assert_eq!(*seen.lock().unwrap(), vec![Location::new("Houston", Some("TX".to_string()))]);
    }

    #[tokio::test]
    async fn test_failed_lookup_outputs_none() {
        let (handler, _) = handler();
        let run = run_with(vec![call("call_1", GET_TEMPERATURE, r#"{"location": "Atlantis"}"#)]);

        let outputs = handler.handle_requires_action(&run).await;

        assert_eq!(outputs[0].output, "None");
    }

    #[tokio::test]
    async fn test_unknown_tools_are_skipped() {
        let (handler, seen) = handler();
        let run = run_with(vec![
            call("call_1", "get_humidity", r#"{"location": "Houston, TX"}"#),
            call("call_2", GET_TEMPERATURE, r#"{"location": "Austin, TX"}"#),
        ]);

        let outputs = handler.handle_requires_action(&run).await;

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].tool_call_id, "call_2");
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_arguments_output_none() {
        let (handler, seen) = handler();
        let run = run_with(vec![call("call_1", GET_TEMPERATURE, r#"{"city": "Houston"}"#)]);

        let outputs = handler.handle_requires_action(&run).await;

        assert_eq!(outputs[0].output, ABSENT_OUTPUT);
        assert!(seen.lock().unwrap().is_empty());
    }
}
