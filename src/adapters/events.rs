use crate::core::{MessageDelta, Run};
use crate::utils::error::{BotError, Result};
use eventsource_stream::{Event, EventStreamError, Eventsource};
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

/// The subset of assistant stream events the session acts on.
#[derive(Debug, Clone)]
pub enum AssistantEvent {
    RunCreated(Run),
    RequiresAction(Run),
    MessageDelta(MessageDelta),
    RunCompleted(Run),
    /// `failed`, `cancelled`, `expired` and `incomplete` runs.
    RunEnded(Run),
    Error(ApiErrorBody),
    Done,
    Other(String),
}

impl AssistantEvent {
    pub fn from_sse(event: &str, data: &str) -> Result<Self> {
        let parsed = match event {
            "thread.run.created" => AssistantEvent::RunCreated(serde_json::from_str(data)?),
            "thread.run.requires_action" => {
                AssistantEvent::RequiresAction(serde_json::from_str(data)?)
            }
            "thread.message.delta" => AssistantEvent::MessageDelta(serde_json::from_str(data)?),
            "thread.run.completed" => AssistantEvent::RunCompleted(serde_json::from_str(data)?),
            "thread.run.failed"
            | "thread.run.cancelled"
            | "thread.run.expired"
            | "thread.run.incomplete" => AssistantEvent::RunEnded(serde_json::from_str(data)?),
            "error" => AssistantEvent::Error(parse_error_body(data)?),
            "done" => AssistantEvent::Done,
            _ if data.trim() == "[DONE]" => AssistantEvent::Done,
            other => AssistantEvent::Other(other.to_string()),
        };
        Ok(parsed)
    }
}

// Error payloads arrive either bare or wrapped in {"error": {...}}.
fn parse_error_body(data: &str) -> Result<ApiErrorBody> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Wrapped { error: ApiErrorBody },
        Bare(ApiErrorBody),
    }

    Ok(match serde_json::from_str::<Wire>(data)? {
        Wire::Wrapped { error } => error,
        Wire::Bare(error) => error,
    })
}

type SseStream = BoxStream<'static, std::result::Result<Event, EventStreamError<reqwest::Error>>>;

/// Server-sent events of one streamed run request.
pub struct RunEventStream {
    inner: SseStream,
}

impl RunEventStream {
    pub fn from_response(response: reqwest::Response) -> Self {
        Self {
            inner: response.bytes_stream().eventsource().boxed(),
        }
    }

    /// Next event, or `None` once the server closes the stream.
    pub async fn next_event(&mut self) -> Result<Option<AssistantEvent>> {
        loop {
            let event = match self.inner.next().await {
                Some(Ok(event)) => event,
                Some(Err(e)) => {
                    return Err(BotError::StreamError {
                        message: format!("SSE parsing error: {}", e),
                    })
                }
                None => return Ok(None),
            };

            if event.event.is_empty() && event.data.trim().is_empty() {
                continue;
            }

            tracing::trace!("Assistant event: {}", event.event);
            return AssistantEvent::from_sse(&event.event, &event.data).map(Some);
        }
    }
}
