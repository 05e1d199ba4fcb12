use crate::adapters::{join_segments, RunEventStream};
use crate::core::{Assistant, FunctionTool, Thread, ThreadMessage, ToolOutput};
use crate::utils::error::{BotError, Result};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

const SERVICE: &str = "assistants api";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const BETA_HEADER: (&str, &str) = ("OpenAI-Beta", "assistants=v2");

/// What the assistant is created with.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantSpec {
    pub model: String,
    pub instructions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub tools: Vec<FunctionTool>,
}

/// Thin client over the Assistants endpoints this program uses.
#[derive(Debug, Clone)]
pub struct AssistantClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl AssistantClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Upper bound for the non-streaming calls. Streamed runs rely on the client's read timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn create_assistant(&self, spec: &AssistantSpec) -> Result<Assistant> {
        self.post_json(&["assistants"], spec).await
    }

    pub async fn create_thread(&self) -> Result<Thread> {
        self.post_json(&["threads"], &json!({})).await
    }

    pub async fn create_message(&self, thread_id: &str, content: &str) -> Result<ThreadMessage> {
        self.post_json(
            &["threads", thread_id, "messages"],
            &json!({"role": "user", "content": content}),
        )
        .await
    }

    pub async fn stream_run(&self, thread_id: &str, assistant_id: &str) -> Result<RunEventStream> {
        self.post_stream(
            &["threads", thread_id, "runs"],
            &json!({"assistant_id": assistant_id, "stream": true}),
        )
        .await
    }

    pub async fn submit_tool_outputs_stream(
        &self,
        thread_id: &str,
        run_id: &str,
        tool_outputs: &[ToolOutput],
    ) -> Result<RunEventStream> {
        self.post_stream(
            &["threads", thread_id, "runs", run_id, "submit_tool_outputs"],
            &json!({"tool_outputs": tool_outputs, "stream": true}),
        )
        .await
    }

    fn post(&self, segments: &[&str]) -> Result<RequestBuilder> {
        let url = join_segments(&self.base_url, segments)?;
        tracing::debug!("POST {}", url);
        Ok(self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header(BETA_HEADER.0, BETA_HEADER.1))
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T> {
        let response = self
            .post(segments)?
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    async fn post_stream<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<RunEventStream> {
        let response = self
            .post(segments)?
            .header(ACCEPT, "text/event-stream")
            .json(body)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(RunEventStream::from_response(response))
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(BotError::UnexpectedStatus {
        service: SERVICE.to_string(),
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::AssistantEvent;
    use crate::core::FunctionDefinition;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> AssistantClient {
        AssistantClient::new(Client::new(), server.url("/v1"), "sk-test")
    }

    #[tokio::test]
    async fn test_create_assistant_sends_model_and_headers() {
        let server = MockServer::start();
        let assistant_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/assistants")
                .header("Authorization", "Bearer sk-test")
                .header("OpenAI-Beta", "assistants=v2")
                .json_body_partial(r#"{"model": "gpt-4o", "instructions": "You are a weather bot."}"#);
            then.status(200)
                .json_body(serde_json::json!({"id": "asst_1", "model": "gpt-4o"}));
        });

        let spec = AssistantSpec {
            model: "gpt-4o".to_string(),
            instructions: "You are a weather bot.".to_string(),
            name: None,
            tools: vec![FunctionTool::new(FunctionDefinition {
                name: "get_temperature".to_string(),
                description: "temperature".to_string(),
                parameters: serde_json::json!({"type": "object"}),
            })],
        };

        let assistant = client_for(&server).create_assistant(&spec).await.unwrap();

        assistant_mock.assert();
        assert_eq!(assistant.id, "asst_1");
    }

    #[tokio::test]
    async fn test_create_message_posts_user_role() {
        let server = MockServer::start();
        let message_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/threads/thread_1/messages")
                .json_body(serde_json::json!({"role": "user", "content": "Hello"}));
            then.status(200)
                .json_body(serde_json::json!({"id": "msg_1", "role": "user"}));
        });

        let message = client_for(&server)
            .create_message("thread_1", "Hello")
            .await
            .unwrap();

        message_mock.assert();
        assert_eq!(message.id, "msg_1");
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/threads");
            then.status(401).body(r#"{"error":{"message":"Incorrect API key provided"}}"#);
        });

        let err = client_for(&server).create_thread().await.unwrap_err();

        match err {
            BotError::UnexpectedStatus {
                status, message, ..
            } => {
                assert_eq!(status, 401);
                assert!(message.contains("Incorrect API key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stalled_server_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/threads");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(serde_json::json!({"id": "thread_1"}));
        });

        let started = std::time::Instant::now();
        let err = client_for(&server)
            .with_timeout(Duration::from_millis(500))
            .create_thread()
            .await
            .unwrap_err();

        assert!(matches!(err, BotError::HttpError(ref e) if e.is_timeout()));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_submit_tool_outputs_stream_yields_events() {
        let server = MockServer::start();
        let body = concat!(
            "event: thread.message.delta\n",
            "data: {\"id\":\"msg_1\",\"delta\":{\"content\":[{\"index\":0,\"type\":\"text\",\"text\":{\"value\":\"88F\"}}]}}\n\n",
            "event: done\n",
            "data: [DONE]\n\n",
        );
        let submit_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/threads/thread_1/runs/run_1/submit_tool_outputs")
                .json_body(serde_json::json!({
                    "tool_outputs": [{"tool_call_id": "call_1", "output": "88"}],
                    "stream": true
                }));
            then.status(200)
                .header("Content-Type", "text/event-stream")
                .body(body);
        });

        let outputs = vec![ToolOutput {
            tool_call_id: "call_1".to_string(),
            output: "88".to_string(),
        }];
        let mut stream = client_for(&server)
            .submit_tool_outputs_stream("thread_1", "run_1", &outputs)
            .await
            .unwrap();

        let first = stream.next_event().await.unwrap().unwrap();
        assert!(matches!(first, AssistantEvent::MessageDelta(ref d) if d.text() == "88F"));
        let second = stream.next_event().await.unwrap().unwrap();
        assert!(matches!(second, AssistantEvent::Done));
        assert!(stream.next_event().await.unwrap().is_none());
        submit_mock.assert();
    }
}
