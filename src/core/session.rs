use crate::adapters::openai::AssistantSpec;
use crate::adapters::{
    streaming_http_client, AssistantClient, AssistantEvent, GeocodeXyzClient, RunEventStream,
    WeatherGovClient,
};
use crate::core::temperature::TemperatureService;
use crate::core::tool_handler::ToolCallHandler;
use crate::core::{ConfigProvider, RequiredActionHandler};
use crate::utils::error::{BotError, Result};
use std::io::Write;

/// What happened during one question/answer exchange.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    pub assistant_id: String,
    pub thread_id: String,
    pub run_id: Option<String>,
    pub tool_rounds: usize,
    pub tool_outputs_submitted: usize,
    pub final_status: Option<String>,
}

impl SessionSummary {
    /// Whether the last run reported `completed`. A stream that closes without a terminal
    /// status does not count.
    pub fn completed(&self) -> bool {
        self.final_status.as_deref() == Some("completed")
    }
}

/// Drives an assistant run to completion, answering tool calls along the way.
pub struct AssistantSession<H: RequiredActionHandler> {
    client: AssistantClient,
    handler: H,
    model: String,
    instructions: String,
    name: Option<String>,
}

impl<H: RequiredActionHandler> AssistantSession<H> {
    pub fn new(
        client: AssistantClient,
        handler: H,
        model: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            client,
            handler,
            model: model.into(),
            instructions: instructions.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Creates the assistant and a thread, asks `question`, and streams the answer into `out`.
    pub async fn ask<W: Write>(&self, question: &str, out: &mut W) -> Result<SessionSummary> {
        let spec = AssistantSpec {
            model: self.model.clone(),
            instructions: self.instructions.clone(),
            name: self.name.clone(),
            tools: self.handler.tools(),
        };

        let assistant = self.client.create_assistant(&spec).await?;
        tracing::info!("🤖 Created assistant {} ({})", assistant.id, self.model);

        let thread = self.client.create_thread().await?;
        let message = self.client.create_message(&thread.id, question).await?;
        tracing::debug!("Posted message {} to thread {}", message.id, thread.id);

        let mut summary = SessionSummary {
            assistant_id: assistant.id.clone(),
            thread_id: thread.id.clone(),
            ..Default::default()
        };

        let stream = self.client.stream_run(&thread.id, &assistant.id).await?;
        self.drive(stream, out, &mut summary).await?;
        writeln!(out)?;

        Ok(summary)
    }

    async fn drive<W: Write>(
        &self,
        mut stream: RunEventStream,
        out: &mut W,
        summary: &mut SessionSummary,
    ) -> Result<()> {
        loop {
            let mut next_stream = None;

            while let Some(event) = stream.next_event().await? {
                match event {
                    AssistantEvent::RunCreated(run) => {
                        tracing::debug!("Run {} created", run.id);
                        summary.run_id = Some(run.id);
                    }
                    AssistantEvent::MessageDelta(delta) => {
                        write!(out, "{}", delta.text())?;
                        out.flush()?;
                    }
                    AssistantEvent::RequiresAction(run) => {
                        let tool_outputs = self.handler.handle_requires_action(&run).await;
                        tracing::info!(
                            "Submitting {} tool output(s) for run {}",
                            tool_outputs.len(),
                            run.id
                        );
                        summary.tool_rounds += 1;
                        summary.tool_outputs_submitted += tool_outputs.len();
                        summary.run_id = Some(run.id.clone());

                        next_stream = Some(
                            self.client
                                .submit_tool_outputs_stream(&run.thread_id, &run.id, &tool_outputs)
                                .await?,
                        );
                        break;
                    }
                    AssistantEvent::RunCompleted(run) => {
                        tracing::debug!("Run {} completed", run.id);
                        summary.run_id = Some(run.id);
                        summary.final_status = Some(run.status);
                    }
                    AssistantEvent::RunEnded(run) => {
                        match &run.last_error {
                            Some(error) => tracing::error!(
                                "Run {} ended with status {}: {} ({})",
                                run.id,
                                run.status,
                                error.message,
                                error.code
                            ),
                            None => tracing::warn!("Run {} ended with status {}", run.id, run.status),
                        }
                        summary.run_id = Some(run.id);
                        summary.final_status = Some(run.status);
                    }
                    AssistantEvent::Error(error) => {
                        return Err(BotError::AssistantError {
                            message: error.message,
                        });
                    }
                    AssistantEvent::Done => break,
                    AssistantEvent::Other(name) => tracing::trace!("Ignoring event {}", name),
                }
            }

            match next_stream {
                Some(submitted) => stream = submitted,
                None => return Ok(()),
            }
        }
    }
}

impl AssistantSession<ToolCallHandler<GeocodeXyzClient, WeatherGovClient>> {
    /// The production wiring: Assistants API, geocode.xyz and api.weather.gov.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let api_key = config
            .openai_api_key()
            .ok_or_else(|| BotError::MissingConfigError {
                field: "assistant.api_key".to_string(),
            })?;

        let client = AssistantClient::new(
            streaming_http_client(config)?,
            config.openai_base_url(),
            api_key,
        )
        .with_timeout(config.request_timeout());
        let handler = ToolCallHandler::new(TemperatureService::from_config(config)?);

        Ok(Self::new(client, handler, config.model(), config.instructions())
            .with_name(config.assistant_name().map(str::to_string)))
    }
}
