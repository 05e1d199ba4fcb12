use clap::Parser;
use weather_bot::utils::error::BotError;
use weather_bot::utils::{logger, validation::Validate};
use weather_bot::{AssistantSession, CliConfig};

/// Exit code when the run ends `failed`, `cancelled`, `expired` or without a final status.
const RUN_NOT_COMPLETED: i32 = 4;

fn fail(e: BotError) -> ! {
    tracing::error!(
        "❌ weather-bot failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting weather-bot");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.load() {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    if let Err(e) = config.validate().and_then(|_| config.require_api_key().map(|_| ())) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(e);
    }

    let session = match AssistantSession::from_config(&config) {
        Ok(session) => session,
        Err(e) => fail(e),
    };

    let question = &config.conversation.question;
    tracing::info!("💬 {}", question);

    let mut stdout = std::io::stdout();
    match session.ask(question, &mut stdout).await {
        Ok(summary) if summary.completed() => {
            tracing::info!(
                "✅ Done: thread {}, {} tool round(s), {} output(s)",
                summary.thread_id,
                summary.tool_rounds,
                summary.tool_outputs_submitted
            );
        }
        Ok(summary) => {
            let status = summary.final_status.as_deref().unwrap_or("unknown");
            tracing::error!(
                "❌ Run {} on thread {} did not complete: final status {}",
                summary.run_id.as_deref().unwrap_or("-"),
                summary.thread_id,
                status
            );
            eprintln!("❌ The assistant run ended with status {}", status);
            std::process::exit(RUN_NOT_COMPLETED);
        }
        Err(e) => fail(e),
    }
}
