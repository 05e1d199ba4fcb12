//! Runs the geocode → forecast chain on its own, printing what the assistant would receive.

use clap::Parser;
use weather_bot::core::tool_handler::format_temperature;
use weather_bot::core::Location;
use weather_bot::utils::{logger, validation::Validate};
use weather_bot::{BotConfig, TemperatureService};

#[derive(Debug, Parser)]
#[command(name = "get-temperature")]
#[command(about = "Look up the current temperature for \"City, ST\"")]
struct Args {
    #[arg(long, help = "Location, e.g. \"Houston, TX\"")]
    location: String,

    #[arg(long, help = "TOML config file")]
    config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let config = match &args.config {
        Some(path) => BotConfig::from_file(path)?,
        None => BotConfig::default(),
    };
    config.validate()?;

    let service = TemperatureService::from_config(&config)?;
    let location = Location::parse(&args.location);
    let temperature = service.get_temperature(&location).await;

    println!("{}", format_temperature(temperature));
    Ok(())
}
