use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use notedrop::config::Config;

/// ScreenPipe capture → MindPal analysis → Obsidian vault bridge.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(
        short,
        long,
        env = "NOTEDROP_CONFIG",
        default_value = notedrop::config::DEFAULT_CONFIG_PATH
    )]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        "MindPal Bridge starting (config: {})",
        args.config.display()
    );

    match notedrop::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Error in main loop: {err:#}");
            ExitCode::FAILURE
        }
    }
}
