//! pipectl - Entry Point
//!
//! Command line client for deployment pipelines: list stages, move content
//! between them, and wait for deployments to finish.

use std::env;
use std::process::ExitCode;

use colored::Colorize;
use pipectl::app::args::CliArgs;
use pipectl::app::options::{ClientOptions, BASE_URL_ENV};
use pipectl::app::run::run;
use pipectl::errors::PipelineError;
use pipectl::logs::{init_logging, LogOptions};
use pipectl::storage::layout::StorageLayout;
use pipectl::storage::settings::Settings;
use pipectl::utils::version_info;

use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse(env::args().skip(1));

    // Print version and exit
    if args.command.as_deref() == Some("version") || args.flag("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("Failed to render version: {}", e),
        }
        return ExitCode::SUCCESS;
    }

    let layout = match args.get("config-dir") {
        Some(dir) => StorageLayout::new(dir),
        None => StorageLayout::default(),
    };

    // Retrieve the settings file
    let settings = match Settings::load_or_default(&layout.settings_file()).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!(
                "{} unable to read {}: {}",
                "error:".red().bold(),
                layout.settings_file().path().display(),
                e
            );
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let mut log_options = LogOptions {
        log_level: settings.log_level,
        json_format: settings.log_json,
        log_dir: settings.log_dir.clone(),
        ..Default::default()
    };
    if let Some(level) = args.get("log-level") {
        match level.parse() {
            Ok(level) => log_options.log_level = level,
            Err(e) => eprintln!("{} {}", "warning:".yellow().bold(), e),
        }
    }
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    let options =
        ClientOptions::from_settings(&settings).with_base_url(env::var(BASE_URL_ENV).ok());
    debug!("Running pipectl with options: {:?}", options);

    match run(&args, &options, &layout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            match e.downcast_ref::<PipelineError>() {
                Some(PipelineError::DeploymentFailed { .. }) => ExitCode::from(2),
                Some(PipelineError::WaitTimeout { .. }) => ExitCode::from(3),
                Some(PipelineError::WaitCancelled { .. }) => ExitCode::from(130),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
