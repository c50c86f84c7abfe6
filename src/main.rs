use alert_report::{ProgressSink, Report, ScrapeConfig};
use clap::Parser;
use std::process::ExitCode;

mod args;
use args::Args;

/// Prints progress lines for the operator and mirrors them into the log
struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn emit(&mut self, message: &str) {
        println!("{}", message);
        ::log::debug!("progress: {}", message);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match ScrapeConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ScrapeConfig::default(),
    };
    args.apply(&mut config);

    if let Some(path) = &args.save_config {
        if let Err(e) = config.save_to_file(path) {
            eprintln!("Error: {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
        ::log::info!("Configuration written to {}", path.display());
    }

    let start_time = std::time::Instant::now();
    match Report::new(config).generate(&mut ConsoleSink).await {
        Ok(summary) => {
            ::log::info!(
                "Report complete - {} of {} alerts written in {:.2} seconds",
                summary.rows_written,
                summary.records_fetched,
                start_time.elapsed().as_secs_f64()
            );
            println!("{}", summary.output_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Report failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
