mod api;
mod app;
mod cmd;
mod config;
mod core;
mod error;
mod export;
mod render;
mod utils;

use clap::{Parser, Subcommand};
use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "allotment-report",
    version,
    about = "Group allotment block reporting, drill-down and export"
)]
struct Cli {
    /// Reporting backend base URL [default: from config, else http://127.0.0.1:5000]
    #[arg(long, global = true)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the group allotment report for a date range
    Report(cmd::report::ReportCommand),
    /// List the reservations of one allotment block
    Reservations(cmd::reservations::ReservationsCommand),
    /// Export a report as CSV, JSON or a printable document
    Export(cmd::export::ExportCommand),
    /// Show or save settings
    Config(cmd::config::ConfigCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let mut config = Config::load_or_default(Config::default_path().as_deref());
    if let Some(url) = cli.backend_url {
        config.backend_url = url;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match cli.command {
            Commands::Report(report) => report.exec(&config).await,
            Commands::Reservations(reservations) => reservations.exec(&config).await,
            Commands::Export(export) => export.exec(&config).await,
            Commands::Config(config_cmd) => config_cmd.exec(&config),
        }
    })
}
