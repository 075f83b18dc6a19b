//! Export command - fetch a report and write it as CSV, JSON or a printable document

use super::{finish, runtime, DateArgs};
use crate::app::{AppState, Command};
use crate::config::Config;
use crate::export::ExportFormat;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExportCommand {
    /// Export format
    #[arg(short, long, value_enum)]
    format: ExportFormat,

    #[command(flatten)]
    dates: DateArgs,

    /// Directory to write into. The printable document is opened in the browser unless this is
    /// given.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

impl ExportCommand {
    pub async fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let mut config = config.clone();
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        let rt = runtime(&config, self.output_dir.is_none());

        let (start_date, end_date) = self.dates.resolve_today();
        let state = rt
            .dispatch(
                AppState::default(),
                Command::GenerateReport {
                    start_date,
                    end_date,
                },
            )
            .await;
        finish(&state)?;

        let state = rt.dispatch(state, Command::Export(self.format)).await;
        for path in &state.artifacts {
            println!("Wrote {}", path.display());
        }
        finish(&state)
    }
}
