//! Report command - hierarchical view of groups, blocks and per-date room types

use super::{finish, runtime, DateArgs};
use crate::app::{AppState, Command};
use crate::config::Config;
use crate::render::{render_report, BlockStatus, Filters, ReportView};
use clap::{Args, ValueEnum};

#[derive(Args, Debug)]
pub struct ReportCommand {
    #[command(flatten)]
    dates: DateArgs,

    /// Block statuses to show (repeatable) [default: lead, tentative, definite]
    #[arg(long = "status", value_enum)]
    statuses: Vec<StatusArg>,

    /// Show blocks of every status
    #[arg(long, conflicts_with = "statuses")]
    all_statuses: bool,

    /// Only groups whose name or code contains this text
    #[arg(short, long)]
    group: Option<String>,

    /// Only blocks whose name or code contains this text
    #[arg(short, long)]
    block: Option<String>,

    /// Show per-date room type details for every block
    #[arg(short = 'x', long)]
    expand: bool,

    /// Output the view as JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Lead,
    Tentative,
    Definite,
    Cancelled,
}

impl From<StatusArg> for BlockStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Lead => BlockStatus::Lead,
            StatusArg::Tentative => BlockStatus::Tentative,
            StatusArg::Definite => BlockStatus::Definite,
            StatusArg::Cancelled => BlockStatus::Cancelled,
        }
    }
}

impl ReportCommand {
    pub async fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let (start_date, end_date) = self.dates.resolve_today();
        let rt = runtime(config, false);

        let state = rt
            .dispatch(
                AppState::default(),
                Command::GenerateReport {
                    start_date,
                    end_date,
                },
            )
            .await;
        let state = rt.dispatch(state, Command::SetFilters(self.filters())).await;
        finish(&state)?;

        let Some(loaded) = &state.report else {
            anyhow::bail!("No report data available. Generate a report first.");
        };
        let mut view = ReportView::build(&loaded.report, &state.filters);
        for index in 0..view.groups.len() {
            view.toggle_group(index);
        }
        if self.expand {
            view.expand_all();
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&view)?);
        } else {
            print!("{}", render_report(&view));
        }
        Ok(())
    }

    fn filters(&self) -> Filters {
        let mut filters = Filters {
            group: self.group.clone(),
            block: self.block.clone(),
            ..Filters::default()
        };
        if self.all_statuses {
            filters.select_all(true);
        } else if !self.statuses.is_empty() {
            filters.statuses = self.statuses.iter().map(|&s| s.into()).collect();
        }
        filters
    }
}
