pub mod config;
pub mod export;
pub mod report;
pub mod reservations;

use crate::api::HttpApi;
use crate::app::runtime::{Runtime, RuntimeOptions};
use crate::app::{AppState, NoticeLevel};
use crate::config::Config;
use crate::render::render_notice;
use chrono::{Local, Months, NaiveDate};
use clap::Args;

/// Report date range; defaults to today through the same day next month
#[derive(Args, Debug, Clone)]
pub struct DateArgs {
    /// First day of the report (YYYY-MM-DD) [default: today]
    #[arg(short, long)]
    start_date: Option<String>,

    /// Last day of the report (YYYY-MM-DD) [default: one month from today]
    #[arg(short, long)]
    end_date: Option<String>,
}

impl DateArgs {
    /// Explicit values are passed through untouched so the handlers can validate them
    pub fn resolve(&self, today: NaiveDate) -> (String, String) {
        let (default_start, default_end) = default_range(today);
        (
            self.start_date
                .clone()
                .unwrap_or_else(|| default_start.to_string()),
            self.end_date.clone().unwrap_or_else(|| default_end.to_string()),
        )
    }

    pub fn resolve_today(&self) -> (String, String) {
        self.resolve(Local::now().date_naive())
    }
}

/// Today and one calendar month later, clamped to the end of a shorter month
pub fn default_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = today.checked_add_months(Months::new(1)).unwrap_or(today);
    (today, end)
}

pub fn runtime(config: &Config, open_print: bool) -> Runtime<HttpApi> {
    Runtime::new(
        HttpApi::new(config.backend_url.as_str()),
        RuntimeOptions {
            concurrency: config.concurrency,
            output_dir: config.output_dir.clone(),
            open_print,
        },
    )
}

/// Print any remaining notice; an error notice fails the command
pub fn finish(state: &AppState) -> anyhow::Result<()> {
    match &state.notice {
        Some(notice) if notice.level == NoticeLevel::Error => {
            anyhow::bail!("{}", notice.message)
        }
        Some(notice) => {
            eprintln!("{}", render_notice(notice));
            Ok(())
        }
        None => Ok(()),
    }
}
