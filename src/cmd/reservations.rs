//! Reservations command - drill down into the reservations of one allotment block

use super::{finish, runtime};
use crate::app::{AppState, Command, PanelContent};
use crate::config::Config;
use crate::render::render_panel;
use clap::Args;

#[derive(Args, Debug)]
pub struct ReservationsCommand {
    /// Allotment block code
    #[arg(short = 'c', long)]
    block_code: String,

    /// Block name shown in the panel title [default: the code]
    #[arg(short = 'n', long)]
    block_name: Option<String>,
}

impl ReservationsCommand {
    pub async fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let rt = runtime(config, false);
        let state = rt
            .dispatch(
                AppState::default(),
                Command::ShowReservations {
                    block_code: self.block_code.clone(),
                    block_name: self
                        .block_name
                        .clone()
                        .unwrap_or_else(|| self.block_code.clone()),
                },
            )
            .await;
        finish(&state)?;

        let Some(panel) = &state.panel else {
            return Ok(());
        };
        print!("{}", render_panel(panel));
        if let PanelContent::Error { message, .. } = &panel.content {
            anyhow::bail!("{}", message);
        }
        Ok(())
    }
}
