//! Performs effects returned by [`handle`] and feeds their outcomes back as commands.

use super::{handle, AppState, Command, Effect};
use crate::api::AllotmentApi;
use crate::export::gather_reservations;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Maximum reservation requests in flight during a CSV export
    pub concurrency: usize,
    /// Where downloads are written
    pub output_dir: PathBuf,
    /// Open the printable document with the system viewer instead of saving it
    pub open_print: bool,
}

pub struct Runtime<A> {
    api: A,
    options: RuntimeOptions,
}

impl<A: AllotmentApi> Runtime<A> {
    pub fn new(api: A, options: RuntimeOptions) -> Self {
        Self { api, options }
    }

    /// Apply `command` and every command produced by its effects, until nothing is pending
    pub async fn dispatch(&self, mut state: AppState, command: Command) -> AppState {
        let mut queue = VecDeque::from([command]);
        while let Some(command) = queue.pop_front() {
            let (next, effects) = handle(state, command);
            state = next;
            for effect in effects {
                queue.push_back(self.perform(effect).await);
            }
        }
        state
    }

    async fn perform(&self, effect: Effect) -> Command {
        match effect {
            Effect::FetchReport(range) => {
                log::info!("Fetching report for {}", range.display());
                Command::ReportLoaded(self.api.fetch_report(&range).await)
            }
            Effect::FetchReservations { ticket, block_code } => {
                log::info!("Fetching reservations for block {}", block_code);
                let result = self.api.fetch_reservations(&block_code).await;
                Command::ReservationsLoaded { ticket, result }
            }
            Effect::GatherReservations(blocks) => Command::ReservationsGathered(
                gather_reservations(&self.api, blocks, self.options.concurrency).await,
            ),
            Effect::Download { filename, contents } => {
                let path = self.options.output_dir.join(filename);
                saved(&path, write_file(&path, &contents))
            }
            Effect::OpenPrint { filename, html } => {
                if self.options.open_print {
                    let path = std::env::temp_dir().join(filename);
                    let result = write_file(&path, html.as_bytes())
                        .and_then(|()| opener::open(&path).map_err(|e| e.to_string()));
                    saved(&path, result)
                } else {
                    let path = self.options.output_dir.join(filename);
                    saved(&path, write_file(&path, html.as_bytes()))
                }
            }
        }
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), String> {
    std::fs::write(path, contents).map_err(|e| e.to_string())
}

fn saved(path: &Path, result: Result<(), String>) -> Command {
    match result {
        Ok(()) => {
            log::info!("Wrote {}", path.display());
            Command::ArtifactSaved(path.to_path_buf())
        }
        Err(err) => {
            log::warn!("Could not write {}: {}", path.display(), err);
            Command::ArtifactFailed(format!(
                "Export failed: could not write {}: {}",
                path.display(),
                err
            ))
        }
    }
}
