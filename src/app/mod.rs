//! Application state and command handlers.
//!
//! Every user action or completed request is a [`Command`]. [`handle`] takes the current
//! [`AppState`] by value and returns the next state plus the [`Effect`]s to perform; it never
//! does I/O itself. The [`runtime`] performs effects and feeds their outcomes back in as
//! commands.

pub mod runtime;

use crate::core::{normalize, DateRange, LoadedReport, RawReservation, Reservation};
use crate::error::AppError;
use crate::export::{
    self, BlockFetch, BlockRef, ExportFormat, CSV_BASIC_FILENAME, CSV_FILENAME, JSON_FILENAME,
    PRINT_FILENAME,
};
use crate::render::filters::Filters;
use chrono::NaiveDate;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Error,
    Warning,
}

/// Dismissible inline message shown after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn error(err: &AppError) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: err.to_string(),
        }
    }

    fn warning(message: String) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Loading {
    pub report: bool,
    pub reservations: bool,
    pub export: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Loading,
    Reservations(Vec<Reservation>),
    NoData,
    Error { status: Option<u16>, message: String },
}

/// Drill-down panel showing the reservations of one block
#[derive(Debug, Clone, PartialEq)]
pub struct DrilldownPanel {
    /// Identifies the request whose result may fill this panel
    pub ticket: u64,
    pub block_code: String,
    pub block_name: String,
    pub content: PanelContent,
}

#[derive(Debug, Default)]
pub struct AppState {
    /// Replaced wholesale on each successful fetch, cleared on reset
    pub report: Option<LoadedReport>,
    pub filters: Filters,
    pub panel: Option<DrilldownPanel>,
    pub loading: Loading,
    pub notice: Option<Notice>,
    /// Files written by export effects, most recent last
    pub artifacts: Vec<PathBuf>,
    next_ticket: u64,
}

#[derive(Debug)]
pub enum Command {
    GenerateReport { start_date: String, end_date: String },
    ReportLoaded(Result<LoadedReport, AppError>),
    ClearReport,
    SetFilters(Filters),
    ShowReservations { block_code: String, block_name: String },
    ReservationsLoaded {
        ticket: u64,
        result: Result<Vec<RawReservation>, AppError>,
    },
    ClosePanel,
    Export(ExportFormat),
    ReservationsGathered(Vec<BlockFetch>),
    ArtifactSaved(PathBuf),
    ArtifactFailed(String),
    DismissNotice,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchReport(DateRange),
    FetchReservations { ticket: u64, block_code: String },
    GatherReservations(Vec<BlockRef>),
    Download { filename: &'static str, contents: Vec<u8> },
    OpenPrint { filename: &'static str, html: String },
}

pub fn handle(mut state: AppState, command: Command) -> (AppState, Vec<Effect>) {
    let mut effects = Vec::new();

    match command {
        Command::GenerateReport {
            start_date,
            end_date,
        } => match validate_range(&start_date, &end_date) {
            Ok(range) => {
                state.loading.report = true;
                state.notice = None;
                effects.push(Effect::FetchReport(range));
            }
            Err(err) => state.notice = Some(Notice::error(&err)),
        },
        Command::ReportLoaded(result) => {
            state.loading.report = false;
            match result {
                Ok(loaded) => {
                    log::info!(
                        "Loaded report {} ({} groups)",
                        loaded.report.date_range.display(),
                        loaded.report.groups.len()
                    );
                    state.report = Some(loaded);
                    // any drill-down still in flight belongs to the previous report
                    state.panel = None;
                    state.loading.reservations = false;
                }
                Err(err) => state.notice = Some(Notice::error(&err)),
            }
        }
        Command::ClearReport => {
            state.report = None;
            state.filters = Filters::default();
            state.panel = None;
            state.notice = None;
            state.loading = Loading::default();
        }
        Command::SetFilters(filters) => state.filters = filters,
        Command::ShowReservations {
            block_code,
            block_name,
        } => {
            if block_code.trim().is_empty() {
                state.notice = Some(Notice::error(&AppError::Validation(
                    "An allotment block code is required to load reservations.".to_string(),
                )));
            } else {
                state.next_ticket += 1;
                let ticket = state.next_ticket;
                state.panel = Some(DrilldownPanel {
                    ticket,
                    block_code: block_code.clone(),
                    block_name,
                    content: PanelContent::Loading,
                });
                state.loading.reservations = true;
                effects.push(Effect::FetchReservations { ticket, block_code });
            }
        }
        Command::ReservationsLoaded { ticket, result } => match state.panel.as_mut() {
            Some(panel) if panel.ticket == ticket => {
                state.loading.reservations = false;
                panel.content = match result {
                    Ok(raw) if raw.is_empty() => PanelContent::NoData,
                    Ok(raw) => PanelContent::Reservations(raw.iter().map(normalize).collect()),
                    Err(err) => PanelContent::Error {
                        status: err.status(),
                        message: err.to_string(),
                    },
                };
            }
            _ => log::debug!("Discarding stale reservations response (ticket {})", ticket),
        },
        Command::ClosePanel => {
            state.panel = None;
            state.loading.reservations = false;
        }
        Command::Export(format) => match (&state.report, format) {
            (None, _) => state.notice = Some(Notice::error(&AppError::NoData)),
            (Some(loaded), ExportFormat::Json) => {
                let mut contents = Vec::new();
                match export::json::write_report(loaded, &mut contents) {
                    Ok(()) => effects.push(Effect::Download {
                        filename: JSON_FILENAME,
                        contents,
                    }),
                    Err(err) => state.notice = Some(export_failed(err)),
                }
            }
            (Some(loaded), ExportFormat::Print) => effects.push(Effect::OpenPrint {
                filename: PRINT_FILENAME,
                html: export::print::render(&loaded.report),
            }),
            (Some(loaded), ExportFormat::Csv) => {
                state.loading.export = true;
                state.notice = None;
                effects.push(Effect::GatherReservations(export::block_refs(loaded)));
            }
        },
        Command::ReservationsGathered(fetches) => {
            state.loading.export = false;
            match &state.report {
                None => state.notice = Some(Notice::error(&AppError::NoData)),
                Some(loaded) => {
                    let attempted = fetches.len();
                    let (gathered, failed) = export::partition_fetches(fetches);
                    let mut contents = Vec::new();
                    match export::csv::write_report(&loaded.report, &gathered, &mut contents) {
                        Ok(()) => {
                            let filename = if gathered.is_empty() && attempted > 0 {
                                CSV_BASIC_FILENAME
                            } else {
                                CSV_FILENAME
                            };
                            if !failed.is_empty() {
                                state.notice = Some(Notice::warning(format!(
                                    "Reservations could not be loaded for {} of {} blocks ({}); \
                                     exported without them.",
                                    failed.len(),
                                    attempted,
                                    failed.join(", ")
                                )));
                            }
                            effects.push(Effect::Download { filename, contents });
                        }
                        Err(err) => state.notice = Some(export_failed(err)),
                    }
                }
            }
        }
        Command::ArtifactSaved(path) => state.artifacts.push(path),
        Command::ArtifactFailed(message) => {
            state.notice = Some(Notice {
                level: NoticeLevel::Error,
                message,
            })
        }
        Command::DismissNotice => state.notice = None,
    }

    (state, effects)
}

fn export_failed(err: impl std::fmt::Display) -> Notice {
    Notice {
        level: NoticeLevel::Error,
        message: format!("Export failed: {}", err),
    }
}

/// Both dates must be present, ISO formatted, and in order
pub fn validate_range(start_date: &str, end_date: &str) -> Result<DateRange, AppError> {
    let (start_date, end_date) = (start_date.trim(), end_date.trim());
    if start_date.is_empty() || end_date.is_empty() {
        return Err(AppError::Validation(
            "Please select both start and end dates.".to_string(),
        ));
    }

    let parse = |date: &str| {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            AppError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD.", date))
        })
    };
    if parse(start_date)? > parse(end_date)? {
        return Err(AppError::Validation(
            "Start date must be on or before end date.".to_string(),
        ));
    }

    Ok(DateRange::new(start_date, end_date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ACME: &str = r#"{
        "date_range": {"start_date": "2025-06-01", "end_date": "2025-07-01"},
        "summary": {"total_groups": 1, "total_allotment_blocks": 2, "total_forecasted_revenue": 1000.0},
        "groups": [{"name": "Acme Corp", "code": "ACME", "total_blocks": 2, "allotment_blocks": [
            {"name": "Summit", "code": "ACME-JUN", "status": "definite", "dates_data": [
                {"date": "2025-06-01", "room_types": [
                    {"room_type_id": "KING", "rate": 100.0, "block_allotted": 10, "block_confirmed": 6, "block_remaining": 4}
                ]}
            ]},
            {"name": "Offsite", "code": "ACME-OFF", "status": "lead", "dates_data": []}
        ]}]
    }"#;

    fn loaded_state() -> AppState {
        let (state, _) = handle(
            AppState::default(),
            Command::ReportLoaded(Ok(LoadedReport::from_json(ACME).unwrap())),
        );
        state
    }

    fn server_error() -> AppError {
        AppError::Request {
            status: Some(500),
            message: "HTTP 500: Internal Server Error".to_string(),
        }
    }

    #[test]
    fn empty_end_date_is_a_validation_error_without_request() {
        let (state, effects) = handle(
            AppState::default(),
            Command::GenerateReport {
                start_date: "2025-06-01".to_string(),
                end_date: "".to_string(),
            },
        );
        assert!(effects.is_empty());
        assert!(!state.loading.report);
        let notice = state.notice.unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Please select both start and end dates.");
    }

    #[test]
    fn inverted_or_malformed_dates_rejected() {
        assert!(matches!(
            validate_range("2025-07-01", "2025-06-01"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_range("06/01/2025", "2025-07-01"),
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            validate_range(" 2025-06-01 ", "2025-06-01").unwrap(),
            DateRange::new("2025-06-01", "2025-06-01")
        );
    }

    #[test]
    fn generate_issues_fetch_and_sets_loading() {
        let (state, effects) = handle(
            AppState::default(),
            Command::GenerateReport {
                start_date: "2025-06-01".to_string(),
                end_date: "2025-07-01".to_string(),
            },
        );
        assert!(state.loading.report);
        assert_eq!(
            effects,
            vec![Effect::FetchReport(DateRange::new("2025-06-01", "2025-07-01"))]
        );
    }

    #[test]
    fn failed_fetch_keeps_previous_report_and_clears_loading() {
        let mut state = loaded_state();
        state.loading.report = true;
        let (state, effects) = handle(
            state,
            Command::ReportLoaded(Err(AppError::Application("Rate limit exceeded.".to_string()))),
        );
        assert!(effects.is_empty());
        assert!(!state.loading.report);
        assert!(state.report.is_some());
        assert_eq!(state.notice.unwrap().message, "Error: Rate limit exceeded.");
    }

    #[test]
    fn clear_resets_report_and_filters() {
        let mut state = loaded_state();
        state.filters.select_all(true);
        let (state, _) = handle(state, Command::ClearReport);
        assert!(state.report.is_none());
        assert_eq!(state.filters, Filters::default());
    }

    #[test]
    fn drilldown_fills_panel() {
        let (state, effects) = handle(
            loaded_state(),
            Command::ShowReservations {
                block_code: "ACME-JUN".to_string(),
                block_name: "Summit".to_string(),
            },
        );
        assert!(state.loading.reservations);
        let ticket = state.panel.as_ref().unwrap().ticket;
        assert_eq!(
            effects,
            vec![Effect::FetchReservations {
                ticket,
                block_code: "ACME-JUN".to_string()
            }]
        );

        let (state, _) = handle(
            state,
            Command::ReservationsLoaded {
                ticket,
                result: Ok(vec![json!({"reservationID": "R1", "guestName": "Jane Doe"})]),
            },
        );
        assert!(!state.loading.reservations);
        match &state.panel.as_ref().unwrap().content {
            PanelContent::Reservations(rows) => assert_eq!(rows[0].guest_name, "Jane Doe"),
            other => panic!("unexpected panel {:?}", other),
        }
    }

    #[test]
    fn empty_drilldown_is_no_data_not_error() {
        let (state, _) = handle(
            loaded_state(),
            Command::ShowReservations {
                block_code: "ACME-OFF".to_string(),
                block_name: "Offsite".to_string(),
            },
        );
        let ticket = state.panel.as_ref().unwrap().ticket;
        let (state, _) = handle(
            state,
            Command::ReservationsLoaded {
                ticket,
                result: Ok(vec![]),
            },
        );
        assert_eq!(state.panel.unwrap().content, PanelContent::NoData);
        assert!(state.notice.is_none());
    }

    #[test]
    fn drilldown_error_shows_status_code() {
        let (state, _) = handle(
            loaded_state(),
            Command::ShowReservations {
                block_code: "ACME-JUN".to_string(),
                block_name: "Summit".to_string(),
            },
        );
        let ticket = state.panel.as_ref().unwrap().ticket;
        let (state, _) = handle(
            state,
            Command::ReservationsLoaded {
                ticket,
                result: Err(server_error()),
            },
        );
        assert!(!state.loading.reservations);
        match state.panel.unwrap().content {
            PanelContent::Error { status, message } => {
                assert_eq!(status, Some(500));
                assert!(message.contains("HTTP 500"));
            }
            other => panic!("unexpected panel {:?}", other),
        }
    }

    #[test]
    fn stale_drilldown_response_is_discarded() {
        let (state, _) = handle(
            loaded_state(),
            Command::ShowReservations {
                block_code: "ACME-JUN".to_string(),
                block_name: "Summit".to_string(),
            },
        );
        let first = state.panel.as_ref().unwrap().ticket;
        let (state, _) = handle(
            state,
            Command::ShowReservations {
                block_code: "ACME-OFF".to_string(),
                block_name: "Offsite".to_string(),
            },
        );
        let second = state.panel.as_ref().unwrap().ticket;
        assert_ne!(first, second);

        let (state, _) = handle(
            state,
            Command::ReservationsLoaded {
                ticket: first,
                result: Ok(vec![json!({"reservationID": "OLD"})]),
            },
        );
        let panel = state.panel.as_ref().unwrap();
        assert_eq!(panel.block_code, "ACME-OFF");
        assert_eq!(panel.content, PanelContent::Loading);
        assert!(state.loading.reservations);
    }

    #[test]
    fn new_report_discards_open_drilldown() {
        let (state, _) = handle(
            loaded_state(),
            Command::ShowReservations {
                block_code: "ACME-JUN".to_string(),
                block_name: "Summit".to_string(),
            },
        );
        let ticket = state.panel.as_ref().unwrap().ticket;
        let (state, _) = handle(
            state,
            Command::ReportLoaded(Ok(LoadedReport::from_json(ACME).unwrap())),
        );
        let (state, _) = handle(
            state,
            Command::ReservationsLoaded {
                ticket,
                result: Ok(vec![json!({})]),
            },
        );
        assert!(state.panel.is_none());
        assert!(!state.loading.reservations);
    }

    #[test]
    fn blank_block_code_rejected() {
        let (state, effects) = handle(
            loaded_state(),
            Command::ShowReservations {
                block_code: " ".to_string(),
                block_name: "Nameless".to_string(),
            },
        );
        assert!(effects.is_empty());
        assert!(state.panel.is_none());
        assert_eq!(state.notice.unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn export_without_report_is_no_data() {
        for format in [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Print] {
            let (state, effects) = handle(AppState::default(), Command::Export(format));
            assert!(effects.is_empty());
            assert_eq!(
                state.notice.unwrap().message,
                "No report data available. Generate a report first."
            );
        }
    }

    #[test]
    fn json_export_downloads_raw_payload() {
        let (_, effects) = handle(loaded_state(), Command::Export(ExportFormat::Json));
        assert_eq!(
            effects,
            vec![Effect::Download {
                filename: "cloudbeds-allotment-report.json",
                contents: ACME.as_bytes().to_vec(),
            }]
        );
    }

    #[test]
    fn print_export_opens_document() {
        let (_, effects) = handle(loaded_state(), Command::Export(ExportFormat::Print));
        match &effects[..] {
            [Effect::OpenPrint { filename, html }] => {
                assert_eq!(*filename, PRINT_FILENAME);
                assert!(html.contains("Acme Corp (ACME)"));
            }
            other => panic!("unexpected effects {:?}", other),
        }
    }

    #[test]
    fn csv_export_gathers_every_block_in_order() {
        let (state, effects) = handle(loaded_state(), Command::Export(ExportFormat::Csv));
        assert!(state.loading.export);
        match &effects[..] {
            [Effect::GatherReservations(blocks)] => {
                let codes: Vec<_> = blocks.iter().map(|b| b.block_code.as_str()).collect();
                assert_eq!(codes, vec!["ACME-JUN", "ACME-OFF"]);
            }
            other => panic!("unexpected effects {:?}", other),
        }
    }

    fn fetch(code: &str, result: Result<Vec<RawReservation>, AppError>) -> BlockFetch {
        BlockFetch {
            block: BlockRef {
                group_name: "Acme Corp".to_string(),
                block_name: code.to_string(),
                block_code: code.to_string(),
            },
            result,
        }
    }

    #[test]
    fn csv_export_degrades_on_partial_failure() {
        let (mut state, _) = handle(loaded_state(), Command::Export(ExportFormat::Csv));
        state.loading.export = true;
        let (state, effects) = handle(
            state,
            Command::ReservationsGathered(vec![
                fetch("ACME-JUN", Err(server_error())),
                fetch("ACME-OFF", Ok(vec![json!({"reservationID": "R9"})])),
            ]),
        );

        assert!(!state.loading.export);
        let notice = state.notice.unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert!(notice.message.contains("1 of 2 blocks (ACME-JUN)"));

        match &effects[..] {
            [Effect::Download { filename, contents }] => {
                assert_eq!(*filename, CSV_FILENAME);
                let csv = String::from_utf8(contents.clone()).unwrap();
                assert!(csv.contains("\"R9\""));
                assert!(csv.contains("\"Block Details\""));
            }
            other => panic!("unexpected effects {:?}", other),
        }
    }

    #[test]
    fn csv_export_is_basic_when_no_reservations_available() {
        let (state, effects) = handle(
            loaded_state(),
            Command::ReservationsGathered(vec![
                fetch("ACME-JUN", Err(server_error())),
                fetch("ACME-OFF", Err(server_error())),
            ]),
        );
        assert_eq!(state.notice.unwrap().level, NoticeLevel::Warning);
        match &effects[..] {
            [Effect::Download { filename, contents }] => {
                assert_eq!(*filename, CSV_BASIC_FILENAME);
                assert!(!String::from_utf8_lossy(contents).contains("\"Reservations\""));
            }
            other => panic!("unexpected effects {:?}", other),
        }
    }

    #[test]
    fn artifacts_and_failures_recorded() {
        let (state, _) = handle(
            AppState::default(),
            Command::ArtifactSaved(PathBuf::from("out.csv")),
        );
        assert_eq!(state.artifacts, vec![PathBuf::from("out.csv")]);

        let (state, _) = handle(state, Command::ArtifactFailed("disk full".to_string()));
        assert_eq!(state.notice.as_ref().unwrap().level, NoticeLevel::Error);
        let (state, _) = handle(state, Command::DismissNotice);
        assert!(state.notice.is_none());
    }
}
