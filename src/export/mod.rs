pub mod csv;
pub mod json;
pub mod print;

use crate::api::AllotmentApi;
use crate::core::{normalize, LoadedReport, RawReservation, Reservation};
use crate::error::AppError;
use clap::ValueEnum;
use futures::stream::{self, StreamExt};

pub const CSV_FILENAME: &str = "cloudbeds-complete-allotment-report.csv";
pub const CSV_BASIC_FILENAME: &str = "cloudbeds-allotment-report-basic.csv";
pub const JSON_FILENAME: &str = "cloudbeds-allotment-report.json";
pub const PRINT_FILENAME: &str = "cloudbeds-allotment-report-print.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    /// Printable HTML document
    Print,
}

/// A block to gather reservations for during export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRef {
    pub group_name: String,
    pub block_name: String,
    pub block_code: String,
}

/// Outcome of fetching one block's reservations
#[derive(Debug)]
pub struct BlockFetch {
    pub block: BlockRef,
    pub result: Result<Vec<RawReservation>, AppError>,
}

/// Normalized reservations for one block, ready for export
#[derive(Debug, Clone)]
pub struct BlockReservations {
    pub group_name: String,
    pub block_name: String,
    pub block_code: String,
    pub reservations: Vec<Reservation>,
}

/// Blocks of the report in group then block order. Blocks without a code cannot be queried and
/// are left out.
pub fn block_refs(loaded: &LoadedReport) -> Vec<BlockRef> {
    loaded
        .blocks()
        .filter_map(|(group, block)| {
            block.code().map(|code| BlockRef {
                group_name: group.name.clone(),
                block_name: block.name.clone(),
                block_code: code.to_string(),
            })
        })
        .collect()
}

/// Fetch reservations for every block with at most `concurrency` requests in flight.
///
/// A failed fetch is kept as an `Err` for its block and never aborts the others. Results come
/// back in the order of `blocks`, not in completion order.
pub async fn gather_reservations<A: AllotmentApi>(
    api: &A,
    blocks: Vec<BlockRef>,
    concurrency: usize,
) -> Vec<BlockFetch> {
    log::info!(
        "Gathering reservations for {} blocks ({} at a time)",
        blocks.len(),
        concurrency.max(1)
    );
    stream::iter(blocks)
        .map(|block| async move {
            let result = api.fetch_reservations(&block.block_code).await;
            if let Err(err) = &result {
                log::warn!("Reservations for block {} unavailable: {}", block.block_code, err);
            }
            BlockFetch { block, result }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

/// Split gathered results into exportable reservations and the codes of blocks that failed
pub fn partition_fetches(fetches: Vec<BlockFetch>) -> (Vec<BlockReservations>, Vec<String>) {
    let mut gathered = Vec::new();
    let mut failed = Vec::new();
    for fetch in fetches {
        match fetch.result {
            Ok(raw) => gathered.push(BlockReservations {
                group_name: fetch.block.group_name,
                block_name: fetch.block.block_name,
                block_code: fetch.block.block_code,
                reservations: raw.iter().map(normalize).collect(),
            }),
            Err(_) => failed.push(fetch.block.block_code),
        }
    }
    (gathered, failed)
}
