//! Pickup and revenue aggregation over allotment blocks.
//!
//! All functions are pure: missing values were already defaulted to zero during decoding, so
//! there are no error conditions here.

use super::report::{Block, Group, Report, RoomTypeStat};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

/// Placeholder for a date bound of a block without any date entries
pub const NO_DATE: &str = "-";

/// Summed counts and revenue for a block (or a set of blocks)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BlockTotals {
    pub total_confirmed: i64,
    pub total_allotted: i64,
    pub actual_revenue: Decimal,
    pub forecasted_revenue: Decimal,
    pub pickup: u32,
}

impl BlockTotals {
    fn add_room(&mut self, room: &RoomTypeStat) {
        let (actual, forecasted) = room_revenue(room);
        self.add(&BlockTotals {
            total_confirmed: room.block_confirmed,
            total_allotted: room.block_allotted,
            actual_revenue: actual,
            forecasted_revenue: forecasted,
            pickup: 0,
        });
    }

    // saturating: lenient decoding lets arbitrarily large counts and rates through
    fn add(&mut self, other: &BlockTotals) {
        self.total_confirmed = self.total_confirmed.saturating_add(other.total_confirmed);
        self.total_allotted = self.total_allotted.saturating_add(other.total_allotted);
        self.actual_revenue = self.actual_revenue.saturating_add(other.actual_revenue);
        self.forecasted_revenue = self
            .forecasted_revenue
            .saturating_add(other.forecasted_revenue);
    }

    fn with_pickup(mut self) -> Self {
        self.pickup = pickup_percentage(self.total_confirmed, self.total_allotted);
        self
    }
}

/// First and last date of a block, `-` for both when the block has no dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateSpan {
    pub start: String,
    pub end: String,
}

/// Report-wide totals recomputed from the block data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    pub groups: usize,
    pub blocks: usize,
    pub totals: BlockTotals,
}

/// `round(100 * confirmed / allotted)`, or 0 when nothing is allotted
pub fn pickup_percentage(confirmed: i64, allotted: i64) -> u32 {
    if allotted <= 0 {
        return 0;
    }
    let pct = Decimal::from(confirmed) * dec!(100) / Decimal::from(allotted);
    pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

/// Actual (confirmed x rate) and forecasted (allotted x rate) revenue for one room type.
///
/// Products beyond the `Decimal` range saturate at its bounds.
pub fn room_revenue(room: &RoomTypeStat) -> (Decimal, Decimal) {
    (
        Decimal::from(room.block_confirmed).saturating_mul(room.rate),
        Decimal::from(room.block_allotted).saturating_mul(room.rate),
    )
}

pub fn room_pickup(room: &RoomTypeStat) -> u32 {
    pickup_percentage(room.block_confirmed, room.block_allotted)
}

pub fn block_totals(block: &Block) -> BlockTotals {
    let mut totals = BlockTotals::default();
    for room in block.dates_data.iter().flat_map(|d| d.room_types.iter()) {
        totals.add_room(room);
    }
    totals.with_pickup()
}

pub fn block_date_span(block: &Block) -> DateSpan {
    let mut dates: Vec<&str> = block.dates_data.iter().map(|d| d.date.as_str()).collect();
    dates.sort_unstable();

    DateSpan {
        start: dates.first().unwrap_or(&NO_DATE).to_string(),
        end: dates.last().unwrap_or(&NO_DATE).to_string(),
    }
}

/// Sum of the group's block totals; pickup is recomputed from the summed counts
pub fn group_totals(group: &Group) -> BlockTotals {
    let mut totals = BlockTotals::default();
    for block in &group.allotment_blocks {
        totals.add(&block_totals(block));
    }
    totals.with_pickup()
}

pub fn report_totals(report: &Report) -> ReportTotals {
    let mut totals = BlockTotals::default();
    let mut blocks = 0;
    for group in &report.groups {
        blocks += group.allotment_blocks.len();
        totals.add(&group_totals(group));
    }
    ReportTotals {
        groups: report.groups.len(),
        blocks,
        totals: totals.with_pickup(),
    }
}
