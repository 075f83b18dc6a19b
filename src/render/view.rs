//! Hierarchical view model: groups → block summaries → per-date, per-room-type detail rows.

use super::filters::Filters;
use crate::core::{
    block_date_span, block_totals, room_pickup, room_revenue, Block, Group, Report,
};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub header: SummaryHeader,
    pub groups: Vec<GroupView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryHeader {
    pub total_groups: i64,
    pub total_blocks: i64,
    pub total_forecasted_revenue: Decimal,
    pub date_range: String,
    pub status_filter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    pub title: String,
    pub total_blocks: i64,
    pub forecasted_revenue: Decimal,
    pub expanded: bool,
    pub blocks: Vec<BlockSummaryRow>,
    /// Only blocks with date entries get a detail table
    pub details: Vec<BlockDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockSummaryRow {
    pub name: String,
    pub code: String,
    pub status: String,
    pub start_date: String,
    pub end_date: String,
    pub pickup: u32,
    pub confirmed: i64,
    pub allotted: i64,
    pub actual_revenue: Decimal,
    pub forecasted_revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockDetail {
    pub block_name: String,
    pub block_code: Option<String>,
    pub expanded: bool,
    pub rows: Vec<DetailRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub date: String,
    pub room_type: String,
    pub rate: Decimal,
    pub allotted: i64,
    pub confirmed: i64,
    pub remaining: i64,
    pub pickup: u32,
    pub actual_revenue: Decimal,
    pub forecasted_revenue: Decimal,
}

impl ReportView {
    pub fn build(report: &Report, filters: &Filters) -> Self {
        let groups = report
            .groups
            .iter()
            .filter(|group| filters.matches_group(group))
            .filter_map(|group| GroupView::build(group, filters))
            .collect();

        Self {
            header: SummaryHeader {
                total_groups: report.summary.total_groups,
                total_blocks: report.summary.total_allotment_blocks,
                total_forecasted_revenue: report.summary.total_forecasted_revenue,
                date_range: report.date_range.display(),
                status_filter: filters.status_label(),
            },
            groups,
        }
    }

    pub fn toggle_group(&mut self, index: usize) {
        if let Some(group) = self.groups.get_mut(index) {
            group.expanded = !group.expanded;
        }
    }

    pub fn toggle_block(&mut self, group: usize, block: usize) {
        if let Some(detail) = self
            .groups
            .get_mut(group)
            .and_then(|g| g.details.get_mut(block))
        {
            detail.expanded = !detail.expanded;
        }
    }

    pub fn expand_all(&mut self) {
        for group in &mut self.groups {
            group.expanded = true;
            for detail in &mut group.details {
                detail.expanded = true;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl GroupView {
    /// `None` when the filters leave the group without blocks
    fn build(group: &Group, filters: &Filters) -> Option<Self> {
        let blocks: Vec<&Block> = group
            .allotment_blocks
            .iter()
            .filter(|block| filters.matches_block(block))
            .collect();
        if blocks.is_empty() {
            return None;
        }

        Some(Self {
            title: group.title(),
            total_blocks: group.total_blocks,
            forecasted_revenue: group.total_forecasted_revenue,
            expanded: false,
            blocks: blocks.iter().map(|b| BlockSummaryRow::build(b)).collect(),
            details: blocks
                .iter()
                .filter(|b| !b.dates_data.is_empty())
                .map(|b| BlockDetail::build(b))
                .collect(),
        })
    }
}

impl BlockSummaryRow {
    fn build(block: &Block) -> Self {
        let totals = block_totals(block);
        let span = block_date_span(block);
        Self {
            name: block.name.clone(),
            code: block.code().unwrap_or("-").to_string(),
            status: block
                .status
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or("-")
                .to_string(),
            start_date: span.start,
            end_date: span.end,
            pickup: totals.pickup,
            confirmed: totals.total_confirmed,
            allotted: totals.total_allotted,
            actual_revenue: totals.actual_revenue,
            forecasted_revenue: totals.forecasted_revenue,
        }
    }
}

impl BlockDetail {
    fn build(block: &Block) -> Self {
        let rows = block
            .dates_data
            .iter()
            .flat_map(|entry| {
                entry.room_types.iter().map(move |room| {
                    let (actual, forecasted) = room_revenue(room);
                    let pickup = room_pickup(room);
                    if Decimal::from(pickup) != room.pickup_percentage.round() {
                        log::debug!(
                            "{} {} {}: upstream pickup {}% differs from recomputed {}%",
                            block.name,
                            entry.date,
                            room.room_type_id,
                            room.pickup_percentage,
                            pickup
                        );
                    }
                    DetailRow {
                        date: entry.date.clone(),
                        room_type: room.room_type_id.clone(),
                        rate: room.rate,
                        allotted: room.block_allotted,
                        confirmed: room.block_confirmed,
                        remaining: room.block_remaining,
                        pickup,
                        actual_revenue: actual,
                        forecasted_revenue: forecasted,
                    }
                })
            })
            .collect();

        Self {
            block_name: block.name.clone(),
            block_code: block.code().map(str::to_string),
            expanded: false,
            rows,
        }
    }
}
