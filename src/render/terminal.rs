//! Terminal rendering of the report view and the drill-down panel.

use super::view::{BlockDetail, BlockSummaryRow, DetailRow, GroupView, ReportView};
use crate::app::{DrilldownPanel, Notice, NoticeLevel, PanelContent};
use crate::core::reservation::format_date;
use crate::core::Reservation;
use crate::utils::{format_amount, format_usd};
use std::fmt::Write;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

pub const NO_DATA: &str = "No data found.";
pub const NO_RESERVATIONS: &str = "No reservations found for this allotment block.";

const BAR_WIDTH: usize = 10;

#[derive(Debug, Clone, Tabled)]
struct BlockRow {
    #[tabled(rename = "Block Name")]
    name: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Start Date")]
    start_date: String,
    #[tabled(rename = "End Date")]
    end_date: String,
    #[tabled(rename = "Pickup")]
    pickup: String,
    #[tabled(rename = "Revenue")]
    actual_revenue: String,
    #[tabled(rename = "Forecasted Revenue")]
    forecasted_revenue: String,
}

impl From<&BlockSummaryRow> for BlockRow {
    fn from(row: &BlockSummaryRow) -> Self {
        Self {
            name: row.name.clone(),
            code: row.code.clone(),
            status: row.status.clone(),
            start_date: row.start_date.clone(),
            end_date: row.end_date.clone(),
            pickup: format!(
                "{} {}% ({}/{})",
                pickup_bar(row.pickup),
                row.pickup,
                row.confirmed,
                row.allotted
            ),
            actual_revenue: format_usd(row.actual_revenue),
            forecasted_revenue: format_usd(row.forecasted_revenue),
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct DetailTableRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Room Type")]
    room_type: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Allotted")]
    allotted: i64,
    #[tabled(rename = "Confirmed")]
    confirmed: i64,
    #[tabled(rename = "Remaining")]
    remaining: i64,
    #[tabled(rename = "Pickup %")]
    pickup: String,
    #[tabled(rename = "Revenue")]
    actual_revenue: String,
    #[tabled(rename = "Forecasted")]
    forecasted_revenue: String,
}

impl From<&DetailRow> for DetailTableRow {
    fn from(row: &DetailRow) -> Self {
        Self {
            date: row.date.clone(),
            room_type: row.room_type.clone(),
            rate: format_amount(row.rate),
            allotted: row.allotted,
            confirmed: row.confirmed,
            remaining: row.remaining,
            pickup: format!("{}%", row.pickup),
            actual_revenue: format_usd(row.actual_revenue),
            forecasted_revenue: format_usd(row.forecasted_revenue),
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct ReservationRow {
    #[tabled(rename = "Reservation ID")]
    id: String,
    #[tabled(rename = "Guest Name")]
    guest_name: String,
    #[tabled(rename = "Check-in")]
    check_in: String,
    #[tabled(rename = "Check-out")]
    check_out: String,
    #[tabled(rename = "Nights")]
    nights: String,
    #[tabled(rename = "Adults")]
    adults: String,
    #[tabled(rename = "Children")]
    children: String,
    #[tabled(rename = "Room Type")]
    room_type: String,
    #[tabled(rename = "Room Number")]
    room_number: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Reservation> for ReservationRow {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id.clone(),
            guest_name: r.guest_name.clone(),
            check_in: format_date(r.check_in),
            check_out: format_date(r.check_out),
            nights: r.nights.to_string(),
            adults: r.adults.clone(),
            children: r.children.clone(),
            room_type: r.room_type.clone(),
            room_number: r.room_number.clone(),
            status: format!("{} ({})", r.status, r.status_colour().name()),
        }
    }
}

/// `██████░░░░` style bar, one cell per 10%
pub fn pickup_bar(pickup: u32) -> String {
    let filled = (pickup.min(100) as usize * BAR_WIDTH + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn render_report(view: &ReportView) -> String {
    let header = &view.header;
    let mut out = String::new();
    let _ = writeln!(out, "GROUP ALLOTMENT REPORT ({})", header.date_range);
    let _ = writeln!(
        out,
        "  Groups: {} | Blocks: {} | Forecasted Revenue: {} | Status: {}",
        header.total_groups,
        header.total_blocks,
        format_usd(header.total_forecasted_revenue),
        header.status_filter
    );
    out.push('\n');

    if view.is_empty() {
        out.push_str(NO_DATA);
        out.push('\n');
        return out;
    }

    for group in &view.groups {
        render_group(&mut out, group);
    }
    out
}

fn render_group(out: &mut String, group: &GroupView) {
    let marker = if group.expanded { '▾' } else { '▸' };
    let _ = writeln!(
        out,
        "{} {}  {} blocks | {} forecasted",
        marker,
        group.title,
        group.total_blocks,
        format_usd(group.forecasted_revenue)
    );
    if !group.expanded {
        return;
    }

    let rows: Vec<BlockRow> = group.blocks.iter().map(BlockRow::from).collect();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(5..)).with(Alignment::right()))
        .to_string();
    let _ = writeln!(out, "{}", table);

    for detail in group.details.iter().filter(|d| d.expanded) {
        render_detail(out, detail);
    }
    out.push('\n');
}

fn render_detail(out: &mut String, detail: &BlockDetail) {
    match &detail.block_code {
        Some(code) => {
            let _ = writeln!(out, "  {} ({})", detail.block_name, code);
        }
        None => {
            let _ = writeln!(out, "  {}", detail.block_name);
        }
    }
    let rows: Vec<DetailTableRow> = detail.rows.iter().map(DetailTableRow::from).collect();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
        .to_string();
    let _ = writeln!(out, "{}", table);
}

pub fn render_panel(panel: &DrilldownPanel) -> String {
    let mut out = format!("RESERVATIONS: {} ({})\n", panel.block_name, panel.block_code);
    match &panel.content {
        PanelContent::Loading => out.push_str("Loading reservations...\n"),
        PanelContent::NoData => {
            out.push_str(NO_RESERVATIONS);
            out.push('\n');
        }
        PanelContent::Error { message, .. } => {
            let _ = writeln!(out, "Error loading reservations: {}", message);
        }
        PanelContent::Reservations(reservations) => {
            let rows: Vec<ReservationRow> =
                reservations.iter().map(ReservationRow::from).collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            let _ = writeln!(out, "{}", table);
            let _ = writeln!(out, "{} reservations", reservations.len());
        }
    }
    out
}

pub fn render_notice(notice: &Notice) -> String {
    let label = match notice.level {
        NoticeLevel::Error => "error",
        NoticeLevel::Warning => "warning",
    };
    format!("{}: {}", label, notice.message)
}
