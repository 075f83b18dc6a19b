//! Multi-section CSV export.
//!
//! Sections, in order: report summary, group overview, block details (one row per date and
//! room type) and reservations. Each section starts with a title row and a header row and is
//! separated from the next by a blank row.

use super::BlockReservations;
use crate::core::reservation::format_iso_date;
use crate::core::{block_totals, group_totals, report_totals, room_pickup, room_revenue, Report};
use crate::utils::format_amount;
use csv::{QuoteStyle, WriterBuilder};
use std::io::Write;

const SUMMARY_HEADER: &[&str] = &[
    "Start Date",
    "End Date",
    "Total Groups",
    "Total Allotment Blocks",
    "Total Confirmed",
    "Total Allotted",
    "Pickup %",
    "Actual Revenue",
    "Forecasted Revenue",
];

const GROUP_HEADER: &[&str] = &[
    "Group Name",
    "Group Code",
    "Total Blocks",
    "Confirmed",
    "Allotted",
    "Pickup %",
    "Actual Revenue",
    "Forecasted Revenue",
];

const DETAIL_HEADER: &[&str] = &[
    "Group Name",
    "Group Code",
    "Block Name",
    "Block Code",
    "Block Status",
    "Date",
    "Room Type",
    "Rate",
    "Allotted",
    "Confirmed",
    "Remaining",
    "Pickup %",
    "Actual Revenue",
    "Forecasted Revenue",
];

const RESERVATION_HEADER: &[&str] = &[
    "Group Name",
    "Block Name",
    "Block Code",
    "Reservation ID",
    "Guest Name",
    "Check-in",
    "Check-out",
    "Nights",
    "Adults",
    "Children",
    "Room Type",
    "Room Number",
    "Status",
    "Total Amount",
];

/// Write the full report. `reservations` holds only the blocks whose reservations could be
/// fetched, in report order; when it is empty the reservation section is left out.
pub fn write_report<W: Write>(
    report: &Report,
    reservations: &[BlockReservations],
    writer: W,
) -> anyhow::Result<()> {
    let mut wtr = WriterBuilder::new()
        .flexible(true)
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(writer);

    // Report summary
    let totals = report_totals(report);
    wtr.write_record(["Report Summary"])?;
    wtr.write_record(SUMMARY_HEADER)?;
    wtr.write_record([
        report.date_range.start_date.clone(),
        report.date_range.end_date.clone(),
        totals.groups.to_string(),
        totals.blocks.to_string(),
        totals.totals.total_confirmed.to_string(),
        totals.totals.total_allotted.to_string(),
        totals.totals.pickup.to_string(),
        format_amount(totals.totals.actual_revenue),
        format_amount(totals.totals.forecasted_revenue),
    ])?;
    wtr.write_record([""])?;

    // Group overview
    wtr.write_record(["Group Overview"])?;
    wtr.write_record(GROUP_HEADER)?;
    for group in &report.groups {
        let totals = group_totals(group);
        wtr.write_record([
            group.name.clone(),
            group.code.clone(),
            group.allotment_blocks.len().to_string(),
            totals.total_confirmed.to_string(),
            totals.total_allotted.to_string(),
            totals.pickup.to_string(),
            format_amount(totals.actual_revenue),
            format_amount(totals.forecasted_revenue),
        ])?;
    }
    wtr.write_record([""])?;

    // Block details
    wtr.write_record(["Block Details"])?;
    wtr.write_record(DETAIL_HEADER)?;
    for group in &report.groups {
        for block in &group.allotment_blocks {
            let block_code = block.code().unwrap_or_default();
            let block_status = block.status.as_deref().unwrap_or_default();
            for entry in &block.dates_data {
                for room in &entry.room_types {
                    let (actual, forecasted) = room_revenue(room);
                    wtr.write_record([
                        group.name.as_str(),
                        group.code.as_str(),
                        block.name.as_str(),
                        block_code,
                        block_status,
                        entry.date.as_str(),
                        room.room_type_id.as_str(),
                        &format_amount(room.rate),
                        &room.block_allotted.to_string(),
                        &room.block_confirmed.to_string(),
                        &room.block_remaining.to_string(),
                        &room_pickup(room).to_string(),
                        &format_amount(actual),
                        &format_amount(forecasted),
                    ])?;
                }
            }
            log::debug!(
                "Exported block {} ({} confirmed)",
                block.name,
                block_totals(block).total_confirmed
            );
        }
    }

    // Reservations
    if !reservations.is_empty() {
        wtr.write_record([""])?;
        wtr.write_record(["Reservations"])?;
        wtr.write_record(RESERVATION_HEADER)?;
        for block in reservations {
            for reservation in &block.reservations {
                wtr.write_record([
                    block.group_name.clone(),
                    block.block_name.clone(),
                    block.block_code.clone(),
                    reservation.id.clone(),
                    reservation.guest_name.clone(),
                    format_iso_date(reservation.check_in),
                    format_iso_date(reservation.check_out),
                    reservation.nights.to_string(),
                    reservation.adults.clone(),
                    reservation.children.clone(),
                    reservation.room_type.clone(),
                    reservation.room_number.clone(),
                    reservation.status.clone(),
                    reservation
                        .total_amount
                        .map(format_amount)
                        .unwrap_or_default(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
