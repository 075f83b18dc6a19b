pub mod aggregate;
pub mod report;
pub mod reservation;

// Flat public surface for domain types and functions.
pub use aggregate::{
    block_date_span, block_totals, group_totals, report_totals, room_pickup, room_revenue,
};
pub use report::{Block, DateRange, Group, LoadedReport, Report};
pub use reservation::{normalize, RawReservation, Reservation};
