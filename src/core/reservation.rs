//! Normalization of upstream reservation records.
//!
//! Reservations come back from the property-management API with field names that vary by
//! endpoint and by whether a room has been assigned. Each logical field is resolved from an
//! ordered list of candidate source fields; the first non-empty one wins.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Reservation exactly as returned by the backend
pub type RawReservation = Value;

pub const RESERVATION_ID_FIELDS: &[&str] = &["reservationID", "reservationId", "id"];
pub const GUEST_NAME_FIELDS: &[&str] = &["guestName"];
pub const CHECK_IN_FIELDS: &[&str] = &["startDate"];
pub const CHECK_OUT_FIELDS: &[&str] = &["endDate"];
pub const ADULTS_FIELDS: &[&str] = &["adults"];
pub const CHILDREN_FIELDS: &[&str] = &["children"];
pub const STATUS_FIELDS: &[&str] = &["status"];
pub const TOTAL_FIELDS: &[&str] = &["total", "grandTotal", "balance"];

/// Room lists inspected in order; only the first entry of each list is authoritative
pub const ROOM_LISTS: &[&str] = &["assigned", "unassigned"];
pub const ROOM_TYPE_FIELDS: &[&str] = &["roomTypeName", "roomType", "subRoomName"];
pub const ROOM_NUMBER_FIELDS: &[&str] = &["roomName", "roomNumber", "room"];

pub const GUEST_NAME_UNAVAILABLE: &str = "Guest Name Not Available";
pub const NO_ROOM_TYPE: &str = "-";
pub const UNASSIGNED_ROOM: &str = "Unassigned";
pub const UNKNOWN_STATUS: &str = "Unknown";
pub const NO_VALUE: &str = "-";

/// Status substrings (lowercase) mapped to a display colour; first match wins
pub const STATUS_COLOURS: &[(&[&str], StatusColour)] = &[
    (&["confirm"], StatusColour::Green),
    (&["checkedin", "arrived"], StatusColour::Blue),
    (&["cancelled"], StatusColour::Red),
    (&["pending"], StatusColour::Orange),
    (&["checkout", "departed"], StatusColour::Purple),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusColour {
    Green,
    Blue,
    Red,
    Orange,
    Purple,
    Gray,
}

impl StatusColour {
    pub fn for_status(status: &str) -> Self {
        let status = status.to_lowercase();
        STATUS_COLOURS
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| status.contains(n)))
            .map(|(_, colour)| *colour)
            .unwrap_or(StatusColour::Gray)
    }

    pub fn name(self) -> &'static str {
        match self {
            StatusColour::Green => "green",
            StatusColour::Blue => "blue",
            StatusColour::Red => "red",
            StatusColour::Orange => "orange",
            StatusColour::Purple => "purple",
            StatusColour::Gray => "gray",
        }
    }
}

/// Length of stay; `Unknown` when either date is unparsable or the stay is not positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Nights {
    Count(i64),
    Unknown,
}

impl fmt::Display for Nights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nights::Count(n) => write!(f, "{}", n),
            Nights::Unknown => f.write_str(NO_VALUE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reservation {
    pub id: String,
    pub guest_name: String,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub nights: Nights,
    pub adults: String,
    pub children: String,
    pub room_type: String,
    pub room_number: String,
    pub status: String,
    pub total_amount: Option<Decimal>,
}

impl Reservation {
    pub fn status_colour(&self) -> StatusColour {
        StatusColour::for_status(&self.status)
    }
}

pub fn normalize(raw: &RawReservation) -> Reservation {
    let check_in = first_text(raw, CHECK_IN_FIELDS).and_then(|d| parse_date(&d));
    let check_out = first_text(raw, CHECK_OUT_FIELDS).and_then(|d| parse_date(&d));
    let room = first_room(raw);

    Reservation {
        id: first_text(raw, RESERVATION_ID_FIELDS).unwrap_or_else(|| NO_VALUE.to_string()),
        guest_name: first_text(raw, GUEST_NAME_FIELDS)
            .unwrap_or_else(|| GUEST_NAME_UNAVAILABLE.to_string()),
        check_in,
        check_out,
        nights: nights_between(check_in, check_out),
        adults: first_text(raw, ADULTS_FIELDS).unwrap_or_else(|| NO_VALUE.to_string()),
        children: first_text(raw, CHILDREN_FIELDS).unwrap_or_else(|| "0".to_string()),
        room_type: room
            .and_then(|r| first_text(r, ROOM_TYPE_FIELDS))
            .unwrap_or_else(|| NO_ROOM_TYPE.to_string()),
        room_number: room
            .and_then(|r| first_text(r, ROOM_NUMBER_FIELDS))
            .unwrap_or_else(|| UNASSIGNED_ROOM.to_string()),
        status: first_text(raw, STATUS_FIELDS).unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
        total_amount: first_decimal(raw, TOTAL_FIELDS),
    }
}

/// First of `fields` present on `record` as a non-blank string or a number
pub fn first_text(record: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| match record.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn first_decimal(record: &Value, fields: &[&str]) -> Option<Decimal> {
    fields.iter().find_map(|field| match record.get(field)? {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    })
}

/// The room both room attributes are read from: `assigned[0]`, else `unassigned[0]`
fn first_room(record: &Value) -> Option<&Value> {
    ROOM_LISTS
        .iter()
        .find_map(|list| record.get(list)?.as_array()?.first())
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime);
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.naive_utc())
}

/// Whole nights between the two dates, rounded up
pub fn nights_between(check_in: Option<NaiveDateTime>, check_out: Option<NaiveDateTime>) -> Nights {
    let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
        return Nights::Unknown;
    };
    const DAY: i64 = 86_400;
    let seconds = (check_out - check_in).num_seconds();
    let nights = seconds.div_euclid(DAY) + i64::from(seconds.rem_euclid(DAY) > 0);
    if nights > 0 {
        Nights::Count(nights)
    } else {
        Nights::Unknown
    }
}

/// `MM/DD/YYYY`, or `-` when the date is missing
pub fn format_date(date: Option<NaiveDateTime>) -> String {
    date.map_or_else(
        || NO_VALUE.to_string(),
        |d| d.format("%m/%d/%Y").to_string(),
    )
}

/// `YYYY-MM-DD`, or an empty string when the date is missing
pub fn format_iso_date(date: Option<NaiveDateTime>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
