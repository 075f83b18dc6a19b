use crate::utils::lenient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Group allotment report as produced by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default, deserialize_with = "lenient")]
    pub date_range: DateRange,
    #[serde(default, deserialize_with = "lenient")]
    pub summary: ReportSummary,
    #[serde(default, deserialize_with = "lenient")]
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, deserialize_with = "lenient")]
    pub start_date: String,
    #[serde(default, deserialize_with = "lenient")]
    pub end_date: String,
}

impl DateRange {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    pub fn display(&self) -> String {
        format!("{} to {}", self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    #[serde(default, deserialize_with = "lenient")]
    pub total_groups: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub total_allotment_blocks: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub total_forecasted_revenue: Decimal,
}

/// Blocks booked under one group (company, wedding, tour...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_blocks: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub total_forecasted_revenue: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub allotment_blocks: Vec<Block>,
}

impl Group {
    /// `display_name` when the backend sent one, otherwise `"<name> (<code>)"`
    pub fn title(&self) -> String {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("{} ({})", self.name, self.code),
        }
    }
}

/// A reserved pool of rooms held for a group across a date range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub dates_data: Vec<DateEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub forecasted_revenue: Decimal,
}

impl Block {
    /// Block code, if present and non-blank
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateEntry {
    /// ISO `YYYY-MM-DD`, so lexical order is chronological order
    #[serde(default, deserialize_with = "lenient")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient")]
    pub room_types: Vec<RoomTypeStat>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomTypeStat {
    #[serde(default, deserialize_with = "lenient")]
    pub room_type_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub rate: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub block_allotted: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub block_confirmed: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub block_remaining: i64,
    /// As computed upstream; summaries always recompute from the counts
    #[serde(default, deserialize_with = "lenient")]
    pub pickup_percentage: Decimal,
}

/// The last successfully fetched report together with the exact payload bytes it was
/// decoded from.
#[derive(Debug, Clone)]
pub struct LoadedReport {
    pub report: Report,
    raw: Box<RawValue>,
}

impl LoadedReport {
    pub fn from_raw(raw: Box<RawValue>) -> Result<Self, serde_json::Error> {
        let report = serde_json::from_str(raw.get())?;
        Ok(Self { report, raw })
    }

    #[cfg(test)]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Self::from_raw(RawValue::from_string(json.to_string())?)
    }

    /// Payload exactly as received from the backend
    pub fn raw_json(&self) -> &str {
        self.raw.get()
    }

    /// Every block across all groups, in group then block order
    pub fn blocks(&self) -> impl Iterator<Item = (&Group, &Block)> {
        self.report
            .groups
            .iter()
            .flat_map(|group| group.allotment_blocks.iter().map(move |block| (group, block)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ACME: &str = r#"{
        "date_range": {"start_date": "2025-06-01", "end_date": "2025-07-01"},
        "summary": {"total_groups": 1, "total_allotment_blocks": 1, "total_forecasted_revenue": 1000.0},
        "groups": [{
            "name": "Acme Corp",
            "code": "ACME",
            "display_name": "Acme Corp (ACME)",
            "total_blocks": 1,
            "total_forecasted_revenue": 1000.0,
            "allotment_blocks": [{
                "id": "901",
                "name": "Acme Summit",
                "code": "ACME-JUN",
                "status": "definite",
                "forecasted_revenue": 1000.0,
                "dates_data": [{
                    "date": "2025-06-01",
                    "room_types": [{
                        "room_type_id": "KING",
                        "rate": 100.0,
                        "block_allotted": 10,
                        "block_confirmed": 6,
                        "block_remaining": 4,
                        "pickup_percentage": 60.0
                    }]
                }]
            }]
        }]
    }"#;

    #[test]
    fn decodes_backend_report() {
        let loaded = LoadedReport::from_json(ACME).unwrap();
        let report = &loaded.report;

        assert_eq!(report.date_range.display(), "2025-06-01 to 2025-07-01");
        assert_eq!(report.summary.total_groups, 1);
        assert_eq!(report.groups[0].title(), "Acme Corp (ACME)");

        let block = &report.groups[0].allotment_blocks[0];
        assert_eq!(block.code(), Some("ACME-JUN"));
        let room = &block.dates_data[0].room_types[0];
        assert_eq!(room.rate, dec!(100));
        assert_eq!(room.block_allotted, 10);
        assert_eq!(room.block_confirmed, 6);
    }

    #[test]
    fn raw_payload_is_kept_verbatim() {
        let loaded = LoadedReport::from_json(ACME).unwrap();
        assert_eq!(loaded.raw_json(), ACME);
    }

    #[test]
    fn missing_and_null_fields_default() {
        let json = r#"{
            "groups": [{
                "name": "Walk-in",
                "code": null,
                "allotment_blocks": [
                    {"name": "No dates", "dates_data": null},
                    {"name": "Sparse", "status": null, "dates_data": [
                        {"date": "2025-06-02", "room_types": [{"room_type_id": "QUEEN", "rate": null}]}
                    ]}
                ]
            }]
        }"#;
        let report: Report = serde_json::from_str(json).unwrap();
        let group = &report.groups[0];

        assert_eq!(group.code, "");
        assert_eq!(group.title(), "Walk-in ()");
        assert!(group.allotment_blocks[0].dates_data.is_empty());
        assert_eq!(group.allotment_blocks[0].code(), None);

        let room = &group.allotment_blocks[1].dates_data[0].room_types[0];
        assert_eq!(room.rate, Decimal::ZERO);
        assert_eq!(room.block_allotted, 0);
        assert_eq!(report.summary, ReportSummary::default());
    }

    #[test]
    fn blocks_iterate_in_source_order() {
        let json = r#"{"groups": [
            {"name": "A", "code": "A", "allotment_blocks": [{"name": "a1"}, {"name": "a2"}]},
            {"name": "B", "code": "B", "allotment_blocks": [{"name": "b1"}]}
        ]}"#;
        let loaded = LoadedReport::from_json(json).unwrap();
        let names: Vec<_> = loaded.blocks().map(|(_, b)| b.name.as_str()).collect();
        assert_eq!(names, vec!["a1", "a2", "b1"]);
    }
}
