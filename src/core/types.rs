use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

pub const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

pub const MONTH_LABELS_KO: [&str; 12] = [
    "1월", "2월", "3월", "4월", "5월", "6월", "7월", "8월", "9월", "10월", "11월", "12월",
];

/// Lowercase English month name for a 1-based month.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTHS.get((month as usize).checked_sub(1)?).copied()
}

pub fn month_label_ko(month: u32) -> Option<&'static str> {
    MONTH_LABELS_KO
        .get((month as usize).checked_sub(1)?)
        .copied()
}

// ----------- Schedule -----------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchedulePeriod {
    pub period_id: String,
    pub year: i32,
    pub month: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub label: String,
    pub label_en: String,
    pub is_past: bool,
}

// ----------- Discovery -----------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoverySource {
    ExactLookup,
    TagSearch,
    TextSearch,
    EnumerativeProbe,
}

impl DiscoverySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoverySource::ExactLookup => "exact_lookup",
            DiscoverySource::TagSearch => "tag_search",
            DiscoverySource::TextSearch => "text_search",
            DiscoverySource::EnumerativeProbe => "enumerative_probe",
        }
    }
}

impl fmt::Display for DiscoverySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One market inside an event, as read off the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSubItem {
    pub question: String,
    pub group_item_title: String,
    pub outcomes: Vec<String>,
    pub prices: Vec<Decimal>,
    pub volume: Decimal,
    pub liquidity: Decimal,
}

/// An external event record before filtering. Lives for one discovery pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCandidate {
    pub identifier: String,
    pub title: String,
    pub resolution_date: Option<String>, // as published, e.g. "2026-03-18T00:00:00Z"
    pub closed: bool,
    pub sub_items: Vec<RawSubItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubItem {
    pub question_raw: String,
    pub question_normalized: String,
    pub group_item_title_raw: String,
    pub group_item_title_normalized: String,
    pub outcome_labels_raw: Vec<String>,
    pub outcome_labels_normalized: Vec<String>,
    pub implied_prices: Vec<Decimal>,
    pub volume: Decimal,
    pub liquidity: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A single meeting's rate decision market.
    Decision,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledRecord {
    pub identifier: String,
    pub title_raw: String,
    pub title_normalized: String,
    pub resolution_date: Option<String>,
    pub closed: bool,
    pub kind: RecordKind,
    pub sub_items: Vec<SubItem>,
    pub discovery_source: DiscoverySource,
}
