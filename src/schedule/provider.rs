use crate::config::config::{KnownYearCfg, MeetingCfg};
use crate::core::clock::ClockContext;
use crate::core::types::{SchedulePeriod, month_label_ko, month_name};
use chrono::{Datelike, Months, NaiveDate};
use std::collections::HashMap;
use tracing::{debug, warn};

/// (month, first day, last day). A last day smaller than the first day
/// means the meeting runs into the following month.
type Meeting = (u32, u32, u32);

const KNOWN_MEETINGS: &[(i32, [Meeting; 8])] = &[
    (
        2024,
        [
            (1, 30, 31),
            (3, 19, 20),
            (4, 30, 1),
            (6, 11, 12),
            (7, 30, 31),
            (9, 17, 18),
            (11, 6, 7),
            (12, 17, 18),
        ],
    ),
    (
        2025,
        [
            (1, 28, 29),
            (3, 18, 19),
            (5, 6, 7),
            (6, 17, 18),
            (7, 29, 30),
            (9, 16, 17),
            (10, 28, 29),
            (12, 9, 10),
        ],
    ),
    (
        2026,
        [
            (1, 27, 28),
            (3, 17, 18),
            (5, 5, 6),
            (6, 16, 17),
            (7, 28, 29),
            (9, 15, 16),
            (10, 27, 28),
            (12, 8, 9),
        ],
    ),
];

/// Eight meetings a year, roughly every six weeks.
const DEFAULT_CADENCE: [Meeting; 8] = [
    (1, 27, 28),
    (3, 17, 18),
    (4, 28, 29),
    (6, 16, 17),
    (7, 28, 29),
    (9, 15, 16),
    (10, 27, 28),
    (12, 8, 9),
];

pub struct ScheduleProvider {
    table: HashMap<i32, Vec<Meeting>>,
}

impl Default for ScheduleProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleProvider {
    pub fn new() -> Self {
        let table = KNOWN_MEETINGS
            .iter()
            .map(|(year, meetings)| (*year, meetings.to_vec()))
            .collect();
        Self { table }
    }

    /// Layers configured years over the built-in table.
    pub fn with_known_years(mut self, known: &[KnownYearCfg]) -> Self {
        for k in known {
            let meetings = k
                .meetings
                .iter()
                .map(|MeetingCfg { month, start_day, end_day }| (*month, *start_day, *end_day))
                .collect();
            self.table.insert(k.year, meetings);
        }
        self
    }

    pub fn is_known(&self, year: i32) -> bool {
        self.table.contains_key(&year)
    }

    /// Canonical decision periods for `year`, sorted by start date. Never empty:
    /// unknown years (or a table that yields no valid dates) fall back to the
    /// default cadence. Any year in `SUPPORTED_YEARS` has valid cadence dates.
    pub fn build(&self, year: i32, clock: &ClockContext) -> Vec<SchedulePeriod> {
        let mut periods = match self.table.get(&year) {
            Some(meetings) => Self::materialize(year, meetings, clock),
            None => {
                debug!(year, "year not in schedule table, using default cadence");
                Vec::new()
            }
        };
        if periods.is_empty() {
            periods = Self::materialize(year, &DEFAULT_CADENCE, clock);
        }

        periods.sort_by_key(|p| p.start_date);
        periods.dedup_by_key(|p| p.month);
        periods
    }

    fn materialize(year: i32, meetings: &[Meeting], clock: &ClockContext) -> Vec<SchedulePeriod> {
        let today = clock.today();
        meetings
            .iter()
            .filter_map(|&(month, start_day, end_day)| {
                let Some(period) = Self::period(year, month, start_day, end_day, today) else {
                    warn!(year, month, start_day, end_day, "skipping impossible meeting date");
                    return None;
                };
                Some(period)
            })
            .collect()
    }

    fn period(
        year: i32,
        month: u32,
        start_day: u32,
        end_day: u32,
        today: NaiveDate,
    ) -> Option<SchedulePeriod> {
        let start_date = NaiveDate::from_ymd_opt(year, month, start_day)?;
        let end_date = if end_day >= start_day {
            NaiveDate::from_ymd_opt(year, month, end_day)?
        } else {
            let next = start_date.with_day(1)?.checked_add_months(Months::new(1))?;
            next.with_day(end_day)?
        };

        Some(SchedulePeriod {
            period_id: format!("fomc-{}-{:02}", year, month),
            year,
            month,
            start_date,
            end_date,
            label: month_label_ko(month)?.to_string(),
            label_en: capitalize(month_name(month)?),
            is_past: end_date < today,
        })
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
