use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// The single "now" of a run. Captured once in `main` and handed to
/// everything that compares against the current date, so tests can pin it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockContext {
    now: DateTime<Utc>,
}

impl ClockContext {
    pub fn system() -> Self {
        Self { now: Utc::now() }
    }

    #[cfg(test)]
    pub fn fixed(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Midnight UTC on the given date; `None` for an impossible date.
    #[cfg(test)]
    pub fn at_date(year: i32, month: u32, day: u32) -> Option<Self> {
        use chrono::TimeZone;
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .map(Self::fixed)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    pub fn today_iso(&self) -> String {
        self.today().format("%Y-%m-%d").to_string()
    }

    pub fn year(&self) -> i32 {
        self.now.year()
    }
}
