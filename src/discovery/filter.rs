use crate::core::types::RawCandidate;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Resolution years accepted around the target year, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptWindow {
    pub years_before: u32,
    pub years_after: u32,
}

impl AcceptWindow {
    /// Same year only.
    pub fn strict() -> Self {
        Self {
            years_before: 0,
            years_after: 0,
        }
    }

    /// One year either side.
    pub fn broad() -> Self {
        Self {
            years_before: 1,
            years_after: 1,
        }
    }

    pub fn contains(&self, year: i32, target_year: i32) -> bool {
        let lo = target_year.saturating_sub_unsigned(self.years_before);
        let hi = target_year.saturating_add_unsigned(self.years_after);
        (lo..=hi).contains(&year)
    }
}

/// Accepts RFC 3339 timestamps, naive timestamps, and bare dates.
pub fn parse_resolution_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Missing or unreadable resolution dates are accepted; only a parsed year
/// outside the window rejects.
pub fn accept(candidate: &RawCandidate, target_year: i32, window: AcceptWindow) -> bool {
    match candidate
        .resolution_date
        .as_deref()
        .and_then(parse_resolution_date)
    {
        Some(date) => window.contains(date.year(), target_year),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolving(date: Option<&str>) -> RawCandidate {
        RawCandidate {
            identifier: "x".to_string(),
            resolution_date: date.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_target_year_always_accepted() {
        let c = resolving(Some("2026-12-10T00:00:00Z"));
        assert!(accept(&c, 2026, AcceptWindow::strict()));
        assert!(accept(&c, 2026, AcceptWindow::broad()));
    }

    #[test]
    fn test_five_years_back_rejected_under_strict() {
        let c = resolving(Some("2021-06-16T18:00:00Z"));
        assert!(!accept(&c, 2026, AcceptWindow::strict()));
        assert!(!accept(&c, 2026, AcceptWindow::broad()));
    }

    #[test]
    fn test_broad_admits_neighbouring_years_only() {
        assert!(accept(&resolving(Some("2025-12-31")), 2026, AcceptWindow::broad()));
        assert!(accept(&resolving(Some("2027-01-01")), 2026, AcceptWindow::broad()));
        assert!(!accept(&resolving(Some("2028-01-01")), 2026, AcceptWindow::broad()));
        assert!(!accept(&resolving(Some("2027-01-01")), 2026, AcceptWindow::strict()));
    }

    #[test]
    fn test_unparseable_or_missing_date_accepted() {
        for raw in [None, Some(""), Some("soon"), Some("2026-13-45"), Some("31/12/2020")] {
            assert!(accept(&resolving(raw), 2026, AcceptWindow::strict()), "{:?}", raw);
        }
    }

    #[test]
    fn test_window_saturates_at_year_extremes() {
        let w = AcceptWindow {
            years_before: 10,
            years_after: 10,
        };
        assert!(w.contains(i32::MAX, i32::MAX));
        assert!(w.contains(i32::MIN, i32::MIN + 3));
        assert!(!w.contains(0, i32::MAX));
    }

    #[test]
    fn test_date_formats() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
        assert_eq!(parse_resolution_date("2026-03-18T12:00:00Z"), Some(d));
        assert_eq!(parse_resolution_date("2026-03-18T12:00:00.000Z"), Some(d));
        assert_eq!(parse_resolution_date("2026-03-18T12:00:00"), Some(d));
        assert_eq!(parse_resolution_date("2026-03-18"), Some(d));
        assert_eq!(parse_resolution_date("2026-03-18 12:00:00"), Some(d));
    }
}
