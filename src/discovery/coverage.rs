use crate::core::types::{MONTHS, ReconciledRecord, SchedulePeriod};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    // English month word, or the Korean "N월" label not preceded by another digit
    // (so "12월" never counts as February).
    static ref MONTH_MENTIONS: Vec<Regex> = MONTHS
        .iter()
        .enumerate()
        .map(|(i, name)| Regex::new(&format!(r"(?i)\b{}\b|(?:^|[^0-9]){}월", name, i + 1)).unwrap())
        .collect();
}

/// Whether `text` refers to the 1-based `month`, by name or Korean label.
pub fn mentions_month(text: &str, month: u32) -> bool {
    (month as usize)
        .checked_sub(1)
        .and_then(|i| MONTH_MENTIONS.get(i))
        .is_some_and(|re| re.is_match(text))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageEntry {
    pub period_id: String,
    pub month: u32,
    pub label: String,
    pub covered: bool,
    /// Identifiers of records whose normalized title names this month.
    pub matched_by: Vec<String>,
}

/// Which schedule months have at least one record mentioning them. A text
/// association only; records carry no schedule key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub entries: Vec<CoverageEntry>,
    pub covered: usize,
    pub total: usize,
    pub ratio: f64,
    pub unmatched_months: Vec<u32>,
}

impl CoverageReport {
    pub fn compute(schedule: &[SchedulePeriod], records: &[ReconciledRecord]) -> Self {
        let entries: Vec<CoverageEntry> = schedule
            .iter()
            .map(|p| {
                let matched_by: Vec<String> = records
                    .iter()
                    .filter(|r| mentions_month(&r.title_normalized, p.month))
                    .map(|r| r.identifier.clone())
                    .collect();
                CoverageEntry {
                    period_id: p.period_id.clone(),
                    month: p.month,
                    label: p.label.clone(),
                    covered: !matched_by.is_empty(),
                    matched_by,
                }
            })
            .collect();

        let total = entries.len();
        let covered = entries.iter().filter(|e| e.covered).count();
        let unmatched_months = entries
            .iter()
            .filter(|e| !e.covered)
            .map(|e| e.month)
            .collect();

        Self {
            ratio: if total == 0 { 0.0 } else { covered as f64 / total as f64 },
            entries,
            covered,
            total,
            unmatched_months,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.covered == self.total
    }

    pub fn is_covered(&self, month: u32) -> bool {
        self.entries.iter().any(|e| e.month == month && e.covered)
    }

    pub fn uncovered<'a>(&self, schedule: &'a [SchedulePeriod]) -> Vec<&'a SchedulePeriod> {
        schedule
            .iter()
            .filter(|p| !self.is_covered(p.month))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ClockContext;
    use crate::core::types::{DiscoverySource, RecordKind};
    use crate::schedule::provider::ScheduleProvider;

    fn record(id: &str, normalized: &str) -> ReconciledRecord {
        ReconciledRecord {
            identifier: id.to_string(),
            title_raw: String::new(),
            title_normalized: normalized.to_string(),
            resolution_date: None,
            closed: false,
            kind: RecordKind::Decision,
            sub_items: vec![],
            discovery_source: DiscoverySource::ExactLookup,
        }
    }

    #[test]
    fn test_month_mentions() {
        assert!(mentions_month("3월 FOMC 금리 결정", 3));
        assert!(mentions_month("12월 FOMC 금리 결정", 12));
        assert!(!mentions_month("12월 FOMC 금리 결정", 2));
        assert!(mentions_month("Fed decision in October", 10));
        assert!(!mentions_month("Septembers", 9));
        assert!(!mentions_month("anything", 0));
        assert!(!mentions_month("anything", 13));
    }

    #[test]
    fn test_compute_reports_unmatched() {
        let clock = ClockContext::at_date(2030, 1, 1).unwrap();
        let schedule = ScheduleProvider::new().build(2030, &clock);
        let records = vec![
            record("a", "1월 FOMC 금리 결정"),
            record("b", "12월 FOMC 금리 결정"),
            record("c", "2030년 Fed 금리 인하 여부"),
        ];

        let report = CoverageReport::compute(&schedule, &records);
        assert_eq!(report.total, 8);
        assert_eq!(report.covered, 2);
        assert_eq!(report.unmatched_months, vec![3, 4, 6, 7, 9, 10]);
        assert!((report.ratio - 0.25).abs() < 1e-9);
        assert!(!report.is_complete());
        assert_eq!(report.entries[0].matched_by, vec!["a".to_string()]);
        assert_eq!(report.uncovered(&schedule).len(), 6);
    }

    #[test]
    fn test_empty_records_zero_coverage() {
        let clock = ClockContext::at_date(2026, 1, 1).unwrap();
        let schedule = ScheduleProvider::new().build(2026, &clock);
        let report = CoverageReport::compute(&schedule, &[]);
        assert_eq!(report.covered, 0);
        assert_eq!(report.ratio, 0.0);
        assert_eq!(report.unmatched_months.len(), 8);
    }
}
