use crate::auxiliary::AuxiliaryData;
use crate::auxiliary::kalshi::KalshiSeries;
use crate::auxiliary::sofr::RatePoint;
use crate::auxiliary::target_rate::TargetRate;
use crate::core::clock::ClockContext;
use crate::core::types::{ReconciledRecord, SchedulePeriod};
use crate::discovery::coordinator::{ReconciliationOutcome, RunPhase, TierTrace};
use crate::discovery::coverage::CoverageReport;
use crate::discovery::store::sort_by_resolution_date;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: DateTime<Utc>,
    pub schema_version: u32,
    pub generator: String,
    pub year: i32,
    pub final_phase: RunPhase,
    pub phases: Vec<TierTrace>,
}

/// The persisted bundle. Auxiliary sections serialize as `null` when their
/// fetch was disabled or failed; the keys are always present.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub meta: Meta,
    pub schedule: Vec<SchedulePeriod>,
    pub sofr_series: Option<Vec<RatePoint>>,
    pub target_rate: Option<TargetRate>,
    pub kalshi: Option<Vec<KalshiSeries>>,
    pub reconciled_records: Vec<ReconciledRecord>,
    pub coverage: CoverageReport,
}

/// Pure assembly. Records are re-sorted so the document order never depends
/// on the caller.
pub fn assemble(
    year: i32,
    outcome: ReconciliationOutcome,
    aux: AuxiliaryData,
    clock: &ClockContext,
) -> Document {
    let ReconciliationOutcome {
        schedule,
        mut records,
        coverage,
        trace,
        phase,
    } = outcome;
    sort_by_resolution_date(&mut records);

    Document {
        meta: Meta {
            generated_at: clock.now(),
            schema_version: SCHEMA_VERSION,
            generator: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            year,
            final_phase: phase,
            phases: trace,
        },
        schedule,
        sofr_series: aux.sofr_series,
        target_rate: aux.target_rate,
        kalshi: aux.kalshi,
        reconciled_records: records,
        coverage,
    }
}
