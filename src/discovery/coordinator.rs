use crate::config::config::DiscoveryCfg;
use crate::core::clock::ClockContext;
use crate::core::types::{DiscoverySource, ReconciledRecord, SchedulePeriod};
use crate::discovery::coverage::CoverageReport;
use crate::discovery::intake::{DiscoveryError, Intake};
use crate::discovery::relevance::TopicMatcher;
use crate::discovery::store::CandidateStore;
use crate::discovery::strategies::{self, DiscoveryStrategy, QueryContext, TierStats};
use crate::schedule::provider::ScheduleProvider;
use crate::source::client::MarketSource;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Forward-only run state. One step per tier, then `Finalized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunPhase {
    Init,
    ExactDone,
    TagDone,
    TextDone,
    ProbeDone,
    Finalized,
}

impl RunPhase {
    pub fn next(self) -> RunPhase {
        match self {
            RunPhase::Init => RunPhase::ExactDone,
            RunPhase::ExactDone => RunPhase::TagDone,
            RunPhase::TagDone => RunPhase::TextDone,
            RunPhase::TextDone => RunPhase::ProbeDone,
            RunPhase::ProbeDone | RunPhase::Finalized => RunPhase::Finalized,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierTrace {
    pub phase: RunPhase,
    pub source: DiscoverySource,
    /// Coverage was already complete, so the tier issued no queries.
    pub skipped: bool,
    pub stats: TierStats,
    pub covered_after: usize,
}

#[derive(Debug, Clone)]
pub struct ReconciliationOutcome {
    pub schedule: Vec<SchedulePeriod>,
    /// Sorted by resolution date.
    pub records: Vec<ReconciledRecord>,
    pub coverage: CoverageReport,
    pub trace: Vec<TierTrace>,
    pub phase: RunPhase,
}

pub struct ReconciliationCoordinator<S: MarketSource> {
    source: Arc<S>,
    schedule: ScheduleProvider,
    clock: ClockContext,
    topic: TopicMatcher,
    tiers: Vec<Box<dyn DiscoveryStrategy>>,
    max_records: usize,
}

impl<S: MarketSource> ReconciliationCoordinator<S> {
    pub fn new(
        source: Arc<S>,
        schedule: ScheduleProvider,
        clock: ClockContext,
        cfg: &DiscoveryCfg,
    ) -> Self {
        Self {
            source,
            schedule,
            clock,
            topic: TopicMatcher::new(&cfg.keywords),
            tiers: strategies::tiers(cfg),
            max_records: cfg.max_records,
        }
    }

    /// Runs the tiers in order, re-measuring coverage after each and skipping
    /// a tier once every scheduled month is covered. Query failures never end
    /// the run; only `DiscoveryError` does.
    pub async fn run(&self, year: i32) -> Result<ReconciliationOutcome, DiscoveryError> {
        let schedule = self.schedule.build(year, &self.clock);
        let mut store = CandidateStore::new();
        let mut phase = RunPhase::Init;
        let mut trace = Vec::with_capacity(self.tiers.len());

        info!(year, periods = schedule.len(), "reconciliation started");

        for tier in &self.tiers {
            let before = CoverageReport::compute(&schedule, store.all());
            let source = tier.source();

            let (stats, skipped) = if before.is_complete() {
                info!(tier = %source, "coverage complete, skipping tier");
                (TierStats::default(), true)
            } else {
                let ctx = QueryContext {
                    year,
                    uncovered: before.uncovered(&schedule),
                };
                let mut intake = Intake::new(&mut store, &self.topic, year, self.max_records);
                let stats = tier
                    .discover(self.source.as_ref(), &ctx, &mut intake)
                    .await?;
                (stats, false)
            };

            let after = CoverageReport::compute(&schedule, store.all());
            phase = phase.next();
            info!(
                ?phase,
                tier = %source,
                queries = stats.queries,
                failures = stats.failures,
                inserted = stats.inserted,
                covered = after.covered,
                total = after.total,
                "tier finished"
            );
            trace.push(TierTrace {
                phase,
                source,
                skipped,
                stats,
                covered_after: after.covered,
            });
        }

        let coverage = CoverageReport::compute(&schedule, store.all());
        if store.is_empty() {
            warn!(year, "no tier produced a record");
        }
        let records = store.into_sorted();
        phase = phase.next();

        info!(
            records = records.len(),
            covered = coverage.covered,
            total = coverage.total,
            unmatched = ?coverage.unmatched_months,
            "reconciliation finished"
        );

        Ok(ReconciliationOutcome {
            schedule,
            records,
            coverage,
            trace,
            phase,
        })
    }
}
