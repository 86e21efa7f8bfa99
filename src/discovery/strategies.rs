use crate::config::config::{DiscoveryCfg, ProbeCfg};
use crate::core::types::{DiscoverySource, SchedulePeriod, month_name};
use crate::discovery::filter::AcceptWindow;
use crate::discovery::intake::{DiscoveryError, Intake, Offer};
use crate::source::client::MarketSource;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

pub struct QueryContext<'a> {
    pub year: i32,
    /// Schedule periods no earlier tier has covered.
    pub uncovered: Vec<&'a SchedulePeriod>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierStats {
    pub queries: usize,
    pub failures: usize,
    pub offered: usize,
    pub inserted: usize,
}

impl TierStats {
    fn absorb(&mut self, offer: Offer) {
        self.offered += 1;
        if offer == Offer::Inserted {
            self.inserted += 1;
        }
    }
}

/// One discovery tier. Query failures are absorbed here (logged, counted,
/// treated as "no candidates"); only a store ceiling breach escapes.
#[async_trait]
pub trait DiscoveryStrategy: Send + Sync {
    fn source(&self) -> DiscoverySource;

    async fn discover(
        &self,
        market: &dyn MarketSource,
        ctx: &QueryContext<'_>,
        intake: &mut Intake<'_>,
    ) -> Result<TierStats, DiscoveryError>;
}

fn fill(template: &str, year: i32) -> String {
    template
        .replace("{next_year}", &year.saturating_add(1).to_string())
        .replace("{year}", &year.to_string())
}

fn decision_slug(template: &str, period: &SchedulePeriod) -> String {
    template.replace("{month}", month_name(period.month).unwrap_or_default())
}

// ---------- exact lookup ----------

pub struct ExactLookup {
    decision_template: String,
    annual_templates: Vec<String>,
    window: AcceptWindow,
}

impl ExactLookup {
    pub fn new(cfg: &DiscoveryCfg) -> Self {
        Self {
            decision_template: cfg.decision_slug_template.clone(),
            annual_templates: cfg.annual_slug_templates.clone(),
            window: cfg.windows.exact,
        }
    }
}

#[async_trait]
impl DiscoveryStrategy for ExactLookup {
    fn source(&self) -> DiscoverySource {
        DiscoverySource::ExactLookup
    }

    async fn discover(
        &self,
        market: &dyn MarketSource,
        ctx: &QueryContext<'_>,
        intake: &mut Intake<'_>,
    ) -> Result<TierStats, DiscoveryError> {
        let mut stats = TierStats::default();
        let ids = ctx
            .uncovered
            .iter()
            .map(|p| decision_slug(&self.decision_template, p))
            .chain(self.annual_templates.iter().map(|t| fill(t, ctx.year)));

        for id in ids {
            stats.queries += 1;
            match market.fetch_by_id(&id).await {
                Ok(Some(candidate)) => {
                    let offer = intake.offer(candidate, self.source(), self.window)?;
                    stats.absorb(offer);
                }
                Ok(None) => debug!(%id, "no event for identifier"),
                Err(e) => {
                    stats.failures += 1;
                    warn!(%id, error = %e, "exact lookup failed");
                }
            }
        }
        Ok(stats)
    }
}

// ---------- tag search ----------

pub struct TagSearch {
    tags: Vec<String>,
    limit: u32,
    window: AcceptWindow,
}

impl TagSearch {
    pub fn new(cfg: &DiscoveryCfg) -> Self {
        Self {
            tags: cfg.tags.clone(),
            limit: cfg.tag_page_limit,
            window: cfg.windows.tag,
        }
    }
}

#[async_trait]
impl DiscoveryStrategy for TagSearch {
    fn source(&self) -> DiscoverySource {
        DiscoverySource::TagSearch
    }

    async fn discover(
        &self,
        market: &dyn MarketSource,
        _ctx: &QueryContext<'_>,
        intake: &mut Intake<'_>,
    ) -> Result<TierStats, DiscoveryError> {
        let mut stats = TierStats::default();
        for tag in &self.tags {
            stats.queries += 1;
            match market.search_by_tag(tag, self.limit).await {
                Ok(candidates) => {
                    debug!(%tag, n = candidates.len(), "tag results");
                    for c in candidates {
                        stats.absorb(intake.offer(c, self.source(), self.window)?);
                    }
                }
                Err(e) => {
                    stats.failures += 1;
                    warn!(%tag, error = %e, "tag search failed");
                }
            }
        }
        Ok(stats)
    }
}

// ---------- free-text search ----------

pub struct TextSearch {
    queries: Vec<String>,
    limit: u32,
    window: AcceptWindow,
}

impl TextSearch {
    pub fn new(cfg: &DiscoveryCfg) -> Self {
        Self {
            queries: cfg.text_queries.clone(),
            limit: cfg.text_page_limit,
            window: cfg.windows.text,
        }
    }
}

#[async_trait]
impl DiscoveryStrategy for TextSearch {
    fn source(&self) -> DiscoverySource {
        DiscoverySource::TextSearch
    }

    async fn discover(
        &self,
        market: &dyn MarketSource,
        ctx: &QueryContext<'_>,
        intake: &mut Intake<'_>,
    ) -> Result<TierStats, DiscoveryError> {
        let mut stats = TierStats::default();
        for template in &self.queries {
            let phrase = fill(template, ctx.year);
            stats.queries += 1;
            match market.search_by_text(&phrase, self.limit).await {
                Ok(candidates) => {
                    debug!(%phrase, n = candidates.len(), "text results");
                    for c in candidates {
                        stats.absorb(intake.offer(c, self.source(), self.window)?);
                    }
                }
                Err(e) => {
                    stats.failures += 1;
                    warn!(%phrase, error = %e, "text search failed");
                }
            }
        }
        Ok(stats)
    }
}

// ---------- enumerative probe ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Found { identifier: String, attempts: usize },
    NotFound { attempts: usize },
}

/// `1..=small_max`, then multiples of `large_step` above it up to `large_max`.
pub fn probe_suffixes(cfg: &ProbeCfg) -> Vec<u32> {
    let step = cfg.large_step.max(1) as usize;
    (1..=cfg.small_max)
        .chain(
            (step as u32..=cfg.large_max)
                .step_by(step)
                .filter(|n| *n > cfg.small_max),
        )
        .collect()
}

pub struct EnumerativeProbe {
    decision_template: String,
    suffixes: Vec<u32>,
    budget: usize,
    window: AcceptWindow,
}

impl EnumerativeProbe {
    pub fn new(cfg: &DiscoveryCfg) -> Self {
        Self {
            decision_template: cfg.decision_slug_template.clone(),
            suffixes: probe_suffixes(&cfg.probe),
            budget: cfg.probe.budget,
            window: cfg.windows.probe,
        }
    }

    /// Tries suffixed identifiers for one period until one is admitted or the
    /// budget runs out.
    async fn probe_period(
        &self,
        market: &dyn MarketSource,
        period: &SchedulePeriod,
        intake: &mut Intake<'_>,
        stats: &mut TierStats,
    ) -> Result<ProbeOutcome, DiscoveryError> {
        let base = decision_slug(&self.decision_template, period);
        let mut attempts = 0;

        for suffix in self.suffixes.iter().take(self.budget) {
            let id = format!("{}-{}", base, suffix);
            attempts += 1;
            stats.queries += 1;
            match market.fetch_by_id(&id).await {
                Ok(Some(candidate)) => {
                    let offer = intake.offer(candidate, self.source(), self.window)?;
                    stats.absorb(offer);
                    if offer == Offer::Inserted {
                        return Ok(ProbeOutcome::Found {
                            identifier: id,
                            attempts,
                        });
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    stats.failures += 1;
                    debug!(%id, error = %e, "probe failed");
                }
            }
        }
        Ok(ProbeOutcome::NotFound { attempts })
    }
}

#[async_trait]
impl DiscoveryStrategy for EnumerativeProbe {
    fn source(&self) -> DiscoverySource {
        DiscoverySource::EnumerativeProbe
    }

    async fn discover(
        &self,
        market: &dyn MarketSource,
        ctx: &QueryContext<'_>,
        intake: &mut Intake<'_>,
    ) -> Result<TierStats, DiscoveryError> {
        let mut stats = TierStats::default();
        for period in &ctx.uncovered {
            match self.probe_period(market, period, intake, &mut stats).await? {
                ProbeOutcome::Found {
                    identifier,
                    attempts,
                } => info!(month = period.month, %identifier, attempts, "probe hit"),
                ProbeOutcome::NotFound { attempts } => {
                    warn!(month = period.month, attempts, "probe budget exhausted, month stays unmatched")
                }
            }
        }
        Ok(stats)
    }
}

/// The four tiers in precedence order.
pub fn tiers(cfg: &DiscoveryCfg) -> Vec<Box<dyn DiscoveryStrategy>> {
    vec![
        Box::new(ExactLookup::new(cfg)),
        Box::new(TagSearch::new(cfg)),
        Box::new(TextSearch::new(cfg)),
        Box::new(EnumerativeProbe::new(cfg)),
    ]
}
