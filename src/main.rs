mod auxiliary;
mod config;
mod core;
mod discovery;
mod http;
mod normalize;
mod output;
mod schedule;
mod source;

use anyhow::{Context, Result};
use crate::config::config::AppCfg;
use crate::core::clock::ClockContext;
use crate::discovery::coordinator::ReconciliationCoordinator;
use crate::http::fetcher::{HttpFetcher, build_client};
use crate::output::aggregator::assemble;
use crate::output::sink::{DocumentSink, JsonFileSink};
use crate::schedule::provider::ScheduleProvider;
use crate::source::gamma::GammaSource;
use std::sync::Arc;
use tracing::{Instrument, info, info_span, warn};
use tracing_subscriber::EnvFilter;

async fn run(cfg: &AppCfg, clock: ClockContext) -> Result<()> {
    let year = cfg.run.year.unwrap_or_else(|| clock.year());
    info!(year, today = %clock.today_iso(), "Collecting");

    info!("Initializing Client");
    let client = build_client(&cfg.http)?;
    let fetcher = Arc::new(HttpFetcher::new(
        client,
        cfg.polymarket.requests_per_second,
    ));

    let source = Arc::new(GammaSource::new(&cfg.polymarket, fetcher.clone()));
    let schedule = ScheduleProvider::new().with_known_years(&cfg.schedule.known_years);
    if !schedule.is_known(year) {
        warn!(year, "no meeting table for year, using default cadence");
    }

    let coordinator = ReconciliationCoordinator::new(source, schedule, clock, &cfg.discovery);
    let (outcome, aux) = tokio::join!(
        coordinator
            .run(year)
            .instrument(info_span!("Discovery")),
        auxiliary::collect(fetcher.as_ref(), &cfg.auxiliary)
            .instrument(info_span!("Auxiliary")),
    );
    let outcome = outcome.context("discovery aborted")?;

    let doc = assemble(year, outcome, aux, &clock);
    JsonFileSink::new(&cfg.output.path)
        .write(&doc)
        .await
        .context("persisting document")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    dotenv::dotenv().ok();

    let cfg = AppCfg::load("config.yml")?;

    let span = info_span!(
        "Supervisor",
        pid = %std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
    );
    let _enter = span.enter();

    info!("Starting up");
    let clock = ClockContext::system();

    tokio::select! {
        res = run(&cfg, clock) => res?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Ctrl-C received, nothing written");
            return Ok(());
        }
    }

    info!("Supervisor exit");
    Ok(())
}
