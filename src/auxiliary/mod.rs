pub mod kalshi;
pub mod sofr;
pub mod target_rate;

use crate::config::config::AuxCfg;
use crate::http::fetcher::JsonFetcher;
use kalshi::KalshiSeries;
use sofr::RatePoint;
use target_rate::TargetRate;
use tracing::{info, warn};

/// Side sections of the output document. `None` means disabled or failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuxiliaryData {
    pub sofr_series: Option<Vec<RatePoint>>,
    pub target_rate: Option<TargetRate>,
    pub kalshi: Option<Vec<KalshiSeries>>,
}

pub async fn collect(fetcher: &dyn JsonFetcher, cfg: &AuxCfg) -> AuxiliaryData {
    let sofr_series = if cfg.sofr.enabled {
        match sofr::fetch_sofr(fetcher, &cfg.sofr).await {
            Ok(series) => {
                info!(days = series.len(), "SOFR series fetched");
                Some(series)
            }
            Err(e) => {
                warn!(error = %e, "SOFR fetch failed");
                None
            }
        }
    } else {
        None
    };

    let target_rate = if cfg.target_rate.enabled {
        match target_rate::fetch_target_rate(fetcher, &cfg.target_rate).await {
            Ok(rate) => {
                info!(lower = rate.lower, upper = rate.upper, "target range fetched");
                Some(rate)
            }
            Err(e) => {
                warn!(error = %e, "target rate fetch failed");
                None
            }
        }
    } else {
        None
    };

    let kalshi = if cfg.kalshi.enabled {
        let series = kalshi::fetch_kalshi(fetcher, &cfg.kalshi).await;
        info!(series = series.len(), "Kalshi series fetched");
        Some(series)
    } else {
        None
    };

    AuxiliaryData {
        sofr_series,
        target_rate,
        kalshi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config::AuxCfg;
    use crate::http::scripted::ScriptedFetcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_failures_and_disabled_sections_are_none() {
        let mut cfg = AuxCfg::default();
        cfg.kalshi.enabled = false;
        let fetcher = ScriptedFetcher::new().respond(
            &cfg.target_rate.url,
            json!({"refRates": [{"effectiveDate": "2026-10-16", "percentRate": 4.11, "targetRateFrom": 4.0, "targetRateTo": 4.25}]}),
        );

        let data = collect(&fetcher, &cfg).await;
        assert_eq!(data.sofr_series, None);
        assert_eq!(data.target_rate.unwrap().upper, 4.25);
        assert_eq!(data.kalshi, None);
    }
}
