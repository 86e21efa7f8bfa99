use crate::config::config::KalshiCfg;
use crate::http::error::FetchError;
use crate::http::fetcher::JsonFetcher;
use crate::normalize::normalize_title;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KalshiMarket {
    pub ticker: String,
    pub title: String,
    pub title_normalized: String,
    pub subtitle: String,
    pub subtitle_normalized: String,
    pub yes_bid: Option<f64>,
    pub yes_ask: Option<f64>,
    pub last_price: Option<f64>,
    pub volume: Option<f64>,
    pub open_interest: Option<f64>,
    pub close_time: String,
    pub expiration_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KalshiSeries {
    pub series_ticker: String,
    pub markets: Vec<KalshiMarket>,
}

fn text(m: &Value, key: &str) -> String {
    m.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn number(m: &Value, key: &str) -> Option<f64> {
    match m.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_market(m: &Value) -> Option<KalshiMarket> {
    let ticker = text(m, "ticker");
    if ticker.is_empty() {
        return None;
    }
    let title = text(m, "title");
    let subtitle = text(m, "subtitle");
    Some(KalshiMarket {
        title_normalized: normalize_title(&title),
        subtitle_normalized: normalize_title(&subtitle),
        ticker,
        title,
        subtitle,
        yes_bid: number(m, "yes_bid"),
        yes_ask: number(m, "yes_ask"),
        last_price: number(m, "last_price"),
        volume: number(m, "volume"),
        open_interest: number(m, "open_interest"),
        close_time: text(m, "close_time"),
        expiration_time: text(m, "expiration_time"),
    })
}

async fn fetch_series(
    fetcher: &dyn JsonFetcher,
    cfg: &KalshiCfg,
    ticker: &str,
) -> Result<Vec<KalshiMarket>, FetchError> {
    let url = format!("{}/markets", cfg.base_url);
    let body = fetcher
        .fetch_json(
            &url,
            &[
                ("series_ticker", ticker.to_string()),
                ("status", "open".to_string()),
                ("limit", cfg.page_limit.to_string()),
            ],
        )
        .await?;
    let markets = body
        .get("markets")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::Decode {
            url: url.clone(),
            reason: "missing markets".to_string(),
        })?;
    Ok(markets.iter().filter_map(parse_market).collect())
}

/// Open markets per configured series. A failed or empty series is left out.
pub async fn fetch_kalshi(fetcher: &dyn JsonFetcher, cfg: &KalshiCfg) -> Vec<KalshiSeries> {
    let mut out = Vec::new();
    for ticker in &cfg.series_tickers {
        match fetch_series(fetcher, cfg, ticker).await {
            Ok(markets) if markets.is_empty() => debug!(%ticker, "no open markets"),
            Ok(markets) => {
                debug!(%ticker, n = markets.len(), "series fetched");
                out.push(KalshiSeries {
                    series_ticker: ticker.clone(),
                    markets,
                });
            }
            Err(e) => warn!(%ticker, error = %e, "Kalshi series fetch failed"),
        }
    }
    out
}
