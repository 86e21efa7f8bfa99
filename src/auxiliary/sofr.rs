use crate::config::config::SofrCfg;
use crate::http::error::FetchError;
use crate::http::fetcher::JsonFetcher;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatePoint {
    pub date: String,
    pub rate: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefRate {
    effective_date: String,
    #[serde(default)]
    percent_rate: Option<f64>,
}

/// Recent SOFR prints, oldest first. Rows without a rate are skipped.
pub async fn fetch_sofr(fetcher: &dyn JsonFetcher, cfg: &SofrCfg) -> Result<Vec<RatePoint>, FetchError> {
    let body = fetcher.fetch_json(&cfg.url, &[]).await?;
    parse_ref_rates(&cfg.url, &body)
}

fn parse_ref_rates(url: &str, body: &Value) -> Result<Vec<RatePoint>, FetchError> {
    let rows = body
        .get("refRates")
        .cloned()
        .ok_or_else(|| FetchError::Decode {
            url: url.to_string(),
            reason: "missing refRates".to_string(),
        })?;
    let rows: Vec<Value> = serde_json::from_value(rows).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let mut points: Vec<RatePoint> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value::<RefRate>(row).ok())
        .filter_map(|r| {
            Some(RatePoint {
                rate: r.percent_rate?,
                date: r.effective_date,
            })
        })
        .collect();
    points.sort_by(|a, b| a.date.cmp(&b.date));
    Ok(points)
}
