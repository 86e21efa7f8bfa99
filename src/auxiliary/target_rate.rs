use crate::config::config::TargetRateCfg;
use crate::http::error::FetchError;
use crate::http::fetcher::JsonFetcher;
use serde::{Deserialize, Serialize};

/// The FOMC target range in force on `effective_date`, with the effective
/// fed funds rate printed that day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetRate {
    pub effective_date: String,
    pub lower: f64,
    pub upper: f64,
    pub effective_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EffrRow {
    effective_date: String,
    #[serde(default)]
    percent_rate: Option<f64>,
    target_rate_from: f64,
    target_rate_to: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EffrEnvelope {
    ref_rates: Vec<EffrRow>,
}

pub async fn fetch_target_rate(fetcher: &dyn JsonFetcher, cfg: &TargetRateCfg) -> Result<TargetRate, FetchError> {
    let body = fetcher.fetch_json(&cfg.url, &[]).await?;
    let decode = |reason: String| FetchError::Decode {
        url: cfg.url.clone(),
        reason,
    };

    let envelope: EffrEnvelope = serde_json::from_value(body).map_err(|e| decode(e.to_string()))?;
    let latest = envelope
        .ref_rates
        .into_iter()
        .max_by(|a, b| a.effective_date.cmp(&b.effective_date))
        .ok_or_else(|| decode("no EFFR rows".to_string()))?;

    Ok(TargetRate {
        effective_date: latest.effective_date,
        lower: latest.target_rate_from,
        upper: latest.target_rate_to,
        effective_rate: latest.percent_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::scripted::ScriptedFetcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_latest_row_wins() {
        let cfg = TargetRateCfg::default();
        let fetcher = ScriptedFetcher::new().respond(
            &cfg.url,
            json!({"refRates": [
                {"effectiveDate": "2026-10-15", "percentRate": 4.33, "targetRateFrom": 4.25, "targetRateTo": 4.5},
                {"effectiveDate": "2026-10-16", "percentRate": 4.08, "targetRateFrom": 4.0, "targetRateTo": 4.25}
            ]}),
        );

        let rate = fetch_target_rate(&fetcher, &cfg).await.unwrap();
        assert_eq!(rate.effective_date, "2026-10-16");
        assert_eq!(rate.lower, 4.0);
        assert_eq!(rate.upper, 4.25);
        assert_eq!(rate.effective_rate, Some(4.08));
    }

    #[tokio::test]
    async fn test_empty_rows_is_error() {
        let cfg = TargetRateCfg::default();
        let fetcher = ScriptedFetcher::new().respond(&cfg.url, json!({"refRates": []}));
        assert!(fetch_target_rate(&fetcher, &cfg).await.is_err());
    }
}
