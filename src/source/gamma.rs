use crate::config::config::PolyCfg;
use crate::core::types::{RawCandidate, RawSubItem};
use crate::http::error::FetchError;
use crate::http::fetcher::JsonFetcher;
use crate::source::client::MarketSource;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GammaMarket {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    group_item_title: Option<String>,
    // JSON-encoded arrays on the wire, e.g. "[\"Yes\", \"No\"]"
    #[serde(default)]
    outcomes: Option<Value>,
    #[serde(default)]
    outcome_prices: Option<Value>,
    #[serde(default)]
    volume: Option<Value>,
    #[serde(default)]
    liquidity: Option<Value>,
}

pub struct GammaSource<F: JsonFetcher> {
    fetcher: Arc<F>,
    events_url: String,
}

impl<F: JsonFetcher> GammaSource<F> {
    pub fn new(cfg: &PolyCfg, fetcher: Arc<F>) -> Self {
        Self {
            fetcher,
            events_url: cfg.gamma_events_url.clone(),
        }
    }

    async fn fetch_events(&self, params: &[(&str, String)]) -> Result<Vec<RawCandidate>, FetchError> {
        let body = self.fetcher.fetch_json(&self.events_url, params).await?;
        Ok(parse_events(&body))
    }
}

#[async_trait]
impl<F: JsonFetcher> MarketSource for GammaSource<F> {
    async fn fetch_by_id(&self, identifier: &str) -> Result<Option<RawCandidate>, FetchError> {
        match self.fetch_events(&[("slug", identifier.to_string())]).await {
            Ok(events) => Ok(events.into_iter().find(|c| c.identifier == identifier)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn search_by_tag(&self, tag: &str, limit: u32) -> Result<Vec<RawCandidate>, FetchError> {
        self.fetch_events(&[
            ("tag", tag.to_string()),
            ("active", "true".to_string()),
            ("closed", "false".to_string()),
            ("limit", limit.to_string()),
        ])
        .await
    }

    async fn search_by_text(&self, phrase: &str, limit: u32) -> Result<Vec<RawCandidate>, FetchError> {
        self.fetch_events(&[
            ("title", phrase.to_string()),
            ("active", "true".to_string()),
            ("closed", "false".to_string()),
            ("limit", limit.to_string()),
        ])
        .await
    }
}

/// The events endpoint answers with a list, or with a bare object for some
/// slug lookups. Anything else is treated as no events.
pub fn parse_events(body: &Value) -> Vec<RawCandidate> {
    match body {
        Value::Array(items) => items.iter().filter_map(parse_event).collect(),
        Value::Object(obj) if obj.get("slug").and_then(Value::as_str).is_some() => {
            parse_event(body).into_iter().collect()
        }
        _ => {
            debug!("events payload is neither a list nor an event");
            Vec::new()
        }
    }
}

/// `None` only when the event has no usable slug. Malformed markets are
/// dropped one by one; the event survives.
pub fn parse_event(ev: &Value) -> Option<RawCandidate> {
    let identifier = ev.get("slug").and_then(Value::as_str)?.trim();
    if identifier.is_empty() {
        return None;
    }

    let sub_items = ev
        .get("markets")
        .and_then(Value::as_array)
        .map(|markets| {
            markets
                .iter()
                .enumerate()
                .filter_map(|(i, m)| match parse_market(m) {
                    Ok(item) => Some(item),
                    Err(reason) => {
                        warn!(event = identifier, index = i, %reason, "dropping malformed market");
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    Some(RawCandidate {
        identifier: identifier.to_string(),
        title: ev
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        resolution_date: ev
            .get("endDate")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        closed: ev.get("closed").and_then(Value::as_bool).unwrap_or(false),
        sub_items,
    })
}

fn parse_market(v: &Value) -> Result<RawSubItem, String> {
    let m: GammaMarket = serde_json::from_value(v.clone()).map_err(|e| e.to_string())?;

    let outcomes = match &m.outcomes {
        Some(v) => string_list(v).map_err(|e| format!("outcomes: {}", e))?,
        None => Vec::new(),
    };
    let prices = match &m.outcome_prices {
        Some(v) => string_list(v)
            .map_err(|e| format!("outcomePrices: {}", e))?
            .iter()
            .map(|p| parse_probability(p).ok_or_else(|| format!("bad price {:?}", p)))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(RawSubItem {
        question: m.question.unwrap_or_default(),
        group_item_title: m.group_item_title.unwrap_or_default(),
        outcomes,
        prices,
        volume: m.volume.as_ref().and_then(decimal_from_value).unwrap_or_default(),
        liquidity: m
            .liquidity
            .as_ref()
            .and_then(decimal_from_value)
            .unwrap_or_default(),
    })
}

/// Accepts a JSON array, or a string holding a JSON-encoded array. Elements
/// may be strings or numbers.
fn string_list(v: &Value) -> Result<Vec<String>, String> {
    let decoded;
    let items = match v {
        Value::Array(items) => items,
        Value::String(s) if s.trim().is_empty() => return Ok(Vec::new()),
        Value::String(s) => {
            decoded = serde_json::from_str::<Value>(s).map_err(|e| e.to_string())?;
            decoded.as_array().ok_or("not an array")?
        }
        Value::Null => return Ok(Vec::new()),
        _ => return Err("not an array".to_string()),
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(format!("unexpected element {}", other)),
        })
        .collect()
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str_exact(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn parse_probability(s: &str) -> Option<Decimal> {
    parse_decimal(s).filter(|p| *p >= Decimal::ZERO && *p <= Decimal::ONE)
}

fn decimal_from_value(v: &Value) -> Option<Decimal> {
    match v {
        Value::String(s) => parse_decimal(s),
        Value::Number(n) => parse_decimal(&n.to_string()),
        _ => None,
    }
}
