use crate::core::types::{RawCandidate, RawSubItem};
use crate::http::error::FetchError;
use crate::source::client::MarketSource;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    ById(String),
    Tag(String),
    Text(String),
}

/// In-memory market source with canned answers and a call log.
#[derive(Default)]
pub struct ScriptedSource {
    by_id: HashMap<String, RawCandidate>,
    by_tag: HashMap<String, Vec<RawCandidate>>,
    by_text: HashMap<String, Vec<RawCandidate>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<SourceCall>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, identifier: &str, candidate: RawCandidate) -> Self {
        self.by_id.insert(identifier.to_string(), candidate);
        self
    }

    pub fn with_tag(mut self, tag: &str, candidates: Vec<RawCandidate>) -> Self {
        self.by_tag.insert(tag.to_string(), candidates);
        self
    }

    pub fn with_text(mut self, phrase: &str, candidates: Vec<RawCandidate>) -> Self {
        self.by_text.insert(phrase.to_string(), candidates);
        self
    }

    /// Any query whose key (identifier, tag, or phrase) equals `key` fails with a transport error.
    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn id_lookups(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SourceCall::ById(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: SourceCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, key: &str) -> Result<(), FetchError> {
        if self.failing.contains(key) {
            return Err(FetchError::Transport {
                url: format!("scripted://{}", key),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MarketSource for ScriptedSource {
    async fn fetch_by_id(&self, identifier: &str) -> Result<Option<RawCandidate>, FetchError> {
        self.record(SourceCall::ById(identifier.to_string()));
        self.check(identifier)?;
        Ok(self.by_id.get(identifier).cloned())
    }

    async fn search_by_tag(&self, tag: &str, _limit: u32) -> Result<Vec<RawCandidate>, FetchError> {
        self.record(SourceCall::Tag(tag.to_string()));
        self.check(tag)?;
        Ok(self.by_tag.get(tag).cloned().unwrap_or_default())
    }

    async fn search_by_text(&self, phrase: &str, _limit: u32) -> Result<Vec<RawCandidate>, FetchError> {
        self.record(SourceCall::Text(phrase.to_string()));
        self.check(phrase)?;
        Ok(self.by_text.get(phrase).cloned().unwrap_or_default())
    }
}

/// A decision event as the listing would publish it, with one yes/no market.
pub fn decision_event(identifier: &str, title: &str, end_date: &str) -> RawCandidate {
    RawCandidate {
        identifier: identifier.to_string(),
        title: title.to_string(),
        resolution_date: Some(end_date.to_string()),
        closed: false,
        sub_items: vec![RawSubItem {
            question: format!("{} - 25 bps decrease", title),
            group_item_title: "25 bps decrease".to_string(),
            outcomes: vec!["Yes".to_string(), "No".to_string()],
            prices: vec![Decimal::new(30, 2), Decimal::new(70, 2)],
            volume: Decimal::new(1000, 0),
            liquidity: Decimal::new(250, 0),
        }],
    }
}
