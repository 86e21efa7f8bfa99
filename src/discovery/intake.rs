use crate::core::types::{
    DiscoverySource, MONTHS, RawCandidate, RawSubItem, ReconciledRecord, RecordKind, SubItem,
};
use crate::discovery::filter::{self, AcceptWindow};
use crate::discovery::relevance::TopicMatcher;
use crate::discovery::store::CandidateStore;
use crate::normalize::outcome::{LabelSource, classify_outcome};
use crate::normalize::{normalize_outcome, normalize_title};
use thiserror::Error;
use tracing::debug;

/// The one failure that ends a run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("candidate store is full ({limit} records); refusing to grow further")]
    ResourceExhausted { limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Inserted,
    /// Identifier already held; the earlier record stands.
    Duplicate,
    Irrelevant,
    OutOfWindow,
}

/// The single path from a raw candidate into the store: dedup, topic check,
/// temporal filter, normalization, insert.
pub struct Intake<'a> {
    store: &'a mut CandidateStore,
    topic: &'a TopicMatcher,
    target_year: i32,
    max_records: usize,
}

impl<'a> Intake<'a> {
    pub fn new(
        store: &'a mut CandidateStore,
        topic: &'a TopicMatcher,
        target_year: i32,
        max_records: usize,
    ) -> Self {
        Self {
            store,
            topic,
            target_year,
            max_records,
        }
    }

    pub fn offer(
        &mut self,
        candidate: RawCandidate,
        source: DiscoverySource,
        window: AcceptWindow,
    ) -> Result<Offer, DiscoveryError> {
        if self.store.contains(&candidate.identifier) {
            return Ok(Offer::Duplicate);
        }
        if !self.topic.is_relevant(&candidate.title) {
            debug!(id = %candidate.identifier, title = %candidate.title, "off-topic");
            return Ok(Offer::Irrelevant);
        }
        if !filter::accept(&candidate, self.target_year, window) {
            debug!(id = %candidate.identifier, date = ?candidate.resolution_date, "outside year window");
            return Ok(Offer::OutOfWindow);
        }
        if self.store.len() >= self.max_records {
            return Err(DiscoveryError::ResourceExhausted {
                limit: self.max_records,
            });
        }

        let inserted = self.store.insert(reconcile(candidate, source));
        debug_assert!(inserted);
        Ok(Offer::Inserted)
    }
}

pub fn classify_kind(title: &str) -> RecordKind {
    let t = title.to_lowercase();
    let about_meeting = t.contains("fed decision") || t.contains("fomc");
    if about_meeting && MONTHS.iter().any(|m| t.contains(m)) {
        RecordKind::Decision
    } else {
        RecordKind::Other
    }
}

/// Group titles are usually outcome-shaped ("25 bps decrease") but sometimes
/// question-shaped; try the outcome table first.
fn normalize_group_title(raw: &str) -> String {
    let label = classify_outcome(raw);
    match label.via {
        LabelSource::Passthrough => normalize_title(&label.text),
        _ => label.text,
    }
}

fn reconcile_sub_item(raw: RawSubItem) -> SubItem {
    SubItem {
        question_normalized: normalize_title(&raw.question),
        group_item_title_normalized: normalize_group_title(&raw.group_item_title),
        outcome_labels_normalized: raw.outcomes.iter().map(|o| normalize_outcome(o)).collect(),
        question_raw: raw.question,
        group_item_title_raw: raw.group_item_title,
        outcome_labels_raw: raw.outcomes,
        implied_prices: raw.prices,
        volume: raw.volume,
        liquidity: raw.liquidity,
    }
}

pub fn reconcile(candidate: RawCandidate, source: DiscoverySource) -> ReconciledRecord {
    ReconciledRecord {
        title_normalized: normalize_title(&candidate.title),
        kind: classify_kind(&candidate.title),
        identifier: candidate.identifier,
        title_raw: candidate.title,
        resolution_date: candidate.resolution_date,
        closed: candidate.closed,
        sub_items: candidate
            .sub_items
            .into_iter()
            .map(reconcile_sub_item)
            .collect(),
        discovery_source: source,
    }
}
