use crate::core::types::ReconciledRecord;
use crate::discovery::filter::parse_resolution_date;
use ahash::AHashMap;

/// Identifier-keyed record set. First write wins; a later record with the
/// same identifier is dropped without error. Iteration is insertion order.
#[derive(Debug, Default)]
pub struct CandidateStore {
    index: AHashMap<String, usize>,
    records: Vec<ReconciledRecord>,
}

impl CandidateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if the record was new, `false` if its identifier was already held.
    pub fn insert(&mut self, record: ReconciledRecord) -> bool {
        if self.index.contains_key(&record.identifier) {
            return false;
        }
        self.index
            .insert(record.identifier.clone(), self.records.len());
        self.records.push(record);
        true
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    #[cfg(test)]
    pub fn get(&self, identifier: &str) -> Option<&ReconciledRecord> {
        self.index.get(identifier).map(|&i| &self.records[i])
    }

    pub fn all(&self) -> &[ReconciledRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_sorted(self) -> Vec<ReconciledRecord> {
        let mut records = self.records;
        sort_by_resolution_date(&mut records);
        records
    }
}

/// Ascending by resolution date; undated records go last, ties keep their order.
pub fn sort_by_resolution_date(records: &mut [ReconciledRecord]) {
    records.sort_by_key(|r| {
        let date = r.resolution_date.as_deref().and_then(parse_resolution_date);
        (date.is_none(), date)
    });
}
