use crate::output::aggregator::Document;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn write(&self, doc: &Document) -> Result<()>;
}

/// Pretty-printed JSON at a fixed path; parent directories are created.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSink for JsonFileSink {
    async fn write(&self, doc: &Document) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let body = serde_json::to_string_pretty(doc).context("serializing document")?;
        tokio::fs::write(&self.path, body)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;

        info!(
            path = %self.path.display(),
            records = doc.reconciled_records.len(),
            "document written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auxiliary::AuxiliaryData;
    use crate::core::clock::ClockContext;
    use crate::discovery::coordinator::{ReconciliationOutcome, RunPhase};
    use crate::discovery::coverage::CoverageReport;
    use crate::output::aggregator::assemble;
    use crate::schedule::provider::ScheduleProvider;

    #[tokio::test]
    async fn test_writes_into_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("rate_data.json");
        let clock = ClockContext::at_date(2026, 1, 5).unwrap();
        let schedule = ScheduleProvider::new().build(2026, &clock);
        let coverage = CoverageReport::compute(&schedule, &[]);
        let doc = assemble(
            2026,
            ReconciliationOutcome {
                schedule,
                records: Vec::new(),
                coverage,
                trace: Vec::new(),
                phase: RunPhase::Finalized,
            },
            AuxiliaryData::default(),
            &clock,
        );

        JsonFileSink::new(&path).write(&doc).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["meta"]["year"], 2026);
        assert_eq!(written["schedule"].as_array().unwrap().len(), 8);
        assert!(written["reconciled_records"].as_array().unwrap().is_empty());
    }
}
