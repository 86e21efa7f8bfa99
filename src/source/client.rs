use crate::core::types::RawCandidate;
use crate::http::error::FetchError;
use async_trait::async_trait;

/// The external market listing, seen through the three query shapes the
/// discovery tiers need.
#[async_trait]
pub trait MarketSource: Send + Sync + 'static {
    /// `Ok(None)` when the identifier does not exist.
    async fn fetch_by_id(&self, identifier: &str) -> Result<Option<RawCandidate>, FetchError>;

    async fn search_by_tag(&self, tag: &str, limit: u32) -> Result<Vec<RawCandidate>, FetchError>;

    async fn search_by_text(&self, phrase: &str, limit: u32) -> Result<Vec<RawCandidate>, FetchError>;
}
