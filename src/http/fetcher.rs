use crate::config::config::HttpCfg;
use crate::http::error::FetchError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

/// `fetch(url, params) -> parsed JSON | failure`. Never panics and never
/// treats a non-2xx response as success.
#[async_trait]
pub trait JsonFetcher: Send + Sync + 'static {
    async fn fetch_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value, FetchError>;
}

pub fn build_client(cfg: &HttpCfg) -> Result<Client> {
    Client::builder()
        .user_agent(cfg.user_agent.clone())
        .pool_idle_timeout(cfg.pool_idle_timeout)
        .pool_max_idle_per_host(cfg.pool_max_idle_per_host)
        .tcp_keepalive(cfg.tcp_keep_alive)
        .timeout(cfg.timeout)
        .build()
        .context("building http client")
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl HttpFetcher {
    pub fn new(client: Client, requests_per_second: u32) -> Self {
        let rps = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rps)));
        Self { client, limiter }
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value, FetchError> {
        self.limiter.until_ready().await;

        let res = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                reason: if e.is_timeout() {
                    "timed out".to_string()
                } else {
                    e.to_string()
                },
            })?;

        let status = res.status();
        if !status.is_success() {
            debug!(%url, %status, "non-success response");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        res.json::<Value>().await.map_err(|e| FetchError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        let cfg = HttpCfg {
            timeout: Duration::from_secs(2),
            ..Default::default()
        };
        let fetcher = HttpFetcher::new(build_client(&cfg).unwrap(), 0);

        let res = fetcher
            .fetch_json("http://127.0.0.1:1/events", &[("slug", "x".to_string())])
            .await;

        match res {
            Err(FetchError::Transport { url, .. }) => assert_eq!(url, "http://127.0.0.1:1/events"),
            other => panic!("expected transport failure, got {:?}", other),
        }
    }
}
